//! Parse error types.

/// Error raised while parsing AsciiDoc source.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    /// A delimited block was opened but never closed.
    #[error("unterminated {context} block starting at line {line}")]
    UnterminatedBlock {
        /// Block context (`listing`, `table`, ...).
        context: &'static str,
        /// 1-indexed line of the opening delimiter.
        line: usize,
    },
    /// A table declared a column count that cannot be used.
    #[error("invalid table at line {line}: {message}")]
    InvalidTable {
        /// 1-indexed source line of the problem.
        line: usize,
        /// What is wrong with the table.
        message: String,
    },
}
