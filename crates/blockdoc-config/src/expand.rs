//! `${VAR}` and `${VAR:-default}` expansion for configuration strings.

use std::env::{self, VarError};

use crate::ConfigError;

/// Expand braced environment references in `value`.
///
/// Only the braced forms are recognized, so URLs containing a bare `$` pass
/// through untouched. `field` names the config key in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |name| env::var(name).map(Some))
    .map(std::borrow::Cow::into_owned)
    .map_err(|err| ConfigError::EnvVar {
        field: field.to_owned(),
        message: match err.cause {
            VarError::NotPresent => format!("${{{}}} not set", err.var_name),
            VarError::NotUnicode(_) => format!("${{{}}} is not valid unicode", err.var_name),
        },
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_expand_set_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            env::set_var("BLOCKDOC_EXPAND_SET", "docs.example.com");
        }
        assert_eq!(
            expand_env("https://${BLOCKDOC_EXPAND_SET}/main", "upstream.url").unwrap(),
            "https://docs.example.com/main"
        );
        unsafe {
            env::remove_var("BLOCKDOC_EXPAND_SET");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            env::remove_var("BLOCKDOC_EXPAND_UNSET");
        }
        assert_eq!(
            expand_env("${BLOCKDOC_EXPAND_UNSET:-/}", "book.base_url").unwrap(),
            "/"
        );
    }

    #[test]
    fn test_expand_missing_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            env::remove_var("BLOCKDOC_EXPAND_MISSING");
        }
        let err = expand_env("${BLOCKDOC_EXPAND_MISSING}", "server.host").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert_eq!(
            err.to_string(),
            "Environment variable error in server.host: ${BLOCKDOC_EXPAND_MISSING} not set"
        );
    }

    #[test]
    fn test_bare_dollar_is_literal() {
        assert_eq!(
            expand_env("https://example.com/$ref", "upstream.url").unwrap(),
            "https://example.com/$ref"
        );
    }
}
