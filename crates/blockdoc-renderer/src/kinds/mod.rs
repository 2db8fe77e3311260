//! Per-kind render rules, as `Converter` methods.

mod anchor;
mod blocks;
mod inline;
mod lists;
mod section;
mod table;

#[cfg(test)]
pub(crate) mod test_support {
    use blockdoc_asciidoc::{AsciiDocParser, Attributes, Document, Node, NodeKind};

    use crate::book::Book;

    /// Book resolving onto a fixed test host.
    pub(crate) struct TestBook;

    impl Book for TestBook {
        fn resolve(&self, path: &str) -> String {
            format!("https://book.test/{path}")
        }
    }

    pub(crate) static PARSER: AsciiDocParser = AsciiDocParser;

    pub(crate) fn document(blocks: Vec<Node>) -> Document {
        Document {
            root: Node::new(NodeKind::Document).with_blocks(blocks),
            attributes: Attributes::new(),
        }
    }
}
