//! Conversion entry point.

use std::fmt;
use std::str::FromStr;

use blockdoc_asciidoc::{AsciiDocParser, Attributes, MarkupParser};

use crate::book::Book;
use crate::context::RenderContext;
use crate::converter::Converter;
use crate::error::ConvertError;
use crate::normalize::{PageScaffold, normalize_fragment};

/// Renderer set used for a conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Backend {
    /// Block-convention renderer.
    #[default]
    Blocks,
    /// The parser's basic HTML5 renderer.
    Html5,
}

impl Backend {
    /// Canonical identifier.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Blocks => "blocks",
            Self::Html5 => "html5",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Backend {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blocks" | "franklin" => Ok(Self::Blocks),
            "html5" | "html" => Ok(Self::Html5),
            _ => Err(ConvertError::UnknownBackend(s.to_owned())),
        }
    }
}

/// Options for [`convert`].
pub struct ConvertOptions<'a> {
    pub backend: Backend,
    /// Attribute overrides forwarded to the parser.
    pub attributes: Attributes,
    /// Emit a bare fragment instead of a full page.
    pub plain: bool,
    pub book: &'a dyn Book,
    /// Collection-relative path of the topic, e.g. `guide/intro.adoc`.
    pub topic_path: &'a str,
    pub scaffold: PageScaffold,
}

impl<'a> ConvertOptions<'a> {
    /// Default options for the topic at `topic_path`.
    #[must_use]
    pub fn new(book: &'a dyn Book, topic_path: &'a str) -> Self {
        Self {
            backend: Backend::default(),
            attributes: Attributes::new(),
            plain: false,
            book,
            topic_path,
            scaffold: PageScaffold::default(),
        }
    }

    #[must_use]
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_plain(mut self, plain: bool) -> Self {
        self.plain = plain;
        self
    }

    #[must_use]
    pub fn with_scaffold(mut self, scaffold: PageScaffold) -> Self {
        self.scaffold = scaffold;
        self
    }
}

/// Convert AsciiDoc source to block-convention HTML.
///
/// # Errors
///
/// Returns an error if the source cannot be parsed or the output cannot be serialized.
pub fn convert(source: &str, options: &ConvertOptions<'_>) -> Result<String, ConvertError> {
    convert_with(&AsciiDocParser::new(), source, options)
}

/// Convert source with an arbitrary markup parser.
///
/// # Errors
///
/// Returns an error if the source cannot be parsed or the output cannot be serialized.
pub fn convert_with(
    parser: &dyn MarkupParser,
    source: &str,
    options: &ConvertOptions<'_>,
) -> Result<String, ConvertError> {
    let document = parser.parse(source, &options.attributes)?;

    let html = match options.backend {
        Backend::Blocks => {
            let converter = Converter::new(parser, options.book, options.topic_path);
            converter.render(&document.root, &RenderContext::new(&document), None)
        }
        Backend::Html5 => parser.render_basic(&document.root, &document),
    };
    let fragment = normalize_fragment(&html)?;

    tracing::debug!(
        topic = options.topic_path,
        backend = %options.backend,
        bytes = fragment.len(),
        "Converted document"
    );

    if options.plain {
        Ok(fragment)
    } else {
        Ok(options.scaffold.render(document.title(), &fragment))
    }
}
