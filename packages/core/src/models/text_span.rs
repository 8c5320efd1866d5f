//! Rich-Text Spans
//!
//! Every textual property of a block (title, caption, link, language, ...)
//! arrives as a sequence of spans. A span is a run of text sharing the same
//! set of inline attributes (bold, link target, mention, ...).
//!
//! # Examples
//!
//! ```rust
//! use notion_model_core::models::{flatten, TextAttr, TextSpan};
//!
//! let spans = vec![
//!     TextSpan::new("Hello, "),
//!     TextSpan::new("world").with_attr(TextAttr::Bold),
//! ];
//!
//! assert_eq!(flatten(&spans), "Hello, world");
//! assert!(spans[1].is_bold());
//! ```

use serde::{Deserialize, Serialize};

/// Inline attribute attached to a span
///
/// Known attribute codes map to dedicated variants; anything else is kept
/// as `Unknown` so new attributes never break decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TextAttr {
    Bold,
    Italic,
    Strikethrough,
    /// Inline code
    Code,
    Underline,
    /// Hyperlink target URL
    Link(String),
    /// Mention of a user (user ID)
    User(String),
    /// Mention of a page (page ID)
    Page(String),
    /// Date mention, kept as the raw JSON object
    Date(serde_json::Value),
    /// Text or background colour, e.g. "red" or "yellow_background"
    Highlight(String),
    /// Discussion/comment ID anchored on this span
    Comment(String),
    /// Inline equation source
    Equation(String),
    Unknown {
        code: String,
        value: Option<serde_json::Value>,
    },
}

/// A run of text with uniform inline attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    pub text: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attrs: Vec<TextAttr>,
}

impl TextSpan {
    /// Create a plain span with no attributes
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attrs: Vec::new(),
        }
    }

    /// Add an attribute (builder style)
    pub fn with_attr(mut self, attr: TextAttr) -> Self {
        self.attrs.push(attr);
        self
    }

    /// True if the span carries no attributes at all
    pub fn is_plain(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn is_bold(&self) -> bool {
        self.attrs.contains(&TextAttr::Bold)
    }

    pub fn is_italic(&self) -> bool {
        self.attrs.contains(&TextAttr::Italic)
    }

    pub fn is_strikethrough(&self) -> bool {
        self.attrs.contains(&TextAttr::Strikethrough)
    }

    pub fn is_code(&self) -> bool {
        self.attrs.contains(&TextAttr::Code)
    }

    /// Link target, if the span is a hyperlink
    pub fn link(&self) -> Option<&str> {
        self.attrs.iter().find_map(|attr| match attr {
            TextAttr::Link(url) => Some(url.as_str()),
            _ => None,
        })
    }
}

/// Concatenate the text of every span, in order, without formatting
///
/// This is the single definition of "plain text of a rich-text field".
pub fn flatten(spans: &[TextSpan]) -> String {
    spans.iter().map(|span| span.text.as_str()).collect()
}

/// Text of the first span only, or "" when there are no spans
///
/// Single-token properties (link, source, language, size, checked) only
/// carry meaning in their first span.
pub fn first_text(spans: &[TextSpan]) -> &str {
    spans.first().map(|span| span.text.as_str()).unwrap_or("")
}
