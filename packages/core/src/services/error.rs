//! Service Layer Error Types
//!
//! Two failure kinds exist while turning raw block records into typed
//! blocks:
//!
//! - `SpanParseError`: a rich-text value isn't a valid span sequence
//! - `NormalizeError`: a block couldn't be fully normalized, either because
//!   its title spans failed to parse or because its format payload doesn't
//!   match the shape its type declares
//!
//! Both are per-block and recoverable: callers typically log, skip the
//! block and continue.

use thiserror::Error;

/// Rich-text span decoding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpanParseError {
    /// The property value isn't an array of spans
    #[error("Expected an array of spans, got {found}")]
    NotAnArray { found: &'static str },

    /// A span is structurally invalid
    #[error("Invalid span {index}: {reason}")]
    InvalidSpan { index: usize, reason: String },

    /// An attribute of a span is structurally invalid
    #[error("Invalid attribute {attr} of span {span}: {reason}")]
    InvalidAttribute {
        span: usize,
        attr: usize,
        reason: String,
    },
}

impl SpanParseError {
    /// Create an invalid span error
    pub fn invalid_span(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidSpan {
            index,
            reason: reason.into(),
        }
    }

    /// Create an invalid attribute error
    pub fn invalid_attribute(span: usize, attr: usize, reason: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            span,
            attr,
            reason: reason.into(),
        }
    }
}

/// Block normalization errors
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// A load-bearing property (the title) failed to parse
    #[error("Failed to parse '{property}' property of block {block_id}: {source}")]
    SpanParse {
        block_id: String,
        property: String,
        #[source]
        source: SpanParseError,
    },

    /// The format payload doesn't match the shape of the declared type
    #[error(
        "Failed to decode {block_type} format of block {block_id}: {source} (format: '{}')",
        String::from_utf8_lossy(.raw)
    )]
    FormatDecode {
        block_id: String,
        block_type: String,
        raw: Vec<u8>,
        #[source]
        source: serde_json::Error,
    },
}

impl NormalizeError {
    /// Create a span parse error for `property` of block `block_id`
    pub fn span_parse(
        block_id: impl Into<String>,
        property: impl Into<String>,
        source: SpanParseError,
    ) -> Self {
        Self::SpanParse {
            block_id: block_id.into(),
            property: property.into(),
            source,
        }
    }

    /// Create a format decode error carrying the offending payload
    pub fn format_decode(
        block_id: impl Into<String>,
        block_type: impl Into<String>,
        raw: impl Into<Vec<u8>>,
        source: serde_json::Error,
    ) -> Self {
        Self::FormatDecode {
            block_id: block_id.into(),
            block_type: block_type.into(),
            raw: raw.into(),
            source,
        }
    }

    /// ID of the block that failed
    pub fn block_id(&self) -> &str {
        match self {
            Self::SpanParse { block_id, .. } | Self::FormatDecode { block_id, .. } => block_id,
        }
    }

    /// True for format payload failures
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::FormatDecode { .. })
    }
}
