//! Normalization Services
//!
//! This module turns raw block records into typed blocks:
//!
//! - `SpanResolver` / `NotionSpanParser` - Rich-text span decoding
//! - `PropertyExtractor` - Typed reads over a block's `properties`
//! - `BlockNormalizer` - Property phase and format phase over one block
//!
//! Services are stateless apart from their collaborators and never touch
//! the network; fetching records is the caller's job.

pub mod error;
pub mod normalizer;
pub mod properties;
pub mod span_parser;

pub use error::{NormalizeError, SpanParseError};
pub use normalizer::{normalize, BlockNormalizer};
pub use properties::{is_checked_text, PropertyExtractor};
pub use span_parser::{NotionSpanParser, SpanResolver};
