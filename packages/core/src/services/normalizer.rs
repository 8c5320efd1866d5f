//! Block Normalization
//!
//! Turns a freshly decoded [`Block`] into a typed one by reading its two
//! untyped side-channels:
//!
//! 1. **Property phase**: scalar fields (title, code, checkbox, link, ...)
//!    from `properties`, dispatching on the block type
//! 2. **Format phase**: the one format variant selected by the block type,
//!    decoded from `format_raw`
//!
//! # Failure policy
//!
//! - Unreadable auxiliary properties are treated as absent
//! - An unreadable `title` aborts the block with `NormalizeError::SpanParse`
//! - A format payload that doesn't fit its type's shape aborts the block with
//!   `NormalizeError::FormatDecode`
//! - Unknown block types never fail: their format payload is skipped
//!
//! Fields derived before a failure stay set.
//!
//! # Examples
//!
//! ```rust
//! use notion_model_core::models::Block;
//! use notion_model_core::services::BlockNormalizer;
//! use serde_json::json;
//!
//! let mut block: Block = serde_json::from_value(json!({
//!     "id": "b1",
//!     "type": "page",
//!     "properties": { "title": [["Hello, "], ["world", [["b"]]]] },
//!     "format": { "page_icon": "👋" }
//! }))?;
//!
//! BlockNormalizer::default().normalize(&mut block)?;
//!
//! assert_eq!(block.title, "Hello, world");
//! assert_eq!(block.title_full.len(), 2);
//! assert_eq!(block.format_page().unwrap().page_icon, "👋");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::config::NormalizerConfig;
use crate::models::{first_text, flatten, Block, BlockFormat, BlockType};
use crate::services::{NormalizeError, NotionSpanParser, PropertyExtractor, SpanResolver};
use crate::utils::{ImageUrlProxy, NotionImageProxy};

const PROP_TITLE: &str = "title";
const PROP_CHECKED: &str = "checked";
const PROP_DESCRIPTION: &str = "description";
const PROP_LINK: &str = "link";
const PROP_SOURCE: &str = "source";
const PROP_LANGUAGE: &str = "language";
const PROP_SIZE: &str = "size";

/// Normalizes blocks using a span resolver and an image proxy
///
/// Stateless apart from its collaborators, so one instance can normalize
/// any number of blocks, from any number of threads.
#[derive(Debug, Clone)]
pub struct BlockNormalizer<S = NotionSpanParser, P = NotionImageProxy> {
    spans: S,
    proxy: P,
}

impl BlockNormalizer {
    /// Default resolver with a proxy built from `config`
    pub fn from_config(config: &NormalizerConfig) -> Self {
        Self {
            spans: NotionSpanParser,
            proxy: NotionImageProxy::from_config(config),
        }
    }
}

impl Default for BlockNormalizer {
    fn default() -> Self {
        Self::from_config(&NormalizerConfig::default())
    }
}

impl<S, P> BlockNormalizer<S, P>
where
    S: SpanResolver,
    P: ImageUrlProxy,
{
    /// Build a normalizer from custom collaborators
    pub fn with_components(spans: S, proxy: P) -> Self {
        Self { spans, proxy }
    }

    /// Run the property phase, then the format phase
    ///
    /// Idempotent: running it again over unchanged raw fields yields the
    /// same derived fields.
    pub fn normalize(&self, block: &mut Block) -> Result<(), NormalizeError> {
        self.apply_properties(block)?;
        self.decode_format(block)
    }

    /// Populate property-derived scalar fields
    ///
    /// Only a failure to resolve the `title` property is reported; every
    /// other property is optional metadata.
    pub fn apply_properties(&self, block: &mut Block) -> Result<(), NormalizeError> {
        let props = PropertyExtractor::new(&self.spans);

        if let Some(title) = props.spans(block, PROP_TITLE) {
            let spans = title
                .map_err(|e| NormalizeError::span_parse(block.id.as_str(), PROP_TITLE, e))?;
            match block.block_type {
                BlockType::Page | BlockType::File | BlockType::Bookmark => {
                    block.title = flatten(&spans);
                    block.title_full = spans;
                }
                BlockType::Code => {
                    block.code = first_text(&spans).to_string();
                }
                _ => {
                    block.inline_content = spans;
                }
            }
        }

        if block.block_type == BlockType::Todo && block.properties.contains_key(PROP_CHECKED) {
            block.is_checked = props.checkbox(block, PROP_CHECKED);
        }

        if let Some(description) = props.first_text(block, PROP_DESCRIPTION) {
            block.description = description;
        }
        if let Some(link) = props.first_text(block, PROP_LINK) {
            block.link = link;
        }

        // A source that arrived on the wire takes precedence
        if block.source.is_empty() {
            if let Some(source) = props.first_text(block, PROP_SOURCE) {
                block.source = source;
            }
        }
        if block.is_image() && !block.source.is_empty() {
            block.image_url = self.proxy.rewrite(&block.source);
        }

        if let Some(language) = props.first_text(block, PROP_LANGUAGE) {
            block.code_language = language;
        }

        if block.block_type == BlockType::File {
            if let Some(size) = props.first_text(block, PROP_SIZE) {
                block.file_size = size;
            }
        }

        Ok(())
    }

    /// Decode `format_raw` into the variant selected by the block type
    ///
    /// Any previously decoded variant is cleared first, so at most one
    /// variant is ever set and an empty payload leaves none.
    pub fn decode_format(&self, block: &mut Block) -> Result<(), NormalizeError> {
        block.format = None;
        if block.format_raw.is_empty() {
            return Ok(());
        }

        let decoded = BlockFormat::decode(&block.block_type, &block.format_raw).map_err(|e| {
            tracing::warn!(
                "Failed to decode {} format of block {}: {}",
                block.block_type,
                block.id,
                e
            );
            NormalizeError::format_decode(
                block.id.as_str(),
                block.block_type.as_str(),
                block.format_raw.clone(),
                e,
            )
        })?;

        let Some(mut format) = decoded else {
            tracing::debug!(
                "Skipping format of block {} with unhandled type '{}'",
                block.id,
                block.block_type
            );
            return Ok(());
        };

        match &mut format {
            BlockFormat::Page(page) => {
                page.page_cover_url = self.proxy.rewrite(&page.page_cover);
            }
            BlockFormat::Image(image) => {
                image.image_url = self.proxy.rewrite(&image.display_source);
            }
            _ => {}
        }
        block.format = Some(format);

        Ok(())
    }
}

/// Normalize `block` with the default configuration
pub fn normalize(block: &mut Block) -> Result<(), NormalizeError> {
    BlockNormalizer::default().normalize(block)
}

#[cfg(test)]
#[path = "normalizer_test.rs"]
mod normalizer_test;
