//! Property Extraction
//!
//! Every read of a block's `properties` map goes through here so the
//! per-property rules live in one place:
//!
//! - single-token properties (link, source, language, size, ...) use the
//!   text of the first span only
//! - the page title uses the flattened text of all spans
//! - the checkbox is the first span compared to "Yes", ignoring ASCII case
//!
//! Extraction is best-effort: a missing property and one whose spans fail
//! to resolve both come back as `None`. Only the raw span accessor
//! surfaces resolution errors, for callers that treat a property as
//! load-bearing.

use crate::models::{first_text, flatten, Block, TextSpan};
use crate::services::{SpanParseError, SpanResolver};

/// Checkbox properties hold this literal when checked
const CHECKED: &str = "Yes";

/// Typed reads over a block's raw properties
pub struct PropertyExtractor<'a, S: ?Sized> {
    resolver: &'a S,
}

impl<'a, S> PropertyExtractor<'a, S>
where
    S: SpanResolver + ?Sized,
{
    pub fn new(resolver: &'a S) -> Self {
        Self { resolver }
    }

    /// Resolve property `name` to spans
    ///
    /// Returns `None` if the property is absent and `Some(Err(_))` if it is
    /// present but malformed.
    pub fn spans(
        &self,
        block: &Block,
        name: &str,
    ) -> Option<Result<Vec<TextSpan>, SpanParseError>> {
        block
            .properties
            .get(name)
            .map(|raw| self.resolver.parse_spans(raw))
    }

    /// Text of the first span of property `name`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use notion_model_core::models::{Block, BlockType};
    /// use notion_model_core::services::{NotionSpanParser, PropertyExtractor};
    /// use serde_json::json;
    ///
    /// let mut block = Block::new("b", BlockType::Code);
    /// block.properties.insert("language".into(), json!([["Rust"], [" ignored"]]));
    ///
    /// let props = PropertyExtractor::new(&NotionSpanParser);
    /// assert_eq!(props.first_text(&block, "language").as_deref(), Some("Rust"));
    /// assert_eq!(props.first_text(&block, "missing"), None);
    /// ```
    pub fn first_text(&self, block: &Block, name: &str) -> Option<String> {
        self.tolerant(block, name)
            .map(|spans| first_text(&spans).to_string())
    }

    /// Concatenated text of every span of property `name`
    pub fn flattened_text(&self, block: &Block, name: &str) -> Option<String> {
        self.tolerant(block, name).map(|spans| flatten(&spans))
    }

    /// Checkbox state of property `name`; absent or unreadable means unchecked
    pub fn checkbox(&self, block: &Block, name: &str) -> bool {
        self.first_text(block, name)
            .is_some_and(|text| is_checked_text(&text))
    }

    fn tolerant(&self, block: &Block, name: &str) -> Option<Vec<TextSpan>> {
        match self.spans(block, name)? {
            Ok(spans) => Some(spans),
            Err(e) => {
                tracing::debug!(
                    "Ignoring unreadable '{}' property of block {}: {}",
                    name,
                    block.id,
                    e
                );
                None
            }
        }
    }
}

/// True if a checkbox's text means "checked"
///
/// The comparison folds ASCII case only: "yes" and "YES" match, but
/// non-ASCII case variants such as "Yeſ" do not.
pub fn is_checked_text(text: &str) -> bool {
    text.eq_ignore_ascii_case(CHECKED)
}
