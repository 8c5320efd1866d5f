//! Block Data Structures
//!
//! This module defines the `Block` entity: one node of a page's document
//! tree as delivered by the service's internal record API.
//!
//! # Architecture
//!
//! - **Raw side-channels**: `properties` (rich-text values keyed by name) and
//!   `format_raw` (opaque JSON whose shape depends on the block type) are
//!   kept for every block, including types this crate doesn't know
//! - **Derived fields**: filled in by [`BlockNormalizer`](crate::services::BlockNormalizer)
//!   from the two side-channels; they are not part of the wire record
//! - **ID-based linkage**: `parent` is the ID of the containing block, set by
//!   [`BlockTree::link`](crate::models::BlockTree::link), never a pointer
//!
//! # Examples
//!
//! ```rust
//! use notion_model_core::models::{Block, BlockType};
//! use serde_json::json;
//!
//! let block: Block = serde_json::from_value(json!({
//!     "id": "4c2b",
//!     "type": "to_do",
//!     "alive": true,
//!     "properties": { "title": [["Buy milk"]], "checked": [["Yes"]] }
//! }))?;
//!
//! assert_eq!(block.block_type, BlockType::Todo);
//! assert!(block.format_raw.is_empty());
//! # Ok::<(), serde_json::Error>(())
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::format::{
    BlockFormat, FormatBookmark, FormatColumn, FormatEmbed, FormatHeader, FormatImage,
    FormatPage, FormatTable, FormatText, FormatToggle, FormatVideo,
};
use crate::models::text_span::TextSpan;
use crate::models::time::datetime_from_millis;

/// `parent_table` value for blocks whose parent is another block
pub const TABLE_BLOCK: &str = "block";
/// `parent_table` value for blocks whose parent is the workspace root
pub const TABLE_SPACE: &str = "space";
/// `parent_table` value for blocks that are rows of a collection
pub const TABLE_COLLECTION: &str = "collection";

/// Declared type of a block
///
/// The set of tags is open: new tags appear over time and must decode
/// without error, so anything unrecognized is kept as `Unknown` with its
/// original text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    Page,
    Text,
    Bookmark,
    BulletedList,
    NumberedList,
    Toggle,
    Todo,
    Divider,
    Image,
    Header,
    SubHeader,
    SubSubHeader,
    Quote,
    Comment,
    Code,
    /// Multi-column container; the number of columns is the number of
    /// `Column` children
    ColumnList,
    Column,
    Table,
    CollectionView,
    /// Embedded video (e.g. YouTube)
    Video,
    File,
    Pdf,
    Gist,
    Tweet,
    /// Generic oEmbed link
    Embed,
    Callout,
    TableOfContents,
    Unknown(String),
}

impl BlockType {
    /// Wire tag for this type
    pub fn as_str(&self) -> &str {
        match self {
            Self::Page => "page",
            Self::Text => "text",
            Self::Bookmark => "bookmark",
            Self::BulletedList => "bulleted_list",
            Self::NumberedList => "numbered_list",
            Self::Toggle => "toggle",
            Self::Todo => "to_do",
            Self::Divider => "divider",
            Self::Image => "image",
            Self::Header => "header",
            Self::SubHeader => "sub_header",
            Self::SubSubHeader => "sub_sub_header",
            Self::Quote => "quote",
            Self::Comment => "comment",
            Self::Code => "code",
            Self::ColumnList => "column_list",
            Self::Column => "column",
            Self::Table => "table",
            Self::CollectionView => "collection_view",
            Self::Video => "video",
            Self::File => "file",
            Self::Pdf => "pdf",
            Self::Gist => "gist",
            Self::Tweet => "tweet",
            Self::Embed => "embed",
            Self::Callout => "callout",
            Self::TableOfContents => "table_of_contents",
            Self::Unknown(tag) => tag,
        }
    }

    /// True if the tag wasn't recognized
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl Default for BlockType {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl From<&str> for BlockType {
    fn from(tag: &str) -> Self {
        match tag {
            "page" => Self::Page,
            "text" => Self::Text,
            "bookmark" => Self::Bookmark,
            "bulleted_list" => Self::BulletedList,
            "numbered_list" => Self::NumberedList,
            "toggle" => Self::Toggle,
            "to_do" => Self::Todo,
            "divider" => Self::Divider,
            "image" => Self::Image,
            "header" => Self::Header,
            "sub_header" => Self::SubHeader,
            "sub_sub_header" => Self::SubSubHeader,
            "quote" => Self::Quote,
            "comment" => Self::Comment,
            "code" => Self::Code,
            "column_list" => Self::ColumnList,
            "column" => Self::Column,
            "table" => Self::Table,
            "collection_view" => Self::CollectionView,
            "video" => Self::Video,
            "file" => Self::File,
            "pdf" => Self::Pdf,
            "gist" => Self::Gist,
            "tweet" => Self::Tweet,
            "embed" => Self::Embed,
            "callout" => Self::Callout,
            "table_of_contents" => Self::TableOfContents,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for BlockType {
    fn from(tag: String) -> Self {
        match Self::from(tag.as_str()) {
            Self::Unknown(_) => Self::Unknown(tag),
            known => known,
        }
    }
}

impl From<BlockType> for String {
    fn from(block_type: BlockType) -> Self {
        match block_type {
            BlockType::Unknown(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a page block relates to the block that contains it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockPageType {
    /// Top-level block of the whole page (no containing block linked)
    TopLevel,
    /// A page nested inside its parent
    SubPage,
    /// A reference to a page that lives elsewhere
    Link,
}

/// Access entry from the `permissions` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub role: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// One node of the document tree
///
/// # Fields
///
/// Wire fields mirror the record as served. Derived fields are skipped by
/// serde and are meaningful only for particular block types:
///
/// - `title`/`title_full`: page, file, bookmark
/// - `inline_content`: text-like blocks (text, headers, lists, quote, ...)
/// - `is_checked`: to-do
/// - `description`/`link`: bookmark
/// - `source`: bookmark, image, gist, file, embed (may also arrive on the wire)
/// - `image_url`: image
/// - `file_size`: file
/// - `code`/`code_language`: code
/// - `format`: at most one decoded format variant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Unique block ID
    pub id: String,

    /// False if the block was deleted; deleted blocks still decode
    #[serde(default)]
    pub alive: bool,

    /// Ordered IDs of child blocks
    #[serde(default, rename = "content", skip_serializing_if = "Vec::is_empty")]
    pub content_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copied_from: Option<String>,

    /// Backing collection, for collection views
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,

    /// ID of the user who created the block
    #[serde(default)]
    pub created_by: String,

    /// Creation time, milliseconds since the epoch
    #[serde(default)]
    pub created_time: i64,

    /// IDs of discussions anchored on this block
    #[serde(default, rename = "discussion", skip_serializing_if = "Vec::is_empty")]
    pub discussion_ids: Vec<String>,

    /// IDs of uploaded files referenced by this block
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_ids: Vec<String>,

    /// Raw `format` JSON; schema depends on `block_type`
    #[serde(
        default,
        rename = "format",
        with = "raw_format",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub format_raw: Vec<u8>,

    #[serde(default)]
    pub ignore_block_count: bool,

    /// ID of the user who last edited the block
    #[serde(default)]
    pub last_edited_by: String,

    /// Last edit time, milliseconds since the epoch
    #[serde(default)]
    pub last_edited_time: i64,

    #[serde(default)]
    pub parent_id: String,

    /// Which table `parent_id` points into (see `TABLE_*` constants)
    #[serde(default)]
    pub parent_table: String,

    /// Not always available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Permission>>,

    /// Raw named properties, typically rich-text span arrays
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,

    #[serde(default, rename = "type")]
    pub block_type: BlockType,

    /// Blocks are versioned
    #[serde(default)]
    pub version: i64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub view_ids: Vec<String>,

    /// Source URL; may arrive on the wire or from the `source` property
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,

    /// ID of the block whose content lists this block
    #[serde(skip)]
    pub parent: Option<String>,

    #[serde(skip)]
    pub inline_content: Vec<TextSpan>,

    #[serde(skip)]
    pub title: String,

    #[serde(skip)]
    pub title_full: Vec<TextSpan>,

    #[serde(skip)]
    pub is_checked: bool,

    #[serde(skip)]
    pub description: String,

    #[serde(skip)]
    pub link: String,

    /// Always-accessible URL built from `source` (image blocks)
    #[serde(skip)]
    pub image_url: String,

    #[serde(skip)]
    pub file_size: String,

    #[serde(skip)]
    pub code: String,

    #[serde(skip)]
    pub code_language: String,

    #[serde(skip)]
    pub format: Option<BlockFormat>,
}

impl Block {
    /// Create an empty live block of the given type
    ///
    /// # Examples
    ///
    /// ```rust
    /// use notion_model_core::models::{Block, BlockType};
    ///
    /// let block = Block::new("b1", BlockType::Text);
    /// assert!(block.alive);
    /// assert!(block.properties.is_empty());
    /// ```
    pub fn new(id: impl Into<String>, block_type: BlockType) -> Self {
        Self {
            id: id.into(),
            alive: true,
            block_type,
            ..Default::default()
        }
    }

    /// Creation time, truncated to whole seconds
    pub fn created_on(&self) -> Option<DateTime<Utc>> {
        datetime_from_millis(self.created_time)
    }

    /// Last edit time, truncated to whole seconds
    pub fn updated_on(&self) -> Option<DateTime<Utc>> {
        datetime_from_millis(self.last_edited_time)
    }

    /// True for page blocks (top-level, sub-page or link)
    pub fn is_page(&self) -> bool {
        self.block_type == BlockType::Page
    }

    pub fn is_image(&self) -> bool {
        self.block_type == BlockType::Image
    }

    pub fn is_code(&self) -> bool {
        self.block_type == BlockType::Code
    }

    /// True if this is a page whose parent is the workspace root
    pub fn is_link_to_page(&self) -> bool {
        self.is_page() && self.parent_table == TABLE_SPACE
    }

    /// Classify this block relative to its linked container
    ///
    /// Only meaningful after [`BlockTree::link`](crate::models::BlockTree::link)
    /// has run: until then every block reports `TopLevel`.
    pub fn page_type(&self) -> BlockPageType {
        match &self.parent {
            None => BlockPageType::TopLevel,
            Some(container_id) if *container_id == self.parent_id => BlockPageType::SubPage,
            Some(_) => BlockPageType::Link,
        }
    }

    pub fn format_page(&self) -> Option<&FormatPage> {
        match &self.format {
            Some(BlockFormat::Page(format)) => Some(format),
            _ => None,
        }
    }

    pub fn format_bookmark(&self) -> Option<&FormatBookmark> {
        match &self.format {
            Some(BlockFormat::Bookmark(format)) => Some(format),
            _ => None,
        }
    }

    pub fn format_image(&self) -> Option<&FormatImage> {
        match &self.format {
            Some(BlockFormat::Image(format)) => Some(format),
            _ => None,
        }
    }

    pub fn format_column(&self) -> Option<&FormatColumn> {
        match &self.format {
            Some(BlockFormat::Column(format)) => Some(format),
            _ => None,
        }
    }

    pub fn format_text(&self) -> Option<&FormatText> {
        match &self.format {
            Some(BlockFormat::Text(format)) => Some(format),
            _ => None,
        }
    }

    pub fn format_table(&self) -> Option<&FormatTable> {
        match &self.format {
            Some(BlockFormat::Table(format)) => Some(format),
            _ => None,
        }
    }

    pub fn format_video(&self) -> Option<&FormatVideo> {
        match &self.format {
            Some(BlockFormat::Video(format)) => Some(format),
            _ => None,
        }
    }

    pub fn format_embed(&self) -> Option<&FormatEmbed> {
        match &self.format {
            Some(BlockFormat::Embed(format)) => Some(format),
            _ => None,
        }
    }

    pub fn format_toggle(&self) -> Option<&FormatToggle> {
        match &self.format {
            Some(BlockFormat::Toggle(format)) => Some(format),
            _ => None,
        }
    }

    pub fn format_header(&self) -> Option<&FormatHeader> {
        match &self.format {
            Some(BlockFormat::Header(format)) => Some(format),
            _ => None,
        }
    }
}

/// Serde adapter keeping `format` as raw JSON bytes
///
/// Maps three input states:
/// - Missing field → empty (handled by `#[serde(default)]`)
/// - null → empty
/// - any other JSON value → its compact encoding
mod raw_format {
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => serde_json::to_vec(&value).map_err(serde::de::Error::custom),
        }
    }

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let value: Value = serde_json::from_slice(bytes).map_err(S::Error::custom)?;
        value.serialize(serializer)
    }
}

#[cfg(test)]
#[path = "block_test.rs"]
mod block_test;
