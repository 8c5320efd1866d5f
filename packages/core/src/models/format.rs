//! Format Payloads
//!
//! A block's `format` side-channel has no shared structure: its shape is
//! selected by the block type. This module models the shapes this crate
//! understands as a closed sum type, so a block holds at most one of them.
//!
//! All records tolerate missing and `null` fields (they fall back to
//! defaults) but reject fields of the wrong JSON type.

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::BlockType;

/// Decoded format payload, one variant per understood shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockFormat {
    Page(FormatPage),
    Bookmark(FormatBookmark),
    Image(FormatImage),
    Column(FormatColumn),
    Text(FormatText),
    Table(FormatTable),
    Video(FormatVideo),
    Embed(FormatEmbed),
    Toggle(FormatToggle),
    Header(FormatHeader),
}

impl BlockFormat {
    /// Decode `raw` into the shape selected by `block_type`
    ///
    /// Returns `Ok(None)` for block types without a known format shape;
    /// those payloads are skipped, not attempted. Computed fields
    /// (`page_cover_url`, `image_url`) are left empty here.
    pub fn decode(block_type: &BlockType, raw: &[u8]) -> Result<Option<Self>, serde_json::Error> {
        let format = match block_type {
            BlockType::Page => Self::Page(serde_json::from_slice(raw)?),
            BlockType::Bookmark => Self::Bookmark(serde_json::from_slice(raw)?),
            BlockType::Image => Self::Image(serde_json::from_slice(raw)?),
            BlockType::Column => Self::Column(serde_json::from_slice(raw)?),
            BlockType::Table => Self::Table(serde_json::from_slice(raw)?),
            BlockType::Text => Self::Text(serde_json::from_slice(raw)?),
            BlockType::Video => Self::Video(serde_json::from_slice(raw)?),
            BlockType::Embed => Self::Embed(serde_json::from_slice(raw)?),
            BlockType::Header | BlockType::SubHeader | BlockType::SubSubHeader => {
                Self::Header(serde_json::from_slice(raw)?)
            }
            BlockType::Toggle => Self::Toggle(serde_json::from_slice(raw)?),
            _ => return Ok(None),
        };
        Ok(Some(format))
    }

    /// Short name of the variant, e.g. "page" or "table"
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Page(_) => "page",
            Self::Bookmark(_) => "bookmark",
            Self::Image(_) => "image",
            Self::Column(_) => "column",
            Self::Text(_) => "text",
            Self::Table(_) => "table",
            Self::Video(_) => "video",
            Self::Embed(_) => "embed",
            Self::Toggle(_) => "toggle",
            Self::Header(_) => "header",
        }
    }
}

/// Format of a page block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatPage {
    /// e.g. "/images/page-cover/gradients_11.jpg"
    #[serde(deserialize_with = "null_as_default")]
    pub page_cover: String,
    /// Vertical offset of the cover, e.g. 0.6
    #[serde(deserialize_with = "null_as_default")]
    pub page_cover_position: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub page_font: String,
    #[serde(deserialize_with = "null_as_default")]
    pub page_full_width: bool,
    /// Either an image URL or an emoji such as "✉️"
    #[serde(deserialize_with = "null_as_default")]
    pub page_icon: String,
    #[serde(deserialize_with = "null_as_default")]
    pub page_small_text: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub block_color: String,

    /// Always-accessible URL derived from `page_cover`
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub page_cover_url: String,
}

/// Format of a bookmark block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatBookmark {
    #[serde(rename = "bookmark_icon", deserialize_with = "null_as_default")]
    pub icon: String,
    #[serde(rename = "bookmark_cover", deserialize_with = "null_as_default")]
    pub cover: String,
}

/// Format of an image block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatImage {
    #[serde(deserialize_with = "null_as_default")]
    pub block_aspect_ratio: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub block_full_width: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub block_page_width: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub block_preserve_scale: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub block_width: f64,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub display_source: String,

    /// Always-accessible URL derived from `display_source`
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub image_url: String,
}

/// Format of a video block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatVideo {
    #[serde(deserialize_with = "null_as_default")]
    pub block_width: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub block_height: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub display_source: String,
    #[serde(deserialize_with = "null_as_default")]
    pub block_full_width: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub block_page_width: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub block_aspect_ratio: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub block_preserve_scale: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatText {
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub block_color: String,
}

/// Format shared by the three header levels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatHeader {
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub block_color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatToggle {
    #[serde(deserialize_with = "null_as_default")]
    pub block_color: String,
}

/// Format of a table block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatTable {
    #[serde(deserialize_with = "null_as_default")]
    pub table_wrap: bool,
    /// Column descriptors in display order, exactly as received
    #[serde(deserialize_with = "null_as_default")]
    pub table_properties: Vec<TableProperty>,
}

/// One column of a table block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableProperty {
    #[serde(deserialize_with = "null_as_default")]
    pub width: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub visible: bool,
    /// Key of the collection property shown in this column
    #[serde(deserialize_with = "null_as_default")]
    pub property: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatColumn {
    /// Share of the row taken by this column, e.g. 0.5 for half width
    #[serde(deserialize_with = "null_as_default")]
    pub column_ratio: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatEmbed {
    #[serde(deserialize_with = "null_as_default")]
    pub block_full_width: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub block_height: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub block_page_width: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub block_preserve_scale: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub display_source: String,
}

/// Read a field whose explicit `null` means "use the default"
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_selects_shape_by_type() {
        let raw = br#"{"column_ratio": 0.25}"#;
        let format = BlockFormat::decode(&BlockType::Column, raw).unwrap();
        assert_eq!(
            format,
            Some(BlockFormat::Column(FormatColumn { column_ratio: 0.25 }))
        );
    }

    #[test]
    fn test_decode_header_levels_share_shape() {
        let raw = br#"{"block_color": "blue"}"#;
        for block_type in [BlockType::Header, BlockType::SubHeader, BlockType::SubSubHeader] {
            let format = BlockFormat::decode(&block_type, raw).unwrap().unwrap();
            assert_eq!(format.kind(), "header");
        }
    }

    #[test]
    fn test_decode_skips_types_without_shape() {
        let raw = br#"{"anything": [1, 2, 3]}"#;
        assert!(BlockFormat::decode(&BlockType::Divider, raw).unwrap().is_none());
        assert!(BlockFormat::decode(&BlockType::Unknown("synced_block".into()), raw)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_missing_fields_default() {
        let format = BlockFormat::decode(&BlockType::Image, b"{}").unwrap().unwrap();
        assert_eq!(format, BlockFormat::Image(FormatImage::default()));
    }

    #[test]
    fn test_wrong_field_type_is_error() {
        let raw = br#"{"block_width": "wide"}"#;
        assert!(BlockFormat::decode(&BlockType::Video, raw).is_err());
    }

    #[test]
    fn test_bookmark_field_names() {
        let raw = br#"{"bookmark_icon": "https://a.test/i.png", "bookmark_cover": "https://a.test/c.png"}"#;
        let Some(BlockFormat::Bookmark(format)) =
            BlockFormat::decode(&BlockType::Bookmark, raw).unwrap()
        else {
            panic!("expected bookmark format");
        };
        assert_eq!(format.icon, "https://a.test/i.png");
        assert_eq!(format.cover, "https://a.test/c.png");
    }

    #[test]
    fn test_null_fields_default() {
        let raw = br#"{"page_icon": "x", "page_cover": null, "page_full_width": null}"#;
        let Some(BlockFormat::Page(page)) = BlockFormat::decode(&BlockType::Page, raw).unwrap()
        else {
            panic!("expected page format");
        };
        assert_eq!(page.page_icon, "x");
        assert_eq!(page.page_cover, "");
        assert!(!page.page_full_width);

        let raw = br#"{"table_wrap": null, "table_properties": [
            {"width": null, "visible": true, "property": "title"},
            {"width": 120, "visible": null, "property": null}
        ]}"#;
        let Some(BlockFormat::Table(table)) = BlockFormat::decode(&BlockType::Table, raw).unwrap()
        else {
            panic!("expected table format");
        };
        assert!(!table.table_wrap);
        assert_eq!(
            table.table_properties,
            vec![
                TableProperty {
                    width: 0,
                    visible: true,
                    property: "title".into(),
                },
                TableProperty {
                    width: 120,
                    visible: false,
                    property: String::new(),
                },
            ]
        );

        let raw = br#"{"table_properties": null}"#;
        let format = BlockFormat::decode(&BlockType::Table, raw).unwrap();
        assert_eq!(format, Some(BlockFormat::Table(FormatTable::default())));
    }
}
