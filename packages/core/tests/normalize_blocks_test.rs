//! Integration tests for page normalization
//!
//! Decodes a small page worth of block records, links them into a tree and
//! normalizes every block, the way a page loader would.

use anyhow::Result;
use notion_model_core::models::{Block, BlockPageType, BlockTree, BlockType, TextAttr};
use notion_model_core::services::BlockNormalizer;
use notion_model_core::NormalizerConfig;
use serde_json::{json, Value};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

fn page_records() -> Value {
    json!([
        {
            "id": "root",
            "alive": true,
            "type": "page",
            "parent_id": "space-1",
            "parent_table": "space",
            "content": ["heading", "todo", "snippet", "photo", "sub", "linked", "broken"],
            "created_time": 1609459200500i64,
            "last_edited_time": 1609459260999i64,
            "properties": {"title": [["Release "], ["notes", [["i"]]]]},
            "format": {"page_icon": "📦", "page_cover": "/images/page-cover/woodcuts_1.jpg"}
        },
        {
            "id": "heading",
            "alive": true,
            "type": "sub_header",
            "parent_id": "root",
            "parent_table": "block",
            "properties": {"title": [["What's "], ["new", [["b"]]]]},
            "format": {"block_color": "blue"}
        },
        {
            "id": "todo",
            "alive": true,
            "type": "to_do",
            "parent_id": "root",
            "parent_table": "block",
            "properties": {"title": [["Ship it"]], "checked": [["Yes"]]}
        },
        {
            "id": "snippet",
            "alive": true,
            "type": "code",
            "parent_id": "root",
            "parent_table": "block",
            "properties": {"title": [["fn main() {}"]], "language": [["Rust"]]}
        },
        {
            "id": "photo",
            "alive": true,
            "type": "image",
            "parent_id": "root",
            "parent_table": "block",
            "properties": {"source": [["https://s3.test/photo.png"]]},
            "format": {"display_source": "https://s3.test/photo.png", "block_width": 480}
        },
        {
            "id": "sub",
            "alive": true,
            "type": "page",
            "parent_id": "root",
            "parent_table": "block",
            "content": ["nested"],
            "properties": {"title": [["Details"]]}
        },
        {
            "id": "nested",
            "alive": true,
            "type": "text",
            "parent_id": "sub",
            "parent_table": "block",
            "properties": {"title": [["see "], ["docs", [["a", "https://docs.test"]]]]}
        },
        {
            "id": "linked",
            "alive": true,
            "type": "page",
            "parent_id": "elsewhere",
            "parent_table": "block",
            "properties": {"title": [["Elsewhere"]]}
        },
        {
            "id": "broken",
            "alive": true,
            "type": "video",
            "parent_id": "root",
            "parent_table": "block",
            "format": {"block_width": "full"}
        }
    ])
}

fn load_tree() -> Result<BlockTree> {
    let blocks: Vec<Block> = serde_json::from_value(page_records())?;
    let mut tree = BlockTree::from_blocks(Some("root".to_string()), blocks);
    tree.link();
    Ok(tree)
}

#[test]
fn test_normalize_page() -> Result<()> {
    init_tracing();
    let mut tree = load_tree()?;

    let failures = tree.normalize_all(&BlockNormalizer::default());

    // Only the malformed video fails; everything else is usable
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "broken");
    assert!(failures[0].1.is_format_error());

    let root = tree.root().expect("root block");
    assert_eq!(root.title, "Release notes");
    assert_eq!(root.title_full[1].attrs, vec![TextAttr::Italic]);
    let page = root.format_page().expect("page format");
    assert_eq!(page.page_icon, "📦");
    assert_eq!(
        page.page_cover_url,
        "https://www.notion.so/images/page-cover/woodcuts_1.jpg"
    );
    assert_eq!(
        root.created_on().map(|t| t.timestamp()),
        Some(1609459200)
    );
    assert_eq!(
        root.updated_on().map(|t| t.timestamp()),
        Some(1609459260)
    );

    let heading = tree.get("heading").expect("heading");
    assert_eq!(heading.inline_content.len(), 2);
    assert!(heading.inline_content[1].is_bold());
    assert_eq!(heading.format_header().expect("header format").block_color, "blue");

    assert!(tree.get("todo").expect("todo").is_checked);

    let snippet = tree.get("snippet").expect("snippet");
    assert_eq!(snippet.code, "fn main() {}");
    assert_eq!(snippet.code_language, "Rust");

    let photo = tree.get("photo").expect("photo");
    assert_eq!(
        photo.image_url,
        "https://www.notion.so/image/https%3A%2F%2Fs3.test%2Fphoto.png"
    );
    assert_eq!(photo.format_image().expect("image format").image_url, photo.image_url);

    let nested = tree.get("nested").expect("nested");
    assert_eq!(nested.inline_content[1].link(), Some("https://docs.test"));

    Ok(())
}

#[test]
fn test_tree_structure() -> Result<()> {
    let tree = load_tree()?;

    let children: Vec<&str> = tree.children("root").map(|b| b.id.as_str()).collect();
    assert_eq!(
        children,
        vec!["heading", "todo", "snippet", "photo", "sub", "linked", "broken"]
    );

    assert_eq!(tree.page_type("root"), Some(BlockPageType::TopLevel));
    assert_eq!(tree.page_type("sub"), Some(BlockPageType::SubPage));
    assert_eq!(tree.page_type("linked"), Some(BlockPageType::Link));
    assert_eq!(tree.parent("nested").map(|b| b.id.as_str()), Some("sub"));
    assert!(tree.get("root").expect("root").is_link_to_page());

    Ok(())
}

#[test]
fn test_disabled_proxy_keeps_source_urls() -> Result<()> {
    init_tracing();
    let mut tree = load_tree()?;
    let config = NormalizerConfig {
        proxy_images: false,
        ..NormalizerConfig::default()
    };
    config.validate().map_err(anyhow::Error::msg)?;

    tree.normalize_all(&BlockNormalizer::from_config(&config));

    let photo = tree.get("photo").expect("photo");
    assert_eq!(photo.image_url, "https://s3.test/photo.png");
    let root = tree.root().expect("root");
    assert_eq!(
        root.format_page().expect("page format").page_cover_url,
        "/images/page-cover/woodcuts_1.jpg"
    );

    Ok(())
}

#[test]
fn test_unknown_blocks_survive_round_trip() -> Result<()> {
    let record = json!({
        "id": "new-kind",
        "alive": true,
        "type": "synced_block",
        "properties": {"title": [["kept"]]},
        "format": {"copied_from_pointer": {"id": "x", "table": "block"}}
    });

    let mut block: Block = serde_json::from_value(record.clone())?;
    notion_model_core::services::normalize(&mut block)?;
    assert_eq!(block.block_type, BlockType::Unknown("synced_block".into()));
    assert!(block.format.is_none());

    let encoded = serde_json::to_value(&block)?;
    assert_eq!(encoded["type"], "synced_block");
    assert_eq!(encoded["format"], record["format"]);
    assert_eq!(encoded["properties"], record["properties"]);

    Ok(())
}
