//! Data Models
//!
//! This module contains the block data structures:
//!
//! - `Block` - One node of a page's document tree, raw and derived fields
//! - `BlockFormat` - Decoded format payload, one variant per block shape
//! - `TextSpan` - Rich-text run with inline attributes
//! - `BlockTree` - Arena owning a page's blocks, with ID-based linkage
//!
//! Raw side-channels (`properties`, `format_raw`) are kept on every block
//! so types this crate doesn't understand survive decoding untouched.

mod block;
mod format;
mod text_span;
pub mod time;
mod tree;

pub use block::{
    Block, BlockPageType, BlockType, Permission, TABLE_BLOCK, TABLE_COLLECTION, TABLE_SPACE,
};
pub use format::{
    BlockFormat, FormatBookmark, FormatColumn, FormatEmbed, FormatHeader, FormatImage, FormatPage,
    FormatTable, FormatText, FormatToggle, FormatVideo, TableProperty,
};
pub use text_span::{first_text, flatten, TextAttr, TextSpan};
pub use tree::BlockTree;
