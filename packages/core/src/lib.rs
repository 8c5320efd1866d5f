//! Notion Block Model Core
//!
//! This crate decodes the block records served by Notion's internal record
//! API and normalizes them into typed blocks.
//!
//! # Architecture
//!
//! - **Raw first**: every record decodes, whatever its type; untyped
//!   `properties` and `format` are kept verbatim next to the typed fields
//! - **Two-phase normalization**: property-derived fields, then the one
//!   format variant the block type selects
//! - **Arena tree**: blocks live in a [`models::BlockTree`] keyed by ID;
//!   parent and children are ID lookups
//!
//! # Modules
//!
//! - [`models`] - Data structures (Block, BlockFormat, TextSpan, BlockTree)
//! - [`services`] - Span resolution, property extraction, normalization
//! - [`utils`] - Image URL proxying
//! - [`config`] - Normalizer configuration with environment overrides

pub mod config;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::NormalizerConfig;
pub use models::*;
pub use services::*;
pub use utils::*;
