//! Utility functions for the block model
//!
//! This module provides helpers used by the normalizer that are useful on
//! their own as well.

mod image_url;

pub use image_url::{ImageUrlProxy, NotionImageProxy};
