//! Block Tree Arena
//!
//! Owns every block of a page keyed by ID. Tree relations are ID lookups
//! into this arena: a block's `parent` is the ID of the block whose
//! `content` lists it, and children are resolved from `content_ids` on
//! demand. No block holds a reference to another, so there are no cycles
//! to manage.
//!
//! # Examples
//!
//! ```rust
//! use notion_model_core::models::{Block, BlockPageType, BlockTree, BlockType};
//!
//! let mut root = Block::new("root", BlockType::Page);
//! root.content_ids = vec!["child".to_string()];
//!
//! let mut child = Block::new("child", BlockType::Page);
//! child.parent_id = "root".to_string();
//!
//! let mut tree = BlockTree::with_root("root");
//! tree.insert(root);
//! tree.insert(child);
//! tree.link();
//!
//! assert_eq!(tree.page_type("root"), Some(BlockPageType::TopLevel));
//! assert_eq!(tree.page_type("child"), Some(BlockPageType::SubPage));
//! ```

use std::collections::{HashMap, HashSet};

use crate::models::{Block, BlockPageType};
use crate::services::{BlockNormalizer, NormalizeError, SpanResolver};
use crate::utils::ImageUrlProxy;

/// Arena of blocks keyed by ID
#[derive(Debug, Clone, Default)]
pub struct BlockTree {
    blocks: HashMap<String, Block>,
    root_id: Option<String>,
}

impl BlockTree {
    /// Create an empty tree without a designated root
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty tree whose root will be the block with `root_id`
    pub fn with_root(root_id: impl Into<String>) -> Self {
        Self {
            blocks: HashMap::new(),
            root_id: Some(root_id.into()),
        }
    }

    /// Build a tree from decoded blocks
    pub fn from_blocks(root_id: Option<String>, blocks: impl IntoIterator<Item = Block>) -> Self {
        let mut tree = Self {
            blocks: HashMap::new(),
            root_id,
        };
        for block in blocks {
            tree.insert(block);
        }
        tree
    }

    /// Insert a block, returning any previous block with the same ID
    pub fn insert(&mut self, block: Block) -> Option<Block> {
        self.blocks.insert(block.id.clone(), block)
    }

    pub fn get(&self, id: &str) -> Option<&Block> {
        self.blocks.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Block> {
        self.blocks.get_mut(id)
    }

    pub fn root(&self) -> Option<&Block> {
        self.root_id.as_deref().and_then(|id| self.blocks.get(id))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate over all blocks in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    /// Set every block's `parent` from the content lists
    ///
    /// Walks depth-first from the root, then from every block no content
    /// list mentions, then from whatever is left (blocks only reachable
    /// through a cycle), each group in ID order so the result is
    /// deterministic. The first block found listing a child becomes its
    /// parent; later listings are ignored, as are content IDs missing from
    /// the arena. Any previous linkage is discarded first.
    pub fn link(&mut self) {
        for block in self.blocks.values_mut() {
            block.parent = None;
        }

        let starts = self.walk_starts();
        let mut visited: HashSet<String> = HashSet::with_capacity(self.blocks.len());
        for start in starts {
            if visited.contains(&start) {
                continue;
            }
            visited.insert(start.clone());
            let mut stack = vec![start];

            while let Some(id) = stack.pop() {
                let content_ids = match self.blocks.get(&id) {
                    Some(block) => block.content_ids.clone(),
                    None => continue,
                };
                // Reverse so children are visited in content order
                for child_id in content_ids.into_iter().rev() {
                    if visited.contains(&child_id) {
                        continue;
                    }
                    if let Some(child) = self.blocks.get_mut(&child_id) {
                        child.parent = Some(id.clone());
                        visited.insert(child_id.clone());
                        stack.push(child_id);
                    }
                }
            }
        }
    }

    fn walk_starts(&self) -> Vec<String> {
        let contained: HashSet<&str> = self
            .blocks
            .values()
            .flat_map(|block| block.content_ids.iter().map(String::as_str))
            .collect();

        let mut uncontained: Vec<&String> = Vec::new();
        let mut contained_only: Vec<&String> = Vec::new();
        for id in self.blocks.keys() {
            if contained.contains(id.as_str()) {
                contained_only.push(id);
            } else {
                uncontained.push(id);
            }
        }
        uncontained.sort();
        contained_only.sort();

        let mut starts = Vec::with_capacity(self.blocks.len() + 1);
        if let Some(root_id) = &self.root_id {
            if self.blocks.contains_key(root_id) {
                starts.push(root_id.clone());
            }
        }
        starts.extend(uncontained.into_iter().cloned());
        starts.extend(contained_only.into_iter().cloned());
        starts
    }

    /// The linked parent of block `id`
    pub fn parent(&self, id: &str) -> Option<&Block> {
        self.blocks
            .get(id)
            .and_then(|block| block.parent.as_deref())
            .and_then(|parent_id| self.blocks.get(parent_id))
    }

    /// Children of block `id` in content order, skipping IDs not in the arena
    pub fn children<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Block> + 'a {
        self.blocks
            .get(id)
            .map(|block| block.content_ids.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(move |child_id| self.blocks.get(child_id))
    }

    /// Page classification of block `id`, if present
    pub fn page_type(&self, id: &str) -> Option<BlockPageType> {
        self.blocks.get(id).map(Block::page_type)
    }

    /// Normalize every block, collecting failures instead of stopping
    ///
    /// Each block is normalized independently; a failing block keeps the
    /// fields derived before the failure. Failures are returned sorted by
    /// block ID.
    pub fn normalize_all<S, P>(
        &mut self,
        normalizer: &BlockNormalizer<S, P>,
    ) -> Vec<(String, NormalizeError)>
    where
        S: SpanResolver,
        P: ImageUrlProxy,
    {
        let mut failures = Vec::new();
        for block in self.blocks.values_mut() {
            if let Err(e) = normalizer.normalize(block) {
                tracing::warn!("Skipping block {} after normalization failure: {}", block.id, e);
                failures.push((block.id.clone(), e));
            }
        }
        failures.sort_by(|a, b| a.0.cmp(&b.0));
        failures
    }
}
