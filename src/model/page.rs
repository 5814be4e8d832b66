//! Page-level types.

use serde::{Deserialize, Serialize};

use super::Block;

/// The ordered collection of top-level blocks for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageBlockTable {
    /// Top-level blocks, in reading order.
    pub blocks: Vec<Block>,

    /// Page width in page units.
    pub page_width: f32,

    /// Page height in page units.
    pub page_height: f32,
}

impl PageBlockTable {
    /// Create an empty table with the given page dimensions.
    pub fn new(page_width: f32, page_height: f32) -> Self {
        Self {
            blocks: Vec::new(),
            page_width,
            page_height,
        }
    }

    /// Create a table from an existing block sequence.
    pub fn with_blocks(blocks: Vec<Block>, page_width: f32, page_height: f32) -> Self {
        Self {
            blocks,
            page_width,
            page_height,
        }
    }

    /// Append a block.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Number of top-level blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the page has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Page dimensions as (width, height).
    pub fn dimensions(&self) -> (f32, f32) {
        (self.page_width, self.page_height)
    }

    /// Deepest nesting level across the page's blocks. An empty page has
    /// depth 0.
    pub fn max_depth(&self) -> usize {
        self.blocks.iter().map(Block::depth).max().unwrap_or(0)
    }

    /// Concatenated leaf text of the whole page, in block order.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::plain_text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
