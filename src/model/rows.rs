//! Row-oriented (tabular) representation of a page's block tree.
//!
//! Sibling blocks are processed row-wise by external tooling, so nested
//! children travel as a self-contained serialized sub-table embedded in the
//! parent row. The in-memory representation stays a genuine tree; conversion
//! happens only at persistence or cross-process boundaries, and is lossless
//! in both directions.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Block, BoundingBox, PageBlockTable, RegionRole};

/// One row of the tabular form of a page block table.
///
/// Mirrors [`Block`] field for field, except that children are carried as an
/// embedded JSON document holding the child row sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRow {
    /// Geometric extent in page coordinates.
    pub bbox: BoundingBox,

    /// Raw text content.
    #[serde(default)]
    pub text: String,

    /// Font identifier.
    pub font_family: String,

    /// Glyph/line height as reported by extraction.
    pub text_height: f32,

    /// Vertical line stride on leaf rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_line_height: Option<u32>,

    /// Header/footer annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<RegionRole>,

    /// Child rows as an embedded JSON document; `None` for leaf rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<String>,
}

impl BlockRow {
    /// Serialize a block into its row form, nesting children as a JSON cell.
    pub fn from_block(block: &Block) -> Result<Self> {
        let children = match &block.children {
            None => None,
            Some(kids) => {
                let rows = kids
                    .iter()
                    .map(BlockRow::from_block)
                    .collect::<Result<Vec<_>>>()?;
                Some(serde_json::to_string(&rows)?)
            }
        };

        Ok(Self {
            bbox: block.bbox,
            text: block.text.clone(),
            font_family: block.font_family.clone(),
            text_height: block.text_height,
            avg_line_height: block.avg_line_height,
            role: block.role,
            children,
        })
    }

    /// Rebuild the block tree this row encodes.
    pub fn into_block(self) -> Result<Block> {
        let children = match self.children {
            None => None,
            Some(cell) => {
                let rows: Vec<BlockRow> = serde_json::from_str(&cell)?;
                Some(
                    rows.into_iter()
                        .map(BlockRow::into_block)
                        .collect::<Result<Vec<_>>>()?,
                )
            }
        };

        Ok(Block {
            bbox: self.bbox,
            text: self.text,
            font_family: self.font_family,
            text_height: self.text_height,
            avg_line_height: self.avg_line_height,
            role: self.role,
            children,
        })
    }

    /// Whether this row encodes a leaf block.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Convert a page table into its row-oriented form.
pub fn to_rows(table: &PageBlockTable) -> Result<Vec<BlockRow>> {
    table.blocks.iter().map(BlockRow::from_block).collect()
}

/// Rebuild a page table from rows produced by [`to_rows`].
pub fn from_rows(rows: Vec<BlockRow>, page_width: f32, page_height: f32) -> Result<PageBlockTable> {
    let blocks = rows
        .into_iter()
        .map(BlockRow::into_block)
        .collect::<Result<Vec<_>>>()?;
    Ok(PageBlockTable::with_blocks(blocks, page_width, page_height))
}
