//! Sub-block flattening.
//!
//! The merge stages leave composite rows whose children encode the geometry
//! of the merged region. This stage collapses one nesting level of the page
//! table: each composite row is replaced by the margin-adjusted child rows
//! the margin calculator computes for it, and every leaf picks up its
//! vertical line stride.

use std::sync::Arc;

use crate::collab::MarginCalculator;
use crate::config::BlockConfig;
use crate::error::Result;
use crate::model::{Block, PageBlockTable};

/// Expands composite rows into margin-adjusted children.
pub struct SubBlockFlattener {
    margin: Arc<dyn MarginCalculator>,
}

impl SubBlockFlattener {
    /// Create a flattener backed by the given margin calculator.
    pub fn new(margin: Arc<dyn MarginCalculator>) -> Self {
        Self { margin }
    }

    /// Flatten one page table.
    ///
    /// Returns a new table; the input is never mutated. Relative order is
    /// preserved: leaf rows pass through in place, and each composite row is
    /// replaced by its expansion in the order the margin calculator returned
    /// it. The output row count is the number of leaf rows plus the total
    /// number of rows the calculator returned for composites.
    ///
    /// A calculator failure on any row aborts the whole page.
    pub fn flatten(&self, table: &PageBlockTable, config: &BlockConfig) -> Result<PageBlockTable> {
        let mut out = PageBlockTable::new(table.page_width, table.page_height);

        for row in &table.blocks {
            if row.is_leaf() {
                out.push(annotate_leaf(row.clone()));
            } else {
                for child in self.margin.compute(row, config)? {
                    out.push(annotate_leaves(child));
                }
            }
        }

        Ok(out)
    }
}

/// Set the line stride on a single leaf row.
fn annotate_leaf(mut block: Block) -> Block {
    block.avg_line_height = Some(block.text_height.round() as u32);
    block
}

/// Set the line stride on every leaf under a returned child row.
///
/// The margin calculator may hand back rows that still carry nested
/// structure; that structure survives flattening untouched apart from the
/// leaf annotation.
fn annotate_leaves(mut block: Block) -> Block {
    match block.children.take() {
        None => annotate_leaf(block),
        Some(children) => {
            block.children = Some(children.into_iter().map(annotate_leaves).collect());
            block
        }
    }
}
