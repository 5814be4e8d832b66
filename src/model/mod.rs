//! Block-tree model shared by every pipeline stage.
//!
//! The model is a genuine recursive tree: a composite [`Block`] owns its
//! children directly. The row-oriented form with nested serialized cells,
//! required by row-wise external tooling, lives in [`rows`] and is produced
//! only at that boundary.

mod block;
mod document;
mod page;
pub mod rows;

pub use block::{Block, BoundingBox, RegionRole};
pub use document::Document;
pub use page::PageBlockTable;
pub use rows::BlockRow;
