//! # blockmerge
//!
//! Block-tree reconstruction for digitized documents.
//!
//! The crate ingests per-glyph/per-line records extracted from a document's
//! XML rendition and reconstructs a hierarchical block model (paragraph →
//! sub-run → glyph-run) suitable for downstream translation and
//! re-typesetting. The geometric merge heuristics and the extraction tooling
//! live outside the crate, behind the [`collab`] traits; what lives here is
//! the data model, the stage orchestration with its truncate-on-first-failure
//! policy, the sub-block flattener, and the majority-vote font normalizer.
//!
//! ## Quick Start
//!
//! ```
//! use blockmerge::{Block, BoundingBox, FontNormalizer, PageBlockTable};
//!
//! let run = Block::leaf(
//!     "अध्याय एक",
//!     "XYZAB+Mangal",
//!     14.0,
//!     BoundingBox::new(10.0, 10.0, 200.0, 24.0),
//! );
//! let mut page = PageBlockTable::new(595.0, 842.0);
//! page.push(run);
//!
//! let normalized = FontNormalizer::new().normalize(&page);
//! assert_eq!(normalized.blocks[0].font_family, "Mangal");
//! ```
//!
//! ## Running the full pipeline
//!
//! Stage collaborators are supplied by the caller; the orchestrator
//! sequences them per page and applies the truncation policy:
//!
//! ```no_run
//! use std::sync::Arc;
//! use blockmerge::collab::{
//!     Collaborators, HeaderFooterTagger, HorizontalMerger, MarginCalculator, VerticalMerger,
//! };
//! use blockmerge::{
//!     Block, BlockConfig, Document, DocumentConfig, Orchestrator, PageBlockTable, Region,
//!     RunConfig,
//! };
//! # struct Geometry;
//! # impl HeaderFooterTagger for Geometry {
//! #     fn tag(&self, _: &Region, _: &Region, page: &PageBlockTable) -> blockmerge::Result<PageBlockTable> {
//! #         Ok(page.clone())
//! #     }
//! # }
//! # impl HorizontalMerger for Geometry {
//! #     fn merge(&self, page: &PageBlockTable, _: &DocumentConfig) -> blockmerge::Result<PageBlockTable> {
//! #         Ok(page.clone())
//! #     }
//! # }
//! # impl VerticalMerger for Geometry {
//! #     fn merge(&self, page: &PageBlockTable, _: &DocumentConfig) -> blockmerge::Result<PageBlockTable> {
//! #         Ok(page.clone())
//! #     }
//! # }
//! # impl MarginCalculator for Geometry {
//! #     fn compute(&self, block: &Block, _: &BlockConfig) -> blockmerge::Result<Vec<Block>> {
//! #         Ok(block.children.clone().unwrap_or_default())
//! #     }
//! # }
//! let geometry = Arc::new(Geometry);
//! let collaborators = Collaborators::new(
//!     geometry.clone(),
//!     geometry.clone(),
//!     geometry.clone(),
//!     geometry,
//! );
//!
//! let config = RunConfig::new(
//!     DocumentConfig::for_language("hi"),
//!     BlockConfig::default(),
//!     Region::new(0.0, 60.0),
//!     Region::new(780.0, 842.0),
//!     true,
//! );
//!
//! let document = Document::new("job-42", "/tmp/work");
//! let (document, outcome) = Orchestrator::new(collaborators).run(document, &config);
//! assert!(outcome.is_complete());
//! println!("pages: {}", document.page_count());
//! ```

pub mod collab;
pub mod config;
pub mod error;
pub mod job;
pub mod model;
pub mod pipeline;

// Re-export commonly used types
pub use collab::{
    BlockTableParser, Collaborators, ExtractedMetadata, HeaderFooterTagger, HorizontalMerger,
    MarginCalculator, MetadataExtractor, VerticalMerger,
};
pub use config::{BlockConfig, DocumentConfig, PipelineOptions, Region, RunConfig};
pub use error::{Error, Result};
pub use job::{provision_workspace, JobRunner, PreparedJob};
pub use model::{Block, BlockRow, BoundingBox, Document, PageBlockTable, RegionRole};
pub use pipeline::{
    canonical_font, font_mode, FontNormalizer, Orchestrator, RunOutcome, Stage, StageFailure,
    SubBlockFlattener,
};

/// Run the full reconstruction pipeline over a document with default options.
///
/// Equivalent to `Orchestrator::new(collaborators).run(document, config)`.
pub fn reconstruct(
    document: Document,
    collaborators: Collaborators,
    config: &RunConfig,
) -> (Document, RunOutcome) {
    Orchestrator::new(collaborators).run(document, config)
}

/// Builder for assembling a configured reconstruction pipeline.
///
/// # Example
///
/// ```no_run
/// use blockmerge::{Collaborators, PipelineBuilder};
///
/// # fn collaborators() -> Collaborators { unimplemented!() }
/// let orchestrator = PipelineBuilder::new()
///     .sequential()
///     .with_max_tree_depth(4)
///     .build(collaborators());
/// ```
pub struct PipelineBuilder {
    options: PipelineOptions,
}

impl PipelineBuilder {
    /// Create a builder with default options.
    pub fn new() -> Self {
        Self {
            options: PipelineOptions::default(),
        }
    }

    /// Enable or disable parallel page processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.options = self.options.with_parallel(parallel);
        self
    }

    /// Disable parallel page processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Set the accepted nesting depth bound.
    pub fn with_max_tree_depth(mut self, depth: usize) -> Self {
        self.options = self.options.with_max_tree_depth(depth);
        self
    }

    /// Build the orchestrator over the given collaborators.
    pub fn build(self, collaborators: Collaborators) -> Orchestrator {
        Orchestrator::with_options(collaborators, self.options)
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
