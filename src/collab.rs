//! Collaborator seams consumed by the reconstruction pipeline.
//!
//! The geometric algorithms (merge heuristics, header/footer detection,
//! margin calculation) and the PDF/XML extraction tooling live outside this
//! crate. The pipeline talks to them through these traits, so any
//! implementation can be slotted in, including mocks in tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{BlockConfig, DocumentConfig, Region};
use crate::error::Result;
use crate::model::{Block, PageBlockTable};

/// Paths produced by metadata extraction.
#[derive(Debug, Clone)]
pub struct ExtractedMetadata {
    /// XML rendition of the source document.
    pub xml_path: PathBuf,

    /// Per-page background images, in page order.
    pub background_images: Vec<PathBuf>,
}

/// Extracts the XML rendition and background images of a source document.
pub trait MetadataExtractor: Send + Sync {
    /// Run extraction into the job's working directory.
    fn extract(&self, source: &Path, working_dir: &Path) -> Result<ExtractedMetadata>;
}

/// Parses per-page block tables out of the XML rendition.
pub trait BlockTableParser: Send + Sync {
    /// Parse text and table blocks, one table per page.
    fn parse_text(&self, xml_path: &Path, language: &str) -> Result<Vec<PageBlockTable>>;

    /// Parse image blocks, one table per page.
    fn parse_images(&self, xml_path: &Path) -> Result<Vec<PageBlockTable>>;
}

/// Annotates blocks falling inside the header or footer band.
pub trait HeaderFooterTagger: Send + Sync {
    /// Return the page with header/footer roles assigned.
    fn tag(
        &self,
        header: &Region,
        footer: &Region,
        page: &PageBlockTable,
    ) -> Result<PageBlockTable>;
}

/// Merges horizontally adjacent blocks into composites.
pub trait HorizontalMerger: Send + Sync {
    /// Return the page with horizontal merges applied.
    fn merge(&self, page: &PageBlockTable, config: &DocumentConfig) -> Result<PageBlockTable>;
}

/// Merges vertically adjacent blocks into composites.
pub trait VerticalMerger: Send + Sync {
    /// Return the page with vertical merges applied.
    fn merge(&self, page: &PageBlockTable, config: &DocumentConfig) -> Result<PageBlockTable>;
}

/// Expands one composite row into its margin-adjusted child rows.
pub trait MarginCalculator: Send + Sync {
    /// Compute the margin-adjusted layout of a composite block's children.
    /// May return zero rows for a degenerate region.
    fn compute(&self, block: &Block, config: &BlockConfig) -> Result<Vec<Block>>;
}

/// The per-page stage collaborators, bundled for the orchestrator.
#[derive(Clone)]
pub struct Collaborators {
    /// Header/footer tagging stage.
    pub tagger: Arc<dyn HeaderFooterTagger>,

    /// Horizontal merge stage.
    pub horizontal: Arc<dyn HorizontalMerger>,

    /// Vertical merge stage.
    pub vertical: Arc<dyn VerticalMerger>,

    /// Margin calculation used by the flattening stage.
    pub margin: Arc<dyn MarginCalculator>,
}

impl Collaborators {
    /// Bundle the four per-page stage collaborators.
    pub fn new(
        tagger: Arc<dyn HeaderFooterTagger>,
        horizontal: Arc<dyn HorizontalMerger>,
        vertical: Arc<dyn VerticalMerger>,
        margin: Arc<dyn MarginCalculator>,
    ) -> Self {
        Self {
            tagger,
            horizontal,
            vertical,
            margin,
        }
    }
}
