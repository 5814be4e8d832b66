//! Pipeline and job configuration.

use serde::{Deserialize, Serialize};

/// Tunables forwarded to the horizontal and vertical merge collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Language of the source document, forwarded to the XML parser.
    pub language: String,

    /// Gap multiplier the horizontal merger applies when deciding adjacency.
    pub horizontal_gap_factor: f32,

    /// Gap multiplier the vertical merger applies when deciding adjacency.
    pub vertical_gap_factor: f32,
}

impl DocumentConfig {
    /// Create a config for the given language with default gap factors.
    pub fn for_language(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Default::default()
        }
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            horizontal_gap_factor: 1.0,
            vertical_gap_factor: 1.2,
        }
    }
}

/// Tunables forwarded to the margin calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockConfig {
    /// Tolerance in page units when snapping children to the left margin.
    pub left_margin_tolerance: f32,

    /// Tolerance in page units when snapping children to the right margin.
    pub right_margin_tolerance: f32,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            left_margin_tolerance: 5.0,
            right_margin_tolerance: 5.0,
        }
    }
}

/// Horizontal band of a page, in page coordinates.
///
/// Header and footer regions are detected by an external collaborator and
/// threaded through the pipeline unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Top edge of the band.
    pub top: f32,

    /// Bottom edge of the band.
    pub bottom: f32,
}

impl Region {
    /// Create a region from its vertical extent.
    pub fn new(top: f32, bottom: f32) -> Self {
        Self { top, bottom }
    }

    /// Whether a Y coordinate falls within the band.
    pub fn contains(&self, y: f32) -> bool {
        y >= self.top && y <= self.bottom
    }
}

/// Inputs for one orchestrator run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Merge tunables.
    pub document_config: DocumentConfig,

    /// Margin-calculation tunables.
    pub block_config: BlockConfig,

    /// Header band of the page.
    pub header_region: Region,

    /// Footer band of the page.
    pub footer_region: Region,

    /// Whether the document spans multiple pages. Header/footer tagging only
    /// runs when it does.
    pub multi_page: bool,
}

impl RunConfig {
    /// Assemble a run configuration.
    pub fn new(
        document_config: DocumentConfig,
        block_config: BlockConfig,
        header_region: Region,
        footer_region: Region,
        multi_page: bool,
    ) -> Self {
        Self {
            document_config,
            block_config,
            header_region,
            footer_region,
            multi_page,
        }
    }
}

/// Options controlling orchestrator execution.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Whether per-page work fans out across threads. Output page order and
    /// the truncation policy are preserved either way.
    pub parallel: bool,

    /// Maximum nesting depth accepted in incoming page tables. Pages nested
    /// deeper fail their first stage.
    pub max_tree_depth: usize,
}

impl PipelineOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable parallel page processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel page processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the accepted nesting depth bound.
    pub fn with_max_tree_depth(mut self, depth: usize) -> Self {
        self.max_tree_depth = depth;
        self
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            max_tree_depth: 3,
        }
    }
}
