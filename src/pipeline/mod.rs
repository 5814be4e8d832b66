//! The per-page reconstruction pipeline.
//!
//! Stage order is fixed: header/footer tagging (multi-page documents only),
//! horizontal merge, vertical merge, sub-block flattening, font
//! normalization. The orchestrator owns the sequencing and the
//! truncate-on-first-failure policy.

mod flatten;
mod font;
mod orchestrator;

pub use flatten::SubBlockFlattener;
pub use font::{canonical_font, font_mode, FontNormalizer};
pub use orchestrator::{truncate_at_first_failure, Orchestrator, RunOutcome, StageFailure};

use std::fmt;

/// A stage of the per-page reconstruction sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Header/footer tagging (multi-page documents only).
    TagHeaderFooter,

    /// Horizontal block merging.
    HorizontalMerge,

    /// Vertical block merging.
    VerticalMerge,

    /// Sub-block flattening.
    Flatten,

    /// Font normalization.
    NormalizeFont,
}

impl Stage {
    /// Stable stage name used in logs and failure records.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::TagHeaderFooter => "tagHeaderFooter",
            Stage::HorizontalMerge => "horizontalMerge",
            Stage::VerticalMerge => "verticalMerge",
            Stage::Flatten => "flatten",
            Stage::NormalizeFont => "normalizeFont",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
