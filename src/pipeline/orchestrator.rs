//! Stage sequencing and the truncate-on-first-failure policy.

use rayon::prelude::*;

use crate::collab::Collaborators;
use crate::config::{PipelineOptions, RunConfig};
use crate::error::Error;
use crate::model::{Document, PageBlockTable};

use super::flatten::SubBlockFlattener;
use super::font::FontNormalizer;
use super::Stage;

/// Failure record for a stage call, carried in [`RunOutcome::Truncated`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    /// 1-indexed page the stage failed on.
    pub page: u32,

    /// The failing stage.
    pub stage: Stage,

    /// Failure detail reported by the collaborator.
    pub message: String,
}

impl StageFailure {
    fn new(page: u32, stage: Stage, error: Error) -> Self {
        Self {
            page,
            stage,
            message: error.to_string(),
        }
    }
}

impl From<StageFailure> for Error {
    fn from(failure: StageFailure) -> Self {
        Error::Stage {
            stage: failure.stage,
            page: failure.page,
            message: failure.message,
        }
    }
}

/// Outcome of an orchestrator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every page completed every stage.
    Complete,

    /// A stage failed: the returned document holds only the pages that
    /// preceded the failing one.
    Truncated(StageFailure),
}

impl RunOutcome {
    /// Whether the run completed without truncation.
    pub fn is_complete(&self) -> bool {
        matches!(self, RunOutcome::Complete)
    }

    /// The recorded failure, if the run was truncated.
    pub fn failure(&self) -> Option<&StageFailure> {
        match self {
            RunOutcome::Truncated(failure) => Some(failure),
            RunOutcome::Complete => None,
        }
    }
}

/// Sequences the per-page stages across a document.
///
/// The per-page sequence is `tag (multi-page only) → horizontal merge →
/// vertical merge → flatten → normalize font`, with pages processed in index
/// order. A stage failure on page *k* discards page *k* and everything after
/// it: the run comes back with pages `1..k-1` and the recorded failure,
/// never an `Err`.
pub struct Orchestrator {
    collaborators: Collaborators,
    options: PipelineOptions,
}

impl Orchestrator {
    /// Create an orchestrator with default options.
    pub fn new(collaborators: Collaborators) -> Self {
        Self::with_options(collaborators, PipelineOptions::default())
    }

    /// Create an orchestrator with explicit options.
    pub fn with_options(collaborators: Collaborators, options: PipelineOptions) -> Self {
        Self {
            collaborators,
            options,
        }
    }

    /// Run the full stage sequence over a document.
    ///
    /// Callers distinguish a complete run from a truncated one through the
    /// returned [`RunOutcome`]; every failure is also logged against the
    /// document's job identifier.
    pub fn run(&self, document: Document, config: &RunConfig) -> (Document, RunOutcome) {
        let Document {
            job_id,
            pages,
            working_dir,
            background_images,
        } = document;
        let total = pages.len();

        let (pages, failure) = if self.options.parallel {
            // Pages past a failure may be computed here, but the ordered
            // reduction below never accepts them into the output.
            let results: Vec<_> = pages
                .par_iter()
                .enumerate()
                .map(|(index, page)| self.process_page(page, index as u32 + 1, config))
                .collect();
            truncate_at_first_failure(results)
        } else {
            let mut completed = Vec::with_capacity(total);
            let mut failure = None;
            for (index, page) in pages.iter().enumerate() {
                match self.process_page(page, index as u32 + 1, config) {
                    Ok(done) => completed.push(done),
                    Err(recorded) => {
                        // Pages after the failing one are never attempted.
                        failure = Some(recorded);
                        break;
                    }
                }
            }
            (completed, failure)
        };

        let outcome = match failure {
            None => {
                log::info!("job {job_id}: reconstructed {} page(s)", pages.len());
                RunOutcome::Complete
            }
            Some(recorded) => {
                log::error!(
                    "job {job_id}: stage {} failed on page {}: {}; returning {} of {} page(s)",
                    recorded.stage,
                    recorded.page,
                    recorded.message,
                    pages.len(),
                    total,
                );
                RunOutcome::Truncated(recorded)
            }
        };

        (
            Document {
                job_id,
                pages,
                working_dir,
                background_images,
            },
            outcome,
        )
    }

    /// Run every stage over one page.
    fn process_page(
        &self,
        page: &PageBlockTable,
        page_no: u32,
        config: &RunConfig,
    ) -> Result<PageBlockTable, StageFailure> {
        let first_stage = if config.multi_page {
            Stage::TagHeaderFooter
        } else {
            Stage::HorizontalMerge
        };

        let depth = page.max_depth();
        if depth > self.options.max_tree_depth {
            return Err(StageFailure {
                page: page_no,
                stage: first_stage,
                message: format!(
                    "block tree depth {depth} exceeds the configured bound {}",
                    self.options.max_tree_depth
                ),
            });
        }

        let current = if config.multi_page {
            let tagged = self
                .collaborators
                .tagger
                .tag(&config.header_region, &config.footer_region, page)
                .map_err(|e| StageFailure::new(page_no, Stage::TagHeaderFooter, e))?;
            log::debug!("page {page_no}: {} done", Stage::TagHeaderFooter);
            tagged
        } else {
            page.clone()
        };

        let current = self
            .collaborators
            .horizontal
            .merge(&current, &config.document_config)
            .map_err(|e| StageFailure::new(page_no, Stage::HorizontalMerge, e))?;
        log::debug!("page {page_no}: {} done", Stage::HorizontalMerge);

        let current = self
            .collaborators
            .vertical
            .merge(&current, &config.document_config)
            .map_err(|e| StageFailure::new(page_no, Stage::VerticalMerge, e))?;
        log::debug!("page {page_no}: {} done", Stage::VerticalMerge);

        let flattener = SubBlockFlattener::new(self.collaborators.margin.clone());
        let current = flattener
            .flatten(&current, &config.block_config)
            .map_err(|e| StageFailure::new(page_no, Stage::Flatten, e))?;
        log::debug!("page {page_no}: {} done", Stage::Flatten);

        let current = FontNormalizer::new().normalize(&current);
        log::debug!("page {page_no}: {} done", Stage::NormalizeFont);

        Ok(current)
    }
}

/// Reduce ordered per-page outcomes to the surviving prefix.
///
/// The first failed page discards itself and every page after it; pages
/// before it are returned in order along with the recorded failure.
pub fn truncate_at_first_failure<T>(
    results: Vec<Result<T, StageFailure>>,
) -> (Vec<T>, Option<StageFailure>) {
    let mut completed = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(value) => completed.push(value),
            Err(failure) => return (completed, Some(failure)),
        }
    }
    (completed, None)
}
