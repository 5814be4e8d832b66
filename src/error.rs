//! Error types for the blockmerge library.

use std::io;
use thiserror::Error;

use crate::pipeline::Stage;

/// Result type alias for blockmerge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during block-tree reconstruction.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The job workspace could not be provisioned. Fatal: the job aborts
    /// before any page is touched.
    #[error("Workspace provisioning failed: {0}")]
    Provisioning(String),

    /// Metadata extraction or block-table parsing failed. Fatal: the job
    /// aborts before stage processing.
    #[error("Metadata extraction failed: {0}")]
    Extraction(String),

    /// A per-page stage call failed. Feeds the orchestrator's truncation
    /// policy rather than aborting the job.
    #[error("Stage {stage} failed on page {page}: {message}")]
    Stage {
        /// The stage that failed.
        stage: Stage,
        /// 1-indexed page number the stage failed on.
        page: u32,
        /// Failure detail reported by the collaborator.
        message: String,
    },

    /// Error encoding or decoding the tabular block representation.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
