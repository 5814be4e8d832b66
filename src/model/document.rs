//! Document-level types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::PageBlockTable;

/// A reconstructed document: one block table per page, plus the job-owned
/// workspace paths carried through for downstream re-typesetting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier of the job that produced this document. Stage failures are
    /// recorded against it.
    pub job_id: String,

    /// Per-page block tables, in page order.
    pub pages: Vec<PageBlockTable>,

    /// Working directory owned exclusively by this job.
    pub working_dir: PathBuf,

    /// Per-page background images extracted by the metadata collaborator.
    pub background_images: Vec<PathBuf>,
}

impl Document {
    /// Create an empty document for a job.
    pub fn new(job_id: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            job_id: job_id.into(),
            pages: Vec::new(),
            working_dir: working_dir.into(),
            background_images: Vec::new(),
        }
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&PageBlockTable> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Append a page.
    pub fn add_page(&mut self, page: PageBlockTable) {
        self.pages.push(page);
    }

    /// Whether the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
