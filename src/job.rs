//! Job-scoped workspace provisioning and the extraction front-end.
//!
//! A job owns its working directory for the entire run; nothing is shared
//! across jobs. Provisioning and extraction failures are fatal: the job
//! aborts before any page enters the pipeline.

use std::path::{Path, PathBuf};
use std::time::Instant;

use uuid::Uuid;

use crate::collab::{BlockTableParser, MetadataExtractor};
use crate::error::{Error, Result};
use crate::model::{Document, PageBlockTable};

/// Everything the pipeline needs from a prepared job.
#[derive(Debug, Clone)]
pub struct PreparedJob {
    /// Text/table block tables assembled into a document.
    pub document: Document,

    /// Per-page image block tables, carried separately for downstream
    /// re-typesetting.
    pub image_pages: Vec<PageBlockTable>,
}

/// Create the job's directory layout under `base_dir`.
///
/// Layout is `data/output/<stem>_<uuid>`; the innermost directory becomes
/// the job's exclusive working directory.
pub fn provision_workspace(base_dir: &Path, filename: &str, job_id: &str) -> Result<PathBuf> {
    let data_dir = base_dir.join("data");
    create_dir(&data_dir, job_id, "data")?;

    let output_dir = data_dir.join("output");
    create_dir(&output_dir, job_id, "output")?;

    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    let working_dir = output_dir.join(format!("{stem}_{}", Uuid::new_v4()));
    create_dir(&working_dir, job_id, "working")?;

    log::info!(
        "job {job_id}: provisioned working directory {}",
        working_dir.display()
    );
    Ok(working_dir)
}

fn create_dir(path: &Path, job_id: &str, what: &str) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| {
        log::error!(
            "job {job_id}: unable to create {what} directory {}: {e}",
            path.display()
        );
        Error::Provisioning(format!(
            "unable to create {what} directory {}: {e}",
            path.display()
        ))
    })
}

/// Drives workspace provisioning, metadata extraction, and block-table
/// parsing for one job.
pub struct JobRunner<E, P> {
    extractor: E,
    parser: P,
}

impl<E: MetadataExtractor, P: BlockTableParser> JobRunner<E, P> {
    /// Create a runner over the given extraction collaborators.
    pub fn new(extractor: E, parser: P) -> Self {
        Self { extractor, parser }
    }

    /// Prepare a document for reconstruction.
    ///
    /// Provisions the workspace, extracts the XML rendition and background
    /// images of `filename` (resolved against `base_dir`), and parses the
    /// per-page text and image block tables.
    pub fn prepare(
        &self,
        filename: &str,
        base_dir: &Path,
        job_id: &str,
        language: &str,
    ) -> Result<PreparedJob> {
        let working_dir = provision_workspace(base_dir, filename, job_id)?;
        let source = base_dir.join(filename);

        let started = Instant::now();
        let metadata = self
            .extractor
            .extract(&source, &working_dir)
            .map_err(|e| {
                log::error!(
                    "job {job_id}: metadata extraction failed for {}: {e}",
                    source.display()
                );
                Error::Extraction(e.to_string())
            })?;
        log::info!(
            "job {job_id}: extracted {} in {:.2?}",
            source.display(),
            started.elapsed()
        );

        let text_pages = self
            .parser
            .parse_text(&metadata.xml_path, language)
            .map_err(|e| {
                log::error!("job {job_id}: text block-table parsing failed: {e}");
                Error::Extraction(e.to_string())
            })?;

        let image_pages = self.parser.parse_images(&metadata.xml_path).map_err(|e| {
            log::error!("job {job_id}: image block-table parsing failed: {e}");
            Error::Extraction(e.to_string())
        })?;

        log::info!(
            "job {job_id}: parsed {} text page(s) and {} image page(s)",
            text_pages.len(),
            image_pages.len()
        );

        let mut document = Document::new(job_id, working_dir);
        document.pages = text_pages;
        document.background_images = metadata.background_images;

        Ok(PreparedJob {
            document,
            image_pages,
        })
    }
}
