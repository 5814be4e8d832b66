//! Integration tests for the reconstruction pipeline.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use blockmerge::collab::{
    Collaborators, HeaderFooterTagger, HorizontalMerger, MarginCalculator, VerticalMerger,
};
use blockmerge::error::{Error, Result};
use blockmerge::{
    Block, BlockConfig, BoundingBox, Document, DocumentConfig, Orchestrator, PageBlockTable,
    PipelineOptions, Region, RegionRole, RunConfig, Stage,
};

/// Tagger that assigns roles from the configured bands.
struct BandTagger;

impl HeaderFooterTagger for BandTagger {
    fn tag(
        &self,
        header: &Region,
        footer: &Region,
        page: &PageBlockTable,
    ) -> Result<PageBlockTable> {
        let blocks = page
            .blocks
            .iter()
            .cloned()
            .map(|mut block| {
                if header.contains(block.bbox.top) {
                    block.role = Some(RegionRole::Header);
                } else if footer.contains(block.bbox.bottom) {
                    block.role = Some(RegionRole::Footer);
                }
                block
            })
            .collect();
        Ok(PageBlockTable::with_blocks(
            blocks,
            page.page_width,
            page.page_height,
        ))
    }
}

/// Tagger that counts how often it runs.
struct CountingTagger {
    calls: Arc<AtomicUsize>,
}

impl HeaderFooterTagger for CountingTagger {
    fn tag(
        &self,
        _header: &Region,
        _footer: &Region,
        page: &PageBlockTable,
    ) -> Result<PageBlockTable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(page.clone())
    }
}

/// Merger that passes pages through, failing when a marker text is present.
struct MarkedMerger {
    fail_marker: Option<&'static str>,
}

impl MarkedMerger {
    fn pass_through() -> Self {
        Self { fail_marker: None }
    }

    fn failing_on(marker: &'static str) -> Self {
        Self {
            fail_marker: Some(marker),
        }
    }

    fn apply(&self, page: &PageBlockTable) -> Result<PageBlockTable> {
        if let Some(marker) = self.fail_marker {
            if page.plain_text().contains(marker) {
                return Err(Error::Other(format!("marker {marker} hit")));
            }
        }
        Ok(page.clone())
    }
}

impl HorizontalMerger for MarkedMerger {
    fn merge(&self, page: &PageBlockTable, _config: &DocumentConfig) -> Result<PageBlockTable> {
        self.apply(page)
    }
}

impl VerticalMerger for MarkedMerger {
    fn merge(&self, page: &PageBlockTable, _config: &DocumentConfig) -> Result<PageBlockTable> {
        self.apply(page)
    }
}

/// Vertical merger that records the pages it saw, failing on a marker.
struct RecordingVertical {
    seen: Arc<Mutex<Vec<String>>>,
    fail_marker: &'static str,
}

impl VerticalMerger for RecordingVertical {
    fn merge(&self, page: &PageBlockTable, _config: &DocumentConfig) -> Result<PageBlockTable> {
        let text = page.plain_text();
        self.seen.lock().unwrap().push(text.clone());
        if text.contains(self.fail_marker) {
            return Err(Error::Other("vertical geometry failed".to_string()));
        }
        Ok(page.clone())
    }
}

/// Margin calculator that keeps composite rows as-is (identity layout).
struct IdentityMargin;

impl MarginCalculator for IdentityMargin {
    fn compute(&self, block: &Block, _config: &BlockConfig) -> Result<Vec<Block>> {
        Ok(vec![block.clone()])
    }
}

/// Margin calculator that expands composites into their children.
struct ChildExpandingMargin;

impl MarginCalculator for ChildExpandingMargin {
    fn compute(&self, block: &Block, _config: &BlockConfig) -> Result<Vec<Block>> {
        Ok(block.children.clone().unwrap_or_default())
    }
}

fn leaf(text: &str, font: &str) -> Block {
    Block::leaf(text, font, 12.0, BoundingBox::new(10.0, 100.0, 200.0, 112.0))
}

fn collaborators(margin: Arc<dyn MarginCalculator>) -> Collaborators {
    Collaborators::new(
        Arc::new(BandTagger),
        Arc::new(MarkedMerger::pass_through()),
        Arc::new(MarkedMerger::pass_through()),
        margin,
    )
}

fn run_config(multi_page: bool) -> RunConfig {
    RunConfig::new(
        DocumentConfig::for_language("hi"),
        BlockConfig::default(),
        Region::new(0.0, 60.0),
        Region::new(780.0, 842.0),
        multi_page,
    )
}

fn document_with_pages(pages: Vec<PageBlockTable>) -> Document {
    let mut doc = Document::new("job-test", "/tmp/job-test");
    doc.pages = pages;
    doc
}

#[test]
fn test_single_composite_resolves_to_majority_font() {
    // One page, one composite whose glyph runs disagree on font identity.
    let composite = Block::composite(
        "raw",
        vec![
            leaf("एक", "XYZAB+Arial"),
            leaf("दो", "Arial"),
            leaf("तीन", "QRSTU+Arial"),
        ],
    );
    let page = PageBlockTable::with_blocks(vec![composite], 595.0, 842.0);
    let document = document_with_pages(vec![page]);

    let orchestrator = Orchestrator::new(collaborators(Arc::new(IdentityMargin)));
    let (document, outcome) = orchestrator.run(document, &run_config(false));

    assert!(outcome.is_complete());
    assert_eq!(document.page_count(), 1);

    let block = &document.pages[0].blocks[0];
    assert_eq!(block.font_family, "Arial");
    for child in block.children.as_ref().unwrap() {
        assert_eq!(child.font_family, "Arial");
        assert_eq!(child.avg_line_height, Some(12));
    }
}

#[test]
fn test_horizontal_failure_on_page_two_truncates() {
    let page1 = PageBlockTable::with_blocks(vec![leaf("fine", "Arial")], 595.0, 842.0);
    let page2 = PageBlockTable::with_blocks(vec![leaf("fail-horizontal", "Arial")], 595.0, 842.0);
    let document = document_with_pages(vec![page1, page2]);

    let collaborators = Collaborators::new(
        Arc::new(BandTagger),
        Arc::new(MarkedMerger::failing_on("fail-horizontal")),
        Arc::new(MarkedMerger::pass_through()),
        Arc::new(IdentityMargin),
    );
    let (document, outcome) = Orchestrator::new(collaborators).run(document, &run_config(true));

    assert_eq!(document.page_count(), 1);
    assert_eq!(document.pages[0].plain_text(), "fine");

    let failure = outcome.failure().expect("run must be truncated");
    assert_eq!(failure.stage, Stage::HorizontalMerge);
    assert_eq!(failure.page, 2);
}

#[test]
fn test_sequential_run_never_attempts_pages_after_failure() {
    let pages: Vec<PageBlockTable> = (1..=4)
        .map(|n| {
            PageBlockTable::with_blocks(vec![leaf(&format!("p{n}"), "Arial")], 595.0, 842.0)
        })
        .collect();
    let document = document_with_pages(pages);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let collaborators = Collaborators::new(
        Arc::new(BandTagger),
        Arc::new(MarkedMerger::pass_through()),
        Arc::new(RecordingVertical {
            seen: seen.clone(),
            fail_marker: "p3",
        }),
        Arc::new(IdentityMargin),
    );
    let orchestrator =
        Orchestrator::with_options(collaborators, PipelineOptions::new().sequential());
    let (document, outcome) = orchestrator.run(document, &run_config(false));

    assert_eq!(document.page_count(), 2);
    let failure = outcome.failure().unwrap();
    assert_eq!(failure.page, 3);
    assert_eq!(failure.stage, Stage::VerticalMerge);

    // Page 4 was never handed to any stage.
    let seen = seen.lock().unwrap();
    assert_eq!(*seen, vec!["p1", "p2", "p3"]);
}

#[test]
fn test_parallel_and_sequential_runs_agree() {
    let make_document = || {
        let page1 = PageBlockTable::with_blocks(
            vec![Block::composite(
                "raw",
                vec![leaf("a", "XYZAB+Mangal"), leaf("b", "Mangal")],
            )],
            595.0,
            842.0,
        );
        let page2 =
            PageBlockTable::with_blocks(vec![leaf("fail-here", "Arial")], 595.0, 842.0);
        let page3 = PageBlockTable::with_blocks(vec![leaf("tail", "Arial")], 595.0, 842.0);
        document_with_pages(vec![page1, page2, page3])
    };
    let make_collaborators = || {
        Collaborators::new(
            Arc::new(BandTagger),
            Arc::new(MarkedMerger::failing_on("fail-here")),
            Arc::new(MarkedMerger::pass_through()),
            Arc::new(IdentityMargin),
        )
    };
    let config = run_config(true);

    let parallel = Orchestrator::with_options(
        make_collaborators(),
        PipelineOptions::new().with_parallel(true),
    );
    let sequential =
        Orchestrator::with_options(make_collaborators(), PipelineOptions::new().sequential());

    let (doc_par, out_par) = parallel.run(make_document(), &config);
    let (doc_seq, out_seq) = sequential.run(make_document(), &config);

    assert_eq!(doc_par, doc_seq);
    assert_eq!(out_par, out_seq);
    assert_eq!(doc_par.page_count(), 1);
}

#[test]
fn test_tagging_only_runs_for_multi_page_documents() {
    let calls = Arc::new(AtomicUsize::new(0));
    let make_collaborators = |calls: Arc<AtomicUsize>| {
        Collaborators::new(
            Arc::new(CountingTagger { calls }),
            Arc::new(MarkedMerger::pass_through()),
            Arc::new(MarkedMerger::pass_through()),
            Arc::new(IdentityMargin),
        )
    };
    let pages = vec![
        PageBlockTable::with_blocks(vec![leaf("x", "Arial")], 595.0, 842.0),
        PageBlockTable::with_blocks(vec![leaf("y", "Arial")], 595.0, 842.0),
    ];

    let orchestrator = Orchestrator::new(make_collaborators(calls.clone()));
    let (_, outcome) = orchestrator.run(document_with_pages(pages.clone()), &run_config(false));
    assert!(outcome.is_complete());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let (_, outcome) = orchestrator.run(document_with_pages(pages), &run_config(true));
    assert!(outcome.is_complete());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_band_tagger_assigns_roles() {
    let mut header_block = leaf("running head", "Arial");
    header_block.bbox = BoundingBox::new(10.0, 20.0, 200.0, 32.0);
    let body_block = leaf("body", "Arial");

    let page = PageBlockTable::with_blocks(vec![header_block, body_block], 595.0, 842.0);
    let document = document_with_pages(vec![page]);

    let orchestrator = Orchestrator::new(collaborators(Arc::new(IdentityMargin)));
    let (document, outcome) = orchestrator.run(document, &run_config(true));

    assert!(outcome.is_complete());
    let blocks = &document.pages[0].blocks;
    assert_eq!(blocks[0].role, Some(RegionRole::Header));
    assert_eq!(blocks[1].role, None);
}

#[test]
fn test_depth_bound_is_enforced() {
    let depth4 = Block::composite(
        "raw",
        vec![Block::composite(
            "raw",
            vec![Block::composite("raw", vec![leaf("deep", "Arial")])],
        )],
    );
    let page = PageBlockTable::with_blocks(vec![depth4], 595.0, 842.0);

    let orchestrator = Orchestrator::new(collaborators(Arc::new(IdentityMargin)));
    let (document, outcome) = orchestrator.run(document_with_pages(vec![page.clone()]), &run_config(false));

    assert!(document.is_empty());
    let failure = outcome.failure().unwrap();
    assert_eq!(failure.page, 1);
    assert_eq!(failure.stage, Stage::HorizontalMerge);

    // Raising the declared bound accepts the same tree.
    let orchestrator = Orchestrator::with_options(
        collaborators(Arc::new(IdentityMargin)),
        PipelineOptions::new().with_max_tree_depth(4),
    );
    let (document, outcome) = orchestrator.run(document_with_pages(vec![page]), &run_config(false));
    assert!(outcome.is_complete());
    assert_eq!(document.page_count(), 1);
}

#[test]
fn test_flatten_expansion_through_the_pipeline() {
    let composite = Block::composite("raw", vec![leaf("x", "Arial"), leaf("y", "Arial")]);
    let page = PageBlockTable::with_blocks(
        vec![leaf("a", "Arial"), composite, leaf("b", "Arial")],
        595.0,
        842.0,
    );
    let document = document_with_pages(vec![page]);

    let orchestrator = Orchestrator::new(collaborators(Arc::new(ChildExpandingMargin)));
    let (document, outcome) = orchestrator.run(document, &run_config(false));

    assert!(outcome.is_complete());
    let blocks = &document.pages[0].blocks;
    assert_eq!(blocks.len(), 4);
    let texts: Vec<_> = blocks.iter().map(|b| b.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "x", "y", "b"]);
    assert!(blocks.iter().all(|b| b.avg_line_height == Some(12)));
}

#[test]
fn test_run_preserves_job_fields() {
    let mut document = Document::new("job-77", "/tmp/job-77");
    document.background_images = vec!["/tmp/job-77/bg-1.png".into()];
    document.pages = vec![PageBlockTable::with_blocks(
        vec![leaf("x", "Arial")],
        595.0,
        842.0,
    )];

    let orchestrator = Orchestrator::new(collaborators(Arc::new(IdentityMargin)));
    let (document, _) = orchestrator.run(document, &run_config(false));

    assert_eq!(document.job_id, "job-77");
    assert_eq!(document.working_dir, std::path::PathBuf::from("/tmp/job-77"));
    assert_eq!(document.background_images.len(), 1);
}
