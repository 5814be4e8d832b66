//! Font identity normalization.
//!
//! Extraction reports subset-embedded fonts as `TAG+Name`, and merged nodes
//! inherit whatever font their glyph runs happened to carry. This stage
//! resolves every node of the tree to a single canonical name: leaves have
//! their subset prefix stripped, and each composite takes the majority vote
//! of its (already canonicalized) children, bottom-up.

use std::collections::BTreeMap;

use crate::model::{Block, PageBlockTable};

/// Normalizes font identity across a page's block tree.
///
/// Runs after the tree shape is final. Idempotent: normalizing an
/// already-normalized table is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontNormalizer;

impl FontNormalizer {
    /// Create a normalizer.
    pub fn new() -> Self {
        Self
    }

    /// Normalize every top-level block of a page.
    pub fn normalize(&self, table: &PageBlockTable) -> PageBlockTable {
        PageBlockTable {
            blocks: table.blocks.iter().cloned().map(normalize_block).collect(),
            page_width: table.page_width,
            page_height: table.page_height,
        }
    }
}

/// Resolve one block and its subtree to canonical font names.
///
/// Works at any nesting depth by structural recursion. A composite with an
/// empty child sequence keeps its own canonicalized name.
fn normalize_block(mut block: Block) -> Block {
    match block.children.take() {
        None => {
            block.font_family = canonical_font(&block.font_family).to_string();
            block
        }
        Some(children) => {
            let children: Vec<Block> = children.into_iter().map(normalize_block).collect();
            block.font_family = font_mode(children.iter().map(|c| c.font_family.as_str()))
                .unwrap_or_else(|| canonical_font(&block.font_family).to_string());
            block.children = Some(children);
            block
        }
    }
}

/// Strip the subset-embedding prefix from a font name.
///
/// Everything after the first `+` is the real name; names without `+` are
/// already canonical.
///
/// ```
/// use blockmerge::canonical_font;
///
/// assert_eq!(canonical_font("XYZAB+Arial"), "Arial");
/// assert_eq!(canonical_font("Arial"), "Arial");
/// ```
pub fn canonical_font(name: &str) -> &str {
    match name.split_once('+') {
        Some((_, rest)) => rest,
        None => name,
    }
}

/// Most frequent name in the collection, or `None` when it is empty.
///
/// Ties resolve to the lexicographically smallest candidate, so the result
/// is reproducible across runs regardless of input order.
pub fn font_mode<'a, I>(names: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for name in names {
        *counts.entry(name).or_insert(0) += 1;
    }

    // Ascending key order: on equal counts the earlier (smaller) name wins.
    let mut best: Option<(&str, usize)> = None;
    for (name, count) in counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((name, count)),
        }
    }
    best.map(|(name, _)| name.to_string())
}
