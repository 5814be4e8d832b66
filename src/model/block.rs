//! Block-level types: the nodes of a page's layout tree.

use serde::{Deserialize, Serialize};

/// Geometric extent of a block in page coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge.
    pub left: f32,

    /// Top edge.
    pub top: f32,

    /// Right edge.
    pub right: f32,

    /// Bottom edge.
    pub bottom: f32,
}

impl BoundingBox {
    /// Create a bounding box from its four edges.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Smallest box covering both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// Page region a block was assigned to by the header/footer tagging stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionRole {
    /// Block lies in the header band.
    Header,

    /// Block lies in the footer band.
    Footer,
}

/// A node in a page's layout tree.
///
/// A block is a **leaf** when `children` is `None` and a **composite**
/// otherwise. Composites own their children directly; the row-oriented
/// serialized form used at persistence boundaries lives in
/// [`rows`](crate::model::rows).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Geometric extent in page coordinates.
    pub bbox: BoundingBox,

    /// Raw text content (empty for purely structural nodes).
    #[serde(default)]
    pub text: String,

    /// Font identifier; may carry a subset-embedding prefix of the form
    /// `TAG+Name` until font normalization runs.
    pub font_family: String,

    /// Glyph/line height as reported by extraction.
    pub text_height: f32,

    /// Vertical line stride, populated on every leaf during flattening.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_line_height: Option<u32>,

    /// Header/footer annotation, set by the tagging stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<RegionRole>,

    /// Child blocks; `None` marks a leaf.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Block>>,
}

impl Block {
    /// Create a leaf block carrying direct glyph/line text.
    pub fn leaf(
        text: impl Into<String>,
        font_family: impl Into<String>,
        text_height: f32,
        bbox: BoundingBox,
    ) -> Self {
        Self {
            bbox,
            text: text.into(),
            font_family: font_family.into(),
            text_height,
            avg_line_height: None,
            role: None,
            children: None,
        }
    }

    /// Create a composite block owning the given children.
    ///
    /// The bounding box is the union of the children's boxes and the text
    /// height the maximum among them, matching how the merge stages report
    /// aggregate regions.
    pub fn composite(font_family: impl Into<String>, children: Vec<Block>) -> Self {
        let bbox = children
            .iter()
            .map(|c| c.bbox)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();
        let text_height = children.iter().map(|c| c.text_height).fold(0.0, f32::max);

        Self {
            bbox,
            text: String::new(),
            font_family: font_family.into(),
            text_height,
            avg_line_height: None,
            role: None,
            children: Some(children),
        }
    }

    /// Attach a header/footer role.
    pub fn with_role(mut self, role: RegionRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Whether this block is a leaf (no children).
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Whether this block is a composite (merged/aggregate region).
    pub fn is_composite(&self) -> bool {
        self.children.is_some()
    }

    /// Number of direct children (0 for leaves).
    pub fn child_count(&self) -> usize {
        self.children.as_ref().map_or(0, |c| c.len())
    }

    /// Nesting depth of the subtree rooted at this block. A leaf has depth 1.
    pub fn depth(&self) -> usize {
        match &self.children {
            None => 1,
            Some(children) => 1 + children.iter().map(Block::depth).max().unwrap_or(0),
        }
    }

    /// Concatenated text of every leaf in this subtree, in order.
    pub fn plain_text(&self) -> String {
        match &self.children {
            None => self.text.clone(),
            Some(children) => children
                .iter()
                .map(Block::plain_text)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}
