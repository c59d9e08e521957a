use serde::{Deserialize, Serialize};

use super::ScreenplayLabel;

/// Vertical gap placed before a block, relative to the block above it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Spacing {
    /// Explicitly no gap; the block hugs the one above it.
    Tight,
    /// No rule applies; the surface's base line spacing stands.
    #[default]
    Base,
    /// A fixed paragraph gap is inserted.
    Paragraph,
}

impl Spacing {
    pub fn adds_gap(&self) -> bool {
        matches!(self, Spacing::Paragraph)
    }
}

/// One finalized, labeled unit of screenplay text.
///
/// A complete scene header line is emitted as a `scene-header-top-line`
/// block whose `children` hold the `scene-header-1` and `scene-header-2`
/// parts. Every other block is a leaf.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScreenplayBlock {
    pub label: ScreenplayLabel,
    pub text: String,
    /// Index of the source line within the batch (empty lines excluded).
    pub line_index: usize,
    pub spacing: Spacing,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ScreenplayBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<serde_json::Value>,
}

impl ScreenplayBlock {
    pub fn leaf(label: ScreenplayLabel, text: impl Into<String>, line_index: usize) -> Self {
        Self {
            label,
            text: text.into(),
            line_index,
            spacing: Spacing::Base,
            children: Vec::new(),
            style: None,
        }
    }

    pub fn group(
        label: ScreenplayLabel,
        text: impl Into<String>,
        line_index: usize,
        children: Vec<ScreenplayBlock>,
    ) -> Self {
        Self {
            label,
            text: text.into(),
            line_index,
            spacing: Spacing::Base,
            children,
            style: None,
        }
    }

    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    /// The label a following block sees as its predecessor.
    pub fn trailing_label(&self) -> ScreenplayLabel {
        self.children
            .last()
            .map(|child| child.trailing_label())
            .unwrap_or(self.label)
    }

    /// Leaf blocks in document order; groups contribute their children.
    pub fn leaves(&self) -> Vec<&ScreenplayBlock> {
        if self.children.is_empty() {
            vec![self]
        } else {
            self.children.iter().flat_map(|child| child.leaves()).collect()
        }
    }
}
