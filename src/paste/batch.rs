use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::classification::spacing_between;
use crate::models::{BatchId, Resolution, ScreenplayBlock, ScreenplayLabel};

/// Opaque per-label rendering descriptors supplied by the editing surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockStyles(HashMap<ScreenplayLabel, serde_json::Value>);

impl BlockStyles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: ScreenplayLabel, style: serde_json::Value) {
        self.0.insert(label, style);
    }

    pub fn get(&self, label: ScreenplayLabel) -> Option<&serde_json::Value> {
        self.0.get(&label)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Attaches each block's descriptor, children included. Labels without
    /// an entry end up with no style.
    pub fn apply(&self, blocks: &mut [ScreenplayBlock]) {
        for block in blocks {
            block.style = self.get(block.label).cloned();
            self.apply(&mut block.children);
        }
    }
}

/// Output of one paste operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasteBatch {
    pub batch_id: BatchId,
    pub session_id: String,
    pub blocks: Vec<ScreenplayBlock>,
    /// Lines queued for confirmation when the batch finished.
    pub pending_count: usize,
}

fn relabel(blocks: &mut [ScreenplayBlock], resolution: &Resolution) -> bool {
    for block in blocks.iter_mut().filter(|b| b.line_index == resolution.line_index) {
        if block.is_group() {
            if relabel(&mut block.children, resolution) {
                return true;
            }
        } else if block.label == resolution.suggested_label {
            block.label = resolution.final_label;
            return true;
        }
    }
    false
}

impl PasteBatch {
    pub fn empty(batch_id: BatchId, session_id: impl Into<String>) -> Self {
        Self {
            batch_id,
            session_id: session_id.into(),
            blocks: Vec::new(),
            pending_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Leaf labels in document order.
    pub fn labels(&self) -> Vec<ScreenplayLabel> {
        self.blocks
            .iter()
            .flat_map(|block| block.leaves())
            .map(|leaf| leaf.label)
            .collect()
    }

    /// Rewrites the resolved lines' labels and the spacing that depends on
    /// them. Other blocks keep their labels. Returns how many blocks changed.
    pub fn apply_resolutions(&mut self, resolutions: &[Resolution]) -> usize {
        let mut changed = 0;
        for resolution in resolutions.iter().filter(|r| r.changed()) {
            if relabel(&mut self.blocks, resolution) {
                changed += 1;
            }
        }
        self.pending_count = self.pending_count.saturating_sub(resolutions.len());

        if changed > 0 {
            let mut previous: Option<ScreenplayLabel> = None;
            for block in &mut self.blocks {
                block.spacing = spacing_between(previous, block.label);
                previous = Some(block.trailing_label());
            }
        }
        changed
    }
}
