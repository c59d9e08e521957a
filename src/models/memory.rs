use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ScreenplayBlock, ScreenplayLabel};

/// Default capacity of the `last_classifications` ring.
pub const MAX_RECENT_CLASSIFICATIONS: usize = 20;

/// Session-scoped record of learned names and recent labeling patterns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContextMemory {
    pub session_id: String,
    pub last_modified: DateTime<Utc>,
    /// Distinct normalized character names in first-seen order.
    pub common_characters: Vec<String>,
    /// Reserved; classification does not read it yet.
    pub common_locations: Vec<String>,
    /// Newest first, never longer than the configured capacity.
    pub last_classifications: Vec<ScreenplayLabel>,
    pub character_dialogue_map: HashMap<String, u32>,
}

impl ContextMemory {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            last_modified: Utc::now(),
            common_characters: Vec::new(),
            common_locations: Vec::new(),
            last_classifications: Vec::new(),
            character_dialogue_map: HashMap::new(),
        }
    }

    /// Up to `n` most recent labels, newest first.
    pub fn recent_labels(&self, n: usize) -> &[ScreenplayLabel] {
        let end = n.min(self.last_classifications.len());
        &self.last_classifications[..end]
    }

    pub fn occurrences(&self, name: &str) -> u32 {
        self.character_dialogue_map.get(name).copied().unwrap_or(0)
    }

    pub fn remember_character(&mut self, name: &str) {
        let name = normalize_character_name(name);
        if name.is_empty() {
            return;
        }
        if !self.common_characters.iter().any(|known| *known == name) {
            self.common_characters.push(name.clone());
        }
        *self.character_dialogue_map.entry(name).or_insert(0) += 1;
    }

    pub fn push_classification(&mut self, label: ScreenplayLabel, capacity: usize) {
        self.last_classifications.insert(0, label);
        self.last_classifications.truncate(capacity);
    }

    /// Folds one finished batch into the record.
    pub fn absorb(&mut self, blocks: &[ScreenplayBlock], capacity: usize, now: DateTime<Utc>) {
        for block in blocks {
            for leaf in block.leaves() {
                if leaf.label == ScreenplayLabel::Character {
                    self.remember_character(&leaf.text);
                }
                self.push_classification(leaf.label, capacity);
            }
        }
        self.last_modified = now;
    }
}

/// Strips the cue colon and collapses inner whitespace.
pub fn normalize_character_name(raw: &str) -> String {
    raw.trim()
        .trim_end_matches([':', '：'])
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(labels: &[(ScreenplayLabel, &str)]) -> Vec<ScreenplayBlock> {
        labels
            .iter()
            .enumerate()
            .map(|(idx, (label, text))| ScreenplayBlock::leaf(*label, *text, idx))
            .collect()
    }

    #[test]
    fn history_is_capped_and_newest_first() {
        let mut memory = ContextMemory::new("s1");
        for round in 0..5 {
            let batch = blocks(&[
                (ScreenplayLabel::Action, "يدخل أحمد"),
                (ScreenplayLabel::Character, "أحمد:"),
                (ScreenplayLabel::Dialogue, "مرحبا"),
                (ScreenplayLabel::Transition, "قطع"),
                (ScreenplayLabel::SceneHeader1, "مشهد"),
                (ScreenplayLabel::Action, "تجلس"),
            ]);
            memory.absorb(&batch, MAX_RECENT_CLASSIFICATIONS, Utc::now());
            assert!(memory.last_classifications.len() <= MAX_RECENT_CLASSIFICATIONS, "round {round}");
        }
        assert_eq!(memory.last_classifications.len(), MAX_RECENT_CLASSIFICATIONS);
        assert_eq!(memory.last_classifications[0], ScreenplayLabel::Action);
        assert_eq!(memory.last_classifications[1], ScreenplayLabel::SceneHeader1);
    }

    #[test]
    fn characters_are_deduplicated_and_counted() {
        let mut memory = ContextMemory::new("s1");
        let batch = blocks(&[
            (ScreenplayLabel::Character, "سارة:"),
            (ScreenplayLabel::Dialogue, "أهلا"),
            (ScreenplayLabel::Character, "سارة"),
            (ScreenplayLabel::Character, "  علي  "),
        ]);
        memory.absorb(&batch, MAX_RECENT_CLASSIFICATIONS, Utc::now());

        assert_eq!(memory.common_characters, vec!["سارة", "علي"]);
        assert_eq!(memory.occurrences("سارة"), 2);
        assert_eq!(memory.occurrences("علي"), 1);
        assert_eq!(memory.occurrences("منى"), 0);
    }

    #[test]
    fn groups_contribute_their_children() {
        let mut memory = ContextMemory::new("s1");
        let group = ScreenplayBlock::group(
            ScreenplayLabel::SceneHeaderTopLine,
            "مشهد 1 - داخلي ليل",
            0,
            vec![
                ScreenplayBlock::leaf(ScreenplayLabel::SceneHeader1, "مشهد 1", 0),
                ScreenplayBlock::leaf(ScreenplayLabel::SceneHeader2, "داخلي ليل", 0),
            ],
        );
        memory.absorb(&[group], MAX_RECENT_CLASSIFICATIONS, Utc::now());
        assert_eq!(
            memory.last_classifications,
            vec![ScreenplayLabel::SceneHeader2, ScreenplayLabel::SceneHeader1]
        );
    }
}
