use crate::classification::config::ClassifierConfig;
use crate::classification::normalize::NormalizedLine;
use crate::classification::patterns::{has_any_punctuation, has_colon, word_count};
use crate::models::ScreenplayLabel;

/// Labels finalized so far in a batch, one per classified line.
///
/// Only ever appended to; each line's window borrows an immutable view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelHistory {
    labels: Vec<ScreenplayLabel>,
}

impl LabelHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: ScreenplayLabel) {
        self.labels.push(label);
    }

    pub fn as_slice(&self) -> &[ScreenplayLabel] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn last(&self) -> Option<ScreenplayLabel> {
        self.labels.last().copied()
    }

    /// The first `len` labels, used to replay a line with the exact
    /// history it originally saw.
    pub fn prefix(&self, len: usize) -> LabelHistory {
        LabelHistory {
            labels: self.labels[..len.min(self.labels.len())].to_vec(),
        }
    }
}

impl From<Vec<ScreenplayLabel>> for LabelHistory {
    fn from(labels: Vec<ScreenplayLabel>) -> Self {
        Self { labels }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineStats {
    pub word_count: usize,
    pub char_count: usize,
    pub has_colon: bool,
    pub has_punctuation: bool,
    pub starts_with_bullet: bool,
    pub is_short: bool,
    pub is_long: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternState {
    pub is_in_dialogue_block: bool,
    pub is_in_scene_header: bool,
    /// Labels back to the most recent scene header (1 = previous line).
    pub last_scene_distance: Option<usize>,
    /// Labels back to the most recent character cue (1 = previous line).
    pub last_character_distance: Option<usize>,
}

/// Everything the classifier may look at for one line.
#[derive(Debug, Clone)]
pub struct ContextWindow<'a> {
    pub previous_lines: Vec<&'a str>,
    pub current_line: &'a str,
    pub next_lines: Vec<&'a str>,
    pub previous_types: &'a [ScreenplayLabel],
    pub stats: LineStats,
    pub pattern: PatternState,
}

impl<'a> ContextWindow<'a> {
    pub fn previous_label(&self) -> Option<ScreenplayLabel> {
        self.previous_types.last().copied()
    }

    pub fn next_line(&self) -> Option<&'a str> {
        self.next_lines.first().copied()
    }
}

fn distance_to_last(history: &[ScreenplayLabel], matches: impl Fn(ScreenplayLabel) -> bool) -> Option<usize> {
    history
        .iter()
        .rev()
        .position(|label| matches(*label))
        .map(|offset| offset + 1)
}

pub fn line_stats(line: &NormalizedLine, config: &ClassifierConfig) -> LineStats {
    let char_count = line.text.chars().count();
    LineStats {
        word_count: word_count(&line.text),
        char_count,
        has_colon: has_colon(&line.text),
        has_punctuation: has_any_punctuation(&line.text),
        starts_with_bullet: line.had_bullet,
        is_short: char_count < config.short_line_chars,
        is_long: char_count > config.long_line_chars,
    }
}

pub fn pattern_state(history: &[ScreenplayLabel], config: &ClassifierConfig) -> PatternState {
    let lookback_start = history.len().saturating_sub(config.dialogue_lookback);
    PatternState {
        is_in_dialogue_block: history[lookback_start..]
            .iter()
            .any(|label| label.is_dialogue_family()),
        is_in_scene_header: history
            .last()
            .map(|label| label.is_scene_header())
            .unwrap_or(false),
        last_scene_distance: distance_to_last(history, |label| label.is_scene_header()),
        last_character_distance: distance_to_last(history, |label| {
            label == ScreenplayLabel::Character
        }),
    }
}

/// Builds the window for `lines[index]`. `history` must hold exactly the
/// labels of lines `0..index`.
pub fn build_context<'a>(
    lines: &'a [NormalizedLine],
    index: usize,
    history: &'a LabelHistory,
    config: &ClassifierConfig,
) -> ContextWindow<'a> {
    let radius = config.window_radius;
    let start = index.saturating_sub(radius);
    let end = (index + 1 + radius).min(lines.len());

    ContextWindow {
        previous_lines: lines[start..index].iter().map(|l| l.text.as_str()).collect(),
        current_line: lines[index].text.as_str(),
        next_lines: lines[index + 1..end].iter().map(|l| l.text.as_str()).collect(),
        previous_types: history.as_slice(),
        stats: line_stats(&lines[index], config),
        pattern: pattern_state(history.as_slice(), config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::normalize::split_lines;
    use ScreenplayLabel::*;

    #[test]
    fn window_is_bounded_on_both_sides() {
        let lines = split_lines("١\n٢\n٣\n٤\n٥\n٦\n٧\n٨");
        let history = LabelHistory::from(vec![Action; 4]);
        let config = ClassifierConfig::default();
        let window = build_context(&lines, 4, &history, &config);

        assert_eq!(window.previous_lines, vec!["٢", "٣", "٤"]);
        assert_eq!(window.current_line, "٥");
        assert_eq!(window.next_lines, vec!["٦", "٧", "٨"]);
        assert_eq!(window.previous_types.len(), 4);

        let empty_history = LabelHistory::new();
        let first = build_context(&lines, 0, &empty_history, &config);
        assert!(first.previous_lines.is_empty());
        assert_eq!(first.next_line(), Some("٢"));
    }

    #[test]
    fn dialogue_block_looks_at_last_three_labels_only() {
        let config = ClassifierConfig::default();
        let inside = pattern_state(&[Character, Dialogue, Action, Action], &config);
        assert!(inside.is_in_dialogue_block);

        let outside = pattern_state(&[Character, Action, Action, Action], &config);
        assert!(!outside.is_in_dialogue_block);
        assert_eq!(outside.last_character_distance, Some(4));
        assert_eq!(outside.last_scene_distance, None);
    }

    #[test]
    fn scene_header_state() {
        let config = ClassifierConfig::default();
        let state = pattern_state(&[SceneHeader1, SceneHeader2], &config);
        assert!(state.is_in_scene_header);
        assert_eq!(state.last_scene_distance, Some(1));
        assert_eq!(state.last_character_distance, None);
    }

    #[test]
    fn stats_flag_short_and_long_lines() {
        let config = ClassifierConfig::default();
        let lines = split_lines(&format!("- أحمد:\n{}", "كلمة ".repeat(30)));
        let short = line_stats(&lines[0], &config);
        assert!(short.is_short && short.has_colon && short.starts_with_bullet);
        let long = line_stats(&lines[1], &config);
        assert!(long.is_long && !long.is_short);
        assert_eq!(long.word_count, 30);
    }
}
