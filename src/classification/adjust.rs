use serde::Serialize;

use super::config::ClassifierConfig;
use super::context::ContextWindow;
use super::patterns::{has_terminal_punctuation, is_complete_scene_header, reads_as_action};
use crate::models::{normalize_character_name, ContextMemory, ScreenplayLabel};

/// Which memory override, if any, changed or confirmed the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Adjustment {
    KnownCharacter,
    BreakDialogueRun,
    MonologueRun,
    ActionRun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustedLabel {
    pub label: ScreenplayLabel,
    pub adjustment: Option<Adjustment>,
    /// The cue names a character seen often enough to trust.
    pub reinforced: bool,
}

impl AdjustedLabel {
    pub fn unchanged(label: ScreenplayLabel) -> Self {
        Self {
            label,
            adjustment: None,
            reinforced: false,
        }
    }
}

fn matching_known_name<'m>(candidate: &str, memory: &'m ContextMemory) -> Option<&'m str> {
    if candidate.chars().count() < 2 {
        return None;
    }
    memory
        .common_characters
        .iter()
        .find(|known| known.contains(candidate) || candidate.contains(known.as_str()))
        .map(String::as_str)
}

fn recent_are(recent: &[ScreenplayLabel], label: ScreenplayLabel) -> bool {
    recent.len() == 3 && recent.iter().all(|l| *l == label)
}

/// Revisits the rule-based label using what the session has learned.
pub fn adjust_with_memory(
    label: ScreenplayLabel,
    context: &ContextWindow<'_>,
    memory: &ContextMemory,
    config: &ClassifierConfig,
) -> AdjustedLabel {
    let line = context.current_line;
    let stats = &context.stats;
    let previous = context.previous_label();
    let recent = memory.recent_labels(3);
    let candidate = normalize_character_name(line);

    let mut adjusted = AdjustedLabel::unchanged(label);

    if stats.is_short
        && !has_terminal_punctuation(line)
        && stats.word_count <= config.memory_name_max_words
        && stats.char_count < config.memory_name_max_chars
        && matching_known_name(&candidate, memory).is_some()
    {
        adjusted.label = ScreenplayLabel::Character;
        adjusted.adjustment = Some(Adjustment::KnownCharacter);
    } else if recent.len() >= 2
        && recent[0] == ScreenplayLabel::Character
        && recent[1] == ScreenplayLabel::Dialogue
        && previous == Some(ScreenplayLabel::Dialogue)
        && !stats.has_colon
        && reads_as_action(line)
    {
        adjusted.label = ScreenplayLabel::Action;
        adjusted.adjustment = Some(Adjustment::BreakDialogueRun);
    } else if recent_are(recent, ScreenplayLabel::Dialogue)
        && previous == Some(ScreenplayLabel::Dialogue)
        && !stats.has_colon
        && !is_complete_scene_header(line)
    {
        adjusted.label = ScreenplayLabel::Dialogue;
        adjusted.adjustment = Some(Adjustment::MonologueRun);
    } else if recent_are(recent, ScreenplayLabel::Action)
        && previous == Some(ScreenplayLabel::Action)
        && stats.is_long
    {
        adjusted.label = ScreenplayLabel::Action;
        adjusted.adjustment = Some(Adjustment::ActionRun);
    }

    if adjusted.label == ScreenplayLabel::Character {
        let occurrences = matching_known_name(&candidate, memory)
            .map(|name| memory.occurrences(name))
            .unwrap_or(0);
        adjusted.reinforced = occurrences >= config.known_character_min_occurrences;
    }

    adjusted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::context::{build_context, LabelHistory};
    use crate::classification::normalize::split_lines;
    use ScreenplayLabel::*;

    fn memory_with(characters: &[(&str, u32)], recent: &[ScreenplayLabel]) -> ContextMemory {
        let mut memory = ContextMemory::new("session");
        for (name, count) in characters {
            memory.common_characters.push(name.to_string());
            memory.character_dialogue_map.insert(name.to_string(), *count);
        }
        memory.last_classifications = recent.to_vec();
        memory
    }

    fn adjust(
        text: &str,
        index: usize,
        history: Vec<ScreenplayLabel>,
        label: ScreenplayLabel,
        memory: &ContextMemory,
    ) -> AdjustedLabel {
        let lines = split_lines(text);
        let history = LabelHistory::from(history);
        let config = ClassifierConfig::default();
        let window = build_context(&lines, index, &history, &config);
        adjust_with_memory(label, &window, memory, &config)
    }

    #[test]
    fn known_name_becomes_character() {
        let memory = memory_with(&[("نور الهدى", 1)], &[]);
        let adjusted = adjust("يدخل\nنور", 1, vec![Action], Action, &memory);
        assert_eq!(adjusted.label, Character);
        assert_eq!(adjusted.adjustment, Some(Adjustment::KnownCharacter));
        assert!(!adjusted.reinforced);
    }

    #[test]
    fn frequent_character_is_reinforced() {
        let memory = memory_with(&[("سارة", 4)], &[]);
        let adjusted = adjust("سارة:", 0, vec![], Character, &memory);
        assert_eq!(adjusted.label, Character);
        assert!(adjusted.reinforced);
    }

    #[test]
    fn punctuated_line_is_not_a_name() {
        let memory = memory_with(&[("سارة", 4)], &[]);
        let adjusted = adjust("سارة.", 0, vec![], Action, &memory);
        assert_eq!(adjusted, AdjustedLabel::unchanged(Action));
    }

    #[test]
    fn monologue_run_is_reinforced() {
        let memory = memory_with(&[], &[Dialogue, Dialogue, Dialogue]);
        let adjusted = adjust(
            "أحمد:\nكلام\nوكلام آخر طويل بعض الشيء",
            2,
            vec![Character, Dialogue],
            Action,
            &memory,
        );
        assert_eq!(adjusted.label, Dialogue);
        assert_eq!(adjusted.adjustment, Some(Adjustment::MonologueRun));
    }

    #[test]
    fn narration_breaks_dialogue_run() {
        let memory = memory_with(&[], &[Character, Dialogue, Action]);
        let adjusted = adjust(
            "أحمد:\nكلام\nسارة تخرج من الغرفة",
            2,
            vec![Character, Dialogue],
            Dialogue,
            &memory,
        );
        assert_eq!(adjusted.label, Action);
        assert_eq!(adjusted.adjustment, Some(Adjustment::BreakDialogueRun));
    }

    #[test]
    fn plain_speech_keeps_dialogue_run() {
        let memory = memory_with(&[], &[Character, Dialogue, Action]);
        let adjusted = adjust(
            "أحمد:\nكلام\nولكنني لن أنسى ما حدث",
            2,
            vec![Character, Dialogue],
            Dialogue,
            &memory,
        );
        assert_eq!(adjusted, AdjustedLabel::unchanged(Dialogue));
    }

    #[test]
    fn long_action_run_stays_action() {
        let memory = memory_with(&[], &[Action, Action, Action]);
        let long = "كان المكان مظلما تماما ولا يسمع فيه إلا صوت المطر على النوافذ القديمة والرياح في الخارج بينما ينتظر الجميع وصوله";
        let adjusted = adjust(&format!("يدخل\n{long}"), 1, vec![Action], Dialogue, &memory);
        assert_eq!(adjusted.label, Action);
        assert_eq!(adjusted.adjustment, Some(Adjustment::ActionRun));
    }
}
