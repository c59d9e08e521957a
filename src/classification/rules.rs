//! Precedence-ordered decision procedure. The first rule that matches wins,
//! and the order below is what makes the tagger behave; do not reorder.

use serde::Serialize;

use super::config::ClassifierConfig;
use super::context::ContextWindow;
use super::patterns::{
    has_sentence_punctuation, is_action_line, is_any_scene_header, is_basmala, is_character_line,
    is_parenthetical_shape, is_scene_header_1, is_scene_header_2,
    is_scene_location, is_transition, split_inline_dialogue, split_scene_header,
    starts_with_action_verb, InlineDialogue, SceneHeaderParts,
};
use crate::models::ScreenplayLabel;

/// Which rule produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    Basmala,
    CompleteSceneHeader,
    SceneNumber,
    SceneDescription,
    Transition,
    InlineDialogue,
    Parenthetical,
    ActionOpener,
    SceneLocation,
    DialogueAfterCue,
    DialogueContinuation,
    ColonCharacter,
    LikelyCharacter,
    LongAction,
    Fallback,
    BulletedProse,
}

impl Rule {
    /// Unambiguous structural matches the memory adjuster leaves alone.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Rule::Basmala
                | Rule::CompleteSceneHeader
                | Rule::SceneNumber
                | Rule::SceneDescription
                | Rule::Transition
                | Rule::InlineDialogue
        )
    }

    /// Bulleted prose stays action whatever memory says.
    pub fn is_memory_adjustable(&self) -> bool {
        !self.is_structural() && *self != Rule::BulletedProse
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Single(ScreenplayLabel),
    SceneHeader(SceneHeaderParts),
    InlineDialogue(InlineDialogue),
}

impl Verdict {
    /// Label recorded in the batch history for this line.
    pub fn history_label(&self) -> ScreenplayLabel {
        match self {
            Verdict::Single(label) => *label,
            Verdict::SceneHeader(_) => ScreenplayLabel::SceneHeader2,
            Verdict::InlineDialogue(_) => ScreenplayLabel::Dialogue,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub verdict: Verdict,
    pub rule: Rule,
}

impl RuleOutcome {
    fn single(label: ScreenplayLabel, rule: Rule) -> Self {
        Self {
            verdict: Verdict::Single(label),
            rule,
        }
    }
}

/// Could this short line be a cue for the long line below it?
fn is_likely_character(line: &str, context: &ContextWindow<'_>) -> bool {
    if is_transition(line) || starts_with_action_verb(line) {
        return false;
    }
    if has_sentence_punctuation(line) && !context.stats.has_colon {
        return false;
    }
    if context.previous_label() == Some(ScreenplayLabel::Character) {
        return false;
    }
    is_character_line(line, Some(context))
}

fn classify_bulleted(line: &str) -> RuleOutcome {
    match split_inline_dialogue(line) {
        Some(parts) => RuleOutcome {
            verdict: Verdict::InlineDialogue(parts),
            rule: Rule::InlineDialogue,
        },
        None => RuleOutcome::single(ScreenplayLabel::Action, Rule::BulletedProse),
    }
}

pub fn classify_rule_based(context: &ContextWindow<'_>, config: &ClassifierConfig) -> RuleOutcome {
    let line = context.current_line;
    let previous = context.previous_label();

    // Bullets mark prose lists; only an inline cue survives them.
    if context.stats.starts_with_bullet {
        return classify_bulleted(line);
    }

    if is_basmala(line) {
        return RuleOutcome::single(ScreenplayLabel::Basmala, Rule::Basmala);
    }

    if let Some(parts) = split_scene_header(line) {
        return RuleOutcome {
            verdict: Verdict::SceneHeader(parts),
            rule: Rule::CompleteSceneHeader,
        };
    }

    if is_scene_header_1(line) {
        return RuleOutcome::single(ScreenplayLabel::SceneHeader1, Rule::SceneNumber);
    }

    if is_scene_header_2(line) {
        return RuleOutcome::single(ScreenplayLabel::SceneHeader2, Rule::SceneDescription);
    }

    if is_transition(line) {
        return RuleOutcome::single(ScreenplayLabel::Transition, Rule::Transition);
    }

    // Speech right under a cue may carry its own colon; that is still speech.
    let follows_cue = context.pattern.is_in_dialogue_block
        && matches!(
            previous,
            Some(ScreenplayLabel::Character) | Some(ScreenplayLabel::Parenthetical)
        );

    if !follows_cue {
        if let Some(parts) = split_inline_dialogue(line) {
            return RuleOutcome {
                verdict: Verdict::InlineDialogue(parts),
                rule: Rule::InlineDialogue,
            };
        }
    }

    if is_parenthetical_shape(line) && context.pattern.is_in_dialogue_block {
        return RuleOutcome::single(ScreenplayLabel::Parenthetical, Rule::Parenthetical);
    }

    if is_action_line(line) {
        return RuleOutcome::single(ScreenplayLabel::Action, Rule::ActionOpener);
    }

    if previous.map(|label| label.is_scene_header()).unwrap_or(false)
        && is_scene_location(line, config.location_max_words)
    {
        return RuleOutcome::single(ScreenplayLabel::SceneHeader3, Rule::SceneLocation);
    }

    if context.pattern.is_in_dialogue_block {
        match previous {
            Some(ScreenplayLabel::Character) | Some(ScreenplayLabel::Parenthetical) => {
                if !is_character_line(line, Some(context)) {
                    return RuleOutcome::single(ScreenplayLabel::Dialogue, Rule::DialogueAfterCue);
                }
            }
            Some(ScreenplayLabel::Dialogue) => {
                if !context.stats.has_colon && !is_any_scene_header(line) {
                    return RuleOutcome::single(
                        ScreenplayLabel::Dialogue,
                        Rule::DialogueContinuation,
                    );
                }
            }
            _ => {}
        }
    }

    if context.stats.is_short && context.stats.has_colon && is_character_line(line, Some(context)) {
        return RuleOutcome::single(ScreenplayLabel::Character, Rule::ColonCharacter);
    }

    if context.stats.is_short
        && context
            .next_line()
            .map(|next| next.chars().count() > config.likely_character_next_min_chars)
            .unwrap_or(false)
        && is_likely_character(line, context)
    {
        return RuleOutcome::single(ScreenplayLabel::Character, Rule::LikelyCharacter);
    }

    if context.stats.is_long && has_sentence_punctuation(line) {
        return RuleOutcome::single(ScreenplayLabel::Action, Rule::LongAction);
    }

    RuleOutcome::single(ScreenplayLabel::Action, Rule::Fallback)
}
