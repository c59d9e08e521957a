use super::adjust::{AdjustedLabel, Adjustment};
use super::rules::Rule;

/// Boost applied when the cue names a frequently seen character.
const REINFORCEMENT_BOOST: f64 = 0.15;

/// Base confidence of a rule-based verdict.
/// Structural pattern matches sit near 1.0; the short-line character
/// heuristics sit below the default acceptance threshold on purpose.
pub fn score_rule(rule: Rule) -> f64 {
    match rule {
        Rule::Basmala => 1.0,
        Rule::CompleteSceneHeader => 0.98,
        Rule::SceneNumber => 0.95,
        Rule::Transition => 0.95,
        Rule::SceneDescription => 0.9,
        Rule::Parenthetical => 0.9,
        Rule::InlineDialogue => 0.85,
        Rule::ActionOpener => 0.85,
        Rule::DialogueAfterCue => 0.85,
        Rule::LongAction => 0.8,
        Rule::BulletedProse => 0.8,
        Rule::SceneLocation => 0.75,
        Rule::DialogueContinuation => 0.7,
        Rule::Fallback => 0.7,
        Rule::ColonCharacter => 0.6,
        Rule::LikelyCharacter => 0.45,
    }
}

/// Confidence once memory had its say. An override replaces the rule's
/// score; a reinforced character cue gets a fixed boost.
pub fn compute_confidence(rule: Rule, adjusted: &AdjustedLabel) -> f64 {
    let base = match adjusted.adjustment {
        Some(Adjustment::KnownCharacter) => 0.75,
        Some(Adjustment::BreakDialogueRun) => 0.7,
        Some(Adjustment::MonologueRun) => 0.75,
        Some(Adjustment::ActionRun) => 0.8,
        None => score_rule(rule),
    };
    let boost = if adjusted.reinforced {
        REINFORCEMENT_BOOST
    } else {
        0.0
    };
    (base + boost).min(1.0)
}

pub fn needs_confirmation(confidence: f64, threshold: f64) -> bool {
    confidence < threshold
}
