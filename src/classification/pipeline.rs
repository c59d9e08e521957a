use serde::Serialize;

use crate::classification::{
    adjust::{adjust_with_memory, AdjustedLabel, Adjustment},
    config::ClassifierConfig,
    context::{build_context, LabelHistory},
    normalize::{split_lines, NormalizedLine},
    rules::{classify_rule_based, Rule, Verdict},
    scoring::{compute_confidence, needs_confirmation},
    spacing::spacing_between,
};
use crate::models::{ContextMemory, ScreenplayBlock, ScreenplayLabel, Spacing};

// Set to true to enable per-line decision traces in this module
const ENABLE_LOGS: bool = true;

use crate::log_debug;

/// Everything decided about one input line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDecision {
    pub line_index: usize,
    pub text: String,
    pub rule: Rule,
    pub adjustment: Option<Adjustment>,
    /// Label appended to the batch history for this line.
    pub label: ScreenplayLabel,
    pub confidence: f64,
    pub needs_confirmation: bool,
    /// One block, except an inline `NAME: TEXT` line which yields two.
    pub blocks: Vec<ScreenplayBlock>,
}

/// Result of classifying a whole batch.
#[derive(Debug, Clone)]
pub struct BatchClassification {
    pub blocks: Vec<ScreenplayBlock>,
    pub decisions: Vec<LineDecision>,
    pub history: LabelHistory,
}

impl BatchClassification {
    pub fn pending(&self) -> impl Iterator<Item = &LineDecision> {
        self.decisions.iter().filter(|d| d.needs_confirmation)
    }
}

fn build_blocks(
    verdict: &Verdict,
    label: ScreenplayLabel,
    line: &NormalizedLine,
    previous: Option<ScreenplayLabel>,
) -> Vec<ScreenplayBlock> {
    match verdict {
        Verdict::Single(_) => {
            let mut block = ScreenplayBlock::leaf(label, line.text.clone(), line.index);
            block.spacing = spacing_between(previous, label);
            vec![block]
        }
        Verdict::SceneHeader(parts) => {
            let mut number =
                ScreenplayBlock::leaf(ScreenplayLabel::SceneHeader1, parts.number.clone(), line.index);
            number.spacing = Spacing::Tight;
            let mut description = ScreenplayBlock::leaf(
                ScreenplayLabel::SceneHeader2,
                parts.description.clone(),
                line.index,
            );
            description.spacing =
                spacing_between(Some(ScreenplayLabel::SceneHeader1), ScreenplayLabel::SceneHeader2);

            let mut group = ScreenplayBlock::group(
                ScreenplayLabel::SceneHeaderTopLine,
                line.text.clone(),
                line.index,
                vec![number, description],
            );
            group.spacing = spacing_between(previous, ScreenplayLabel::SceneHeaderTopLine);
            vec![group]
        }
        Verdict::InlineDialogue(parts) => {
            let mut cue =
                ScreenplayBlock::leaf(ScreenplayLabel::Character, parts.name.clone(), line.index);
            cue.spacing = spacing_between(previous, ScreenplayLabel::Character);
            let mut speech =
                ScreenplayBlock::leaf(ScreenplayLabel::Dialogue, parts.dialogue.clone(), line.index);
            speech.spacing =
                spacing_between(Some(ScreenplayLabel::Character), ScreenplayLabel::Dialogue);
            vec![cue, speech]
        }
    }
}

/// Classifies `lines[index]` given the labels of every earlier line.
///
/// Pure: the same lines, history, memory and config always give the same
/// decision, so a batch can be replayed line by line.
pub fn classify_line(
    lines: &[NormalizedLine],
    index: usize,
    history: &LabelHistory,
    memory: Option<&ContextMemory>,
    config: &ClassifierConfig,
) -> LineDecision {
    let context = build_context(lines, index, history, config);
    let outcome = classify_rule_based(&context, config);

    let adjusted = match (&outcome.verdict, memory) {
        (Verdict::Single(label), Some(memory)) if outcome.rule.is_memory_adjustable() => {
            adjust_with_memory(*label, &context, memory, config)
        }
        (verdict, _) => AdjustedLabel::unchanged(verdict.history_label()),
    };

    let confidence = compute_confidence(outcome.rule, &adjusted);
    let label = adjusted.label;
    let blocks = build_blocks(&outcome.verdict, label, &lines[index], history.last());

    log_debug!(
        "line {} -> {} via {:?} (adjustment {:?}, confidence {:.2})",
        index,
        label,
        outcome.rule,
        adjusted.adjustment,
        confidence
    );

    LineDecision {
        line_index: index,
        text: lines[index].text.clone(),
        rule: outcome.rule,
        adjustment: adjusted.adjustment,
        label,
        confidence,
        needs_confirmation: needs_confirmation(confidence, config.confidence_threshold),
        blocks,
    }
}

/// Classifies normalized lines strictly in order, threading the history.
pub fn classify_lines(
    lines: &[NormalizedLine],
    memory: Option<&ContextMemory>,
    config: &ClassifierConfig,
) -> BatchClassification {
    let mut history = LabelHistory::new();
    let mut blocks = Vec::with_capacity(lines.len());
    let mut decisions = Vec::with_capacity(lines.len());

    for index in 0..lines.len() {
        let decision = classify_line(lines, index, &history, memory, config);
        history.push(decision.label);
        blocks.extend(decision.blocks.iter().cloned());
        decisions.push(decision);
    }

    BatchClassification {
        blocks,
        decisions,
        history,
    }
}

/// Normalizes and classifies raw pasted text. Empty input yields no blocks.
pub fn classify_text(
    raw: &str,
    memory: Option<&ContextMemory>,
    config: &ClassifierConfig,
) -> BatchClassification {
    let lines = split_lines(raw);
    classify_lines(&lines, memory, config)
}
