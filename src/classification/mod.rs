//! Line-by-line screenplay classification of pasted text.

pub mod adjust;
pub mod config;
pub mod context;
pub mod lexicon;
pub mod normalize;
pub mod patterns;
pub mod pipeline;
pub mod rules;
pub mod scoring;
pub mod spacing;

pub use adjust::{adjust_with_memory, AdjustedLabel, Adjustment};
pub use config::ClassifierConfig;
pub use context::{build_context, ContextWindow, LabelHistory};
pub use normalize::{normalize_text, split_lines, NormalizedLine};
pub use pipeline::{classify_line, classify_lines, classify_text, BatchClassification, LineDecision};
pub use rules::{classify_rule_based, Rule, RuleOutcome, Verdict};
pub use scoring::compute_confidence;
pub use spacing::spacing_between;
