use crate::models::{ScreenplayLabel, Spacing};

/// Gap placed between a block labeled `previous` and one labeled `current`.
/// The first block of a batch has no predecessor and keeps base spacing.
pub fn spacing_between(previous: Option<ScreenplayLabel>, current: ScreenplayLabel) -> Spacing {
    use ScreenplayLabel::*;

    let Some(previous) = previous else {
        return Spacing::Base;
    };

    match (previous, current) {
        (Basmala, _) => Spacing::Tight,
        (Character, Dialogue | Parenthetical) => Spacing::Tight,
        (Parenthetical, Dialogue) => Spacing::Tight,
        (SceneHeader2, SceneHeader3) => Spacing::Paragraph,
        (SceneHeader3, Action) => Spacing::Paragraph,
        (Action, Action | Character | Transition) => Spacing::Paragraph,
        (Dialogue, Character | Action | Transition) => Spacing::Paragraph,
        (Parenthetical, Character | Action | Transition) => Spacing::Paragraph,
        (Transition, SceneHeader1 | SceneHeaderTopLine) => Spacing::Paragraph,
        _ => Spacing::Base,
    }
}
