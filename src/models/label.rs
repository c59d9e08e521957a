use std::{fmt, str::FromStr};

use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};

/// Screenplay element types a pasted line can be tagged with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ScreenplayLabel {
    #[serde(rename = "basmala")]
    Basmala,
    #[serde(rename = "scene-header-top-line")]
    SceneHeaderTopLine,
    #[serde(rename = "scene-header-1")]
    SceneHeader1,
    #[serde(rename = "scene-header-2")]
    SceneHeader2,
    #[serde(rename = "scene-header-3")]
    SceneHeader3,
    #[serde(rename = "action")]
    Action,
    #[serde(rename = "character")]
    Character,
    #[serde(rename = "dialogue")]
    Dialogue,
    #[serde(rename = "parenthetical")]
    Parenthetical,
    #[serde(rename = "transition")]
    Transition,
}

impl ScreenplayLabel {
    pub const ALL: [ScreenplayLabel; 10] = [
        ScreenplayLabel::Basmala,
        ScreenplayLabel::SceneHeaderTopLine,
        ScreenplayLabel::SceneHeader1,
        ScreenplayLabel::SceneHeader2,
        ScreenplayLabel::SceneHeader3,
        ScreenplayLabel::Action,
        ScreenplayLabel::Character,
        ScreenplayLabel::Dialogue,
        ScreenplayLabel::Parenthetical,
        ScreenplayLabel::Transition,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenplayLabel::Basmala => "basmala",
            ScreenplayLabel::SceneHeaderTopLine => "scene-header-top-line",
            ScreenplayLabel::SceneHeader1 => "scene-header-1",
            ScreenplayLabel::SceneHeader2 => "scene-header-2",
            ScreenplayLabel::SceneHeader3 => "scene-header-3",
            ScreenplayLabel::Action => "action",
            ScreenplayLabel::Character => "character",
            ScreenplayLabel::Dialogue => "dialogue",
            ScreenplayLabel::Parenthetical => "parenthetical",
            ScreenplayLabel::Transition => "transition",
        }
    }

    /// Any of the scene-header variants, including the grouping label.
    pub fn is_scene_header(&self) -> bool {
        matches!(
            self,
            ScreenplayLabel::SceneHeaderTopLine
                | ScreenplayLabel::SceneHeader1
                | ScreenplayLabel::SceneHeader2
                | ScreenplayLabel::SceneHeader3
        )
    }

    /// Labels that make up a dialogue exchange.
    pub fn is_dialogue_family(&self) -> bool {
        matches!(
            self,
            ScreenplayLabel::Character | ScreenplayLabel::Dialogue | ScreenplayLabel::Parenthetical
        )
    }
}

impl fmt::Display for ScreenplayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScreenplayLabel {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ScreenplayLabel::ALL
            .iter()
            .copied()
            .find(|label| label.as_str() == value)
            .ok_or_else(|| anyhow!("unknown screenplay label '{value}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_strings_match_serde_names() {
        for label in ScreenplayLabel::ALL {
            let json = serde_json::to_string(&label).unwrap();
            assert_eq!(json, format!("\"{}\"", label.as_str()));
            assert_eq!(label.as_str().parse::<ScreenplayLabel>().unwrap(), label);
        }
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert!("slugline".parse::<ScreenplayLabel>().is_err());
    }
}
