//! Independent predicates, one per candidate label.
//!
//! Every matcher takes an already normalized line. Matchers that care about
//! the surrounding exchange also take the line's [`ContextWindow`].

use once_cell::sync::Lazy;
use regex::Regex;

use super::context::ContextWindow;
use super::lexicon::{clitic_variants, Lexicon};
use crate::models::ScreenplayLabel;

static BASMALA_NOISE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[{}()\[\]﴾﴿«»"'“”]"#).unwrap());

static SCENE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:مشهد|scene)\s*[0-9٠-٩۰-۹]+").unwrap());

static SCENE_HEADER_START_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^((?:مشهد|scene)\s*[0-9٠-٩۰-۹]+)\s*(?:[-–—ـ:،,.]\s*)*(.*)$").unwrap()
});

static DASH_VARIANTS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-–—ـ_/|]+").unwrap());

/// Whole-token cues only: `ليل` must not fire inside `قليل`. The Arabic
/// forms may take the article and an adverbial or feminine ending.
static TIME_OF_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:[وفب]?ال)?(?:ليل|نهار|صباح|مساء|فجر|ظهر|عصر|مغرب|غروب|شروق|ضحى|سحر)(?:ا|ة|ي|ه)?\b|\b(?:dawn|morning|day|dusk|evening|night|noon)\b",
    )
    .unwrap()
});

/// Bare `داخلي`/`خارجي` as header cues; `الداخلية` is ordinary prose.
static INTERIOR_EXTERIOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:داخلي|خارجي|int|ext|interior|exterior)\b").unwrap()
});

static TRANSITION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:قطع|مزج|تلاشي|تلاش|ذوبان|اختفاء|ظهور تدريجي|انتقال|cut|fade|dissolve|wipe|smash cut|match cut)(?:\s*$|\s*[:.!]|\s+(?:إلى|الى|سريع|مفاجئ|تدريجي|للسواد|to|in|out)\b)",
    )
    .unwrap()
});

static NARRATOR_CUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[وف]|ثم\s+)?(?:نرى|نسمع|نشاهد|نلاحظ|نلمح|نتابع|لقطة|الكاميرا|كاميرا)(?:\s|$)")
        .unwrap()
});

static IMPERFECTIVE_OPENER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[وف]|ثم\s+)?[يت][\x{0621}-\x{064A}]{2,}\s+(?:\S+\s+)?(?:بهدوء|ببطء|بسرعة|بحذر|بغضب|بعصبية|بتوتر|بقلق|بحزن|نحو|باتجاه|ناحية)(?:\s|$)",
    )
    .unwrap()
});

static STRICT_CHARACTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s:：.!?؟،,][^:：.!?؟،,]{0,24}[:：]$").unwrap());

static ARABIC_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\x{0621}-\x{064A}\x{0660}-\x{0669}\x{066E}-\x{06D3}\x{06FA}-\x{06FF}0-9\s]+$")
        .unwrap()
});

static LOCATION_DASH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^-–—]+\s[-–—]\s[^-–—]+$").unwrap());

const SENTENCE_PUNCTUATION: &[char] = &['.', '!', '?', '؟', '…'];
const ANY_PUNCTUATION: &[char] = &['.', '!', '?', '؟', '…', '،', ',', ';', '؛'];

pub fn has_colon(line: &str) -> bool {
    line.contains(':') || line.contains('：')
}

pub fn ends_with_colon(line: &str) -> bool {
    line.trim_end().ends_with([':', '：'])
}

pub fn has_terminal_punctuation(line: &str) -> bool {
    line.trim_end().ends_with(SENTENCE_PUNCTUATION)
}

pub fn has_sentence_punctuation(line: &str) -> bool {
    line.contains(SENTENCE_PUNCTUATION)
}

pub fn has_any_punctuation(line: &str) -> bool {
    line.contains(ANY_PUNCTUATION)
}

pub fn word_count(line: &str) -> usize {
    line.split_whitespace().count()
}

/// "In the name of God, the Merciful", matched by its three fragments.
pub fn is_basmala(line: &str) -> bool {
    let cleaned = BASMALA_NOISE_RE.replace_all(line, " ");
    cleaned.contains("بسم")
        && cleaned.contains("الله")
        && (cleaned.contains("الرحمن") || cleaned.contains("الرحمان"))
}

pub fn is_scene_header_1(line: &str) -> bool {
    SCENE_NUMBER_RE.is_match(line)
}

pub fn is_scene_header_2(line: &str) -> bool {
    let collapsed = DASH_VARIANTS_RE.replace_all(line, " ");
    TIME_OF_DAY_RE.is_match(&collapsed) && INTERIOR_EXTERIOR_RE.is_match(&collapsed)
}

/// The number segment and description of a line that carries both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneHeaderParts {
    pub number: String,
    pub description: String,
}

/// Splits a complete scene header. `None` when the line starts with a scene
/// number but has no time/place description after it.
pub fn split_scene_header(line: &str) -> Option<SceneHeaderParts> {
    let captures = SCENE_HEADER_START_RE.captures(line)?;
    let number = captures.get(1)?.as_str().trim();
    let description = captures.get(2)?.as_str().trim();
    if description.is_empty() || !is_scene_header_2(description) {
        return None;
    }
    Some(SceneHeaderParts {
        number: number.to_string(),
        description: description.to_string(),
    })
}

pub fn is_complete_scene_header(line: &str) -> bool {
    split_scene_header(line).is_some()
}

pub fn is_any_scene_header(line: &str) -> bool {
    is_scene_header_1(line) || is_scene_header_2(line)
}

pub fn is_transition(line: &str) -> bool {
    TRANSITION_RE.is_match(line.trim())
}

pub fn is_parenthetical_shape(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.chars().count() >= 2
        && trimmed.starts_with(['(', '（'])
        && trimmed.ends_with([')', '）'])
}

fn first_token(line: &str) -> Option<&str> {
    line.split_whitespace().next().map(trim_token)
}

fn trim_token(token: &str) -> &str {
    token.trim_end_matches(|ch: char| ch.is_ascii_punctuation() || "،؛؟…".contains(ch))
}

/// Known action verb, with an optional leading `و`/`ف` removed.
fn is_action_verb_token(token: &str) -> bool {
    let token = trim_token(token);
    if Lexicon::ActionVerbs.contains(token) {
        return true;
    }
    ["و", "ف"].iter().any(|particle| {
        token
            .strip_prefix(particle)
            .map(|rest| Lexicon::ActionVerbs.contains(rest))
            .unwrap_or(false)
    })
}

pub fn starts_with_action_verb(line: &str) -> bool {
    first_token(line).map(is_action_verb_token).unwrap_or(false)
}

/// Narrator cues ("we see", "we hear") and manner/direction verb openers.
pub fn matches_action_opener(line: &str) -> bool {
    let trimmed = line.trim();
    if NARRATOR_CUE_RE.is_match(trimmed) {
        return true;
    }
    !trimmed.ends_with(['?', '؟']) && IMPERFECTIVE_OPENER_RE.is_match(trimmed)
}

pub fn is_action_line(line: &str) -> bool {
    starts_with_action_verb(line) || matches_action_opener(line)
}

/// Looser than [`is_action_line`]: also accepts subject-first narration
/// ("سارة تخرج من الغرفة") where the verb is the second or third token.
/// Questions are left to dialogue.
pub fn reads_as_action(line: &str) -> bool {
    let trimmed = line.trim();
    if is_action_line(trimmed) {
        return true;
    }
    if trimmed.ends_with(['?', '؟']) || word_count(trimmed) < 3 {
        return false;
    }
    trimmed
        .split_whitespace()
        .skip(1)
        .take(2)
        .any(is_action_verb_token)
}

fn contains_stop_word(line: &str) -> bool {
    line.split_whitespace()
        .any(|token| Lexicon::StopWords.contains(token))
}

/// Bare shape of a character cue, ignoring where the line sits.
pub fn matches_character_shape(line: &str) -> bool {
    let trimmed = line.trim();
    let words = word_count(trimmed);
    if words == 0 || words > 5 {
        return false;
    }
    if is_any_scene_header(trimmed)
        || is_transition(trimmed)
        || is_parenthetical_shape(trimmed)
        || starts_with_action_verb(trimmed)
    {
        return false;
    }
    if ends_with_colon(trimmed) {
        return true;
    }
    ARABIC_NAME_RE.is_match(trimmed) && (1..=3).contains(&words) && !contains_stop_word(trimmed)
}

/// Character cue test. With a window, the dialogue exchange narrows it:
/// right after a cue or parenthetical only a colon-anchored name counts, and
/// right after dialogue nothing does.
pub fn is_character_line(line: &str, context: Option<&ContextWindow<'_>>) -> bool {
    if !matches_character_shape(line) {
        return false;
    }
    let Some(context) = context else {
        return true;
    };
    if !context.pattern.is_in_dialogue_block {
        return true;
    }
    match context.previous_label() {
        Some(ScreenplayLabel::Character) | Some(ScreenplayLabel::Parenthetical) => {
            STRICT_CHARACTER_RE.is_match(line.trim())
        }
        Some(ScreenplayLabel::Dialogue) => false,
        _ => true,
    }
}

/// Name and speech of a `NAME: TEXT` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineDialogue {
    pub name: String,
    pub dialogue: String,
}

pub fn split_inline_dialogue(line: &str) -> Option<InlineDialogue> {
    let (colon_at, colon) = line.char_indices().find(|(_, ch)| *ch == ':' || *ch == '：')?;
    let name = line[..colon_at].trim();
    let dialogue = line[colon_at + colon.len_utf8()..].trim();
    if name.is_empty() || dialogue.is_empty() {
        return None;
    }
    if !matches_character_shape(&format!("{name}:")) {
        return None;
    }
    Some(InlineDialogue {
        name: name.to_string(),
        dialogue: dialogue.to_string(),
    })
}

/// A short place line under a scene header: a known location noun or a
/// "place - qualifier" dash pattern.
pub fn is_scene_location(line: &str, max_words: usize) -> bool {
    let trimmed = line.trim();
    let words = word_count(trimmed);
    if words == 0 || words > max_words {
        return false;
    }
    if has_terminal_punctuation(trimmed) || matches_action_opener(trimmed) {
        return false;
    }
    let names_location = trimmed.split_whitespace().any(|token| {
        clitic_variants(token)
            .into_iter()
            .any(|variant| Lexicon::LocationNouns.contains(variant))
    });
    names_location || LOCATION_DASH_RE.is_match(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basmala_needs_all_three_fragments() {
        assert!(is_basmala("بسم الله الرحمن الرحيم"));
        assert!(is_basmala("﴿بسم الله الرحمن الرحيم﴾"));
        assert!(!is_basmala("بسم الله"));
    }

    #[test]
    fn scene_headers() {
        assert!(is_scene_header_1("مشهد 12"));
        assert!(is_scene_header_1("مشهد ٣"));
        assert!(is_scene_header_1("Scene 4"));
        assert!(!is_scene_header_1("مشهد جميل"));

        assert!(is_scene_header_2("داخلي - ليل"));
        assert!(is_scene_header_2("خارجي—نهار"));
        assert!(is_scene_header_2("INT. KITCHEN - NIGHT"));
        assert!(!is_scene_header_2("ليل طويل"));
        assert!(is_scene_header_2("داخلي الليل"));
        assert!(is_scene_header_2("خارجي - صباحا"));
    }

    #[test]
    fn scene_cues_match_whole_tokens_only() {
        assert!(!is_scene_header_2("تدخل سارة إلى الغرفة الداخلية بعد قليل."));
        assert!(!is_scene_header_2("الساحة الخارجية مزدحمة منذ الظهيرة"));
        assert!(!is_scene_header_2("EXTRA time at the INTERNAL meeting tonight"));
    }

    #[test]
    fn complete_scene_header_splits() {
        let parts = split_scene_header("مشهد 1 - داخلي ليل").unwrap();
        assert_eq!(parts.number, "مشهد 1");
        assert_eq!(parts.description, "داخلي ليل");

        assert!(split_scene_header("مشهد 1").is_none());
        assert!(split_scene_header("مشهد 1 -").is_none());
        assert!(split_scene_header("داخلي ليل مشهد 1").is_none());
    }

    #[test]
    fn transitions() {
        assert!(is_transition("قطع"));
        assert!(is_transition("قطع إلى:"));
        assert!(is_transition("مزج"));
        assert!(is_transition("CUT TO:"));
        assert!(is_transition("Fade out."));
        assert!(!is_transition("قطعة من الخبز"));
        assert!(!is_transition("قطع الخبز بالسكين"));
    }

    #[test]
    fn parenthetical_shape() {
        assert!(is_parenthetical_shape("(بهدوء)"));
        assert!(is_parenthetical_shape("（يبتسم）"));
        assert!(!is_parenthetical_shape("(بهدوء) ثم يخرج"));
    }

    #[test]
    fn action_openers() {
        assert!(starts_with_action_verb("يدخل أحمد الغرفة"));
        assert!(starts_with_action_verb("وتجلس سارة"));
        assert!(!starts_with_action_verb("أحمد يدخل"));
        assert!(matches_action_opener("نرى الشارع مزدحما"));
        assert!(matches_action_opener("تتحرك سارة ببطء"));
        assert!(!matches_action_opener("تتحرك سارة ببطء؟"));
    }

    #[test]
    fn subject_first_narration_reads_as_action() {
        assert!(reads_as_action("سارة تخرج من الغرفة"));
        assert!(reads_as_action("الرجل العجوز يجلس وحيدا"));
        assert!(reads_as_action("يدخل أحمد"));
        assert!(!reads_as_action("سارة تخرج من الغرفة؟"));
        assert!(!reads_as_action("لا أعرف ماذا أقول"));
        assert!(!reads_as_action("سارة تخرج"));
    }

    #[test]
    fn character_shapes() {
        assert!(is_character_line("أحمد:", None));
        assert!(is_character_line("سارة", None));
        assert!(is_character_line("الدكتور سامي", None));
        assert!(!is_character_line("في البيت", None));
        assert!(!is_character_line("يدخل:", None));
        assert!(!is_character_line("هذا كلام طويل جدا لا يصلح اسما", None));
        assert!(!is_character_line("(بهدوء)", None));
    }

    #[test]
    fn inline_dialogue_split() {
        let split = split_inline_dialogue("علي: أين أنت؟").unwrap();
        assert_eq!(split.name, "علي");
        assert_eq!(split.dialogue, "أين أنت؟");

        let full_width = split_inline_dialogue("منى： تعال").unwrap();
        assert_eq!(full_width.name, "منى");

        assert!(split_inline_dialogue("علي:").is_none());
        assert!(split_inline_dialogue("يدخل أحمد: ويجلس").is_none());
    }

    #[test]
    fn scene_locations() {
        assert!(is_scene_location("بيت أحمد", 12));
        assert!(is_scene_location("المطبخ", 12));
        assert!(is_scene_location("فيلا الحاج - الدور الثاني", 12));
        assert!(!is_scene_location("بيت أحمد.", 12));
        assert!(!is_scene_location("أحمد", 12));
    }
}
