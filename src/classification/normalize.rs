//! Line normalization applied before any pattern is matched.
//!
//! Pasted text arrives with tashkeel, bidi control marks, byte-order marks
//! and list bullets that carry no screenplay meaning. They are removed here
//! so every matcher sees the same bare letters.

/// A non-empty input line after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLine {
    /// 0-based position among the non-empty lines of the batch.
    pub index: usize,
    pub text: String,
    /// A leading bullet or dash glyph was removed.
    pub had_bullet: bool,
}

const BULLET_GLYPHS: &[char] = &[
    '•', '·', '●', '○', '◦', '▪', '▫', '■', '□', '‣', '⁃', '►', '▶', '➢', '➤', '✓', '✔', '*',
    '-', '–', '—', '−',
];

fn is_diacritic(ch: char) -> bool {
    matches!(ch,
        '\u{0610}'..='\u{061A}'
        | '\u{064B}'..='\u{065F}'
        | '\u{0670}'
        | '\u{06D6}'..='\u{06DC}'
        | '\u{06DF}'..='\u{06E8}'
        | '\u{06EA}'..='\u{06ED}')
}

fn is_invisible_mark(ch: char) -> bool {
    matches!(ch,
        '\u{061C}'
        | '\u{200B}'
        | '\u{200E}'
        | '\u{200F}'
        | '\u{202A}'..='\u{202E}'
        | '\u{2060}'
        | '\u{2066}'..='\u{2069}'
        | '\u{FEFF}')
}

/// Collapses every CR/LF variant and Unicode line separator to `\n`.
pub fn unify_line_breaks(raw: &str) -> String {
    raw.replace("\r\n", "\n")
        .replace(['\r', '\u{2028}', '\u{2029}', '\u{0085}'], "\n")
}

/// Removes tashkeel and invisible marks and normalizes spaces, keeping bullets.
pub fn strip_marks(line: &str) -> String {
    line.chars()
        .filter(|ch| !is_diacritic(*ch) && !is_invisible_mark(*ch))
        .map(|ch| if ch == '\u{00A0}' || ch == '\t' { ' ' } else { ch })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Strips a single leading bullet glyph, returning whether one was present.
pub fn strip_leading_bullet(line: &str) -> (String, bool) {
    let mut chars = line.chars();
    match chars.next() {
        Some(first) if BULLET_GLYPHS.contains(&first) => {
            let rest = chars.as_str();
            // "--" or "***" style runs are decoration, not a bullet plus text
            let stripped = rest.trim_start_matches(BULLET_GLYPHS).trim();
            (stripped.to_string(), true)
        }
        _ => (line.to_string(), false),
    }
}

/// Normalizes one physical line. `index` is assigned by the caller.
pub fn normalize_line(raw: &str, index: usize) -> NormalizedLine {
    let (text, had_bullet) = strip_leading_bullet(&strip_marks(raw));
    NormalizedLine {
        index,
        text,
        had_bullet,
    }
}

/// Normalizes the whole text, preserving the number of lines.
pub fn normalize_text(raw: &str) -> String {
    unify_line_breaks(raw)
        .split('\n')
        .map(|line| strip_leading_bullet(&strip_marks(line)).0)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splits raw input into the normalized, non-empty lines that get classified.
pub fn split_lines(raw: &str) -> Vec<NormalizedLine> {
    unify_line_breaks(raw)
        .split('\n')
        .map(|line| normalize_line(line, 0))
        .filter(|line| !line.text.is_empty())
        .enumerate()
        .map(|(index, line)| NormalizedLine { index, ..line })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tashkeel_and_bidi_marks() {
        let line = normalize_line("\u{FEFF}\u{200F}مَشْهَدٌ ١", 0);
        assert_eq!(line.text, "مشهد ١");
        assert!(!line.had_bullet);
    }

    #[test]
    fn strips_leading_bullet() {
        let line = normalize_line("  • يدخل أحمد", 0);
        assert_eq!(line.text, "يدخل أحمد");
        assert!(line.had_bullet);

        let dashed = normalize_line("— سارة: أين كنت؟", 0);
        assert_eq!(dashed.text, "سارة: أين كنت؟");
        assert!(dashed.had_bullet);
    }

    #[test]
    fn normalize_text_keeps_line_count() {
        let raw = "أحمد:\r\n\r\nمرحبا\rكيف حالك\u{2028}- وداعا";
        let normalized = normalize_text(raw);
        assert_eq!(normalized.split('\n').count(), 5);
        assert_eq!(normalized, "أحمد:\n\nمرحبا\nكيف حالك\nوداعا");
    }

    #[test]
    fn empty_lines_never_reach_classification() {
        let lines = split_lines("\n   \n\u{200F}\nيدخل أحمد\n\n•\nيجلس");
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["يدخل أحمد", "يجلس"]);
        assert_eq!(lines[0].index, 0);
        assert_eq!(lines[1].index, 1);
    }
}
