use crate::models::MAX_RECENT_CLASSIFICATIONS;

/// Configuration for the paste classifier with tunable thresholds.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Lines strictly shorter than this many chars count as short
    pub short_line_chars: usize,

    /// Lines strictly longer than this many chars count as long
    pub long_line_chars: usize,

    /// Number of raw lines gathered on each side of the current line
    pub window_radius: usize,

    /// How many trailing labels decide whether we are inside a dialogue exchange
    pub dialogue_lookback: usize,

    /// Capacity of the memory's recent-label ring
    pub history_capacity: usize,

    /// Scene-header-3 lines are at most this many words
    pub location_max_words: usize,

    /// Memory name match only applies to lines within these limits
    pub memory_name_max_words: usize,
    pub memory_name_max_chars: usize,

    /// A bare name is a likely cue only when the next line is longer than this
    pub likely_character_next_min_chars: usize,

    /// Lines scored below this are queued for confirmation
    pub confidence_threshold: f64,

    /// Known characters with at least this many occurrences get a boost
    pub known_character_min_occurrences: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            short_line_chars: 30,
            long_line_chars: 100,
            window_radius: 3,
            dialogue_lookback: 3,
            history_capacity: MAX_RECENT_CLASSIFICATIONS,
            location_max_words: 12,
            memory_name_max_words: 3,
            memory_name_max_chars: 40,
            likely_character_next_min_chars: 20,
            confidence_threshold: 0.65,
            known_character_min_occurrences: 3,
        }
    }
}
