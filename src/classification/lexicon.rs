//! Frozen word sets the pattern matchers consult.
//!
//! Each set is built once on first use and addressed through [`Lexicon`],
//! so control flow never carries literal word lists.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Identifies one of the frozen word sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lexicon {
    ActionVerbs,
    StopWords,
    LocationNouns,
}

impl Lexicon {
    pub fn contains(self, token: &str) -> bool {
        let set: &HashSet<String> = match self {
            Lexicon::ActionVerbs => &ACTION_VERBS,
            Lexicon::StopWords => &STOP_WORDS,
            Lexicon::LocationNouns => &LOCATION_NOUNS,
        };
        set.contains(token)
    }

    pub fn len(self) -> usize {
        match self {
            Lexicon::ActionVerbs => ACTION_VERBS.len(),
            Lexicon::StopWords => STOP_WORDS.len(),
            Lexicon::LocationNouns => LOCATION_NOUNS.len(),
        }
    }
}

/// Third-person imperfective verbs, masculine form. The feminine `ت` form
/// of each is added when the set is built.
const IMPERFECTIVE_VERBS: &[&str] = &[
    "يدخل", "يخرج", "ينظر", "يقف", "يجلس", "يمشي", "يركض", "يجري", "يفتح", "يغلق",
    "يلتفت", "يبتسم", "يضحك", "يبكي", "يصرخ", "يهمس", "يمسك", "يرفع", "يضع", "يأخذ",
    "يسحب", "يدفع", "يلقي", "يرمي", "يسقط", "يقفز", "يقترب", "يبتعد", "يعود", "يتوقف",
    "يتحرك", "يستدير", "ينهض", "يقوم", "ينحني", "يهز", "يشير", "يلمح", "يراقب", "يتنهد",
    "يصمت", "يطفئ", "يشعل", "يحمل", "يترك", "يكتب", "يقرأ", "يشرب", "يأكل", "يطرق",
    "يدق", "يرن", "يندفع", "يتسلل", "يهرب", "يلحق", "يرتمي", "يحتضن", "يعانق", "يصفع",
    "يضرب", "يلكم", "يقبل", "يمسح", "يرتدي", "يخلع", "ينام", "يستيقظ", "يفيق", "يتراجع",
    "يتقدم", "يصعد", "ينزل", "يهبط", "يعبر", "يختفي", "يظهر", "يدور", "يلف", "يتأمل",
    "يحدق", "يتجه", "يصل", "يغادر", "يجمع", "يفتش", "يبحث", "يلتقط", "يناول", "يسلم",
    "يستلقي", "يتمدد", "يرتجف", "يرتعش", "يتعثر", "ينتفض", "يتسمر", "يومئ", "يتبادل", "يحاول",
    "يستمع", "يتصل", "يمد", "يضم", "يربت", "يلوح", "يتكئ", "يستند", "يقطع", "يملأ",
    "يسكب", "يشغل", "يدير", "يطل", "يتلفت", "ينصرف", "يتبع", "يطارد", "يمسك", "ينتظر",
];

/// Third-person perfective verbs, masculine form. The feminine `ت` suffix
/// form of each is added when the set is built.
const PERFECTIVE_VERBS: &[&str] = &[
    "دخل", "خرج", "نظر", "وقف", "جلس", "مشى", "ركض", "جرى", "فتح", "أغلق",
    "التفت", "ابتسم", "ضحك", "صرخ", "همس", "أمسك", "رفع", "وضع", "أخذ", "سحب",
    "دفع", "ألقى", "سقط", "قفز", "اقترب", "ابتعد", "عاد", "توقف", "تحرك", "استدار",
    "نهض", "قام", "انحنى", "هز", "أشار", "لمح", "راقب", "تنهد", "صمت", "أطفأ",
    "أشعل", "حمل", "ترك", "كتب", "قرأ", "شرب", "أكل", "طرق", "دق", "رن",
    "اندفع", "تسلل", "هرب", "لحق", "ارتمى", "احتضن", "عانق", "صفع", "ضرب", "لكم",
    "مسح", "ارتدى", "خلع", "نام", "استيقظ", "أفاق", "تراجع", "تقدم", "صعد", "نزل",
    "هبط", "عبر", "اختفى", "ظهر", "تأمل", "حدق", "اتجه", "وصل", "غادر",
    "التقط", "ناول", "استلقى", "تمدد", "ارتجف", "تعثر", "انتفض", "أومأ", "حاول", "مد",
    "ربت", "لوح", "اتكأ", "انصرف", "طارد", "انتظر",
];

static STOP_WORDS: Lazy<HashSet<String>> = Lazy::new(|| {
    [
        "في", "من", "إلى", "الى", "على", "عن", "مع", "ثم", "لكن", "لكنه", "أو", "و", "أن",
        "إن", "ان", "هذا", "هذه", "ذلك", "تلك", "التي", "الذي", "الذين", "هو", "هي", "هم",
        "أنا", "انا", "أنت", "انت", "نحن", "كان", "كانت", "قد", "لقد", "لا", "لم", "لن",
        "ما", "ماذا", "لماذا", "كيف", "متى", "أين", "اين", "هل", "نعم", "يا", "حتى", "بعد",
        "قبل", "عند", "حين", "بين", "كل", "بعض", "أي", "إذا", "اذا", "لو", "لأن", "فقط",
        "أيضا", "ايضا", "جدا", "الآن", "الان", "هنا", "هناك", "بل", "كما", "مثل", "منذ",
        "عندما", "بينما", "غير", "سوف", "ليس", "ليست",
    ]
    .iter()
    .map(|word| word.to_string())
    .collect()
});

static ACTION_VERBS: Lazy<HashSet<String>> = Lazy::new(|| {
    let mut verbs = HashSet::new();
    for verb in IMPERFECTIVE_VERBS {
        verbs.insert(verb.to_string());
        if let Some(stem) = verb.strip_prefix('ي') {
            verbs.insert(format!("ت{stem}"));
        }
    }
    for verb in PERFECTIVE_VERBS {
        verbs.insert(verb.to_string());
        verbs.insert(format!("{verb}ت"));
    }
    verbs
});

static LOCATION_NOUNS: Lazy<HashSet<String>> = Lazy::new(|| {
    [
        "منزل", "بيت", "شقة", "غرفة", "صالة", "صالون", "مطبخ", "حمام", "مكتب", "شركة",
        "شارع", "طريق", "ميدان", "حديقة", "مستشفى", "عيادة", "مدرسة", "جامعة", "فصل",
        "مطعم", "مقهى", "كافيه", "فندق", "سيارة", "تاكسي", "قطار", "محطة", "مطار", "سوق",
        "محل", "مسجد", "كنيسة", "قصر", "فيلا", "مزرعة", "صحراء", "شاطئ", "بحر", "نهر",
        "جبل", "قرية", "مدينة", "سطح", "ممر", "مخزن", "قسم", "سجن", "محكمة", "نادي",
        "ملعب", "مصنع", "بنك", "مبنى", "عمارة", "بلكونة", "شرفة", "كوخ", "خيمة", "مقبرة",
        "استوديو", "مسرح", "مخبز", "صيدلية", "ورشة", "حارة", "زقاق", "كورنيش", "ميناء",
    ]
    .iter()
    .map(|word| word.to_string())
    .collect()
});

/// Surface forms of `token` with common clitics removed: the conjunctions
/// `و`/`ف`, the prepositions `ب`/`ل` and the article `ال`.
pub fn clitic_variants(token: &str) -> Vec<&str> {
    let mut variants = vec![token];
    let mut stems = vec![token];
    for prefix in ["و", "ف"] {
        if let Some(rest) = token.strip_prefix(prefix) {
            if rest.chars().count() >= 2 {
                stems.push(rest);
            }
        }
    }
    for stem in stems {
        for article in ["ال", "بال", "وال", "لل", "فال"] {
            if let Some(rest) = stem.strip_prefix(article) {
                if rest.chars().count() >= 2 {
                    variants.push(rest);
                }
            }
        }
        if stem != token {
            variants.push(stem);
        }
    }
    variants
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verb_set_includes_generated_feminine_forms() {
        assert!(Lexicon::ActionVerbs.contains("يدخل"));
        assert!(Lexicon::ActionVerbs.contains("تدخل"));
        assert!(Lexicon::ActionVerbs.contains("دخلت"));
        assert!(!Lexicon::ActionVerbs.contains("أحمد"));
        assert!(Lexicon::ActionVerbs.len() > 300);
    }

    #[test]
    fn stop_words_and_locations() {
        assert!(Lexicon::StopWords.contains("في"));
        assert!(!Lexicon::StopWords.contains("سارة"));
        assert!(Lexicon::LocationNouns.contains("مطبخ"));
    }

    #[test]
    fn clitics_are_peeled() {
        let variants = clitic_variants("والمطبخ");
        assert!(variants.contains(&"مطبخ"));
        assert!(clitic_variants("بيت").contains(&"بيت"));
        assert!(clitic_variants("وبيت").contains(&"بيت"));
    }
}
