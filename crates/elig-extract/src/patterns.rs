//! Pattern and keyword extractors for free-text clinical notes.
//!
//! Every extractor is a pure function of the note. Numeric extractors return
//! `None` when the pattern is absent or the captured text does not parse.
//! Keyword extractors always decide, returning `false` when nothing matches.

use std::sync::LazyLock;

use elig_model::Gender;
use regex::Regex;

/// A note plus its lowercase form, computed once for keyword matching.
#[derive(Debug, Clone)]
pub struct NoteText<'a> {
    original: &'a str,
    lower: String,
}

impl<'a> NoteText<'a> {
    pub fn new(note: &'a str) -> Self {
        Self {
            original: note,
            lower: note.to_lowercase(),
        }
    }

    pub fn as_str(&self) -> &'a str {
        self.original
    }

    /// Whether the note contains `phrase`, which must be lowercase.
    pub fn contains(&self, phrase: &str) -> bool {
        self.lower.contains(phrase)
    }

    /// Whether the note contains any of `phrases`.
    pub fn contains_any(&self, phrases: &[&str]) -> bool {
        phrases.iter().any(|phrase| self.contains(phrase))
    }
}

// === Numeric patterns ===

static AGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)-year-old").expect("Invalid age regex"));

static GENDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(woman|man|female|male)").expect("Invalid gender regex"));

/// Percentage after an `LVEF` or `ejection fraction` label, skipping non-digits.
static LVEF_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:LVEF|ejection fraction)[^0-9]*?([0-9]+\.?[0-9]*)%")
        .expect("Invalid LVEF regex")
});

static NT_PROBNP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)NT-proBNP[^0-9]*([0-9][0-9,]*)").expect("Invalid NT-proBNP regex")
});

static EGFR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)eGFR[^0-9]*([0-9]+\.?[0-9]*)").expect("Invalid eGFR regex")
});

static BLOOD_PRESSURE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+)/([0-9]+)\s*mmHg").expect("Invalid blood pressure regex")
});

/// Combined ranges are listed before single classes so `III` never matches as `II`.
static NYHA_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)NYHA class (II\s*[-\x{2013}]\s*III|III|IV|II)\b").expect("Invalid NYHA regex")
});

// === Keyword tables ===

const SGLT2_INHIBITORS: &[&str] = &["empagliflozin", "dapagliflozin", "canagliflozin"];

/// Phrases that negate a medication or diagnosis mention anywhere in a note.
pub const NOTE_NEGATIONS: &[&str] = &["no history", "never received", "not received"];

/// Negations for a type 1 diabetes mention in a narrative note.
pub const TYPE1_NEGATIONS: &[&str] = &["no history"];

/// Negations for a type 1 diabetes mention in a structured clinical note,
/// which also names the competing diagnosis explicitly.
pub const TYPE1_NOTE_NEGATIONS: &[&str] = &[
    "no history",
    "not type 1",
    "type 2 diabetes",
    "type ii diabetes",
];

/// Guideline-directed heart failure therapy classes; each inner list is one class.
const GDMT_CLASSES: &[&[&str]] = &[
    &["ace inhibitor", "arni"],
    &["beta-blocker"],
    &["mra", "mineralocorticoid receptor antagonist"],
    &["diuretic"],
];

/// Number of therapy classes that counts as guideline-directed treatment.
const GDMT_MIN_CLASSES: usize = 2;

const CONGESTIVE_HF_PHRASES: &[&str] = &["congestive", "heart failure", "hf"];

const UNSTABLE_ANGINA_PHRASES: &[&str] = &[
    "unstable angina",
    "at rest",
    "worsening",
    "new-onset",
    "first time in life",
    "acute coronary syndrome",
];

const CALCIUM_CHANNEL_BLOCKER_PHRASES: &[&str] = &["calcium channel blocker", "ccb", "amlodipine"];

/// Parses a string as f64, returning None for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|number| number.is_finite())
}

fn capture<'t>(regex: &Regex, note: &'t str, group: usize) -> Option<&'t str> {
    regex
        .captures(note)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str())
}

pub fn extract_age(note: &str) -> Option<i64> {
    capture(&AGE_REGEX, note, 1)?.parse().ok()
}

/// First gender word in the note.
pub fn extract_gender(note: &str) -> Option<Gender> {
    capture(&GENDER_REGEX, note, 1)?.parse().ok()
}

pub fn extract_lvef(note: &str) -> Option<f64> {
    parse_f64(capture(&LVEF_REGEX, note, 1)?)
}

/// NT-proBNP in pg/mL; thousands separators are dropped.
pub fn extract_nt_probnp(note: &str) -> Option<f64> {
    parse_f64(&capture(&NT_PROBNP_REGEX, note, 1)?.replace(',', ""))
}

pub fn extract_egfr(note: &str) -> Option<f64> {
    parse_f64(capture(&EGFR_REGEX, note, 1)?)
}

pub fn extract_systolic_bp(note: &str) -> Option<i64> {
    capture(&BLOOD_PRESSURE_REGEX, note, 1)?.parse().ok()
}

pub fn extract_diastolic_bp(note: &str) -> Option<i64> {
    capture(&BLOOD_PRESSURE_REGEX, note, 2)?.parse().ok()
}

/// NYHA functional class as 2, 3 or 4. A `II-III` range counts as 3.
pub fn extract_nyha_class(note: &str) -> Option<i64> {
    let class = capture(&NYHA_REGEX, note, 1)?.to_ascii_uppercase();
    match class.as_str() {
        "II" => Some(2),
        "III" => Some(3),
        "IV" => Some(4),
        _ if class.starts_with("II") && class.ends_with("III") => Some(3),
        _ => None,
    }
}

/// An SGLT2 inhibitor is named and no negation phrase appears.
pub fn extract_sglt2_inhibitor(note: &NoteText<'_>) -> bool {
    note.contains_any(SGLT2_INHIBITORS) && !note.contains_any(NOTE_NEGATIONS)
}

/// "type 1 diabetes" is mentioned and none of `negations` appears.
pub fn mentions_type1_diabetes(note: &NoteText<'_>, negations: &[&str]) -> bool {
    note.contains("type 1 diabetes") && !note.contains_any(negations)
}

pub fn extract_type1_diabetes(note: &NoteText<'_>) -> bool {
    mentions_type1_diabetes(note, TYPE1_NEGATIONS)
}

/// At least two guideline-directed therapy classes are mentioned.
pub fn extract_gdmt_therapy(note: &NoteText<'_>) -> bool {
    let classes = GDMT_CLASSES
        .iter()
        .filter(|class| note.contains_any(class))
        .count();
    classes >= GDMT_MIN_CLASSES
}

pub fn extract_congestive_hf(note: &NoteText<'_>) -> bool {
    note.contains_any(CONGESTIVE_HF_PHRASES)
}

pub fn extract_unstable_angina(note: &NoteText<'_>) -> bool {
    note.contains_any(UNSTABLE_ANGINA_PHRASES)
}

pub fn extract_calcium_channel_blocker(note: &NoteText<'_>) -> bool {
    note.contains_any(CALCIUM_CHANNEL_BLOCKER_PHRASES)
}
