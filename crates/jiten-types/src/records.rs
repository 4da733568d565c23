use serde_json::Value;

/// One entry of a `term_bank_N.json` file.
///
/// Whitespace-only tag/rule strings decode to `None` so they never reach the
/// interning tables as empty strings.
#[derive(Debug, Clone, PartialEq)]
pub struct TermRecord {
    pub term: String,
    pub reading: String,
    pub definition_tags: Option<String>,
    pub rules: Option<String>,
    pub score: i64,
    pub glossary: Value,
    pub sequence: Option<i64>,
    pub term_tags: Option<String>,
}

/// Metadata payload kind for term/kanji meta banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaMode {
    Frequency,
    PitchAccent,
}

impl MetaMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetaMode::Frequency => "freq",
            MetaMode::PitchAccent => "pitch",
        }
    }
}

/// One entry of a `term_meta_bank_N.json` file.
///
/// `reading` is surfaced out of the data payload when present (always, for
/// pitch data).
#[derive(Debug, Clone, PartialEq)]
pub struct TermMetaRecord {
    pub term: String,
    pub mode: MetaMode,
    pub reading: Option<String>,
    pub data: Value,
}

/// One entry of a `tag_bank_N.json` file.
#[derive(Debug, Clone, PartialEq)]
pub struct TagRecord {
    pub name: String,
    pub category: String,
    pub sort_order: i64,
    pub notes: String,
    pub score: i64,
}

/// One entry of a `kanji_bank_N.json` file.
#[derive(Debug, Clone, PartialEq)]
pub struct KanjiRecord {
    pub kanji: String,
    pub onyomi: String,
    pub kunyomi: String,
    pub tags: Option<String>,
    pub meanings: Value,
    pub stats: Value,
}

/// One entry of a `kanji_meta_bank_N.json` file (mode is always `freq`).
#[derive(Debug, Clone, PartialEq)]
pub struct KanjiMetaRecord {
    pub kanji: String,
    pub data: Value,
}
