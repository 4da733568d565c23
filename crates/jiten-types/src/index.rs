use serde::Deserialize;

/// Archive metadata parsed from `index.json`.
///
/// `title` and `revision` identify the dictionary; a `(title, revision)`
/// pair may be installed at most once.
#[derive(Debug, Clone, Deserialize)]
pub struct DictionaryIndex {
    pub title: String,
    pub revision: String,
    #[serde(default)]
    pub format: Option<i64>,
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(default)]
    pub sequenced: Option<bool>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attribution: Option<String>,
    #[serde(rename = "frequencyMode", default)]
    pub frequency_mode: Option<String>,
}

impl DictionaryIndex {
    /// Archive format version; newer archives use `format`, older ones `version`.
    pub fn format_version(&self) -> Option<i64> {
        self.format.or(self.version)
    }
}
