use async_trait::async_trait;

use crate::error::StoreError;
use crate::rows::RowBatch;

/// The three interned-string tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringTable {
    DefinitionTags,
    TermTags,
    Rules,
}

impl StringTable {
    pub fn table(&self) -> &'static str {
        match self {
            StringTable::DefinitionTags => "def_tag_sets",
            StringTable::TermTags => "term_tag_sets",
            StringTable::Rules => "rule_sets",
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            StringTable::Rules => "rules",
            _ => "tags",
        }
    }
}

/// Metadata for registering a new dictionary.
#[derive(Debug, Clone)]
pub struct DictionaryRecord {
    pub title: String,
    pub revision: String,
    pub format: Option<i64>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub attribution: Option<String>,
    pub sequenced: bool,
    pub frequency_mode: Option<String>,
    pub is_bundled: bool,
}

/// Storage contract for the import pipeline.
///
/// Interning is upsert-or-ignore: a concurrent equal insert (possible on the
/// hosted store) resolves to the existing row's id, never an error.
#[async_trait]
pub trait StoreBackend: Send {
    async fn dictionary_exists(&mut self, title: &str, revision: &str)
    -> Result<bool, StoreError>;

    async fn register_dictionary(&mut self, record: &DictionaryRecord)
    -> Result<i64, StoreError>;

    async fn intern_glossary(&mut self, hash: &str, content: &str) -> Result<i64, StoreError>;

    async fn intern_string(&mut self, table: StringTable, value: &str)
    -> Result<i64, StoreError>;

    /// Insert all rows of `batch`, atomically: either every row becomes
    /// visible or none does.
    async fn insert_batch(&mut self, batch: RowBatch) -> Result<(), StoreError>;

    /// Remove a dictionary and, by cascade, every row referencing it.
    async fn remove_dictionary(&mut self, dict_id: i64) -> Result<(), StoreError>;

    /// Post-import compaction.
    async fn finalize(&mut self) -> Result<(), StoreError>;

    /// Max rows per `insert_batch` call; `None` means a whole bank file at a
    /// time.
    fn batch_limit(&self) -> Option<usize> {
        None
    }
}
