use std::collections::HashMap;

use serde_json::Value;
use sha1::{Digest, Sha1};

use jiten_store::{StoreBackend, StoreError, StringTable};

/// Per-import value → id caches in front of the backend's upsert-or-ignore
/// interning. Scoped to one import invocation, never shared across imports.
#[derive(Default)]
pub struct InternCache {
    glossaries: HashMap<String, i64>,
    def_tags: HashMap<String, i64>,
    term_tags: HashMap<String, i64>,
    rules: HashMap<String, i64>,
}

impl InternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the id for a glossary payload, storing it on first sighting.
    ///
    /// Content is canonicalized by its compact JSON serialization and keyed
    /// by the SHA-1 of that form.
    pub async fn glossary_id<B: StoreBackend>(
        &mut self,
        backend: &mut B,
        content: &Value,
    ) -> Result<i64, StoreError> {
        let canonical = content.to_string();
        let hash = sha1_hex(&canonical);
        if let Some(&id) = self.glossaries.get(&hash) {
            return Ok(id);
        }
        let id = backend.intern_glossary(&hash, &canonical).await?;
        self.glossaries.insert(hash, id);
        Ok(id)
    }

    /// Resolve the id for a tag/rule string, storing it on first sighting.
    pub async fn string_id<B: StoreBackend>(
        &mut self,
        backend: &mut B,
        table: StringTable,
        value: &str,
    ) -> Result<i64, StoreError> {
        let cache = match table {
            StringTable::DefinitionTags => &mut self.def_tags,
            StringTable::TermTags => &mut self.term_tags,
            StringTable::Rules => &mut self.rules,
        };
        if let Some(&id) = cache.get(value) {
            return Ok(id);
        }
        let id = backend.intern_string(table, value).await?;
        cache.insert(value.to_string(), id);
        Ok(id)
    }
}

fn sha1_hex(input: &str) -> String {
    let digest = Sha1::digest(input.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
