use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::{Connection, Transaction, params};

use crate::backend::{DictionaryRecord, StoreBackend, StringTable};
use crate::error::StoreError;
use crate::rows::RowBatch;
use crate::schema;

/// Embedded single-process backend over a SQLite file.
///
/// `insert_batch` wraps each call in one transaction, so the pipeline's
/// one-batch-per-bank-file policy yields whole-file atomicity and lets the
/// engine checkpoint write-ahead state between files.
pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Open (creating if needed) a database file and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::bootstrap(Connection::open(path)?)
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA synchronous  = NORMAL;
             PRAGMA cache_size   = -65536;
             PRAGMA temp_store   = MEMORY;",
        )?;
        conn.busy_timeout(Duration::from_secs(5))?;
        for statement in schema::SCHEMA_STATEMENTS {
            conn.execute_batch(statement)?;
        }
        Ok(Self { conn })
    }
}

#[async_trait]
impl StoreBackend for SqliteBackend {
    async fn dictionary_exists(
        &mut self,
        title: &str,
        revision: &str,
    ) -> Result<bool, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT 1 FROM dictionaries WHERE title = ?1 AND revision = ?2")?;
        Ok(stmt.exists(params![title, revision])?)
    }

    async fn register_dictionary(
        &mut self,
        record: &DictionaryRecord,
    ) -> Result<i64, StoreError> {
        self.conn.execute(
            schema::INSERT_DICTIONARY,
            params![
                record.title,
                record.revision,
                record.format,
                record.author,
                record.url,
                record.description,
                record.attribution,
                record.sequenced,
                record.frequency_mode,
                record.is_bundled,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    async fn intern_glossary(&mut self, hash: &str, content: &str) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO glossaries (hash, content) VALUES (?1, ?2)",
            params![hash, content],
        )?;
        let id = self.conn.query_row(
            "SELECT id FROM glossaries WHERE hash = ?1",
            params![hash],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    async fn intern_string(
        &mut self,
        table: StringTable,
        value: &str,
    ) -> Result<i64, StoreError> {
        let insert = format!(
            "INSERT OR IGNORE INTO {} ({}) VALUES (?1)",
            table.table(),
            table.column()
        );
        let select = format!(
            "SELECT id FROM {} WHERE {} = ?1",
            table.table(),
            table.column()
        );
        self.conn.execute(&insert, params![value])?;
        let id = self
            .conn
            .query_row(&select, params![value], |row| row.get(0))?;
        Ok(id)
    }

    async fn insert_batch(&mut self, batch: RowBatch) -> Result<(), StoreError> {
        let table = batch.table();
        let rows = batch.len();
        let tx = self.conn.transaction()?;
        write_batch(&tx, batch).map_err(|err| classify(err, table))?;
        tx.commit()?;
        tracing::debug!("committed {rows} rows into {table}");
        Ok(())
    }

    async fn remove_dictionary(&mut self, dict_id: i64) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM dictionaries WHERE id = ?1", params![dict_id])?;
        Ok(())
    }

    async fn finalize(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch("VACUUM;")?;
        Ok(())
    }
}

fn write_batch(tx: &Transaction<'_>, batch: RowBatch) -> Result<(), rusqlite::Error> {
    match batch {
        RowBatch::Terms(rows) => {
            let mut stmt = tx.prepare_cached(schema::INSERT_TERM)?;
            for row in rows {
                stmt.execute(params![
                    row.dict_id,
                    row.term,
                    row.reading,
                    row.def_tags_id,
                    row.rules_id,
                    row.score,
                    row.glossary_id,
                    row.sequence,
                    row.term_tags_id,
                ])?;
            }
        }
        RowBatch::TermMeta(rows) => {
            let mut stmt = tx.prepare_cached(schema::INSERT_TERM_META)?;
            for row in rows {
                stmt.execute(params![row.dict_id, row.term, row.mode, row.reading, row.data])?;
            }
        }
        RowBatch::Tags(rows) => {
            let mut stmt = tx.prepare_cached(schema::INSERT_TAG)?;
            for row in rows {
                stmt.execute(params![
                    row.dict_id,
                    row.name,
                    row.category,
                    row.sort_order,
                    row.notes,
                    row.score,
                ])?;
            }
        }
        RowBatch::Kanji(rows) => {
            let mut stmt = tx.prepare_cached(schema::INSERT_KANJI)?;
            for row in rows {
                stmt.execute(params![
                    row.dict_id,
                    row.kanji,
                    row.onyomi,
                    row.kunyomi,
                    row.tags,
                    row.meanings,
                    row.stats,
                ])?;
            }
        }
        RowBatch::KanjiMeta(rows) => {
            let mut stmt = tx.prepare_cached(schema::INSERT_KANJI_META)?;
            for row in rows {
                stmt.execute(params![row.dict_id, row.kanji, row.mode, row.data])?;
            }
        }
    }
    Ok(())
}

/// Surface unexpected constraint failures with the table they hit; expected
/// dedup conflicts never reach here because interning uses INSERT OR IGNORE.
fn classify(err: rusqlite::Error, table: &str) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(e, message)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            StoreError::Constraint {
                table: table.to_string(),
                detail: message.clone().unwrap_or_else(|| e.to_string()),
            }
        }
        _ => StoreError::Sqlite(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::TermRow;

    fn record(title: &str, revision: &str) -> DictionaryRecord {
        DictionaryRecord {
            title: title.to_string(),
            revision: revision.to_string(),
            format: Some(3),
            author: None,
            url: None,
            description: None,
            attribution: None,
            sequenced: false,
            frequency_mode: None,
            is_bundled: false,
        }
    }

    #[tokio::test]
    async fn registration_makes_dictionary_visible() {
        let mut backend = SqliteBackend::open_in_memory().unwrap();
        assert!(!backend.dictionary_exists("Test", "1").await.unwrap());
        let id = backend.register_dictionary(&record("Test", "1")).await.unwrap();
        assert!(id > 0);
        assert!(backend.dictionary_exists("Test", "1").await.unwrap());
        assert!(!backend.dictionary_exists("Test", "2").await.unwrap());
    }

    #[tokio::test]
    async fn interning_returns_one_id_per_distinct_value() {
        let mut backend = SqliteBackend::open_in_memory().unwrap();
        let a = backend.intern_string(StringTable::TermTags, "n").await.unwrap();
        let b = backend.intern_string(StringTable::TermTags, "n").await.unwrap();
        let c = backend.intern_string(StringTable::TermTags, "v").await.unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);

        // the same value is independent across tables
        let d = backend.intern_string(StringTable::Rules, "n").await.unwrap();
        let rules: i64 = backend
            .conn
            .query_row("SELECT COUNT(*) FROM rule_sets", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rules, 1);
        assert!(d > 0);

        let g1 = backend.intern_glossary("abc123", "[\"cat\"]").await.unwrap();
        let g2 = backend.intern_glossary("abc123", "[\"cat\"]").await.unwrap();
        assert_eq!(g1, g2);
        let glossaries: i64 = backend
            .conn
            .query_row("SELECT COUNT(*) FROM glossaries", [], |r| r.get(0))
            .unwrap();
        assert_eq!(glossaries, 1);
    }

    #[tokio::test]
    async fn removing_a_dictionary_cascades_to_its_rows() {
        let mut backend = SqliteBackend::open_in_memory().unwrap();
        let dict_id = backend.register_dictionary(&record("Test", "1")).await.unwrap();
        let glossary_id = backend.intern_glossary("abc123", "[\"cat\"]").await.unwrap();
        backend
            .insert_batch(RowBatch::Terms(vec![TermRow {
                dict_id,
                term: "猫".to_string(),
                reading: "ねこ".to_string(),
                def_tags_id: None,
                rules_id: None,
                score: 100,
                glossary_id,
                sequence: Some(1),
                term_tags_id: None,
            }]))
            .await
            .unwrap();

        backend.remove_dictionary(dict_id).await.unwrap();
        let terms: i64 = backend
            .conn
            .query_row("SELECT COUNT(*) FROM terms", [], |r| r.get(0))
            .unwrap();
        assert_eq!(terms, 0);
        // interned content survives removal and stays shared
        let glossaries: i64 = backend
            .conn
            .query_row("SELECT COUNT(*) FROM glossaries", [], |r| r.get(0))
            .unwrap();
        assert_eq!(glossaries, 1);
    }

    #[tokio::test]
    async fn unexpected_constraint_violations_carry_table_context() {
        let mut backend = SqliteBackend::open_in_memory().unwrap();
        let dict_id = backend.register_dictionary(&record("Test", "1")).await.unwrap();
        // glossary_id 999 does not exist
        let err = backend
            .insert_batch(RowBatch::Terms(vec![TermRow {
                dict_id,
                term: "猫".to_string(),
                reading: "ねこ".to_string(),
                def_tags_id: None,
                rules_id: None,
                score: 0,
                glossary_id: 999,
                sequence: None,
                term_tags_id: None,
            }]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Constraint { ref table, .. } if table == "terms"));
    }
}
