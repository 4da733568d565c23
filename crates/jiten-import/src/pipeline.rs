use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use jiten_archive::decode;
use jiten_archive::entry::{BankKind, DictionaryArchive};
use jiten_store::{
    KanjiMetaRow, KanjiRow, RowBatch, StoreBackend, StringTable, TagRow, TermMetaRow, TermRow,
};

use crate::error::ImportError;
use crate::intern::InternCache;
use crate::registrar;
use crate::writer;

/// Row counts for one completed import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub terms: usize,
    pub term_meta: usize,
    pub tags: usize,
    pub kanji: usize,
    pub kanji_meta: usize,
}

/// Result of importing one archive.
#[derive(Debug)]
pub enum ImportOutcome {
    Installed {
        dict_id: i64,
        title: String,
        revision: String,
        stats: ImportStats,
    },
    Skipped {
        title: String,
        revision: String,
    },
}

/// Import one dictionary archive into the given backend.
///
/// Reads `index.json` first, gates on the `(title, revision)` idempotency
/// check, then streams bank files through decode → intern → batched writes.
pub async fn import_archive<B: StoreBackend>(
    backend: &mut B,
    path: &Path,
    bundled: bool,
) -> Result<ImportOutcome, ImportError> {
    let mut archive = DictionaryArchive::open(path)?;
    let index = archive.read_index()?;
    info!(
        "importing {} revision {} from {}",
        index.title,
        index.revision,
        path.display()
    );

    let Some(dict_id) = registrar::register(backend, &index, bundled).await? else {
        return Ok(ImportOutcome::Skipped {
            title: index.title,
            revision: index.revision,
        });
    };

    match import_banks(backend, &mut archive, dict_id).await {
        Ok(stats) => {
            backend.finalize().await?;
            info!(
                "installed {}: {} terms, {} term meta, {} tags, {} kanji, {} kanji meta",
                index.title, stats.terms, stats.term_meta, stats.tags, stats.kanji,
                stats.kanji_meta
            );
            Ok(ImportOutcome::Installed {
                dict_id,
                title: index.title,
                revision: index.revision,
                stats,
            })
        }
        Err(err) => {
            // A failed import must not leave the dictionary registered.
            if let Err(cleanup) = backend.remove_dictionary(dict_id).await {
                warn!("failed to remove partially imported dictionary {dict_id}: {cleanup}");
            }
            Err(err)
        }
    }
}

/// Import every `*.zip` directly inside a directory, in sorted order.
pub async fn import_dir<B: StoreBackend>(
    backend: &mut B,
    dir: &Path,
    bundled: bool,
) -> Result<Vec<ImportOutcome>, ImportError> {
    let mut archives: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("zip") {
            archives.push(path);
        }
    }
    archives.sort();

    let mut outcomes = Vec::with_capacity(archives.len());
    for path in archives {
        outcomes.push(import_archive(backend, &path, bundled).await?);
    }
    Ok(outcomes)
}

async fn import_banks<B: StoreBackend>(
    backend: &mut B,
    archive: &mut DictionaryArchive,
    dict_id: i64,
) -> Result<ImportStats, ImportError> {
    let mut cache = InternCache::new();
    let mut stats = ImportStats::default();

    for entry in archive.entries() {
        let entry = entry?;
        let written = match entry.kind {
            BankKind::Terms => {
                let records = decode::decode_term_bank(&entry.name, &entry.bytes)?;
                let mut rows = Vec::with_capacity(records.len());
                for record in records {
                    // interned ids must exist before the row referencing them
                    let glossary_id = cache.glossary_id(backend, &record.glossary).await?;
                    let def_tags_id = match record.definition_tags.as_deref() {
                        Some(value) => Some(
                            cache
                                .string_id(backend, StringTable::DefinitionTags, value)
                                .await?,
                        ),
                        None => None,
                    };
                    let rules_id = match record.rules.as_deref() {
                        Some(value) => {
                            Some(cache.string_id(backend, StringTable::Rules, value).await?)
                        }
                        None => None,
                    };
                    let term_tags_id = match record.term_tags.as_deref() {
                        Some(value) => Some(
                            cache
                                .string_id(backend, StringTable::TermTags, value)
                                .await?,
                        ),
                        None => None,
                    };
                    rows.push(TermRow {
                        dict_id,
                        term: record.term,
                        reading: record.reading,
                        def_tags_id,
                        rules_id,
                        score: record.score,
                        glossary_id,
                        sequence: record.sequence,
                        term_tags_id,
                    });
                }
                let written = writer::write_rows(backend, RowBatch::Terms(rows)).await?;
                stats.terms += written;
                written
            }
            BankKind::TermMeta => {
                let records = decode::decode_term_meta_bank(&entry.name, &entry.bytes)?;
                let rows = records
                    .into_iter()
                    .map(|record| TermMetaRow {
                        dict_id,
                        term: record.term,
                        mode: record.mode.as_str().to_string(),
                        reading: record.reading,
                        data: record.data.to_string(),
                    })
                    .collect();
                let written = writer::write_rows(backend, RowBatch::TermMeta(rows)).await?;
                stats.term_meta += written;
                written
            }
            BankKind::Tags => {
                let records = decode::decode_tag_bank(&entry.name, &entry.bytes)?;
                let rows = records
                    .into_iter()
                    .map(|record| TagRow {
                        dict_id,
                        name: record.name,
                        category: record.category,
                        sort_order: record.sort_order,
                        notes: record.notes,
                        score: record.score,
                    })
                    .collect();
                let written = writer::write_rows(backend, RowBatch::Tags(rows)).await?;
                stats.tags += written;
                written
            }
            BankKind::Kanji => {
                let records = decode::decode_kanji_bank(&entry.name, &entry.bytes)?;
                let rows = records
                    .into_iter()
                    .map(|record| KanjiRow {
                        dict_id,
                        kanji: record.kanji,
                        onyomi: record.onyomi,
                        kunyomi: record.kunyomi,
                        tags: record.tags,
                        meanings: record.meanings.to_string(),
                        stats: record.stats.to_string(),
                    })
                    .collect();
                let written = writer::write_rows(backend, RowBatch::Kanji(rows)).await?;
                stats.kanji += written;
                written
            }
            BankKind::KanjiMeta => {
                let records = decode::decode_kanji_meta_bank(&entry.name, &entry.bytes)?;
                let rows = records
                    .into_iter()
                    .map(|record| KanjiMetaRow {
                        dict_id,
                        kanji: record.kanji,
                        mode: "freq".to_string(),
                        data: record.data.to_string(),
                    })
                    .collect();
                let written = writer::write_rows(backend, RowBatch::KanjiMeta(rows)).await?;
                stats.kanji_meta += written;
                written
            }
        };
        debug!("processed {} ({written} rows)", entry.name);
    }
    Ok(stats)
}
