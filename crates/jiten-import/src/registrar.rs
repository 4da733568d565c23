use jiten_store::{DictionaryRecord, StoreBackend, StoreError};
use jiten_types::index::DictionaryIndex;

/// Idempotency gate: returns `None` when this `(title, revision)` is already
/// installed, otherwise registers the dictionary and returns its id.
pub async fn register<B: StoreBackend>(
    backend: &mut B,
    index: &DictionaryIndex,
    bundled: bool,
) -> Result<Option<i64>, StoreError> {
    if backend
        .dictionary_exists(&index.title, &index.revision)
        .await?
    {
        tracing::info!(
            "{} revision {} is already installed, skipping",
            index.title,
            index.revision
        );
        return Ok(None);
    }

    let record = DictionaryRecord {
        title: index.title.clone(),
        revision: index.revision.clone(),
        format: index.format_version(),
        author: index.author.clone(),
        url: index.url.clone(),
        description: index.description.clone(),
        attribution: index.attribution.clone(),
        sequenced: index.sequenced.unwrap_or(false),
        frequency_mode: index.frequency_mode.clone(),
        is_bundled: bundled,
    };
    let id = backend.register_dictionary(&record).await?;
    tracing::info!(
        "registered {} revision {} as dictionary {id}",
        index.title,
        index.revision
    );
    Ok(Some(id))
}
