use jiten_store::{RowBatch, StoreBackend, StoreError};

/// Write one bank file's rows, split to the backend's batch limit.
///
/// With no limit (embedded backend) the whole file commits as one
/// transaction; with a limit (remote backend) each chunk is one network
/// write, retried by the backend itself.
pub async fn write_rows<B: StoreBackend>(
    backend: &mut B,
    batch: RowBatch,
) -> Result<usize, StoreError> {
    let total = batch.len();
    if total == 0 {
        return Ok(0);
    }
    match backend.batch_limit() {
        None => backend.insert_batch(batch).await?,
        Some(limit) => {
            for chunk in batch.chunks(limit.max(1)) {
                backend.insert_batch(chunk).await?;
            }
        }
    }
    Ok(total)
}
