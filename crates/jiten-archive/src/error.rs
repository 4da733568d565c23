use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Archive not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive has no index.json")]
    MissingIndex,

    #[error("Malformed JSON in {entry}: {source}")]
    Json {
        entry: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Bad record in {entry}[{index}]: {reason}")]
    Record {
        entry: String,
        index: usize,
        reason: String,
    },
}
