use jiten_archive::ArchiveError;
use jiten_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
