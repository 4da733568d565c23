pub mod backend;
pub mod error;
pub mod remote;
pub mod retry;
pub mod rows;
pub mod schema;
pub mod sqlite;

pub use backend::{DictionaryRecord, StoreBackend, StringTable};
pub use error::StoreError;
pub use remote::RemoteBackend;
pub use retry::RetryPolicy;
pub use rows::{KanjiMetaRow, KanjiRow, RowBatch, TagRow, TermMetaRow, TermRow};
pub use sqlite::SqliteBackend;
