pub mod error;
pub mod intern;
pub mod pipeline;
pub mod registrar;
pub mod writer;

pub use error::ImportError;
pub use pipeline::{ImportOutcome, ImportStats, import_archive, import_dir};
