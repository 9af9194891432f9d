//! Tabular storage for planting records.
//!
//! The store hands back raw rows, header included; interpreting them is the
//! record layer's job.

mod sheets;

use async_trait::async_trait;

pub use sheets::SheetsRecordStore;

/// A row of cells as the spreadsheet reports them.
pub type Row = Vec<String>;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage request failed: {0}")]
    Transport(String),
    #[error("storage returned http status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("storage credentials missing: {0}")]
    MissingCredentials(&'static str),
    #[error("no sequence number follows {last}")]
    SequenceExhausted { last: u64 },
}

/// Read-everything / append-one access to a named sheet range.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn read_rows(&self) -> Result<Vec<Row>, StorageError>;
    async fn append_row(&self, row: Row) -> Result<(), StorageError>;
}
