//! Planting records: request validation, name-matched search, numbered appends and
//! the HTTP surface over them.

pub mod domain;
pub mod export;
pub mod router;
pub mod service;

pub use domain::{
    next_sequence_number, NewRecord, PlantingRecord, SearchQuery, SearchResults, StoredRecord,
    ValidationError, DEFAULT_ACTIVITY,
};
pub use export::write_csv;
pub use router::record_router;
pub use service::{RecordService, RecordServiceError};
