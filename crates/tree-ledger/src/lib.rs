pub mod config;
pub mod error;
pub mod identity;
pub mod names;
pub mod records;
pub mod storage;
pub mod telemetry;
