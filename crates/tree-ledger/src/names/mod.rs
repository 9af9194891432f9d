//! Name handling shared by record writes and searches.
//!
//! Names arrive in whatever shape people type them. Every comparison goes through
//! [`normalize`], which is pure and total over strings.

mod display;
mod normalizer;

pub use display::{compose_full_name, display_name};
pub use normalizer::normalize;
