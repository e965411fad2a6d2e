//! Glimpse extraction crate - fixed ID-card field pattern.
//!
//! Turns recognized OCR text into `ExtractedFields` with a single regex
//! carrying two named groups (`name`, `dob`).

pub mod pattern;

pub use pattern::{FieldExtractor, ID_CARD_PATTERN};
