//! CSV Import Pipeline (pure stages)
//!
//! The three side-effect-free stages of the CSV import path:
//!
//! - [`csv`] - raw text to structured rows plus per-line errors
//! - [`convert`] - rows to a two-level candidate tree (category -> topics)
//! - [`merge`] - additive merge of a candidate tree into an existing tree
//!
//! Orchestration against storage (read baseline, expand to three levels,
//! synchronize) lives in `services::import_service`.

pub mod convert;
pub mod csv;
pub mod merge;

pub use convert::{rows_to_candidate_tree, CandidateCategory, CandidateTopic, CandidateTree};
pub use csv::{parse_topic_csv, CsvLineError, CsvRow, ParsedCsv};
pub use merge::merge_candidate;
