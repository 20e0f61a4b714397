//! Core data types for the scoring pipeline

pub mod decision;
pub mod table;

pub use decision::{Decision, ScoredApplicant};
pub use table::{Cell, ProcessedTable, RawTable};
