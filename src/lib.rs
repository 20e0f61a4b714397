//! Credit Risk Pipeline Library
//!
//! Scores loan applicants for credit-default risk: a deterministic
//! preprocessing pipeline turns uploaded applicant records into the
//! exact feature matrix the trained model expects, and a decision
//! pipeline turns risk probabilities into approve/deny outcomes with
//! ranked business-readable explanations.

pub mod config;
pub mod error;
pub mod explain;
pub mod models;
pub mod preprocess;
pub mod report;
pub mod schema;
pub mod types;

pub use config::AppConfig;
pub use error::SchemaError;
pub use models::{LinearModel, ScoringEngine};
pub use preprocess::Preprocessor;
pub use report::BatchReport;
pub use schema::FeatureSchema;
pub use types::{Cell, Decision, ProcessedTable, RawTable, ScoredApplicant};
