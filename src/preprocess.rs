//! Preprocessing of raw applicant records into model input.
//!
//! Transforms an uploaded dataset into the exact numeric feature matrix
//! the trained bundle expects. The transformation is deterministic and
//! matches the preprocessing used when the model was trained: the
//! encoding and fallback values below are frozen business rules, and
//! changing any of them would shift the model's input distribution and
//! invalidate its calibration.

use std::collections::BTreeSet;

use crate::error::SchemaError;
use crate::schema::FeatureSchema;
use crate::types::table::{Cell, ProcessedTable, RawTable};

/// Validates and transforms uploaded datasets against a feature schema.
///
/// Stateless apart from the immutable schema; calls are independent and
/// safe to run in parallel over separate tables.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    schema: FeatureSchema,
}

impl Preprocessor {
    pub fn new(schema: FeatureSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Check that every required column is present.
    ///
    /// Presence is the only rule: types, ranges and missing values are
    /// the transform's concern, not validation's.
    pub fn validate(&self, table: &RawTable) -> Result<(), SchemaError> {
        let missing: BTreeSet<String> = self
            .schema
            .model_features()
            .iter()
            .filter(|feature| !table.has_column(feature))
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::new(missing))
        }
    }

    /// Produce the model's feature matrix from an uploaded dataset.
    ///
    /// Validates first, then projects the required columns in model
    /// order, applies the frozen gender encoding, coerces everything
    /// else to numbers and fills anything unusable with the frozen
    /// fallback. Anomalous cells never fail the batch; they are silently
    /// normalized, so the output row count always matches the input.
    pub fn transform(&self, table: &RawTable) -> Result<ProcessedTable, SchemaError> {
        self.validate(table)?;

        let features = self.schema.model_features();
        let columns: Vec<(&[Cell], bool)> = features
            .iter()
            .map(|feature| {
                // Presence was just validated.
                let cells = table.column(feature).unwrap_or(&[]);
                (cells, self.schema.is_categorical(feature))
            })
            .collect();

        let rows = (0..table.num_rows())
            .map(|row| {
                columns
                    .iter()
                    .map(|(cells, categorical)| match cells.get(row) {
                        Some(cell) if *categorical => encode_gender(cell),
                        Some(cell) => coerce_numeric(cell),
                        None if *categorical => encode_gender(&Cell::Missing),
                        None => coerce_numeric(&Cell::Missing),
                    })
                    .collect()
            })
            .collect();

        Ok(ProcessedTable::new(features.to_vec(), rows))
    }
}

/// Frozen encoding for the gender code: `"M"` is 1, `"F"` is 0 and
/// everything unrecognized is -1. The numeric codes themselves pass
/// through, so an already-encoded column is a fixpoint.
fn encode_gender(cell: &Cell) -> f64 {
    match cell {
        Cell::Text(s) if s == "M" => 1.0,
        Cell::Text(_) => -1.0,
        Cell::Number(v) if *v == 1.0 || *v == 0.0 || *v == -1.0 => *v,
        Cell::Number(_) => -1.0,
        Cell::Missing => -1.0,
    }
}

/// Total coercion from a raw cell to a model input value. Unparseable,
/// missing and non-finite values all fall back to 0.
fn coerce_numeric(cell: &Cell) -> f64 {
    let value = match cell {
        Cell::Number(v) => *v,
        Cell::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Cell::Missing => 0.0,
    };
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
