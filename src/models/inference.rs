//! Scoring engine: probabilities, decisions and per-row explanations.

use anyhow::{bail, Result};
use tracing::{debug, info};

use crate::config::{THRESHOLD_CEIL, THRESHOLD_FLOOR};
use crate::explain::{self, DecisionReason};
use crate::models::{Explainer, RiskModel};
use crate::types::decision::ScoredApplicant;
use crate::types::table::ProcessedTable;

/// Applies a trained model and a decision threshold to processed
/// feature matrices.
pub struct ScoringEngine<M> {
    model: M,
    threshold: f64,
}

impl<M: RiskModel> ScoringEngine<M> {
    /// Engine using the threshold stored in the model bundle.
    pub fn new(model: M) -> Self {
        let threshold = model.default_threshold();
        Self { model, threshold }
    }

    /// Engine with a caller-chosen threshold.
    ///
    /// The cutoff is a policy knob exposed to the business user and must
    /// stay inside the same bounds the dashboard offers.
    pub fn with_threshold(model: M, threshold: f64) -> Result<Self> {
        if !(THRESHOLD_FLOOR..=THRESHOLD_CEIL).contains(&threshold) {
            bail!(
                "threshold {} outside allowed range [{}, {}]",
                threshold,
                THRESHOLD_FLOOR,
                THRESHOLD_CEIL
            );
        }
        Ok(Self { model, threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Predict default probabilities, one per row.
    pub fn predict(&self, features: &ProcessedTable) -> Result<Vec<f64>> {
        self.model.predict(features)
    }

    /// Score a batch: probability plus approve/deny outcome per row.
    pub fn score(&self, features: &ProcessedTable) -> Result<Vec<ScoredApplicant>> {
        let probabilities = self.model.predict(features)?;

        let scored: Vec<ScoredApplicant> = probabilities
            .into_iter()
            .enumerate()
            .map(|(row, probability)| ScoredApplicant::new(row, probability, self.threshold))
            .collect();

        let denied = scored.iter().filter(|s| !s.decision.is_approved()).count();
        info!(
            rows = scored.len(),
            denied = denied,
            threshold = self.threshold,
            "Batch scored"
        );

        Ok(scored)
    }
}

impl<M: RiskModel + Explainer> ScoringEngine<M> {
    /// Ranked business reasons behind one applicant's score.
    pub fn explain(
        &self,
        features: &ProcessedTable,
        row: usize,
        top_n: usize,
    ) -> Result<Vec<DecisionReason>> {
        let attributions = self.model.attributions(features, row)?;
        debug!(row = row, attributions = attributions.len(), "Row explained");
        Ok(explain::top_reasons(attributions, top_n))
    }
}
