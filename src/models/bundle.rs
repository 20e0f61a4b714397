//! Serialized model bundle loading.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::explain::Attribution;
use crate::models::{Explainer, RiskModel};
use crate::types::table::ProcessedTable;

/// A trained logistic scorer packaged with its decision threshold.
///
/// The bundle is exported at training time as JSON: coefficient per
/// feature, intercept, the training-set feature means used as the
/// attribution baseline, and the threshold picked during calibration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    name: String,
    feature_names: Vec<String>,
    weights: Vec<f64>,
    intercept: f64,
    baseline: Vec<f64>,
    threshold: f64,
}

impl LinearModel {
    pub fn new(
        name: String,
        feature_names: Vec<String>,
        weights: Vec<f64>,
        intercept: f64,
        baseline: Vec<f64>,
        threshold: f64,
    ) -> Result<Self> {
        let model = Self {
            name,
            feature_names,
            weights,
            intercept,
            baseline,
            threshold,
        };
        model.validate()?;
        Ok(model)
    }

    /// Load a model bundle from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path)
            .context(format!("Failed to read model bundle from {:?}", path))?;
        let model: LinearModel = serde_json::from_str(&contents)
            .context(format!("Failed to parse model bundle from {:?}", path))?;
        model.validate()?;

        info!(
            model = %model.name,
            path = %path.display(),
            features = model.feature_names.len(),
            threshold = model.threshold,
            "Model bundle loaded"
        );

        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        if self.feature_names.is_empty() {
            bail!("model bundle declares no features");
        }
        if self.weights.len() != self.feature_names.len() {
            bail!(
                "model bundle has {} weights for {} features",
                self.weights.len(),
                self.feature_names.len()
            );
        }
        if self.baseline.len() != self.feature_names.len() {
            bail!(
                "model bundle has {} baseline values for {} features",
                self.baseline.len(),
                self.feature_names.len()
            );
        }
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            bail!("stored threshold {} is outside (0, 1)", self.threshold);
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Score one feature vector.
    fn score_row(&self, row: &[f64]) -> f64 {
        let logit: f64 = self
            .weights
            .iter()
            .zip(row)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;
        sigmoid(logit)
    }

    /// The processed table must match the layout the model was trained
    /// on; a mismatch means the preprocessing and the bundle are from
    /// different model versions.
    fn check_layout(&self, features: &ProcessedTable) -> Result<()> {
        if features.feature_names() != self.feature_names.as_slice() {
            bail!(
                "feature layout mismatch: model '{}' expects {:?}, got {:?}",
                self.name,
                self.feature_names,
                features.feature_names()
            );
        }
        Ok(())
    }
}

impl RiskModel for LinearModel {
    fn predict(&self, features: &ProcessedTable) -> Result<Vec<f64>> {
        self.check_layout(features)?;
        Ok(features.rows().iter().map(|r| self.score_row(r)).collect())
    }

    fn default_threshold(&self) -> f64 {
        self.threshold
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}

impl Explainer for LinearModel {
    /// Linear attribution: each feature contributes its coefficient
    /// times the distance from the training baseline.
    fn attributions(&self, features: &ProcessedTable, row: usize) -> Result<Vec<Attribution>> {
        self.check_layout(features)?;
        let Some(values) = features.row(row) else {
            bail!(
                "row {} out of bounds for table with {} rows",
                row,
                features.num_rows()
            );
        };

        Ok(self
            .feature_names
            .iter()
            .zip(self.weights.iter())
            .zip(values.iter().zip(self.baseline.iter()))
            .map(|((feature, weight), (value, base))| {
                Attribution::new(feature.clone(), weight * (value - base))
            })
            .collect())
    }
}

fn sigmoid(logit: f64) -> f64 {
    1.0 / (1.0 + (-logit).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_feature_model() -> LinearModel {
        LinearModel::new(
            "test".to_string(),
            vec!["A".to_string(), "B".to_string()],
            vec![1.0, -2.0],
            0.0,
            vec![0.0, 0.0],
            0.5,
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_mismatched_weights() {
        let result = LinearModel::new(
            "bad".to_string(),
            vec!["A".to_string()],
            vec![1.0, 2.0],
            0.0,
            vec![0.0],
            0.5,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_threshold_outside_unit_interval() {
        let result = LinearModel::new(
            "bad".to_string(),
            vec!["A".to_string()],
            vec![1.0],
            0.0,
            vec![0.0],
            1.0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_predict_probabilities() {
        let model = two_feature_model();
        let table = ProcessedTable::new(
            vec!["A".to_string(), "B".to_string()],
            vec![vec![0.0, 0.0], vec![10.0, 0.0], vec![0.0, 10.0]],
        );

        let probabilities = model.predict(&table).unwrap();
        assert_eq!(probabilities.len(), 3);
        // Zero logit is exactly 0.5; large positive logit approaches 1,
        // large negative approaches 0.
        assert!((probabilities[0] - 0.5).abs() < 1e-12);
        assert!(probabilities[1] > 0.99);
        assert!(probabilities[2] < 0.01);
        for p in probabilities {
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_predict_rejects_wrong_layout() {
        let model = two_feature_model();
        let table = ProcessedTable::new(
            vec!["B".to_string(), "A".to_string()],
            vec![vec![0.0, 0.0]],
        );
        assert!(model.predict(&table).is_err());
    }

    #[test]
    fn test_attribution_signs_follow_weights() {
        let model = two_feature_model();
        let table = ProcessedTable::new(
            vec!["A".to_string(), "B".to_string()],
            vec![vec![2.0, 3.0]],
        );

        let attributions = model.attributions(&table, 0).unwrap();
        assert_eq!(attributions.len(), 2);
        assert_eq!(attributions[0].feature, "A");
        assert!((attributions[0].value - 2.0).abs() < 1e-12);
        assert!((attributions[1].value + 6.0).abs() < 1e-12);
        assert!(attributions[0].increases_risk());
        assert!(!attributions[1].increases_risk());
    }

    #[test]
    fn test_attribution_row_out_of_bounds() {
        let model = two_feature_model();
        let table = ProcessedTable::new(vec!["A".to_string(), "B".to_string()], vec![]);
        assert!(model.attributions(&table, 0).is_err());
    }

    #[test]
    fn test_bundle_json_round_trip() {
        let model = two_feature_model();
        let json = serde_json::to_string(&model).unwrap();
        let restored: LinearModel = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.name(), "test");
        assert_eq!(restored.default_threshold(), 0.5);
    }
}
