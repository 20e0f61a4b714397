//! Credit decision data structures

use serde::{Deserialize, Serialize};

/// Outcome of applying the decision threshold to a risk probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "APROVADO")]
    Aprovado,
    #[serde(rename = "NEGADO")]
    Negado,
}

impl Decision {
    /// Apply the credit policy: probability at or above the threshold is
    /// denied, anything below is approved.
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        if probability >= threshold {
            Decision::Negado
        } else {
            Decision::Aprovado
        }
    }

    /// Business-facing label, as shown on the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Aprovado => "APROVADO",
            Decision::Negado => "NEGADO",
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Decision::Aprovado)
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One scored applicant: row position in the uploaded dataset, the
/// model's default probability and the resulting decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredApplicant {
    /// Zero-based row index in the uploaded dataset.
    pub row: usize,

    /// Predicted probability of default (0.0 - 1.0).
    pub probability: f64,

    /// Approve/deny outcome under the active threshold.
    pub decision: Decision,
}

impl ScoredApplicant {
    pub fn new(row: usize, probability: f64, threshold: f64) -> Self {
        Self {
            row,
            probability,
            decision: Decision::from_probability(probability, threshold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_boundary() {
        // Exactly at the threshold is denied.
        assert_eq!(Decision::from_probability(0.35, 0.35), Decision::Negado);
        // Just below is approved.
        assert_eq!(
            Decision::from_probability(0.35 - 1e-9, 0.35),
            Decision::Aprovado
        );
        assert_eq!(Decision::from_probability(0.9, 0.35), Decision::Negado);
        assert_eq!(Decision::from_probability(0.1, 0.35), Decision::Aprovado);
    }

    #[test]
    fn test_decision_labels() {
        assert_eq!(Decision::Aprovado.label(), "APROVADO");
        assert_eq!(Decision::Negado.to_string(), "NEGADO");
    }

    #[test]
    fn test_scored_applicant_serialization() {
        let scored = ScoredApplicant::new(3, 0.72, 0.35);

        let json = serde_json::to_string(&scored).unwrap();
        assert!(json.contains("\"NEGADO\""));

        let deserialized: ScoredApplicant = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.row, 3);
        assert_eq!(deserialized.decision, Decision::Negado);
    }
}
