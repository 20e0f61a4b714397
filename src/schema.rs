//! Feature schema for the credit-default risk model.
//!
//! Single source of truth for which columns the trained model consumes
//! and how they are categorized. The layout is frozen together with the
//! model bundle: any change here is a model-compatibility-breaking change
//! and must be versioned alongside a retrained bundle.

use std::collections::BTreeSet;

/// Feature names the model expects, in the exact input order used
/// during training.
pub const MODEL_FEATURES: [&str; 13] = [
    "EXT_SOURCE_1",
    "EXT_SOURCE_2",
    "EXT_SOURCE_3",
    "AMT_CREDIT",
    "AMT_ANNUITY",
    "PAYMENT_RATIO_MEAN",
    "POS_CNT_INSTALMENT_FUTURE_MEAN",
    "INST_NUM_INSTALMENT_NUMBER_COUNT",
    "PREV_CNT_PAYMENT_MEAN",
    "PREV_REFUSAL_RATE",
    "DAYS_EMPLOYED",
    "OWN_CAR_AGE",
    "CODE_GENDER",
];

/// Features that carry a frozen categorical encoding rather than plain
/// numeric coercion.
pub const CATEGORICAL_FEATURES: [&str; 1] = ["CODE_GENDER"];

/// Immutable declaration of the model's feature set.
///
/// Constructed once at startup and passed explicitly into the
/// preprocessor; it holds no mutable state and is safe to share across
/// threads.
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    model_features: Vec<String>,
    categorical_features: BTreeSet<String>,
}

impl FeatureSchema {
    /// Schema of the current credit-default model bundle.
    pub fn credit_default() -> Self {
        Self {
            model_features: MODEL_FEATURES.iter().map(|f| f.to_string()).collect(),
            categorical_features: CATEGORICAL_FEATURES
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }

    /// Ordered feature names the model consumes.
    pub fn model_features(&self) -> &[String] {
        &self.model_features
    }

    /// Features requiring the frozen categorical encoding.
    pub fn categorical_features(&self) -> &BTreeSet<String> {
        &self.categorical_features
    }

    /// Derived set of plain numeric features (order-agnostic).
    pub fn numerical_features(&self) -> BTreeSet<&str> {
        self.model_features
            .iter()
            .map(String::as_str)
            .filter(|f| !self.categorical_features.contains(*f))
            .collect()
    }

    pub fn is_categorical(&self, feature: &str) -> bool {
        self.categorical_features.contains(feature)
    }

    /// Number of features the model consumes.
    pub fn feature_count(&self) -> usize {
        self.model_features.len()
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::credit_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        let schema = FeatureSchema::credit_default();
        assert_eq!(schema.feature_count(), 13);
        assert_eq!(schema.model_features().len(), 13);
    }

    #[test]
    fn test_feature_order_is_model_order() {
        let schema = FeatureSchema::credit_default();
        assert_eq!(schema.model_features()[0], "EXT_SOURCE_1");
        assert_eq!(schema.model_features()[12], "CODE_GENDER");
    }

    #[test]
    fn test_partition_invariant() {
        let schema = FeatureSchema::credit_default();
        let numerical = schema.numerical_features();

        // Categorical and numerical are disjoint and together cover
        // every model feature.
        for feature in schema.model_features() {
            let in_categorical = schema.is_categorical(feature);
            let in_numerical = numerical.contains(feature.as_str());
            assert!(in_categorical != in_numerical, "feature {feature} not partitioned");
        }
        assert_eq!(
            numerical.len() + schema.categorical_features().len(),
            schema.feature_count()
        );
    }

    #[test]
    fn test_categorical_subset_of_model_features() {
        let schema = FeatureSchema::credit_default();
        for feature in schema.categorical_features() {
            assert!(schema.model_features().contains(feature));
        }
    }
}
