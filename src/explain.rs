//! Business-facing explanations for individual decisions.
//!
//! Consumes signed per-feature attributions (positive values push the
//! risk up, negative values pull it down) and turns them into the ranked
//! narrative shown next to each decision. The feature-to-narrative copy
//! is product text reviewed with the credit team; keep it in sync with
//! the schema when the model is retrained.

use serde::{Deserialize, Serialize};

use crate::types::decision::Decision;

/// Default number of reasons presented per decision.
pub const DEFAULT_TOP_REASONS: usize = 8;

/// Signed contribution of one feature to one prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    pub feature: String,
    pub value: f64,
}

impl Attribution {
    pub fn new<S: Into<String>>(feature: S, value: f64) -> Self {
        Self {
            feature: feature.into(),
            value,
        }
    }

    /// Whether this feature pushed the prediction toward denial.
    pub fn increases_risk(&self) -> bool {
        self.value > 0.0
    }
}

/// One ranked reason backing a decision, ready for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionReason {
    pub feature: String,
    pub attribution: f64,
    pub narrative: String,
}

/// Business copy for each model feature.
pub fn business_reason(feature: &str) -> Option<&'static str> {
    let text = match feature {
        "PAYMENT_RATIO_MEAN" => "Comprometimento da renda influenciou a decisão de risco",
        "POS_CNT_INSTALMENT_FUTURE_MEAN" => {
            "Quantidade de parcelamentos futuros impactou o risco"
        }
        "EXT_SOURCE_3" => "Score externo teve influência relevante na avaliação do risco",
        "EXT_SOURCE_2" => "Score externo contribuiu para a decisão de crédito",
        "EXT_SOURCE_1" => "Comportamento capturado por score externo afetou o risco",
        "AMT_CREDIT" => "Valor do crédito solicitado impactou a decisão",
        "AMT_ANNUITY" => "Valor da parcela mensal influenciou o risco",
        "DAYS_EMPLOYED" => "Histórico de vínculo empregatício impactou a decisão",
        "OWN_CAR_AGE" => "Indicador patrimonial contribuiu para avaliação do risco",
        "INST_NUM_INSTALMENT_NUMBER_COUNT" => {
            "Ausência de informações em contratos parcelados anteriores influenciou a decisão"
        }
        "PREV_CNT_PAYMENT_MEAN" => {
            "Comportamento médio de pagamentos em contratos anteriores impactou o risco"
        }
        "PREV_REFUSAL_RATE" => "Histórico de recusas anteriores influenciou a avaliação do risco",
        "CODE_GENDER" => {
            "Padrões estatísticos associados ao perfil demográfico influenciaram a decisão"
        }
        _ => return None,
    };
    Some(text)
}

/// Full sentence for one attribution: business copy plus the direction
/// of influence.
pub fn describe(feature: &str, attribution: f64) -> String {
    let base = match business_reason(feature) {
        Some(text) => text.to_string(),
        None => format!("O comportamento da variável {feature} influenciou a decisão"),
    };
    let direction = if attribution > 0.0 {
        "aumentando o risco"
    } else {
        "reduzindo o risco"
    };
    format!("{base}, {direction}.")
}

/// Rank attributions by absolute impact and keep the `n` strongest.
pub fn top_reasons(mut attributions: Vec<Attribution>, n: usize) -> Vec<DecisionReason> {
    attributions.sort_by(|a, b| {
        b.value
            .abs()
            .partial_cmp(&a.value.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    attributions
        .into_iter()
        .take(n)
        .map(|a| DecisionReason {
            narrative: describe(&a.feature, a.value),
            feature: a.feature,
            attribution: a.value,
        })
        .collect()
}

/// Closing narrative shown under the ranked reasons.
pub fn conclusion(decision: Decision) -> &'static str {
    match decision {
        Decision::Negado => {
            "A solicitação foi negada porque a combinação dos principais fatores \
             indicou risco elevado de inadimplência, especialmente relacionados a \
             capacidade de pagamento, histórico de crédito e comportamento financeiro."
        }
        Decision::Aprovado => {
            "A solicitação foi aprovada porque os principais indicadores apontam \
             capacidade de pagamento adequada, histórico favorável e risco controlado \
             segundo os critérios do modelo."
        }
    }
}
