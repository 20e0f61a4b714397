//! Executive batch summary and decision export.
//!
//! Aggregates a scored batch into the figures the business side reads:
//! approval counts, the financial projection of the decisions and the
//! per-gender decision breakdown. The financial model is the one used
//! on the dashboard: every approval books one average ticket of
//! revenue, and a configured fraction of approvals is expected to
//! default at the average loss.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::config::BusinessConfig;
use crate::types::decision::ScoredApplicant;
use crate::types::table::{Cell, RawTable};

/// Financial projection of a scored batch (R$).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// Revenue booked by approvals
    pub gross_revenue: f64,
    /// Expected loss from approvals that will default
    pub estimated_loss: f64,
    /// Gross revenue minus expected loss
    pub net_profit: f64,
    /// Revenue declined along with the denied applicants
    pub uncaptured_revenue: f64,
}

/// Decision counts for one gender group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenderDecisionCount {
    pub label: String,
    pub approved: u64,
    pub denied: u64,
}

/// Aggregate view of one scored batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Unique identifier of this scoring run
    pub batch_id: String,
    pub generated_at: DateTime<Utc>,
    /// Threshold the batch was decided under
    pub threshold: f64,
    pub total_applicants: usize,
    pub approved: usize,
    pub denied: usize,
    pub approval_rate: f64,
    pub financials: FinancialSummary,
    pub by_gender: Vec<GenderDecisionCount>,
}

impl BatchReport {
    /// Summarize a scored batch.
    ///
    /// The gender breakdown reads the raw gender column, so values the
    /// model never saw as "M"/"F" are grouped as unreported rather than
    /// shown as an encoded number.
    pub fn build(
        scored: &[ScoredApplicant],
        raw: &RawTable,
        threshold: f64,
        params: &BusinessConfig,
    ) -> Self {
        let total = scored.len();
        let approved = scored.iter().filter(|s| s.decision.is_approved()).count();
        let denied = total - approved;

        let gross_revenue = approved as f64 * params.avg_ticket;
        let estimated_loss =
            approved as f64 * params.avg_default_loss * params.expected_default_rate;

        let mut by_gender = [
            GenderDecisionCount {
                label: "Homem".to_string(),
                approved: 0,
                denied: 0,
            },
            GenderDecisionCount {
                label: "Mulher".to_string(),
                approved: 0,
                denied: 0,
            },
            GenderDecisionCount {
                label: "Não informado".to_string(),
                approved: 0,
                denied: 0,
            },
        ];
        let gender_column = raw.column("CODE_GENDER");
        for record in scored {
            let group = match gender_column.and_then(|cells| cells.get(record.row)) {
                Some(Cell::Text(s)) if s == "M" => &mut by_gender[0],
                Some(Cell::Text(s)) if s == "F" => &mut by_gender[1],
                _ => &mut by_gender[2],
            };
            if record.decision.is_approved() {
                group.approved += 1;
            } else {
                group.denied += 1;
            }
        }

        Self {
            batch_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            threshold,
            total_applicants: total,
            approved,
            denied,
            approval_rate: if total > 0 {
                approved as f64 / total as f64
            } else {
                0.0
            },
            financials: FinancialSummary {
                gross_revenue,
                estimated_loss,
                net_profit: gross_revenue - estimated_loss,
                uncaptured_revenue: denied as f64 * params.avg_ticket,
            },
            by_gender: by_gender
                .into_iter()
                .filter(|g| g.approved + g.denied > 0)
                .collect(),
        }
    }

    /// Log the executive summary.
    pub fn print_summary(&self) {
        info!("═══════════════════════════════════════════════════");
        info!("  CREDIT RISK SCORING - EXECUTIVE SUMMARY");
        info!("═══════════════════════════════════════════════════");
        info!(
            "  Applicants: {:>6}  |  Approved: {:>6}  |  Denied: {:>6}",
            self.total_applicants, self.approved, self.denied
        );
        info!(
            "  Approval rate: {:>5.1}%  |  Threshold: {:.2}",
            self.approval_rate * 100.0,
            self.threshold
        );
        info!(
            "  Gross revenue: R$ {:>12.0}  |  Estimated loss: R$ {:>12.0}",
            self.financials.gross_revenue, self.financials.estimated_loss
        );
        info!(
            "  Net profit:    R$ {:>12.0}  |  Uncaptured:     R$ {:>12.0}",
            self.financials.net_profit, self.financials.uncaptured_revenue
        );
        for group in &self.by_gender {
            info!(
                "  {:>14}: {:>5} aprovados / {:>5} negados",
                group.label, group.approved, group.denied
            );
        }
        info!("═══════════════════════════════════════════════════");
    }
}

/// Write the uploaded dataset back out with the prediction columns
/// appended, as shown on the dashboard's result table.
pub fn write_decisions_csv<P: AsRef<Path>>(
    path: P,
    raw: &RawTable,
    scored: &[ScoredApplicant],
) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .context(format!("Failed to create decisions file {:?}", path))?;

    let mut header: Vec<&str> = raw.column_names().collect();
    header.push("PROB_DEFAULT");
    header.push("DECISION");
    writer.write_record(&header)?;

    let columns: Vec<&[Cell]> = raw
        .column_names()
        .map(|name| raw.column(name).unwrap_or(&[]))
        .collect();

    for record in scored {
        let mut fields: Vec<String> = columns
            .iter()
            .map(|cells| match cells.get(record.row) {
                Some(Cell::Number(v)) => v.to_string(),
                Some(Cell::Text(s)) => s.clone(),
                Some(Cell::Missing) | None => String::new(),
            })
            .collect();
        fields.push(record.probability.to_string());
        fields.push(record.decision.label().to_string());
        writer.write_record(&fields)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::decision::Decision;

    fn scored_batch() -> Vec<ScoredApplicant> {
        vec![
            ScoredApplicant::new(0, 0.1, 0.35),
            ScoredApplicant::new(1, 0.2, 0.35),
            ScoredApplicant::new(2, 0.9, 0.35),
            ScoredApplicant::new(3, 0.4, 0.35),
        ]
    }

    fn raw_with_genders() -> RawTable {
        let mut table = RawTable::new();
        table.insert_column(
            "CODE_GENDER",
            vec![
                Cell::from("M"),
                Cell::from("F"),
                Cell::from("F"),
                Cell::from("X"),
            ],
        );
        table
    }

    #[test]
    fn test_financial_projection() {
        let params = BusinessConfig::default();
        let report = BatchReport::build(&scored_batch(), &raw_with_genders(), 0.35, &params);

        // 2 approved, 2 denied under threshold 0.35.
        assert_eq!(report.total_applicants, 4);
        assert_eq!(report.approved, 2);
        assert_eq!(report.denied, 2);
        assert_eq!(report.approval_rate, 0.5);
        assert_eq!(report.financials.gross_revenue, 2.0 * 15_000.0);
        assert_eq!(report.financials.estimated_loss, 2.0 * 12_000.0 * 0.25);
        assert_eq!(report.financials.net_profit, 30_000.0 - 6_000.0);
        assert_eq!(report.financials.uncaptured_revenue, 2.0 * 15_000.0);
    }

    #[test]
    fn test_gender_breakdown_from_raw_values() {
        let params = BusinessConfig::default();
        let report = BatchReport::build(&scored_batch(), &raw_with_genders(), 0.35, &params);

        let men = report.by_gender.iter().find(|g| g.label == "Homem").unwrap();
        assert_eq!((men.approved, men.denied), (1, 0));

        let women = report
            .by_gender
            .iter()
            .find(|g| g.label == "Mulher")
            .unwrap();
        assert_eq!((women.approved, women.denied), (1, 1));

        let unreported = report
            .by_gender
            .iter()
            .find(|g| g.label == "Não informado")
            .unwrap();
        assert_eq!((unreported.approved, unreported.denied), (0, 1));
    }

    #[test]
    fn test_empty_batch() {
        let params = BusinessConfig::default();
        let report = BatchReport::build(&[], &RawTable::new(), 0.35, &params);

        assert_eq!(report.total_applicants, 0);
        assert_eq!(report.approval_rate, 0.0);
        assert_eq!(report.financials.net_profit, 0.0);
        assert!(report.by_gender.is_empty());
    }

    #[test]
    fn test_write_decisions_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decisions.csv");

        let mut raw = raw_with_genders();
        raw.insert_column(
            "AMT_CREDIT",
            vec![
                Cell::from(1000.0),
                Cell::from(2000.0),
                Cell::Missing,
                Cell::from("abc"),
            ],
        );

        write_decisions_csv(&path, &raw, &scored_batch()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next().unwrap(), "CODE_GENDER,AMT_CREDIT,PROB_DEFAULT,DECISION");
        assert!(contents.contains("M,1000,0.1,APROVADO"));
        assert!(contents.contains("F,,0.9,NEGADO"));

        // One record per scored row.
        assert_eq!(contents.lines().count(), 5);
        let denied_line = contents
            .lines()
            .find(|l| l.starts_with("X"))
            .unwrap();
        assert_eq!(
            denied_line.split(',').last().unwrap(),
            Decision::Negado.label()
        );
    }
}
