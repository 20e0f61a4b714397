//! Credit Risk Pipeline - Main Entry Point
//!
//! Scores an applicant CSV against the configured model bundle and
//! writes the decisions back out with an executive summary.

use anyhow::{bail, Context, Result};
use credit_risk_pipeline::{
    config::AppConfig, explain, models::ScoringEngine, preprocess::Preprocessor,
    report::{self, BatchReport}, schema::FeatureSchema, types::RawTable, LinearModel,
};
use tracing::{info, warn};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("credit_risk_pipeline=info".parse()?),
        )
        .init();

    info!("Starting Credit Risk Pipeline");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let Some(input_path) = args.get(1) else {
        bail!("usage: credit-risk-pipeline <applicants.csv> [decisions.csv] [row-to-explain]");
    };
    let output_path = args.get(2).map(|s| s.as_str()).unwrap_or("decisions.csv");
    let explain_row: Option<usize> = args.get(3).and_then(|s| s.parse().ok());

    // Load configuration
    let config = AppConfig::load()?;
    info!("Configuration loaded successfully");

    // Load the uploaded dataset
    let table = RawTable::from_csv_path(input_path)
        .context(format!("Failed to read dataset from {input_path}"))?;
    info!(
        rows = table.num_rows(),
        columns = table.num_columns(),
        "Dataset loaded"
    );

    // Preprocess into the model's feature matrix
    let preprocessor = Preprocessor::new(FeatureSchema::credit_default());
    info!(
        "Preprocessor initialized ({} features)",
        preprocessor.schema().feature_count()
    );
    let processed = preprocessor.transform(&table)?;

    // Load the model bundle and resolve the decision threshold
    let model = LinearModel::load(&config.model.bundle_path)?;
    let threshold = config.resolve_threshold(model.default_threshold());
    info!(
        "Decision rule: probability >= {:.2} -> NEGADO",
        threshold
    );
    let engine = ScoringEngine::with_threshold(model, threshold)?;

    // Score and summarize
    let scored = engine.score(&processed)?;
    let summary = BatchReport::build(&scored, &table, threshold, &config.business);
    summary.print_summary();

    report::write_decisions_csv(output_path, &table, &scored)
        .context(format!("Failed to write decisions to {output_path}"))?;
    info!(path = %output_path, "Decisions written");

    // Explain one applicant when asked
    if let Some(row) = explain_row {
        match scored.get(row) {
            Some(record) => {
                info!(
                    row = row,
                    probability = record.probability,
                    decision = %record.decision,
                    "Principais fatores que influenciaram a decisão:"
                );
                let reasons = engine.explain(&processed, row, config.scoring.top_reasons)?;
                for reason in &reasons {
                    info!("  - {}", reason.narrative);
                }
                info!("{}", explain::conclusion(record.decision));
            }
            None => warn!(
                row = row,
                rows = scored.len(),
                "Requested row not in the scored batch"
            ),
        }
    }

    Ok(())
}
