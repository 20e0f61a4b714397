//! Test Applicant Generator
//!
//! Generates sample applicant CSV files for pipeline testing: a mix of
//! well-behaved and risky profiles, with an optional share of malformed
//! cells to exercise the frozen coercion rules.

use anyhow::Result;
use rand::Rng;
use tracing::info;

use credit_risk_pipeline::schema::MODEL_FEATURES;

/// Applicant row generator for testing
struct ApplicantGenerator {
    rng: rand::rngs::ThreadRng,
    counter: u64,
}

impl ApplicantGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            counter: 0,
        }
    }

    /// Generate a low-risk applicant profile
    fn generate_good(&mut self) -> Vec<String> {
        self.counter += 1;
        let mut row = vec![format!("{:06}", 100_000 + self.counter)];

        for feature in MODEL_FEATURES {
            let value = match feature {
                "EXT_SOURCE_1" | "EXT_SOURCE_2" | "EXT_SOURCE_3" => {
                    self.rng.gen_range(0.55..0.95).to_string()
                }
                "AMT_CREDIT" => self.rng.gen_range(50_000.0..300_000.0).to_string(),
                "AMT_ANNUITY" => self.rng.gen_range(5_000.0..20_000.0).to_string(),
                "PAYMENT_RATIO_MEAN" => self.rng.gen_range(0.9..1.1).to_string(),
                "POS_CNT_INSTALMENT_FUTURE_MEAN" => self.rng.gen_range(2.0..8.0).to_string(),
                "INST_NUM_INSTALMENT_NUMBER_COUNT" => {
                    self.rng.gen_range(10..60).to_string()
                }
                "PREV_CNT_PAYMENT_MEAN" => self.rng.gen_range(6.0..24.0).to_string(),
                "PREV_REFUSAL_RATE" => self.rng.gen_range(0.0..0.1).to_string(),
                "DAYS_EMPLOYED" => self.rng.gen_range(-12_000..-1_000).to_string(),
                "OWN_CAR_AGE" => self.rng.gen_range(0..12).to_string(),
                "CODE_GENDER" => self.random_choice(&["M", "F"]).to_string(),
                _ => "0".to_string(),
            };
            row.push(value);
        }
        row
    }

    /// Generate a high-risk applicant profile
    fn generate_risky(&mut self) -> Vec<String> {
        self.counter += 1;
        let mut row = vec![format!("{:06}", 100_000 + self.counter)];

        for feature in MODEL_FEATURES {
            let value = match feature {
                "EXT_SOURCE_1" | "EXT_SOURCE_2" | "EXT_SOURCE_3" => {
                    self.rng.gen_range(0.05..0.35).to_string()
                }
                "AMT_CREDIT" => self.rng.gen_range(300_000.0..1_000_000.0).to_string(),
                "AMT_ANNUITY" => self.rng.gen_range(25_000.0..60_000.0).to_string(),
                "PAYMENT_RATIO_MEAN" => self.rng.gen_range(0.3..0.8).to_string(),
                "POS_CNT_INSTALMENT_FUTURE_MEAN" => self.rng.gen_range(10.0..30.0).to_string(),
                "INST_NUM_INSTALMENT_NUMBER_COUNT" => self.rng.gen_range(0..8).to_string(),
                "PREV_CNT_PAYMENT_MEAN" => self.rng.gen_range(0.0..6.0).to_string(),
                "PREV_REFUSAL_RATE" => self.rng.gen_range(0.3..0.9).to_string(),
                "DAYS_EMPLOYED" => self.rng.gen_range(-800..0).to_string(),
                "OWN_CAR_AGE" => self.rng.gen_range(15..40).to_string(),
                "CODE_GENDER" => self.random_choice(&["M", "F"]).to_string(),
                _ => "0".to_string(),
            };
            row.push(value);
        }
        row
    }

    /// Corrupt a few cells to exercise the silent coercion fallbacks
    fn corrupt(&mut self, row: &mut [String]) {
        let cells = row.len();
        for _ in 0..self.rng.gen_range(1..=3) {
            let index = self.rng.gen_range(1..cells);
            row[index] = self
                .random_choice(&["", "n/a", "unknown", "###", "XNA"])
                .to_string();
        }
    }

    fn random_choice<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[self.rng.gen_range(0..choices.len())]
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("test_generator=info".parse()?),
        )
        .init();

    info!("Starting Test Applicant Generator");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let output = args.get(1).map(|s| s.as_str()).unwrap_or("applicants.csv");
    let count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);
    let risky_rate: f64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(0.2);
    let malformed_rate: f64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(0.05);

    info!(
        output = %output,
        count = count,
        risky_rate = risky_rate,
        malformed_rate = malformed_rate,
        "Configuration loaded"
    );

    let mut writer = csv::Writer::from_path(output)?;

    // Header: an id column the preprocessor will drop, then the model features
    let mut header = vec!["SK_ID_CURR"];
    header.extend(MODEL_FEATURES);
    writer.write_record(&header)?;

    let mut generator = ApplicantGenerator::new();
    let mut rng = rand::thread_rng();

    let mut risky_count = 0;
    let mut malformed_count = 0;

    for _ in 0..count {
        let mut row = if rng.gen_bool(risky_rate) {
            risky_count += 1;
            generator.generate_risky()
        } else {
            generator.generate_good()
        };

        if rng.gen_bool(malformed_rate) {
            malformed_count += 1;
            generator.corrupt(&mut row);
        }

        writer.write_record(&row)?;
    }

    writer.flush()?;

    info!(
        "Completed! Wrote {} applicants ({} risky, {} with malformed cells) to {}",
        count, risky_count, malformed_count, output
    );

    Ok(())
}
