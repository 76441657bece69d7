//! CSV batch processing.
//!
//! Each input row is one request; each output row reports the outcome for the
//! input row with the same number. A bad row is reported in the output and does
//! not stop the batch.

use crate::clock::Clock;
use crate::dispatch::calculate;
use crate::{CalculatorKind, Config, Error, FormFields, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// A row in the CSV input
#[derive(Debug, Deserialize)]
struct InputRow {
    #[serde(rename = "type")]
    calculator: String,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    age: Option<i64>,
    #[serde(default)]
    weight: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
    #[serde(default)]
    activity: Option<String>,
    #[serde(default)]
    goal: Option<String>,
    #[serde(default)]
    lmp: Option<String>,
    #[serde(default)]
    cycle_length: Option<i64>,
}

impl From<InputRow> for FormFields {
    fn from(row: InputRow) -> Self {
        FormFields {
            gender: row.gender,
            age: row.age,
            weight: row.weight,
            height: row.height,
            activity: row.activity,
            goal: row.goal,
            lmp: row.lmp,
            cycle_length: row.cycle_length,
        }
    }
}

/// Column names of the CSV output, matching [`OutputRow`]
const OUTPUT_HEADER: [&str; 5] = ["row", "type", "status", "headline", "error"];

/// A row in the CSV output
#[derive(Debug, Serialize)]
struct OutputRow {
    row: usize,
    #[serde(rename = "type")]
    calculator: String,
    status: &'static str,
    headline: Option<String>,
    error: Option<String>,
}

/// Counts for a finished batch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Run every row of `input` through its calculator and write outcomes to `output`.
///
/// Output mode gating does not apply; batches are run by the operator.
pub fn process<R: Read, W: Write>(
    input: R,
    output: W,
    clock: &dyn Clock,
    config: &Config,
) -> Result<BatchSummary> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let mut writer = csv::Writer::from_writer(output);
    let mut summary = BatchSummary::default();

    for (index, row) in reader.deserialize::<InputRow>().enumerate() {
        let row_number = index + 1;
        summary.processed += 1;

        let outcome = match row {
            Ok(row) => {
                let calculator = row.calculator.clone();
                let result = calculator
                    .parse::<CalculatorKind>()
                    .and_then(|kind| calculate(kind, &row.into(), clock, config));
                (calculator, result)
            }
            Err(e) => {
                tracing::warn!("Failed to parse batch row {}: {}", row_number, e);
                (String::new(), Err(Error::Csv(e)))
            }
        };

        let out = match outcome {
            (calculator, Ok(result)) => {
                summary.succeeded += 1;
                OutputRow {
                    row: row_number,
                    calculator,
                    status: "ok",
                    headline: Some(result.headline(&config.display.date_format)),
                    error: None,
                }
            }
            (calculator, Err(e)) => {
                summary.failed += 1;
                OutputRow {
                    row: row_number,
                    calculator,
                    status: "error",
                    headline: None,
                    error: Some(e.to_string()),
                }
            }
        };
        writer.serialize(out)?;
    }

    // The header is only written with the first row
    if summary.processed == 0 {
        writer.write_record(OUTPUT_HEADER)?;
    }

    writer.flush()?;
    tracing::info!(
        "Batch finished: {} rows, {} ok, {} failed",
        summary.processed,
        summary.succeeded,
        summary.failed
    );
    Ok(summary)
}

/// File-based wrapper around [`process`]
pub fn run_file(
    input_path: &Path,
    output_path: &Path,
    clock: &dyn Clock,
    config: &Config,
) -> Result<BatchSummary> {
    let input = File::open(input_path)?;

    // Ensure parent directory exists
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let output = File::create(output_path)?;

    let summary = process(input, &output, clock, config)?;
    output.sync_all()?;

    tracing::info!("Wrote batch results to {:?}", output_path);
    Ok(summary)
}
