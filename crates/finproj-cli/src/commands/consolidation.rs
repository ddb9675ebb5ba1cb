use clap::Args;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

use finproj_core::consolidation::aggregate::{aggregate, PeriodSummary};
use finproj_core::consolidation::inputs::ConsolidationInput;
use finproj_core::consolidation::monthly::{consolidate_monthly, MonthlyStatement};
use finproj_core::consolidation::summary::{summarize, ConsolidationSummary};
use finproj_core::{with_metadata, EngineConfig};

use crate::input;

/// Arguments for consolidating prepared schedules
#[derive(Args)]
pub struct ConsolidateArgs {
    /// Path to JSON input file (baseline, assumptions and schedule rows)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Serialize)]
struct ConsolidatedStatements {
    summary: ConsolidationSummary,
    monthly: Vec<MonthlyStatement>,
    quarterly: Vec<PeriodSummary>,
    annual: Vec<PeriodSummary>,
}

pub fn run_consolidate(
    args: ConsolidateArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let consolidation_input: ConsolidationInput =
        input::read_input(args.input.as_deref(), "consolidate")?;

    let monthly = consolidate_monthly(&consolidation_input, config)?;
    let periods = aggregate(&monthly.result)?;
    let summary = summarize(
        &monthly.result,
        &periods.result.quarterly,
        &periods.result.annual,
    )?;

    let mut warnings = monthly.warnings;
    warnings.extend(periods.warnings);
    warnings.extend(summary.warnings);

    let result = ConsolidatedStatements {
        summary: summary.result,
        monthly: monthly.result,
        quarterly: periods.result.quarterly,
        annual: periods.result.annual,
    };
    let output = with_metadata(
        "Monthly consolidation with quarterly and annual roll-ups",
        &consolidation_input,
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    );
    Ok(serde_json::to_value(output)?)
}
