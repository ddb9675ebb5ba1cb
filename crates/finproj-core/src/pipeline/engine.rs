use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::store::{ProjectionSource, ProjectionStore};
use crate::config::EngineConfig;
use crate::consolidation::aggregate::{aggregate, PeriodKind, PeriodSummary};
use crate::consolidation::inputs::{
    BaselineFinancials, ConsolidationInput, DebtSchedules, GrowthAssumptions, SeasonalityProfile,
    WorkingCapitalRatios, SECTION_BALANCE_SHEET, SECTION_DEBT_STRUCTURE, SECTION_PROFIT_LOSS,
};
use crate::consolidation::monthly::{consolidate_monthly, MonthlyStatement};
use crate::consolidation::summary::{summarize, ConsolidationSummary};
use crate::error::ProjectionError;
use crate::schedules::debt::{build_debt_schedule, DebtInput, DebtScheduleOutput, DebtType};
use crate::schedules::depreciation::{
    build_depreciation_schedule, DepreciationInput, DepreciationScheduleOutput,
};
use crate::types::{with_metadata, ComputationOutput};
use crate::ProjectionResult;

// ---------------------------------------------------------------------------
// Input / output
// ---------------------------------------------------------------------------

/// One project's complete input snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionInputs {
    pub baseline: BaselineFinancials,
    #[serde(default)]
    pub growth: GrowthAssumptions,
    #[serde(default)]
    pub seasonality: SeasonalityProfile,
    #[serde(default)]
    pub working_capital: WorkingCapitalRatios,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub senior_debt: Option<DebtInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_term_debt: Option<DebtInput>,
    pub depreciation: DepreciationInput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionOutput {
    pub senior_debt: Option<DebtScheduleOutput>,
    pub short_term_debt: Option<DebtScheduleOutput>,
    pub depreciation: DepreciationScheduleOutput,
    pub monthly: Vec<MonthlyStatement>,
    pub quarterly: Vec<PeriodSummary>,
    pub annual: Vec<PeriodSummary>,
    pub summary: ConsolidationSummary,
}

/// A computed result together with the outcome of saving it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persisted<T> {
    pub output: T,
    pub persistence: PersistenceReport,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistenceReport {
    pub saved: Vec<String>,
    pub failures: Vec<PersistenceFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistenceFailure {
    pub target: String,
    pub reason: String,
}

impl PersistenceReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, project_id: &str, target: &str, outcome: ProjectionResult<()>) {
        match outcome {
            Ok(()) => self.saved.push(target.to_string()),
            Err(e) => {
                tracing::warn!(
                    project_id,
                    series = target,
                    error = %e,
                    "failed to persist computed series; result is still returned"
                );
                self.failures.push(PersistenceFailure {
                    target: target.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Compute
// ---------------------------------------------------------------------------

/// Run every stage of the engine over one input snapshot.
pub fn run_projection(
    inputs: &ProjectionInputs,
    config: &EngineConfig,
) -> ProjectionResult<ComputationOutput<ProjectionOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let missing = missing_sections(inputs);
    if !missing.is_empty() {
        return Err(ProjectionError::MissingData { sections: missing });
    }

    let senior_debt = build_optional_debt(inputs.senior_debt.as_ref(), DebtType::Senior, &mut warnings)?;
    let short_term_debt =
        build_optional_debt(inputs.short_term_debt.as_ref(), DebtType::ShortTerm, &mut warnings)?;

    let depreciation = build_depreciation_schedule(&inputs.depreciation)?;
    warnings.extend(prefixed("depreciation", depreciation.warnings));
    let depreciation = depreciation.result;

    let consolidation_input = ConsolidationInput {
        baseline: inputs.baseline.clone(),
        growth: inputs.growth.clone(),
        seasonality: inputs.seasonality.clone(),
        working_capital: inputs.working_capital.clone(),
        debt: Some(DebtSchedules {
            senior: senior_debt.as_ref().map(|d| d.rows.clone()).unwrap_or_default(),
            short_term: short_term_debt
                .as_ref()
                .map(|d| d.rows.clone())
                .unwrap_or_default(),
        }),
        depreciation: depreciation.rows.clone(),
    };
    let monthly = consolidate_monthly(&consolidation_input, config)?;
    warnings.extend(prefixed("consolidation", monthly.warnings));
    let monthly = monthly.result;

    let periods = aggregate(&monthly)?.result;
    let summary = summarize(&monthly, &periods.quarterly, &periods.annual)?.result;

    tracing::debug!(
        months = monthly.len(),
        warnings = warnings.len(),
        "projection run complete"
    );

    let output = ProjectionOutput {
        senior_debt,
        short_term_debt,
        depreciation,
        monthly,
        quarterly: periods.quarterly,
        annual: periods.annual,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Ten-Year Projection: debt and depreciation schedules, monthly consolidation, period roll-ups",
        inputs,
        warnings,
        elapsed,
        output,
    ))
}

fn missing_sections(inputs: &ProjectionInputs) -> Vec<String> {
    let mut missing = Vec::new();
    if inputs.baseline.profit_loss.is_none() {
        missing.push(SECTION_PROFIT_LOSS.to_string());
    }
    if inputs.baseline.balance_sheet.is_none() {
        missing.push(SECTION_BALANCE_SHEET.to_string());
    }
    if inputs.senior_debt.is_none() && inputs.short_term_debt.is_none() {
        missing.push(SECTION_DEBT_STRUCTURE.to_string());
    }
    missing
}

fn build_optional_debt(
    input: Option<&DebtInput>,
    slot: DebtType,
    warnings: &mut Vec<String>,
) -> ProjectionResult<Option<DebtScheduleOutput>> {
    let Some(input) = input else {
        return Ok(None);
    };
    if input.debt_type != slot {
        warnings.push(format!(
            "Debt supplied as {} is tagged {}; treated as {}",
            slot.as_str(),
            input.debt_type.as_str(),
            slot.as_str()
        ));
    }
    let mut schedule = build_debt_schedule(input)?;
    schedule.result.debt_type = slot;
    warnings.extend(prefixed(slot.as_str(), schedule.warnings));
    Ok(Some(schedule.result))
}

fn prefixed(stage: &str, warnings: Vec<String>) -> impl Iterator<Item = String> + '_ {
    warnings.into_iter().map(move |w| format!("{stage}: {w}"))
}

// ---------------------------------------------------------------------------
// Persist
// ---------------------------------------------------------------------------

/// Save every series of a computed projection, collecting failures.
pub fn persist_projection(
    project_id: &str,
    output: &ProjectionOutput,
    store: &dyn ProjectionStore,
) -> PersistenceReport {
    let mut report = PersistenceReport::default();

    for schedule in [&output.senior_debt, &output.short_term_debt].into_iter().flatten() {
        report.record(
            project_id,
            &format!("debt_schedule:{}", schedule.debt_type.as_str()),
            store.save_debt_schedule(project_id, schedule.debt_type, &schedule.rows),
        );
    }
    report.record(
        project_id,
        "depreciation_schedule",
        store.save_depreciation_schedule(project_id, &output.depreciation.rows),
    );
    report.record(
        project_id,
        "monthly",
        store.save_monthly(project_id, &output.monthly),
    );
    report.record(
        project_id,
        "quarterly",
        store.save_periods(project_id, PeriodKind::Quarter, &output.quarterly),
    );
    report.record(
        project_id,
        "annual",
        store.save_periods(project_id, PeriodKind::Year, &output.annual),
    );

    report
}

/// Load, compute, then save if possible.
///
/// Loading or computation failures are errors. Save failures only show up in
/// the returned report.
pub fn project_and_persist(
    project_id: &str,
    source: &dyn ProjectionSource,
    store: &dyn ProjectionStore,
    config: &EngineConfig,
) -> ProjectionResult<Persisted<ComputationOutput<ProjectionOutput>>> {
    let inputs = source.load_inputs(project_id)?;
    let output = run_projection(&inputs, config)?;
    let persistence = persist_projection(project_id, &output.result, store);
    Ok(Persisted {
        output,
        persistence,
    })
}

/// Build one debt schedule and save it if possible.
pub fn build_and_save_debt_schedule(
    project_id: &str,
    input: &DebtInput,
    store: &dyn ProjectionStore,
) -> ProjectionResult<Persisted<ComputationOutput<DebtScheduleOutput>>> {
    let output = build_debt_schedule(input)?;
    let mut persistence = PersistenceReport::default();
    persistence.record(
        project_id,
        &format!("debt_schedule:{}", input.debt_type.as_str()),
        store.save_debt_schedule(project_id, input.debt_type, &output.result.rows),
    );
    Ok(Persisted {
        output,
        persistence,
    })
}

/// Build the depreciation schedule and save it if possible.
pub fn build_and_save_depreciation_schedule(
    project_id: &str,
    input: &DepreciationInput,
    store: &dyn ProjectionStore,
) -> ProjectionResult<Persisted<ComputationOutput<DepreciationScheduleOutput>>> {
    let output = build_depreciation_schedule(input)?;
    let mut persistence = PersistenceReport::default();
    persistence.record(
        project_id,
        "depreciation_schedule",
        store.save_depreciation_schedule(project_id, &output.result.rows),
    );
    Ok(Persisted {
        output,
        persistence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consolidation::inputs::{BalanceSheetBaseline, ProfitLossBaseline};
    use crate::schedules::depreciation::DepreciationMethod;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn sample_inputs() -> ProjectionInputs {
        ProjectionInputs {
            baseline: BaselineFinancials {
                profit_loss: Some(ProfitLossBaseline {
                    revenue: dec!(240000),
                    cogs: dec!(-96000),
                    operating_expenses: dec!(-60000),
                }),
                balance_sheet: Some(BalanceSheetBaseline {
                    cash: dec!(25000),
                    accounts_receivable: dec!(8000),
                    inventory: dec!(6000),
                    other_current_assets: dec!(1500),
                    other_assets: Decimal::ZERO,
                    accounts_payable: dec!(7000),
                    ppe: dec!(15000),
                    equity: dec!(40000),
                    retained_earnings: dec!(5000),
                }),
            },
            growth: GrowthAssumptions::flat(dec!(5), dec!(4), dec!(3)),
            seasonality: SeasonalityProfile::default(),
            working_capital: WorkingCapitalRatios {
                accounts_receivable_percent: dec!(17.6),
                inventory_percent: dec!(8),
                other_current_assets_percent: dec!(1),
                accounts_payable_percent: dec!(10),
            },
            senior_debt: Some(DebtInput {
                principal: dec!(50000),
                additional_loan: Decimal::ZERO,
                bank_base_rate: dec!(5),
                liquidity_premium: dec!(1),
                credit_risk_premium: dec!(1),
                maturity_years: 10,
                amortization_years: 4,
                debt_type: DebtType::Senior,
            }),
            short_term_debt: None,
            depreciation: DepreciationInput {
                opening_balance: dec!(15000),
                monthly_capex: dec!(1667),
                depreciation_rate: dec!(10),
                depreciation_method: DepreciationMethod::StraightLine,
                salvage_value: None,
            },
        }
    }

    #[test]
    fn test_full_run_shapes() {
        let out = run_projection(&sample_inputs(), &EngineConfig::default()).unwrap();
        let r = &out.result;
        assert_eq!(r.monthly.len(), 120);
        assert_eq!(r.quarterly.len(), 40);
        assert_eq!(r.annual.len(), 10);
        assert_eq!(r.depreciation.rows.len(), 120);
        assert!(r.short_term_debt.is_none());
        assert_eq!(r.summary.final_debt, r.monthly[119].total_debt);
    }

    #[test]
    fn test_no_debt_is_missing_structure() {
        let mut inputs = sample_inputs();
        inputs.senior_debt = None;
        match run_projection(&inputs, &EngineConfig::default()) {
            Err(ProjectionError::MissingData { sections }) => {
                assert_eq!(sections, vec![SECTION_DEBT_STRUCTURE.to_string()]);
            }
            other => panic!("expected MissingData, got {other:?}"),
        }
    }

    #[test]
    fn test_mistagged_debt_is_reslotted() {
        let mut inputs = sample_inputs();
        inputs.short_term_debt = inputs.senior_debt.clone();
        let out = run_projection(&inputs, &EngineConfig::default()).unwrap();
        assert_eq!(
            out.result.short_term_debt.as_ref().unwrap().debt_type,
            DebtType::ShortTerm
        );
        assert!(out.warnings.iter().any(|w| w.contains("tagged senior")));
    }

    #[test]
    fn test_report_records_each_series() {
        let out = run_projection(&sample_inputs(), &EngineConfig::default()).unwrap();
        let store = crate::pipeline::store::InMemoryStore::new();
        let report = persist_projection("p", &out.result, &store);
        assert!(report.is_complete());
        assert_eq!(
            report.saved,
            vec![
                "debt_schedule:senior",
                "depreciation_schedule",
                "monthly",
                "quarterly",
                "annual"
            ]
        );
    }
}
