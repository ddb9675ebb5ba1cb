use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

use super::engine::ProjectionInputs;
use crate::consolidation::aggregate::{PeriodKind, PeriodSummary};
use crate::consolidation::monthly::MonthlyStatement;
use crate::error::ProjectionError;
use crate::schedules::debt::{DebtScheduleRow, DebtType};
use crate::schedules::depreciation::DepreciationScheduleRow;
use crate::ProjectionResult;

/// Loads a project's input snapshot. Implemented by the storage layer.
pub trait ProjectionSource: Send + Sync {
    fn load_inputs(&self, project_id: &str) -> ProjectionResult<ProjectionInputs>;
}

/// Persists computed series. Implemented by the storage layer.
///
/// Failures are reported to the caller but never invalidate a computed result.
pub trait ProjectionStore: Send + Sync {
    fn save_debt_schedule(
        &self,
        project_id: &str,
        debt_type: DebtType,
        rows: &[DebtScheduleRow],
    ) -> ProjectionResult<()>;

    fn save_depreciation_schedule(
        &self,
        project_id: &str,
        rows: &[DepreciationScheduleRow],
    ) -> ProjectionResult<()>;

    fn save_monthly(&self, project_id: &str, rows: &[MonthlyStatement]) -> ProjectionResult<()>;

    fn save_periods(
        &self,
        project_id: &str,
        kind: PeriodKind,
        rows: &[PeriodSummary],
    ) -> ProjectionResult<()>;
}

/// Everything saved for one project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredProjection {
    pub debt_schedules: HashMap<DebtType, Vec<DebtScheduleRow>>,
    pub depreciation: Vec<DepreciationScheduleRow>,
    pub monthly: Vec<MonthlyStatement>,
    pub quarterly: Vec<PeriodSummary>,
    pub annual: Vec<PeriodSummary>,
}

/// Process-local store, keyed by project id.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inputs: RwLock<HashMap<String, ProjectionInputs>>,
    outputs: RwLock<HashMap<String, StoredProjection>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_inputs(&self, project_id: &str, inputs: ProjectionInputs) -> ProjectionResult<()> {
        let mut guard = self.inputs.write().map_err(|_| poisoned("inputs"))?;
        guard.insert(project_id.to_string(), inputs);
        Ok(())
    }

    /// Snapshot of what has been saved for a project.
    pub fn stored(&self, project_id: &str) -> Option<StoredProjection> {
        self.outputs
            .read()
            .ok()
            .and_then(|guard| guard.get(project_id).cloned())
    }

    fn update(
        &self,
        project_id: &str,
        target: &str,
        apply: impl FnOnce(&mut StoredProjection),
    ) -> ProjectionResult<()> {
        let mut guard = self.outputs.write().map_err(|_| poisoned(target))?;
        apply(guard.entry(project_id.to_string()).or_default());
        Ok(())
    }
}

fn poisoned(target: &str) -> ProjectionError {
    ProjectionError::Persistence {
        target: target.to_string(),
        reason: "store lock poisoned".into(),
    }
}

impl ProjectionSource for InMemoryStore {
    fn load_inputs(&self, project_id: &str) -> ProjectionResult<ProjectionInputs> {
        let guard = self.inputs.read().map_err(|_| poisoned("inputs"))?;
        guard.get(project_id).cloned().ok_or_else(|| ProjectionError::MissingData {
            sections: vec![format!("Project '{project_id}'")],
        })
    }
}

impl ProjectionStore for InMemoryStore {
    fn save_debt_schedule(
        &self,
        project_id: &str,
        debt_type: DebtType,
        rows: &[DebtScheduleRow],
    ) -> ProjectionResult<()> {
        self.update(project_id, debt_type.as_str(), |p| {
            p.debt_schedules.insert(debt_type, rows.to_vec());
        })
    }

    fn save_depreciation_schedule(
        &self,
        project_id: &str,
        rows: &[DepreciationScheduleRow],
    ) -> ProjectionResult<()> {
        self.update(project_id, "depreciation", |p| p.depreciation = rows.to_vec())
    }

    fn save_monthly(&self, project_id: &str, rows: &[MonthlyStatement]) -> ProjectionResult<()> {
        self.update(project_id, "monthly", |p| p.monthly = rows.to_vec())
    }

    fn save_periods(
        &self,
        project_id: &str,
        kind: PeriodKind,
        rows: &[PeriodSummary],
    ) -> ProjectionResult<()> {
        self.update(project_id, "periods", |p| match kind {
            PeriodKind::Quarter => p.quarterly = rows.to_vec(),
            PeriodKind::Year => p.annual = rows.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedules::debt::{build_debt_schedule, DebtInput};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_saves_are_keyed_by_project_and_debt_type() {
        let store = InMemoryStore::new();
        let rows = build_debt_schedule(&DebtInput {
            principal: dec!(1200),
            additional_loan: Decimal::ZERO,
            bank_base_rate: dec!(3),
            liquidity_premium: Decimal::ZERO,
            credit_risk_premium: Decimal::ZERO,
            maturity_years: 1,
            amortization_years: 1,
            debt_type: DebtType::ShortTerm,
        })
        .unwrap()
        .result
        .rows;

        store
            .save_debt_schedule("p-1", DebtType::ShortTerm, &rows)
            .unwrap();

        let saved = store.stored("p-1").unwrap();
        assert_eq!(saved.debt_schedules[&DebtType::ShortTerm], rows);
        assert!(!saved.debt_schedules.contains_key(&DebtType::Senior));
        assert!(store.stored("p-2").is_none());
    }

    #[test]
    fn test_unknown_project_inputs_are_missing() {
        let store = InMemoryStore::new();
        assert!(matches!(
            store.load_inputs("nope"),
            Err(ProjectionError::MissingData { .. })
        ));
    }
}
