use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use finproj_core::consolidation::aggregate::{PeriodKind, PeriodSummary};
use finproj_core::consolidation::monthly::MonthlyStatement;
use finproj_core::pipeline::ProjectionStore;
use finproj_core::schedules::debt::{DebtScheduleRow, DebtType};
use finproj_core::schedules::depreciation::DepreciationScheduleRow;
use finproj_core::{ProjectionError, ProjectionResult};

/// Saves each series as `<root>/<project_id>/<series>.json`, replacing any
/// earlier file for the same series.
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// A project id names a single directory under the root. Path separators,
    /// `.` and `..` components are rejected.
    pub fn check_project_id(project_id: &str) -> ProjectionResult<()> {
        let escapes = project_id.is_empty()
            || project_id == "."
            || project_id.contains("..")
            || project_id.contains(['/', '\\', ':']);
        if escapes {
            return Err(ProjectionError::invalid(
                "project_id",
                format!("'{project_id}' must be a plain directory name"),
            ));
        }
        Ok(())
    }

    fn write<T: Serialize>(&self, project_id: &str, name: &str, rows: &[T]) -> ProjectionResult<()> {
        Self::check_project_id(project_id)?;
        let dir = self.root.join(project_id);
        let path = dir.join(format!("{name}.json"));
        let failed = |reason: String| ProjectionError::Persistence {
            target: path.display().to_string(),
            reason,
        };

        fs::create_dir_all(&dir).map_err(|e| failed(e.to_string()))?;
        let body = serde_json::to_vec_pretty(rows)?;
        fs::write(&path, body).map_err(|e| failed(e.to_string()))?;

        tracing::debug!(path = %path.display(), rows = rows.len(), "saved series");
        Ok(())
    }
}

impl ProjectionStore for JsonDirStore {
    fn save_debt_schedule(
        &self,
        project_id: &str,
        debt_type: DebtType,
        rows: &[DebtScheduleRow],
    ) -> ProjectionResult<()> {
        self.write(project_id, &format!("debt_schedule_{}", debt_type.as_str()), rows)
    }

    fn save_depreciation_schedule(
        &self,
        project_id: &str,
        rows: &[DepreciationScheduleRow],
    ) -> ProjectionResult<()> {
        self.write(project_id, "depreciation_schedule", rows)
    }

    fn save_monthly(&self, project_id: &str, rows: &[MonthlyStatement]) -> ProjectionResult<()> {
        self.write(project_id, "monthly", rows)
    }

    fn save_periods(
        &self,
        project_id: &str,
        kind: PeriodKind,
        rows: &[PeriodSummary],
    ) -> ProjectionResult<()> {
        let name = match kind {
            PeriodKind::Quarter => "quarterly",
            PeriodKind::Year => "annual",
        };
        self.write(project_id, name, rows)
    }
}
