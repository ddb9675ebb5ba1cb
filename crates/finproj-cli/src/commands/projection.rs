use clap::{Args, ValueEnum};
use serde_json::Value;

use finproj_core::export::{export_series, Series};
use finproj_core::pipeline::{persist_projection, run_projection, Persisted, ProjectionInputs};
use finproj_core::EngineConfig;

use crate::input;
use crate::store::JsonDirStore;

/// Arguments for the full projection
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to JSON input file (one project's input snapshot)
    #[arg(long)]
    pub input: Option<String>,

    /// Directory to save every computed series into, as JSON files
    #[arg(long)]
    pub save_dir: Option<String>,

    /// Project id used as the sub-directory name when saving
    #[arg(long, default_value = "default")]
    pub project_id: String,
}

pub fn run_project(args: ProjectArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    if args.save_dir.is_some() {
        JsonDirStore::check_project_id(&args.project_id)?;
    }
    let inputs: ProjectionInputs = input::read_input(args.input.as_deref(), "project")?;
    let output = run_projection(&inputs, config)?;

    let Some(dir) = args.save_dir else {
        return Ok(serde_json::to_value(output)?);
    };

    let store = JsonDirStore::new(dir);
    let persistence = persist_projection(&args.project_id, &output.result, &store);
    Ok(serde_json::to_value(Persisted {
        output,
        persistence,
    })?)
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SeriesKind {
    SeniorDebt,
    ShortTermDebt,
    Depreciation,
    Monthly,
    Quarterly,
    Annual,
}

impl From<SeriesKind> for Series {
    fn from(kind: SeriesKind) -> Self {
        match kind {
            SeriesKind::SeniorDebt => Series::SeniorDebt,
            SeriesKind::ShortTermDebt => Series::ShortTermDebt,
            SeriesKind::Depreciation => Series::Depreciation,
            SeriesKind::Monthly => Series::Monthly,
            SeriesKind::Quarterly => Series::Quarterly,
            SeriesKind::Annual => Series::Annual,
        }
    }
}

/// Arguments for exporting one series
#[derive(Args)]
pub struct ExportArgs {
    /// Path to JSON input file (one project's input snapshot)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, value_enum, default_value = "monthly")]
    pub series: SeriesKind,
}

/// Run the projection and render one series as CSV text.
pub fn run_export(args: ExportArgs, config: &EngineConfig) -> Result<String, Box<dyn std::error::Error>> {
    let inputs: ProjectionInputs = input::read_input(args.input.as_deref(), "export")?;
    let output = run_projection(&inputs, config)?;
    for warning in &output.warnings {
        tracing::warn!(%warning, "projection warning");
    }
    Ok(export_series(&output.result, args.series.into())?)
}
