pub mod engine;
pub mod store;

pub use engine::{
    build_and_save_debt_schedule, build_and_save_depreciation_schedule, persist_projection,
    project_and_persist, run_projection, Persisted, PersistenceFailure, PersistenceReport,
    ProjectionInputs, ProjectionOutput,
};
pub use store::{InMemoryStore, ProjectionSource, ProjectionStore, StoredProjection};
