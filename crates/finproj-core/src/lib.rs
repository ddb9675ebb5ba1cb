pub mod config;
pub mod error;
pub mod types;

pub mod schedules;

#[cfg(feature = "consolidation")]
pub mod consolidation;

#[cfg(feature = "pipeline")]
pub mod pipeline;

#[cfg(feature = "export")]
pub mod export;

pub use config::EngineConfig;
pub use error::ProjectionError;
pub use types::*;

/// Standard result type for all projection operations
pub type ProjectionResult<T> = Result<T, ProjectionError>;
