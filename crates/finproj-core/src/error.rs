use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Missing required data: {}", sections.join(", "))]
    MissingData { sections: Vec<String> },

    #[error("Computation error: {0}")]
    Computation(String),

    #[error("Persistence failure saving {target}: {reason}")]
    Persistence { target: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ProjectionError {
    /// Shorthand for the common validation failure shape.
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ProjectionError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ProjectionError {
    fn from(e: serde_json::Error) -> Self {
        ProjectionError::SerializationError(e.to_string())
    }
}

impl From<csv::Error> for ProjectionError {
    fn from(e: csv::Error) -> Self {
        ProjectionError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_data_lists_every_section() {
        let err = ProjectionError::MissingData {
            sections: vec!["Profit & Loss".into(), "Balance Sheet".into()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required data: Profit & Loss, Balance Sheet"
        );
    }

    #[test]
    fn test_invalid_shorthand() {
        let err = ProjectionError::invalid("principal", "must be positive");
        assert!(matches!(err, ProjectionError::InvalidInput { ref field, .. } if field == "principal"));
    }
}
