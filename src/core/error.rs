use super::types::ParameterField;

/// Errors raised when an edit cannot be applied to the scenario store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("unknown scenario: {0}")]
    UnknownScenario(String),

    /// Lowering `endAge` below `startAge` would invert the contribution window.
    #[error("endAge {end_age} must be >= startAge {start_age}")]
    InvertedWindow { start_age: u32, end_age: u32 },

    #[error("{} must be a finite number", field.as_str())]
    NonFinite { field: ParameterField },

    #[error("{} must be a non-negative whole number, got {value}", field.as_str())]
    InvalidAge { field: ParameterField, value: f64 },
}
