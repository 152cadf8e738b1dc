use thiserror::Error;

/// Why an untrusted filter structure was rejected. The whole structure is
/// rejected; nothing is ever partially accepted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("schema violation: {0}")]
    SchemaViolation(String),

    #[error("operator violation: {0}")]
    OperatorViolation(String),

    #[error("value shape violation: {0}")]
    ValueShapeViolation(String),

    #[error("value coercion violation: {0}")]
    ValueCoercionViolation(String),

    #[error("limit exceeded: {0}")]
    LimitExceededViolation(String),
}

impl ValidationError {
    /// Stable label for callers that branch on the kind of rejection.
    pub fn label(&self) -> &'static str {
        match self {
            ValidationError::SchemaViolation(_) => "SchemaViolation",
            ValidationError::OperatorViolation(_) => "OperatorViolation",
            ValidationError::ValueShapeViolation(_) => "ValueShapeViolation",
            ValidationError::ValueCoercionViolation(_) => "ValueCoercionViolation",
            ValidationError::LimitExceededViolation(_) => "LimitExceededViolation",
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            ValidationError::SchemaViolation(r)
            | ValidationError::OperatorViolation(r)
            | ValidationError::ValueShapeViolation(r)
            | ValidationError::ValueCoercionViolation(r)
            | ValidationError::LimitExceededViolation(r) => r,
        }
    }
}
