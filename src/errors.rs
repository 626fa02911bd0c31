use std::result::Result as StdResult;

use thiserror::Error;

/// Error type shared by the calendar, finance, and reporting layers.
#[derive(Debug, Error)]
pub enum FieldOpsError {
    #[error("Invalid payment basis: {0}")]
    InvalidPaymentBasis(String),
    #[error("Invalid numeric input: {field} is not finite (record {record_id})")]
    InvalidNumericInput { field: String, record_id: String },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = StdResult<T, FieldOpsError>;

impl FieldOpsError {
    pub(crate) fn non_finite(field: impl Into<String>, record_id: impl Into<String>) -> Self {
        FieldOpsError::InvalidNumericInput {
            field: field.into(),
            record_id: record_id.into(),
        }
    }
}

/// Fails with [`FieldOpsError::InvalidNumericInput`] unless `value` is finite.
pub(crate) fn ensure_finite(value: f64, field: &str, record_id: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FieldOpsError::non_finite(field, record_id))
    }
}

impl From<std::io::Error> for FieldOpsError {
    fn from(err: std::io::Error) -> Self {
        FieldOpsError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for FieldOpsError {
    fn from(err: serde_json::Error) -> Self {
        FieldOpsError::StorageError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_rejects_nan_and_infinity() {
        assert!(ensure_finite(12.5, "amount", "job-1").is_ok());
        let err = ensure_finite(f64::NAN, "amount", "job-1").expect_err("nan rejected");
        assert!(matches!(err, FieldOpsError::InvalidNumericInput { .. }));
        assert!(ensure_finite(f64::INFINITY, "rate", "job-2").is_err());
    }

    #[test]
    fn numeric_error_names_field_and_record() {
        let message = FieldOpsError::non_finite("rate", "inv-7").to_string();
        assert!(message.contains("rate"));
        assert!(message.contains("inv-7"));
    }
}
