use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EduFinError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Convergence failure: {function} did not converge after {iterations} iterations (delta: {last_delta})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_delta: Decimal,
    },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Required column missing from dataset: {column}")]
    MissingColumn { column: String },

    #[error("Dataset error: {0}")]
    Dataset(String),
}

#[cfg(feature = "dataset")]
impl From<csv::Error> for EduFinError {
    fn from(e: csv::Error) -> Self {
        EduFinError::Dataset(e.to_string())
    }
}
