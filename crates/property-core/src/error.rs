use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Missing or non-numeric monetary field, or a required form field left blank.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// ROI requested for an acquisition whose cost base is zero.
    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    #[error("Unknown {kind} value: {value:?}")]
    UnknownEnum { kind: &'static str, value: String },
}
