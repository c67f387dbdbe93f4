use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("field `{field}` expects {expected}, got {value}")]
    InvalidInput {
        field: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{quantity} is out of range ({value})")]
    OutOfRange { quantity: &'static str, value: f64 },

    #[error("Explanation failed: {0}")]
    Explanation(String),
}

impl CalcError {
    pub fn invalid_input(field: &'static str, expected: &'static str, value: impl ToString) -> Self {
        Self::InvalidInput {
            field,
            expected,
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
