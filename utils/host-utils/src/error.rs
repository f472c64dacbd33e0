use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid value for `{key}`; expected {expected}")]
    InvalidValue { key: String, expected: &'static str },
    #[error("empty value for `{key}`")]
    EmptyValue { key: String },
    #[error("store access for `{key}` failed: {reason}")]
    Store { key: String, reason: String },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_value(key: &str, expected: &'static str) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            expected,
        }
    }

    pub fn empty_value(key: &str) -> Self {
        Self::EmptyValue {
            key: key.to_string(),
        }
    }

    pub fn store(key: &str, reason: impl Into<String>) -> Self {
        Self::Store {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
