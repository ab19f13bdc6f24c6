use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuadError {
    #[error("parse error at byte {pos}: {reason}")]
    Parse { pos: usize, reason: String },

    #[error("evaluation error at x = {x}: {reason}")]
    Evaluation { x: f64, reason: String },

    #[error("data error in field `{field}`: {reason}")]
    Data { field: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl QuadError {
    pub fn parse(pos: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            pos,
            reason: reason.into(),
        }
    }

    pub fn data(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Data {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type QuadResult<T> = Result<T, QuadError>;
