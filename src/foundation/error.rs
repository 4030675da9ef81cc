pub type StyleResult<T> = Result<T, StyleError>;

/// Failure taxonomy shared by every subsystem.
///
/// None of these abort a style or data pass: callers log and skip the offending declaration,
/// binding or effect entry.
#[derive(thiserror::Error, Debug)]
pub enum StyleError {
    #[error("registration error: {0}")]
    Registration(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("instancing error: {0}")]
    Instancing(String),

    #[error("evaluation error: {0}")]
    Evaluation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StyleError {
    pub fn registration(msg: impl Into<String>) -> Self {
        Self::Registration(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn instancing(msg: impl Into<String>) -> Self {
        Self::Instancing(msg.into())
    }

    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
