pub type DelayResult<T> = Result<T, DelayError>;

#[derive(thiserror::Error, Debug)]
pub enum DelayError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("sink unavailable: {0}")]
    SinkUnavailable(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DelayError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable(msg.into())
    }

    pub fn sink_unavailable(msg: impl Into<String>) -> Self {
        Self::SinkUnavailable(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
