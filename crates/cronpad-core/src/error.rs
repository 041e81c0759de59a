use thiserror::Error;

#[derive(Debug, Error)]
pub enum CronpadError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Backing store error: {0}")]
    Store(String),

    #[error("Backing store timed out after {ms}ms")]
    Timeout { ms: u64 },
}

impl CronpadError {
    /// Short error code string sent to clients alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            CronpadError::Config(_) => "CONFIG_ERROR",
            CronpadError::MalformedRequest(_) => "MALFORMED_REQUEST",
            CronpadError::Store(_) => "STORE_ERROR",
            CronpadError::Timeout { .. } => "TIMEOUT",
        }
    }
}

pub type Result<T> = std::result::Result<T, CronpadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(
            CronpadError::MalformedRequest("x".into()).code(),
            "MALFORMED_REQUEST"
        );
        assert_eq!(CronpadError::Timeout { ms: 10 }.code(), "TIMEOUT");
        assert_eq!(CronpadError::Store("boom".into()).code(), "STORE_ERROR");
    }

    #[test]
    fn timeout_message_carries_duration() {
        let err = CronpadError::Timeout { ms: 2_500 };
        assert_eq!(err.to_string(), "Backing store timed out after 2500ms");
    }
}
