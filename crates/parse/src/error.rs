use thiserror::Error;

/// Rejection classes for one notification. All are unrecoverable for the
/// input that produced them: the engine is deterministic, so retrying the
/// same text yields the same error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no format rule matched the notification text")]
    NoFormatMatched,
    #[error("matched format is missing required field '{0}'")]
    MissingField(&'static str),
    #[error("malformed amount: {0:?}")]
    MalformedAmount(String),
    #[error("malformed date: {0:?}")]
    MalformedDate(String),
}
