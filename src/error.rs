use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures while building or reading a SAS token.
///
/// Messages are static so that no caller-supplied key material can leak
/// through `Display` or `Debug`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("malformed signing key: {0}")]
    MalformedKey(&'static str),

    #[error("malformed SAS token: {0}")]
    MalformedToken(&'static str),
}
