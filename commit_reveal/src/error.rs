use crate::*;

use thiserror::Error;

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("commit-reveal: invalid commitment - invalid hexidecimal")]
    CommitmentBadHex,

    #[error("commit-reveal: invalid commitment - wrong length, expected 32 bytes, got {0}")]
    CommitmentBadLen(usize),

    #[error("commit-reveal: JSON error: {0}")]
    JSON(#[from] serde_json::Error),

    #[error("commit-reveal: CBOR error: {0}")]
    CBOR(#[from] serde_cbor::Error),

    #[error("commit-reveal: error deserializing transaction: empty input")]
    DeserializationEmpty,

    #[error("commit-reveal: invalid config value for {0}: {1}")]
    InvalidConfig(&'static str, String),

    #[error("commit-reveal: inconsistent state: {0}")]
    InconsistentState(String),
}

/// Operation validation errors
///
/// Every variant rejects a single operation. None of them leave partial state behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("commit-reveal validation: commitment {0} has already been submitted")]
    DuplicateCommitment(Commitment),

    #[error("commit-reveal validation: commitment {0} was never submitted")]
    UnknownCommitment(Commitment),

    #[error("commit-reveal validation: commitment {0} has already been revealed")]
    AlreadyRevealed(Commitment),

    #[error("commit-reveal validation: reveal too early, allowed at {ready_at}, now {now}")]
    RevealTooEarly { ready_at: u64, now: u64 },

    #[error("commit-reveal validation: ballot does not match commitment {0}")]
    InvalidReveal(Commitment),

    #[error("commit-reveal validation: malformed ballot, expected <choice>~<secret>")]
    MalformedBallot,

    #[error("commit-reveal validation: invalid choice {0}, expected 1 or 2")]
    InvalidChoice(String),
}

impl From<CommitmentNotFound> for ValidationError {
    fn from(e: CommitmentNotFound) -> Self {
        ValidationError::UnknownCommitment(e.0)
    }
}
