//! Error types for bundle encoding and decoding

use std::io;
use std::path::PathBuf;

/// Why a caller-supplied score table could not become a [`ScoreVector`].
///
/// [`ScoreVector`]: crate::formats::ScoreVector
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreVectorError {
    #[error("expected {expected} values, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("value {value} at outcome {outcome} is outside -128..=127")]
    OutOfRange { outcome: usize, value: i64 },
}

/// Errors produced while building or reading a bundle.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// Malformed scoring data (caller bug)
    #[error("invalid score vector: {0}")]
    InvalidScoreVector(#[from] ScoreVectorError),

    /// Source asset missing, unreadable or over the size cap
    #[error("failed to read payload {}: {source}", .path.display())]
    PayloadReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Wrong number of result records
    #[error("expected {expected} result records, got {actual}")]
    ResultArityError { expected: usize, actual: usize },

    /// Question count overflows the u32 bundle header
    #[error("{0} questions do not fit a u32 count prefix")]
    TooManyQuestions(usize),

    /// Zero-length clip, on encode or in a decoded record
    #[error("payload is empty")]
    EmptyPayload,

    /// Clip longer than the u32 length prefix can describe
    #[error("payload of {0} bytes does not fit a u32 length prefix")]
    PayloadTooLarge(usize),

    /// Bundle ends before a header or payload is complete
    #[error("bundle truncated at offset {offset}: need {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Bytes left over after the last result record
    #[error("{0} unexpected bytes after the last result record")]
    TrailingBytes(usize),

    /// Result header with scoring data (outcome ordinal, 1-based)
    #[error("result record {0} carries non-zero score vectors")]
    NonZeroResultScores(usize),

    /// Sink failure while streaming a bundle
    #[error("failed to write bundle: {0}")]
    Io(#[from] io::Error),
}
