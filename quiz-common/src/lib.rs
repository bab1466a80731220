//! Shared types for the quiz player bundle format
//!
//! This crate provides the bundle format shared between:
//! - `quiz-export` (asset pipeline and CLI)
//! - anything that needs to read a bundle back (inspection, tests)
//!
//! # Modules
//!
//! - [`formats`] - Record headers, score vectors, bundle encoder and decoder
//! - [`fs`] - Size-capped payload reads
//! - [`error`] - Error taxonomy for encoding and decoding

pub mod error;
pub mod formats;
pub mod fs;

pub use error::{BundleError, ScoreVectorError};

// Re-export commonly used format items
pub use formats::{
    BinarySerializable, Bundle, BundleHeader, OUTCOME_COUNT, Question, RecordHeader, ResultClip,
    ScoreVector, encode_bundle, encode_question, encode_result, write_bundle,
};

pub use fs::{DEFAULT_MAX_PAYLOAD_BYTES, read_payload};
