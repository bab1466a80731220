//! quiz-export library
//!
//! Turns a quiz.toml manifest and its audio clips into a bundle file. Used by
//! the `quiz-export` binary and by integration tests.

pub mod assets;
pub mod build;
pub mod manifest;
pub mod output;

pub use assets::{AssetSource, DirSource, load_bundle};
pub use build::{BuildSummary, build, check, inspect};
pub use manifest::{ManifestContext, QuizManifest, ScoreTable, load_manifest};
