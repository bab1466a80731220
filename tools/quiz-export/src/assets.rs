//! Payload loading.
//!
//! The encoder only sees bytes; an [`AssetSource`] turns the manifest's path
//! references into those bytes.

use anyhow::{Context, Result};
use quiz_common::{Bundle, BundleError, Question, ResultClip, read_payload};
use std::path::{Path, PathBuf};

use crate::manifest::QuizManifest;

/// Supplies raw audio bytes for a manifest path reference
pub trait AssetSource {
    fn load(&self, reference: &str) -> Result<Vec<u8>, BundleError>;
}

/// Reads payloads from disk, relative to a project directory
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
    max_bytes: u64,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirSource {
    fn load(&self, reference: &str) -> Result<Vec<u8>, BundleError> {
        read_payload(&self.root.join(reference), self.max_bytes)
    }
}

/// Resolve every manifest entry into an in-memory bundle.
///
/// Stops at the first failing record; the error names it. Each record's
/// header is built here so payload rules (empty, oversize) surface with the
/// record label rather than later from the encoder.
pub fn load_bundle(manifest: &QuizManifest, source: &dyn AssetSource) -> Result<Bundle> {
    let outcomes = manifest.outcome_names();

    let mut questions = Vec::with_capacity(manifest.questions.len());
    for (i, entry) in manifest.questions.iter().enumerate() {
        let label = format!("question {} ({})", i + 1, entry.path);
        let (yes_points, no_points) = entry
            .score_vectors(outcomes)
            .with_context(|| label.clone())?;
        let payload = source.load(&entry.path).with_context(|| label.clone())?;

        let question = Question::new(payload, yes_points, no_points);
        question.header().with_context(|| label.clone())?;
        tracing::debug!("Loaded {}: {} bytes", label, question.payload.len());
        questions.push(question);
    }

    let mut results = Vec::with_capacity(manifest.results.len());
    for (i, entry) in manifest.results.iter().enumerate() {
        let label = format!("result {} ({})", i + 1, entry.path);
        let payload = source.load(&entry.path).with_context(|| label.clone())?;

        let result = ResultClip::new(payload);
        result.header().with_context(|| label.clone())?;
        tracing::debug!("Loaded {}: {} bytes", label, result.payload.len());
        results.push(result);
    }

    Ok(Bundle::new(questions, results))
}
