//! quiz.toml manifest parsing
//!
//! The manifest holds everything deployment-specific: which clips to pack and
//! the per-question scoring tables. The encoder itself stays generic.

use anyhow::{Context, Result, bail};
use quiz_common::{BundleError, DEFAULT_MAX_PAYLOAD_BYTES, OUTCOME_COUNT, ScoreVector};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Default bundle file name, relative to the manifest directory
pub const DEFAULT_OUTPUT: &str = "bundle.bin";

/// quiz.toml manifest structure
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuizManifest {
    #[serde(default)]
    pub bundle: BundleSection,
    #[serde(default)]
    pub outcomes: Option<OutcomesSection>,
    #[serde(default)]
    pub questions: Vec<QuestionEntry>,
    #[serde(default)]
    pub results: Vec<ResultEntry>,
}

/// Output settings
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleSection {
    /// Bundle path, relative to the manifest directory
    pub output: Option<String>,
    /// Per-payload size cap in bytes
    pub max_payload_bytes: Option<u64>,
}

/// Outcome names, in outcome order 1..7
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutcomesSection {
    pub names: Vec<String>,
}

/// One question clip and its scoring
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestionEntry {
    pub path: String,
    pub yes: ScoreTable,
    pub no: ScoreTable,
}

/// One result clip. Entries are listed in outcome order.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResultEntry {
    pub path: String,
}

/// Score table as written in the manifest.
///
/// Either seven positional values or a table keyed by outcome name, where
/// missing outcomes score 0.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ScoreTable {
    List(Vec<i64>),
    Named(BTreeMap<String, i64>),
}

impl ScoreTable {
    /// Resolve to a score vector using the manifest's outcome names
    pub fn resolve(&self, outcomes: Option<&[String]>) -> Result<ScoreVector> {
        let values = match self {
            ScoreTable::List(values) => values.clone(),
            ScoreTable::Named(table) => {
                let Some(names) = outcomes else {
                    bail!("named score table requires an [outcomes] section");
                };
                let mut values = vec![0i64; names.len()];
                for (name, &points) in table {
                    let Some(index) = names.iter().position(|n| n == name) else {
                        bail!("unknown outcome name '{}'", name);
                    };
                    values[index] = points;
                }
                values
            }
        };
        let vector = ScoreVector::from_values(&values).map_err(BundleError::from)?;
        Ok(vector)
    }
}

impl QuestionEntry {
    /// Resolved (yes, no) vectors
    pub fn score_vectors(&self, outcomes: Option<&[String]>) -> Result<(ScoreVector, ScoreVector)> {
        let yes = self.yes.resolve(outcomes).context("yes points")?;
        let no = self.no.resolve(outcomes).context("no points")?;
        Ok((yes, no))
    }
}

impl QuizManifest {
    /// Load manifest from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse manifest from string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse quiz.toml")
    }

    pub fn outcome_names(&self) -> Option<&[String]> {
        self.outcomes.as_ref().map(|o| o.names.as_slice())
    }

    pub fn max_payload_bytes(&self) -> u64 {
        self.bundle
            .max_payload_bytes
            .unwrap_or(DEFAULT_MAX_PAYLOAD_BYTES)
    }

    /// Check everything that can be checked without touching payload files
    pub fn validate(&self) -> Result<()> {
        if let Some(names) = self.outcome_names() {
            if names.len() != OUTCOME_COUNT {
                bail!(
                    "[outcomes] must name exactly {} outcomes, found {}",
                    OUTCOME_COUNT,
                    names.len()
                );
            }
            let mut seen = HashSet::new();
            for name in names {
                if !seen.insert(name.as_str()) {
                    bail!("duplicate outcome name '{}'", name);
                }
            }
        }

        if self.results.len() != OUTCOME_COUNT {
            return Err(BundleError::ResultArityError {
                expected: OUTCOME_COUNT,
                actual: self.results.len(),
            })
            .context("Invalid [[results]] section");
        }

        if self.questions.is_empty() {
            tracing::warn!("Manifest has no questions; the player expects at least one");
        }

        for (i, entry) in self.questions.iter().enumerate() {
            let label = format!("question {} ({})", i + 1, entry.path);
            if entry.path.trim().is_empty() {
                bail!("question {} has an empty path", i + 1);
            }
            entry
                .score_vectors(self.outcome_names())
                .with_context(|| label.clone())?;
        }

        for (i, entry) in self.results.iter().enumerate() {
            if entry.path.trim().is_empty() {
                bail!("result {} has an empty path", i + 1);
            }
        }

        Ok(())
    }
}

/// A validated manifest and the directory its paths are relative to
pub struct ManifestContext {
    pub manifest: QuizManifest,
    pub project_dir: PathBuf,
}

pub fn load_manifest(manifest_path: &Path) -> Result<ManifestContext> {
    let manifest = QuizManifest::load(manifest_path)?;
    manifest
        .validate()
        .with_context(|| format!("Invalid manifest: {}", manifest_path.display()))?;

    let project_dir = manifest_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    Ok(ManifestContext {
        manifest,
        project_dir,
    })
}
