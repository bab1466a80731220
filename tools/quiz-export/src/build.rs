//! Build, check and inspect commands

use anyhow::{Context, Result};
use quiz_common::Bundle;
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::xxh3_64;

use crate::assets::{DirSource, load_bundle};
use crate::manifest::load_manifest;
use crate::output;

/// What a successful build produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub output_path: PathBuf,
    pub size: usize,
    pub question_count: usize,
    /// xxh3-64 of the bundle bytes
    pub hash: u64,
}

/// Load the manifest, pack every clip and write the bundle.
///
/// Nothing is written unless every record loads and encodes.
pub fn build(manifest_path: &Path, output_override: Option<PathBuf>) -> Result<BuildSummary> {
    let ctx = load_manifest(manifest_path)?;
    let source = DirSource::new(&ctx.project_dir, ctx.manifest.max_payload_bytes());
    tracing::debug!("Resolving payloads relative to {}", source.root().display());

    let bundle = load_bundle(&ctx.manifest, &source)?;
    let bytes = bundle.encode().context("Failed to encode bundle")?;

    let output_path = output::default_output_path(&ctx.project_dir, &ctx.manifest, output_override);
    output::write_bundle_file(&output_path, &bytes)?;

    Ok(BuildSummary {
        output_path,
        size: bytes.len(),
        question_count: bundle.question_count(),
        hash: xxh3_64(&bytes),
    })
}

/// Validate the manifest and make sure every payload can be read
pub fn check(manifest_path: &Path) -> Result<Bundle> {
    let ctx = load_manifest(manifest_path)?;
    let source = DirSource::new(&ctx.project_dir, ctx.manifest.max_payload_bytes());
    load_bundle(&ctx.manifest, &source)
}

/// Decode a bundle file and log its layout
pub fn inspect(bundle_path: &Path) -> Result<Bundle> {
    let bytes = std::fs::read(bundle_path)
        .with_context(|| format!("Failed to read bundle: {}", bundle_path.display()))?;
    let bundle = Bundle::decode(&bytes)
        .with_context(|| format!("Invalid bundle: {}", bundle_path.display()))?;

    tracing::info!(
        "{}: {} bytes, hash {:016x}",
        bundle_path.display(),
        bytes.len(),
        xxh3_64(&bytes)
    );
    tracing::info!("Questions: {}", bundle.question_count());
    for (i, q) in bundle.questions.iter().enumerate() {
        tracing::info!(
            "  Q{}: {} bytes, yes {:?}, no {:?}",
            i + 1,
            q.payload.len(),
            q.yes_points.points(),
            q.no_points.points()
        );
    }
    tracing::info!("Results: {}", bundle.results.len());
    for (i, r) in bundle.results.iter().enumerate() {
        tracing::info!("  R{}: {} bytes", i + 1, r.payload.len());
    }

    Ok(bundle)
}

pub fn log_summary(summary: &BuildSummary) {
    tracing::info!(
        "Created: {} ({} bytes)",
        summary.output_path.display(),
        summary.size
    );
    tracing::info!("  Questions: {}", summary.question_count);
    tracing::info!("  Bundle hash: {:016x}", summary.hash);
}
