use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::manifest::{DEFAULT_OUTPUT, QuizManifest};

pub fn default_output_path(
    project_dir: &Path,
    manifest: &QuizManifest,
    override_path: Option<PathBuf>,
) -> PathBuf {
    override_path.unwrap_or_else(|| {
        project_dir.join(manifest.bundle.output.as_deref().unwrap_or(DEFAULT_OUTPUT))
    })
}

fn temp_path(output_path: &Path) -> PathBuf {
    let mut name = OsString::from(output_path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_and_rename(tmp_path: &Path, output_path: &Path, bytes: &[u8]) -> io::Result<()> {
    {
        let mut f = fs::File::create(tmp_path)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }

    #[cfg(windows)]
    {
        if output_path.exists() {
            // Windows rename fails if destination exists.
            fs::remove_file(output_path)?;
        }
    }

    fs::rename(tmp_path, output_path)
}

/// Write the bundle through a sibling temp file and rename it into place.
///
/// A failed write never leaves a truncated bundle at `output_path`.
pub fn write_bundle_file(output_path: &Path, bundle_bytes: &[u8]) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let tmp_path = temp_path(output_path);
    if let Err(e) = write_and_rename(&tmp_path, output_path, bundle_bytes) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e)
            .with_context(|| format!("Failed to write bundle: {}", output_path.display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("build/nested/bundle.bin");

        write_bundle_file(&path, b"bundle").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"bundle");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_write_replaces_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bundle.bin");
        fs::write(&path, b"old").unwrap();

        write_bundle_file(&path, b"new bundle").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new bundle");
    }

    #[test]
    fn test_failed_write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        // Renaming a file over a non-empty directory fails on every platform
        let path = dir.path().join("taken");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"x").unwrap();

        assert!(write_bundle_file(&path, b"bundle").is_err());
        assert!(!temp_path(&path).exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn test_default_output_path() {
        let manifest = QuizManifest::parse("[bundle]\noutput = \"build/bundle.bin\"").unwrap();
        let project = Path::new("quiz");

        assert_eq!(
            default_output_path(project, &manifest, None),
            project.join("build/bundle.bin")
        );
        assert_eq!(
            default_output_path(project, &manifest, Some(PathBuf::from("out.bin"))),
            PathBuf::from("out.bin")
        );

        let bare = QuizManifest::parse("").unwrap();
        assert_eq!(
            default_output_path(project, &bare, None),
            project.join(DEFAULT_OUTPUT)
        );
    }
}
