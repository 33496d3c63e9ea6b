//! Output directory lifecycle.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Remove whatever is at `output_dir` and create it again, empty.
///
/// Refuses an output path that is the source directory, one of its
/// ancestors, or somewhere inside it.
pub fn prepare_output_dir(output_dir: &Path, source_dir: &Path) -> Result<()> {
    ensure_apart(output_dir, source_dir)?;

    if fs::symlink_metadata(output_dir).is_ok() {
        remove_any(output_dir)?;
        tracing::debug!("Removed previous output {}", output_dir.display());
    }

    fs::create_dir_all(output_dir).with_context(|| format!("create {}", output_dir.display()))
}

fn ensure_apart(output_dir: &Path, source_dir: &Path) -> Result<()> {
    let output = resolve(output_dir)?;
    let source = resolve(source_dir)?;

    anyhow::ensure!(
        !source.starts_with(&output),
        "refusing to remove {}: it contains the source directory {}",
        output_dir.display(),
        source_dir.display()
    );
    anyhow::ensure!(
        !output.starts_with(&source),
        "refusing to write {}: it is inside the source directory {}",
        output_dir.display(),
        source_dir.display()
    );

    Ok(())
}

/// Absolute form of `path` with its longest existing prefix canonicalized.
fn resolve(path: &Path) -> Result<PathBuf> {
    let absolute =
        std::path::absolute(path).with_context(|| format!("resolve {}", path.display()))?;

    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(canonical) = fs::canonicalize(existing) {
            return Ok(missing.iter().rev().fold(canonical, |acc, part| acc.join(part)));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name);
                existing = parent;
            }
            _ => return Ok(absolute.clone()),
        }
    }
}

/// Remove a path regardless of whether it is a file, symlink, or directory.
fn remove_any(p: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(p).with_context(|| format!("stat {}", p.display()))?;

    if meta.is_dir() {
        fs::remove_dir_all(p)
    } else {
        fs::remove_file(p)
    }
    .with_context(|| format!("remove {}", p.display()))
}
