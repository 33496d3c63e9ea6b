//! Copy static assets next to the rendered site.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::config::AssetsConfig;

/// Name of the asset directory inside the output directory.
pub const ASSETS_DIR: &str = "assets";

/// What was copied.
#[derive(Debug, Default)]
pub struct AssetReport {
    /// Number of files copied from the asset directory
    pub files: usize,

    /// Destination of the copied script, if one was present
    pub script: Option<PathBuf>,
}

/// Copy the asset directory and the script into `output_dir`.
///
/// A missing source is skipped; an error while copying one that exists is not.
pub fn copy_assets(config: &AssetsConfig, output_dir: &Path) -> Result<AssetReport> {
    let mut report = AssetReport::default();

    if config.dir.exists() {
        let dest = output_dir.join(ASSETS_DIR);
        report.files = copy_dir(&config.dir, &dest)?;
        tracing::info!("Copied {} asset(s) from {}", report.files, config.dir.display());
    } else {
        tracing::debug!("No asset directory at {}, skipping", config.dir.display());
    }

    if config.script.exists() {
        let name = config
            .script
            .file_name()
            .with_context(|| format!("{} has no file name", config.script.display()))?;
        let dest = output_dir.join(name);
        fs::copy(&config.script, &dest).with_context(|| {
            format!("copy {} -> {}", config.script.display(), dest.display())
        })?;
        tracing::info!("Copied script {}", config.script.display());
        report.script = Some(dest);
    } else {
        tracing::debug!("No script at {}, skipping", config.script.display());
    }

    Ok(report)
}

/// Recursively copy `src` into `dest`, overwriting existing files.
fn copy_dir(src: &Path, dest: &Path) -> Result<usize> {
    anyhow::ensure!(src.is_dir(), "{} is not a directory", src.display());

    let mut count = 0;

    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.with_context(|| format!("walk {}", src.display()))?;
        let relative = entry.path().strip_prefix(src)?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("create {}", target.display()))?;
        } else {
            fs::copy(entry.path(), &target).with_context(|| {
                format!("copy {} -> {}", entry.path().display(), target.display())
            })?;
            count += 1;
        }
    }

    Ok(count)
}
