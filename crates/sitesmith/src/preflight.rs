//! Pre-flight checks on the template directory.
//!
//! Checks run in a fixed order and stop at the first failure, so a missing
//! directory is never reported as an empty one. Nothing is written here.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extension of the files that must be present at the top of the source directory.
pub const RENDERABLE_EXTENSION: &str = "html";

/// Why the source directory cannot be rendered.
#[derive(Debug, thiserror::Error)]
pub enum PreflightError {
    #[error("Error: source directory '{}' not found.", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Error: insufficient permissions to list directory '{}'.", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("Error: cannot list directory '{}': {source}", .path.display())]
    NotListable { path: PathBuf, source: io::Error },

    #[error("Error: no renderable files found in '{}'.", .0.display())]
    NoRenderableFiles(PathBuf),

    #[error("{}", unreadable_message(.0))]
    UnreadableFiles(Vec<PathBuf>),
}

impl PreflightError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::SourceNotFound(_) => 1,
            Self::PermissionDenied { .. } | Self::NotListable { .. } => 2,
            Self::NoRenderableFiles(_) => 3,
            Self::UnreadableFiles(_) => 4,
        }
    }
}

fn unreadable_message(files: &[PathBuf]) -> String {
    let mut message = String::from("Error: the following files are not readable:");
    for file in files {
        message.push_str(&format!("\n - {}", file.display()));
    }
    message.push_str("\nRendering impossible.");
    message
}

/// Run every check against `source_dir`.
///
/// Returns the top-level renderable files, sorted.
pub fn check(source_dir: &Path) -> Result<Vec<PathBuf>, PreflightError> {
    ensure_exists(source_dir)?;
    let entries = list_directory(source_dir)?;
    let templates = renderable_files(source_dir, entries)?;
    ensure_readable(&templates)?;
    Ok(templates)
}

fn ensure_exists(source_dir: &Path) -> Result<(), PreflightError> {
    if source_dir.exists() {
        Ok(())
    } else {
        Err(PreflightError::SourceNotFound(source_dir.to_path_buf()))
    }
}

fn list_directory(source_dir: &Path) -> Result<Vec<PathBuf>, PreflightError> {
    let listing_error = |e: io::Error| match e.kind() {
        io::ErrorKind::PermissionDenied => PreflightError::PermissionDenied {
            path: source_dir.to_path_buf(),
        },
        _ => PreflightError::NotListable {
            path: source_dir.to_path_buf(),
            source: e,
        },
    };

    fs::read_dir(source_dir)
        .map_err(listing_error)?
        .map(|entry| entry.map(|e| e.path()).map_err(listing_error))
        .collect()
}

/// Regular files (symlinks followed) directly under the source directory.
fn renderable_files(
    source_dir: &Path,
    entries: Vec<PathBuf>,
) -> Result<Vec<PathBuf>, PreflightError> {
    let mut templates: Vec<PathBuf> = entries
        .into_iter()
        .filter(|p| p.extension().is_some_and(|ext| ext == RENDERABLE_EXTENSION))
        .filter(|p| p.is_file())
        .collect();

    if templates.is_empty() {
        return Err(PreflightError::NoRenderableFiles(source_dir.to_path_buf()));
    }

    templates.sort();
    Ok(templates)
}

fn ensure_readable(templates: &[PathBuf]) -> Result<(), PreflightError> {
    let unreadable: Vec<PathBuf> = templates
        .iter()
        .filter(|p| fs::File::open(p).is_err())
        .cloned()
        .collect();

    if unreadable.is_empty() {
        Ok(())
    } else {
        Err(PreflightError::UnreadableFiles(unreadable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_directory_is_not_found() {
        let temp = tempdir().unwrap();
        let err = check(&temp.path().join("MyTemplates")).unwrap_err();

        assert!(matches!(err, PreflightError::SourceNotFound(_)));
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn file_instead_of_directory_is_not_listable() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("index.html");
        fs::write(&file, "hi").unwrap();

        let err = check(&file).unwrap_err();

        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn empty_directory_has_nothing_to_render() {
        let temp = tempdir().unwrap();

        let err = check(temp.path()).unwrap_err();

        assert!(matches!(err, PreflightError::NoRenderableFiles(_)));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn only_top_level_html_files_count() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("readme.txt"), "text").unwrap();
        fs::create_dir_all(temp.path().join("pages")).unwrap();
        fs::write(temp.path().join("pages/about.html"), "nested").unwrap();
        fs::create_dir_all(temp.path().join("folder.html")).unwrap();

        let err = check(temp.path()).unwrap_err();

        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn returns_sorted_templates() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("b.html"), "b").unwrap();
        fs::write(temp.path().join("a.html"), "a").unwrap();
        fs::write(temp.path().join("style.css"), "css").unwrap();

        let templates = check(temp.path()).unwrap();

        assert_eq!(
            templates,
            vec![temp.path().join("a.html"), temp.path().join("b.html")]
        );
    }

    #[test]
    fn unreadable_message_lists_each_file() {
        let err = PreflightError::UnreadableFiles(vec![
            PathBuf::from("MyTemplates/a.html"),
            PathBuf::from("MyTemplates/b.html"),
        ]);

        assert_eq!(
            err.to_string(),
            "Error: the following files are not readable:\n - MyTemplates/a.html\n - MyTemplates/b.html\nRendering impossible."
        );
        assert_eq!(err.exit_code(), 4);
    }

    #[cfg(unix)]
    mod permissions {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn chmod(path: &Path, mode: u32) {
            fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
        }

        #[test]
        fn unlistable_directory() {
            let temp = tempdir().unwrap();
            let src = temp.path().join("src");
            fs::create_dir_all(&src).unwrap();
            fs::write(src.join("index.html"), "hi").unwrap();
            chmod(&src, 0o000);

            // Privileged users can list anything
            if fs::read_dir(&src).is_ok() {
                chmod(&src, 0o755);
                return;
            }

            let err = check(&src).unwrap_err();
            chmod(&src, 0o755);

            assert!(matches!(err, PreflightError::PermissionDenied { .. }));
            assert_eq!(err.exit_code(), 2);
        }

        #[test]
        fn unreadable_templates_are_all_reported() {
            let temp = tempdir().unwrap();
            fs::write(temp.path().join("a.html"), "a").unwrap();
            fs::write(temp.path().join("b.html"), "b").unwrap();
            fs::write(temp.path().join("c.html"), "c").unwrap();
            chmod(&temp.path().join("b.html"), 0o000);
            chmod(&temp.path().join("c.html"), 0o000);

            if fs::File::open(temp.path().join("b.html")).is_ok() {
                return;
            }

            let err = check(temp.path()).unwrap_err();

            match err {
                PreflightError::UnreadableFiles(files) => assert_eq!(
                    files,
                    vec![temp.path().join("b.html"), temp.path().join("c.html")]
                ),
                other => panic!("unexpected error: {other}"),
            }
        }
    }
}
