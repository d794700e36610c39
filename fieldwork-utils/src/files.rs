//! Recursive file search filtered by extension.

use crate::error::{Result, UtilsError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Regular files below a directory whose extension is in a given list.
///
/// Unreadable subdirectories are skipped.
pub struct ExtensionFilteredFiles {
    walker: walkdir::IntoIter,
    extensions: Vec<String>,
}

impl Iterator for ExtensionFilteredFiles {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    trace!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let matches = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| self.extensions.iter().any(|e| e == ext))
                .unwrap_or(false);

            if matches {
                return Some(entry.into_path());
            }
        }
    }
}

/// Find files below `path` with one of `extensions` (compared exactly, without the dot).
///
/// `path` must be a readable directory.
pub fn find_files_with_extensions<P, I, S>(path: P, extensions: I) -> Result<ExtensionFilteredFiles>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let path = path.as_ref();
    if !path.is_dir() || fs::read_dir(path).is_err() {
        return Err(UtilsError::InvalidPath(path.to_path_buf()));
    }

    let extensions: Vec<String> = extensions.into_iter().map(Into::into).collect();
    if extensions.is_empty() {
        return Err(UtilsError::NoExtensions);
    }

    debug!("Searching {} for extensions {:?}", path.display(), extensions);
    Ok(ExtensionFilteredFiles {
        walker: WalkDir::new(path).into_iter(),
        extensions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_recursive_match() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.rs");
        touch(dir.path(), "b.txt");
        touch(dir.path(), "nested/deep/c.rs");
        touch(dir.path(), "nested/d.RS");
        fs::create_dir_all(dir.path().join("folder.rs")).unwrap();

        let mut found: Vec<_> = find_files_with_extensions(dir.path(), ["rs"])
            .unwrap()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        found.sort();

        assert_eq!(
            found,
            vec![PathBuf::from("a.rs"), PathBuf::from("nested/deep/c.rs")]
        );
    }

    #[test]
    fn test_multiple_extensions() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.jpg");
        touch(dir.path(), "b.png");
        touch(dir.path(), "c.gif");
        touch(dir.path(), "noext");

        let count = find_files_with_extensions(dir.path(), ["jpg", "png"])
            .unwrap()
            .count();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_invalid_arguments() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "file.txt");

        assert!(matches!(
            find_files_with_extensions(dir.path().join("missing"), ["txt"]),
            Err(UtilsError::InvalidPath(_))
        ));
        assert!(matches!(
            find_files_with_extensions(dir.path().join("file.txt"), ["txt"]),
            Err(UtilsError::InvalidPath(_))
        ));
        assert!(matches!(
            find_files_with_extensions(dir.path(), Vec::<String>::new()),
            Err(UtilsError::NoExtensions)
        ));
    }
}
