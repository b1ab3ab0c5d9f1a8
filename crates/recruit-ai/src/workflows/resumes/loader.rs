use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Résumé text read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeDocument {
    pub path: PathBuf,
    pub text: String,
}

/// A single résumé that could not be read; the rest of the batch continues.
#[derive(Debug, thiserror::Error)]
#[error("unable to read résumé {path}: {source}")]
pub struct FileAccessError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Failures that stop the résumé pipeline as a whole.
#[derive(Debug, thiserror::Error)]
pub enum ResumeError {
    #[error("unable to list résumé directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Default)]
pub struct LoadedResumes {
    pub documents: Vec<ResumeDocument>,
    pub skipped: Vec<FileAccessError>,
}

/// Reads every regular file in a directory as UTF-8 text.
#[derive(Debug, Clone)]
pub struct ResumeLoader {
    directory: PathBuf,
}

impl ResumeLoader {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Files are returned sorted by path. Non-UTF-8 content is rejected as unreadable.
    pub fn load(&self) -> Result<LoadedResumes, ResumeError> {
        let mut paths = self.list_files()?;
        paths.sort();

        let mut loaded = LoadedResumes::default();
        for path in paths {
            match fs::read_to_string(&path) {
                Ok(text) => {
                    debug!(path = %path.display(), bytes = text.len(), "read résumé");
                    loaded.documents.push(ResumeDocument { path, text });
                }
                Err(source) => {
                    warn!(path = %path.display(), error = %source, "skipping unreadable résumé");
                    loaded.skipped.push(FileAccessError { path, source });
                }
            }
        }

        Ok(loaded)
    }

    fn list_files(&self) -> Result<Vec<PathBuf>, ResumeError> {
        let directory_error = |source| ResumeError::Directory {
            path: self.directory.clone(),
            source,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.directory).map_err(directory_error)? {
            let entry = entry.map_err(directory_error)?;
            let path = entry.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_regular_files_in_path_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("b.txt"), "second").expect("write b");
        fs::write(dir.path().join("a.txt"), "first").expect("write a");
        fs::create_dir(dir.path().join("nested")).expect("nested dir");

        let loaded = ResumeLoader::new(dir.path()).load().expect("directory loads");
        let texts: Vec<&str> = loaded.documents.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn non_utf8_file_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("binary.pdf"), [0xff, 0xfe, 0x00, 0x9f]).expect("write");
        fs::write(dir.path().join("ok.txt"), "Rust").expect("write");

        let loaded = ResumeLoader::new(dir.path()).load().expect("directory loads");
        assert_eq!(loaded.documents.len(), 1);
        assert_eq!(loaded.skipped.len(), 1);
        assert!(loaded.skipped[0].path.ends_with("binary.pdf"));
    }

    #[test]
    fn missing_directory_is_fatal() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent");
        let err = ResumeLoader::new(&missing).load().expect_err("missing dir");
        assert!(matches!(err, ResumeError::Directory { .. }));
    }
}
