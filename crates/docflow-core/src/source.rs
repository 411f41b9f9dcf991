//! Discovery and reading of Python source files

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DocflowError;
use crate::log::RunLog;

/// A source file read into memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Directory entry name, e.g. `currency.py`
    pub name: String,
    pub path: PathBuf,
    /// UTF-8 contents with line endings normalized to `\n`
    pub text: String,
}

impl SourceFile {
    /// Read one file as UTF-8
    pub fn read(path: &Path) -> Result<Self, DocflowError> {
        let bytes = fs::read(path).map_err(|source| DocflowError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|_| DocflowError::Decode {
            path: path.to_path_buf(),
        })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            path: path.to_path_buf(),
            text: normalize_newlines(text),
        })
    }
}

/// Enumerates candidate source files in a directory
#[derive(Debug, Clone)]
pub struct SourceLoader {
    extension: String,
}

impl Default for SourceLoader {
    fn default() -> Self {
        Self::new("py")
    }
}

impl SourceLoader {
    #[must_use]
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// Paths of matching entries, sorted by file name
    ///
    /// Only the directory itself is listed. Subdirectories are not entered.
    pub fn discover(&self, dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        let suffix = format!(".{}", self.extension);
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !name.ends_with(&suffix) {
                continue;
            }
            // Skip directories that happen to carry the extension
            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                continue;
            }
            paths.push(entry.path());
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(paths)
    }

    /// Read every matching file, logging and skipping unreadable ones
    pub fn load(&self, dir: &Path, log: &mut RunLog) -> Vec<SourceFile> {
        let paths = match self.discover(dir) {
            Ok(paths) => paths,
            Err(e) => {
                log.error(format!("Could not list directory {}: {e}", dir.display()));
                return Vec::new();
            }
        };
        tracing::debug!(count = paths.len(), dir = %dir.display(), "discovered source files");

        paths
            .iter()
            .filter_map(|path| match SourceFile::read(path) {
                Ok(file) => {
                    tracing::debug!(file = %file.name, bytes = file.text.len(), "read source file");
                    Some(file)
                }
                Err(e) => {
                    log.failure(&e);
                    None
                }
            })
            .collect()
    }
}

fn normalize_newlines(text: String) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    }
}
