//! Context handed to every check.

use crate::category::{file_name_base, FileCategory};

use std::path::{Path, PathBuf};

/// What a check knows about the file it is looking at.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Path of the file as given to the analyzer.
    pub path: &'a Path,
    /// Path relative to the analysis root, used in messages.
    pub relative_path: PathBuf,
    /// Category decided from the extension.
    pub category: FileCategory,
    /// C mode: C++-only checks are not run.
    pub c_mode: bool,
}

impl<'a> FileContext<'a> {
    /// Creates a context, deriving the category and relative path.
    #[must_use]
    pub fn new(path: &'a Path, root: &Path, c_mode: bool) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .ok()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| path.to_path_buf(), Path::to_path_buf);
        Self {
            path,
            relative_path,
            category: FileCategory::of(path),
            c_mode,
        }
    }

    /// Context for a file analyzed on its own, as in tests.
    #[must_use]
    pub fn standalone(path: &'a Path) -> Self {
        Self {
            path,
            relative_path: path.to_path_buf(),
            category: FileCategory::of(path),
            c_mode: false,
        }
    }

    /// Returns true if C++-only checks should be skipped for this file.
    #[must_use]
    pub fn is_c_only(&self) -> bool {
        self.c_mode || self.category == FileCategory::SourceC
    }

    /// The file's name without directory, extension or `-inl`.
    #[must_use]
    pub fn base_name(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        file_name_base(&name).to_string()
    }
}
