//! File classification by extension.

use serde::Serialize;
use std::path::Path;

const HEADER_EXTENSIONS: &[&str] = &[".h", ".hpp", ".hh"];
const C_EXTENSIONS: &[&str] = &[".c"];
const CPP_EXTENSIONS: &[&str] = &[".C", ".cc", ".cpp", ".CPP", ".c++", ".cp", ".cxx"];

/// Kind of source file, decided by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    /// `.h`, `.hpp`, `.hh`
    Header,
    /// A header whose stem ends in `-inl`.
    InlHeader,
    /// `.c`
    SourceC,
    /// `.cpp`, `.cc` and friends.
    SourceCpp,
    /// Anything else; not linted.
    Unknown,
}

impl FileCategory {
    /// Classifies `path`. Extensions are case-sensitive: `.C` is C++.
    #[must_use]
    pub fn of(path: &Path) -> Self {
        let path = path.to_string_lossy();
        for ext in HEADER_EXTENSIONS {
            if path.ends_with(&format!("-inl{ext}")) {
                return Self::InlHeader;
            }
            if path.ends_with(ext) {
                return Self::Header;
            }
        }
        if C_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
            return Self::SourceC;
        }
        if CPP_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
            return Self::SourceCpp;
        }
        Self::Unknown
    }

    /// Returns true for headers and inline headers.
    #[must_use]
    pub fn is_header(self) -> bool {
        matches!(self, Self::Header | Self::InlHeader)
    }

    /// Returns true for C and C++ sources.
    #[must_use]
    pub fn is_source(self) -> bool {
        matches!(self, Self::SourceC | Self::SourceCpp)
    }

    /// Returns true for any recognised category.
    #[must_use]
    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

/// Returns `path` with its recognised extension (and any `-inl`) removed.
///
/// Unrecognised paths are returned unchanged.
#[must_use]
pub fn file_name_base(path: &str) -> &str {
    for ext in HEADER_EXTENSIONS {
        if let Some(base) = path.strip_suffix(ext) {
            return base.strip_suffix("-inl").unwrap_or(base);
        }
    }
    C_EXTENSIONS
        .iter()
        .chain(CPP_EXTENSIONS)
        .find_map(|ext| path.strip_suffix(ext))
        .unwrap_or(path)
}
