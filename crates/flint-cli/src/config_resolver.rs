//! Locates the configuration file for a run.
//!
//! Priority order:
//!
//! 1. `--config PATH` (or `$FLINT_CONFIG`)
//! 2. `flint.toml` or `.flint.toml` in the project directory or the nearest
//!    ancestor that has one
//! 3. `$FLINT_CONFIG_DIR/config.toml`, else `~/.flint/config.toml`
//! 4. built-in defaults

use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given on the command line.
    Explicit(PathBuf),
    /// Found next to the sources.
    Project(PathBuf),
    /// Per-user configuration.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Returns the file to load, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` for the per-user configuration.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

const PROJECT_CONFIG_NAMES: &[&str] = &["flint.toml", ".flint.toml"];
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration for sources under `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_with_global(project_dir, explicit, global_config_dir())
}

fn resolve_with_global(project_dir: &Path, explicit: Option<&Path>, global_dir: Option<PathBuf>) -> ConfigSource {
    // An explicit path is used as given; a missing file fails at load time.
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = find_project_config(project_dir) {
        debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, |candidate| {
            debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        })
}

/// Nearest `flint.toml` or `.flint.toml` at or above `start`.
fn find_project_config(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());
    start.ancestors().find_map(|dir| {
        PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

/// Per-user configuration directory: `$FLINT_CONFIG_DIR`, else `~/.flint`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    match std::env::var_os("FLINT_CONFIG_DIR") {
        Some(dir) => Some(PathBuf::from(dir)),
        None => home::home_dir().map(|h| h.join(".flint")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_wins_and_is_not_checked() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("flint.toml"), "").unwrap();
        let explicit = Path::new("/nonexistent/custom.toml");

        let result = resolve_with_global(tmp.path(), Some(explicit), None);
        assert_eq!(result, ConfigSource::Explicit(explicit.to_path_buf()));
    }

    #[test]
    fn project_config_in_ancestor() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("src/net");
        fs::create_dir_all(&nested).unwrap();
        fs::write(tmp.path().join(".flint.toml"), "").unwrap();

        let result = resolve_with_global(&nested, None, None);
        let found = result.path().map(Path::to_path_buf);
        assert!(matches!(result, ConfigSource::Project(_)));
        assert_eq!(found.and_then(|p| p.file_name().map(|n| n.to_os_string())), Some(".flint.toml".into()));
    }

    #[test]
    fn plain_name_preferred_over_dot_name() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("flint.toml"), "").unwrap();
        fs::write(tmp.path().join(".flint.toml"), "").unwrap();

        let result = resolve_with_global(tmp.path(), None, None);
        assert!(result.path().is_some_and(|p| p.ends_with("flint.toml") && !p.ends_with(".flint.toml")));
    }

    #[test]
    fn global_used_only_without_project_config() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();

        let none = resolve_with_global(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(none, ConfigSource::Default);

        fs::write(global.path().join("config.toml"), "").unwrap();
        let result = resolve_with_global(project.path(), None, Some(global.path().to_path_buf()));
        assert!(result.is_global());
        assert_eq!(result.path(), Some(global.path().join("config.toml").as_path()));
    }
}
