//! Locating the configuration for a `check` run.
//!
//! pyscan has no project root: a config file applies to the sources sitting
//! beside it. For an analyzed file `dir/app.py` the first match wins:
//!
//! 1. the `--config` path, used as given
//! 2. `dir/pyscan.toml`, then `dir/.pyscan.toml`
//! 3. `config.toml` in the global directory (`$PYSCAN_CONFIG_DIR`, else
//!    `~/.pyscan/`)
//! 4. built-in defaults

use std::path::{Path, PathBuf};

/// Where the configuration for a run comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`; may not exist.
    Explicit(PathBuf),
    /// A config file in the analyzed file's directory.
    Local(PathBuf),
    /// The user-wide config file.
    Global(PathBuf),
    /// Nothing found; built-in defaults apply.
    Default,
}

impl ConfigSource {
    /// Returns the config file path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Local(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` for the user-wide config file.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

const LOCAL_CONFIG_NAMES: [&str; 2] = ["pyscan.toml", ".pyscan.toml"];

/// Finds the configuration that applies to `target`.
#[must_use]
pub fn resolve(target: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_in(target, explicit, global_config_file())
}

/// Directory searched for local config files: the parent of `target`, or
/// the working directory for a bare file name.
fn search_dir(target: &Path) -> &Path {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn resolve_in(target: &Path, explicit: Option<&Path>, global: Option<PathBuf>) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }

    let dir = search_dir(target);
    if let Some(local) = LOCAL_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
    {
        tracing::debug!("Using config beside {}: {}", target.display(), local.display());
        return ConfigSource::Local(local);
    }

    match global {
        Some(file) if file.is_file() => {
            tracing::debug!("Using global config: {}", file.display());
            ConfigSource::Global(file)
        }
        _ => ConfigSource::Default,
    }
}

/// Path of the user-wide config file, whether or not it exists.
fn global_config_file() -> Option<PathBuf> {
    let dir = match std::env::var_os("PYSCAN_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => home::home_dir()?.join(".pyscan"),
    };
    Some(dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, "").unwrap();
    }

    #[test]
    fn bare_file_name_searches_working_directory() {
        assert_eq!(search_dir(Path::new("app.py")), Path::new("."));
        assert_eq!(search_dir(Path::new("src/app.py")), Path::new("src"));
    }

    #[test]
    fn explicit_path_is_used_even_if_missing() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("pyscan.toml"));

        let result = resolve_in(
            &tmp.path().join("app.py"),
            Some(Path::new("/nonexistent.toml")),
            None,
        );
        assert_eq!(result, ConfigSource::Explicit("/nonexistent.toml".into()));
    }

    #[test]
    fn config_beside_the_file_is_found() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir(&src).unwrap();
        touch(&src.join(".pyscan.toml"));
        // A config one level up does not apply.
        touch(&tmp.path().join("pyscan.toml"));

        let result = resolve_in(&src.join("app.py"), None, None);
        assert_eq!(result, ConfigSource::Local(src.join(".pyscan.toml")));

        touch(&src.join("pyscan.toml"));
        let result = resolve_in(&src.join("app.py"), None, None);
        assert_eq!(result, ConfigSource::Local(src.join("pyscan.toml")));
    }

    #[test]
    fn global_config_is_the_fallback() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        let file = global.path().join("config.toml");

        let target = project.path().join("app.py");
        assert_eq!(
            resolve_in(&target, None, Some(file.clone())),
            ConfigSource::Default
        );

        touch(&file);
        let result = resolve_in(&target, None, Some(file.clone()));
        assert_eq!(result, ConfigSource::Global(file));
        assert!(result.is_global());

        touch(&project.path().join("pyscan.toml"));
        assert!(matches!(
            resolve_in(&target, None, Some(global.path().join("config.toml"))),
            ConfigSource::Local(_)
        ));
    }

    #[test]
    fn default_has_no_path() {
        assert!(ConfigSource::Default.path().is_none());
        assert!(!ConfigSource::Default.is_global());
    }
}
