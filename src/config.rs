//! User configuration and storage root resolution

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DIR_ENV: &str = "SNIPSTER_DIR";
pub const CONFIG_ENV: &str = "SNIPSTER_CONFIG";

/// Optional settings read from `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Snippet storage root, overridden by `SNIPSTER_DIR`
    pub data_dir: Option<PathBuf>,
    /// Editor used when neither `VISUAL` nor `EDITOR` is set
    pub editor: Option<String>,
    /// Start with fuzzy matching enabled
    pub fuzzy: bool,
    /// Initial border accent index
    pub accent: usize,
}

impl Config {
    pub fn path() -> Option<PathBuf> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
            _ => dirs::config_dir().map(|dir| dir.join("snipster").join("config.toml")),
        }
    }

    /// Loads the user config. A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read config {}", path.display()));
            }
        };

        toml::from_str(&content).with_context(|| format!("Failed to parse config {}", path.display()))
    }
}

/// Resolves and creates the snippet storage root.
///
/// Order: `SNIPSTER_DIR`, the configured `data_dir`, `~/.snipster/snippets`,
/// and `./.snipster/snippets` when the home directory is not writable.
pub fn ensure_data_dir(config: &Config) -> Result<PathBuf> {
    let from_env = std::env::var_os(DIR_ENV)
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from);

    resolve_data_dir(
        from_env,
        config.data_dir.clone(),
        dirs::home_dir(),
        Path::new(".snipster").join("snippets"),
    )
}

fn resolve_data_dir(
    from_env: Option<PathBuf>,
    configured: Option<PathBuf>,
    home: Option<PathBuf>,
    local: PathBuf,
) -> Result<PathBuf> {
    if let Some(dir) = from_env.or(configured) {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        return Ok(dir);
    }

    if let Some(home) = home {
        let root = home.join(".snipster").join("snippets");
        match fs::create_dir_all(&root) {
            Ok(()) => return Ok(root),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                tracing::warn!(root = %root.display(), "home directory not writable");
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to create data directory {}", root.display()));
            }
        }
    }

    fs::create_dir_all(&local)
        .with_context(|| format!("Failed to create data directory {}", local.display()))?;
    tracing::info!(root = %local.display(), "using local data dir");
    Ok(local)
}

/// Directory the log file goes into: the parent of the storage root
pub fn log_dir(data_dir: &Path) -> PathBuf {
    match data_dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => data_dir.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_config_parses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "editor = \"hx\"\nfuzzy = true\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.editor.as_deref(), Some("hx"));
        assert!(config.fuzzy);
        assert_eq!(config.accent, 0);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn invalid_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "fuzzy = \"maybe\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn env_dir_wins_over_config_and_home() {
        let dir = TempDir::new().unwrap();
        let env_dir = dir.path().join("env");
        let root = resolve_data_dir(
            Some(env_dir.clone()),
            Some(dir.path().join("configured")),
            Some(dir.path().join("home")),
            dir.path().join("local"),
        )
        .unwrap();

        assert_eq!(root, env_dir);
        assert!(env_dir.is_dir());
        assert!(!dir.path().join("configured").exists());
    }

    #[test]
    fn home_default_is_created() {
        let dir = TempDir::new().unwrap();
        let root = resolve_data_dir(None, None, Some(dir.path().to_path_buf()), dir.path().join("local")).unwrap();
        assert_eq!(root, dir.path().join(".snipster").join("snippets"));
        assert!(root.is_dir());
    }

    #[test]
    fn no_home_falls_back_to_local() {
        let dir = TempDir::new().unwrap();
        let local = dir.path().join(".snipster").join("snippets");
        let root = resolve_data_dir(None, None, None, local.clone()).unwrap();
        assert_eq!(root, local);
    }

    #[test]
    fn log_dir_is_parent_of_root() {
        assert_eq!(log_dir(Path::new("/home/u/.snipster/snippets")), Path::new("/home/u/.snipster"));
        assert_eq!(log_dir(Path::new("snippets")), Path::new("snippets"));
    }
}
