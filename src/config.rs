//! Shell configuration, read from a TOML file.
//!
//! ```toml
//! state_dir = "/home/me/.local/share/tutor-shell"
//! autosave_delay_ms = 500
//! tilde = "current-user"
//! pipe_input = "allow-list"
//! color = true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("invalid config {path}: {source}")]
    Parse { path: String, source: toml::de::Error },
}

/// What a leading `~` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TildeMode {
    /// Always `/home/user`, whoever is logged in.
    #[default]
    Fixed,
    /// The current user's home directory.
    CurrentUser,
}

/// Which pipeline stages receive the previous stage's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PipeInput {
    /// Every stage.
    #[default]
    All,
    /// Only grep, sort, uniq, wc, head and tail.
    AllowList,
}

pub const PIPE_ALLOW_LIST: &[&str] = &["grep", "sort", "uniq", "wc", "head", "tail"];

impl PipeInput {
    pub fn accepts(self, command: &str) -> bool {
        match self {
            PipeInput::All => true,
            PipeInput::AllowList => PIPE_ALLOW_LIST.contains(&command),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Directory holding saved state. `None` disables persistence.
    pub state_dir: Option<PathBuf>,
    pub autosave_delay_ms: u64,
    pub tilde: TildeMode,
    pub pipe_input: PipeInput,
    pub color: bool,
    pub history_limit: usize,
    pub hostname: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            state_dir: None,
            autosave_delay_ms: 500,
            tilde: TildeMode::Fixed,
            pipe_input: PipeInput::All,
            color: false,
            history_limit: crate::history::MAX_HISTORY_SIZE,
            hostname: "localhost".to_string(),
        }
    }
}

impl ShellConfig {
    pub fn from_toml(text: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse { path: origin.to_string(), source })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let origin = path.display().to_string();
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: origin.clone(), source })?;
        let config = Self::from_toml(&text, &origin)?;
        log::info!("loaded config from {}", origin);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ShellConfig::default();
        assert_eq!(config.autosave_delay_ms, 500);
        assert_eq!(config.tilde, TildeMode::Fixed);
        assert_eq!(config.pipe_input, PipeInput::All);
        assert_eq!(config.history_limit, 1000);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ShellConfig::from_toml("tilde = \"current-user\"\ncolor = true\n", "test").unwrap();
        assert_eq!(config.tilde, TildeMode::CurrentUser);
        assert!(config.color);
        assert_eq!(config.autosave_delay_ms, 500);
        assert_eq!(config.hostname, "localhost");
    }

    #[test]
    fn test_pipe_allow_list() {
        let config = ShellConfig::from_toml("pipe_input = \"allow-list\"", "test").unwrap();
        assert!(config.pipe_input.accepts("grep"));
        assert!(!config.pipe_input.accepts("cat"));
        assert!(PipeInput::All.accepts("cat"));
    }

    #[test]
    fn test_invalid_file() {
        let err = ShellConfig::from_toml("tilde = \"nowhere\"", "shell.toml").unwrap_err();
        assert!(err.to_string().starts_with("invalid config shell.toml"));
    }
}
