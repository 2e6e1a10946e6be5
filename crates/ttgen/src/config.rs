//! Configuration system for ttgen.
//!
//! Loads config from:
//! 1. Global: ~/.config/ttgen/config.toml
//! 2. Per-project: ttgen.toml in the working directory (overrides global),
//!    or the file passed with `--config`
//!
//! Example ttgen.toml:
//! ```toml
//! root = "@vendetta"
//! notice = "Generated file, do not edit"
//! output = "types/vendetta.d.ts"
//! max_depth = 32
//! additions = ["/:plugin:VendettaPluginObject"]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name of the per-project config.
pub const PROJECT_CONFIG: &str = "ttgen.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TtgenConfig {
    /// Root module name.
    pub root: Option<String>,
    /// Comment placed at the top of the output.
    pub notice: Option<String>,
    /// Output file; standard output when unset.
    pub output: Option<PathBuf>,
    /// Maximum module nesting depth.
    pub max_depth: Option<usize>,
    /// Addition directives applied before any given on the command line.
    pub additions: Vec<String>,
}

impl TtgenConfig {
    /// Load the global config merged with the project config in `root`.
    ///
    /// Missing files are skipped; unreadable ones are logged and skipped.
    pub fn load(root: &Path) -> Self {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path()
            && let Some(global) = Self::load_file(&global_path)
        {
            config = config.merge(global);
        }

        let project_path = root.join(PROJECT_CONFIG);
        if let Some(project) = Self::load_file(&project_path) {
            config = config.merge(project);
        }

        config
    }

    /// Load the global config merged with an explicitly requested file.
    ///
    /// Unlike [`TtgenConfig::load`], a missing or invalid explicit file is an error.
    pub fn load_explicit(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        if let Some(global_path) = Self::global_config_path()
            && let Some(global) = Self::load_file(&global_path)
        {
            config = config.merge(global);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let explicit: Self = toml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config.merge(explicit))
    }

    /// Get the global config path.
    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("ttgen").join("config.toml"))
    }

    /// Load config from a file path.
    fn load_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                Some(config)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
                None
            }
        }
    }

    /// Merge another config into this one.
    /// Values set in `other` take precedence; additions accumulate.
    fn merge(self, other: Self) -> Self {
        let mut additions = self.additions;
        additions.extend(other.additions);
        Self {
            root: other.root.or(self.root),
            notice: other.notice.or(self.notice),
            output: other.output.or(self.output),
            max_depth: other.max_depth.or(self.max_depth),
            additions,
        }
    }
}
