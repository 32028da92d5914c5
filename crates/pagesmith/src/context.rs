//! Global context for CLI commands

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use pagesmith_core::config::Config;

/// Site root and its configuration
pub struct Context {
    pub root: PathBuf,
    pub config: Config,
    pub verbose: bool,
}

impl Context {
    /// Load `pagesmith.toml` from `root` (or the current directory)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The root directory does not exist
    /// - The config file exists but cannot be read or parsed
    pub fn new(root: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let root = match root {
            Some(root) => root,
            None => env::current_dir()?,
        };
        if !root.is_dir() {
            anyhow::bail!("Site root '{}' is not a directory", root.display());
        }

        tracing::debug!(root = %root.display(), "site root");
        let config = Config::load_or_default(&root)
            .with_context(|| format!("Failed to load config in '{}'", root.display()))?;

        Ok(Self {
            root,
            config,
            verbose,
        })
    }

    /// Resolve a user-supplied path against the current directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    }
}
