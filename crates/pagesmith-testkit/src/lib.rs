//! Test utilities for pagesmith
//!
//! This crate provides shared testing utilities used across the pagesmith workspace.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Static mutex to serialize tests that modify environment variables
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Creates a temporary directory within `.tmp/` at the project root
///
/// This ensures all test temporary files are centralized in a single location
/// that is gitignored and easy to clean up manually if needed.
///
/// # Panics
///
/// Panics if the current directory cannot be determined or `.tmp/` cannot be created.
///
/// # Examples
///
/// ```rust
/// use pagesmith_testkit::temp_dir_in_workspace;
///
/// let temp = temp_dir_in_workspace();
/// let file_path = temp.path().join("test.txt");
/// std::fs::write(&file_path, "test data").unwrap();
/// // Cleanup happens automatically when temp is dropped
/// ```
pub fn temp_dir_in_workspace() -> TempDir {
    let workspace_root = std::env::current_dir().expect("Failed to get current directory");

    let tmp_base = workspace_root.join(".tmp");

    // Ensure .tmp/ exists
    std::fs::create_dir_all(&tmp_base).expect("Failed to create .tmp directory");

    // Create unique subdirectory within .tmp/
    TempDir::new_in(&tmp_base).expect("Failed to create temporary directory in .tmp/")
}

/// Run a closure with an environment variable set (or removed when `value` is `None`)
///
/// The previous value is restored afterwards. Holds [`ENV_LOCK`] for the duration,
/// recovering the lock if an earlier test panicked while holding it.
pub fn with_env_var<F, R>(key: &str, value: Option<&str>, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let original = std::env::var(key).ok();

    // SAFETY: We hold ENV_LOCK, ensuring no other test is modifying env vars concurrently.
    unsafe {
        match value {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }
    }

    let result = f();

    // SAFETY: We still hold ENV_LOCK.
    unsafe {
        match original {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }
    }

    result
}

/// Builder for an on-disk site layout used by build tests
///
/// Paths follow the default `pagesmith.toml` layout:
/// templates in `src/templates/`, partials in `src/partials/`,
/// data in `data/<family>/`.
pub struct SiteFixture {
    root: PathBuf,
}

impl SiteFixture {
    /// Create a fixture rooted at `root` with the template and partial directories in place
    pub fn new(root: &Path) -> Self {
        std::fs::create_dir_all(root.join("src/templates")).expect("Failed to create templates dir");
        std::fs::create_dir_all(root.join("src/partials")).expect("Failed to create partials dir");
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Site root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `src/templates/<name>`
    pub fn template(&self, name: &str, content: &str) -> &Self {
        self.write(&format!("src/templates/{name}"), content)
    }

    /// Write `src/partials/<name>`
    pub fn partial(&self, name: &str, content: &str) -> &Self {
        self.write(&format!("src/partials/{name}"), content)
    }

    /// Write `data/<family>/<file>`
    pub fn data(&self, family: &str, file: &str, content: &str) -> &Self {
        self.write(&format!("data/{family}/{file}"), content)
    }

    /// Write `pagesmith.toml`
    pub fn config(&self, content: &str) -> &Self {
        self.write("pagesmith.toml", content)
    }

    /// Write `site-config.json`
    pub fn site_definition(&self, content: &str) -> &Self {
        self.write("site-config.json", content)
    }

    /// Write an arbitrary file relative to the site root, creating parent directories
    pub fn write(&self, relative: &str, content: &str) -> &Self {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        std::fs::write(&path, content)
            .unwrap_or_else(|e| panic!("Failed to write fixture {}: {}", path.display(), e));
        self
    }

    /// Read a file relative to the site root
    pub fn read(&self, relative: &str) -> String {
        let path = self.root.join(relative);
        std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
    }

    /// Whether a file relative to the site root exists
    pub fn exists(&self, relative: &str) -> bool {
        self.root.join(relative).exists()
    }
}
