//! File system collaborator used by the batch builder

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::error::Result;

/// The I/O a build needs; everything else is pure
pub trait SiteIo {
    fn read_text_file(&self, path: &Path) -> Result<String>;

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>>;

    /// File names (not paths) directly inside `dir` with the given extension, sorted
    fn list_files(&self, dir: &Path, extension: &str) -> Result<Vec<String>>;

    fn write_text_file(&self, path: &Path, text: &str) -> Result<()>;

    fn ensure_directory(&self, path: &Path) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;
}

/// [`SiteIo`] over the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSiteIo;

impl SiteIo for FsSiteIo {
    fn read_text_file(&self, path: &Path) -> Result<String> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        Ok(text)
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        let bytes =
            std::fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))?;
        Ok(bytes)
    }

    fn list_files(&self, dir: &Path, extension: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry =
                entry.with_context(|| format!("failed to list '{}'", dir.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(extension) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }

        Ok(names)
    }

    /// Written through a temp file in the target directory, then renamed into place
    fn write_text_file(&self, path: &Path, text: &str) -> Result<()> {
        use std::io::Write as _;

        let parent = parent_dir(path);
        let mut temp = NamedTempFile::new_in(&parent)
            .with_context(|| format!("failed to create temp file in '{}'", parent.display()))?;
        temp.write_all(text.as_bytes())?;
        temp.persist(path)
            .map_err(|e| e.error)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        Ok(())
    }

    fn ensure_directory(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory '{}'", path.display()))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesmith_testkit::temp_dir_in_workspace;

    #[test]
    fn test_list_files_filters_and_sorts() {
        let temp = temp_dir_in_workspace();
        let dir = temp.path();
        for name in ["b.json", "a.json", "notes.txt", "c.json"] {
            std::fs::write(dir.join(name), "{}").unwrap();
        }
        std::fs::create_dir(dir.join("nested.json")).unwrap();
        std::fs::write(dir.join("nested.json/inner.json"), "{}").unwrap();

        let names = FsSiteIo.list_files(dir, "json").unwrap();
        assert_eq!(names, vec!["a.json", "b.json", "c.json"]);
    }

    #[test]
    fn test_write_text_file_replaces_existing() {
        let temp = temp_dir_in_workspace();
        let path = temp.path().join("out/index.html");
        FsSiteIo.ensure_directory(path.parent().unwrap()).unwrap();

        FsSiteIo.write_text_file(&path, "first").unwrap();
        FsSiteIo.write_text_file(&path, "second").unwrap();

        assert_eq!(FsSiteIo.read_text_file(&path).unwrap(), "second");
        let leftovers = std::fs::read_dir(temp.path().join("out")).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_read_missing_file_is_error() {
        let temp = temp_dir_in_workspace();
        let err = FsSiteIo
            .read_text_file(&temp.path().join("missing.html"))
            .unwrap_err();
        assert!(err.to_string().contains("missing.html"));
    }
}
