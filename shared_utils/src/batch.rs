//! Batch file collection and result accounting.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions the batch loader enumerates. Matching is lowercased, so
/// `A.JPG` is picked up on case-sensitive filesystems too.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "png"];

pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    extensions.contains(&ext.as_str())
}

/// List matching files directly inside `dir`. Non-recursive: files in
/// subfolders (including previous `converted-*` output folders) are never
/// picked up.
pub fn collect_files(dir: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| has_extension(e.path(), extensions))
        .map(|e| e.path().to_path_buf())
        .collect()
}

/// Per-run accounting: every discovered file ends up as exactly one of
/// succeeded, failed or skipped.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: Vec<(PathBuf, String)>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self {
            total: 0,
            succeeded: 0,
            failed: 0,
            skipped: 0,
            errors: Vec::new(),
        }
    }

    pub fn success(&mut self) {
        self.total += 1;
        self.succeeded += 1;
    }

    pub fn fail(&mut self, path: PathBuf, error: String) {
        self.total += 1;
        self.failed += 1;
        self.errors.push((path, error));
    }

    pub fn skip(&mut self) {
        self.total += 1;
        self.skipped += 1;
    }

    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.succeeded as f64 / self.total as f64) * 100.0
        }
    }
}

impl Default for BatchResult {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_has_extension_case_insensitive() {
        assert!(has_extension(Path::new("a.jpg"), IMAGE_EXTENSIONS));
        assert!(has_extension(Path::new("a.JPG"), IMAGE_EXTENSIONS));
        assert!(has_extension(Path::new("a.png"), IMAGE_EXTENSIONS));
        assert!(!has_extension(Path::new("a.jpeg"), IMAGE_EXTENSIONS));
        assert!(!has_extension(Path::new("a.gif"), IMAGE_EXTENSIONS));
        assert!(!has_extension(Path::new("noext"), IMAGE_EXTENSIONS));
    }

    #[test]
    fn test_collect_files_non_recursive() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        fs::write(dir.path().join("b.png"), b"x").unwrap();
        fs::write(dir.path().join("c.txt"), b"x").unwrap();

        let sub = dir.path().join("converted-20250101000000");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("nested.jpg"), b"x").unwrap();

        let mut files = collect_files(dir.path(), IMAGE_EXTENSIONS);
        files.sort();

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.jpg"));
        assert!(files[1].ends_with("b.png"));
    }

    #[test]
    fn test_collect_files_empty_dir() {
        let dir = TempDir::new().unwrap();
        assert!(collect_files(dir.path(), IMAGE_EXTENSIONS).is_empty());
    }

    #[test]
    fn test_batch_result_accounting() {
        let mut result = BatchResult::new();
        result.success();
        result.success();
        result.fail(PathBuf::from("b.png"), "decode error".to_string());
        result.skip();

        assert_eq!(result.total, 4);
        assert_eq!(result.succeeded, 2);
        assert_eq!(result.failed, 1);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.total,
            result.succeeded + result.failed + result.skipped
        );
    }

    #[test]
    fn test_success_rate() {
        let empty = BatchResult::new();
        assert!((empty.success_rate() - 100.0).abs() < 0.01);

        let mut half = BatchResult::new();
        half.success();
        half.fail(PathBuf::from("x.jpg"), "e".to_string());
        assert!((half.success_rate() - 50.0).abs() < 0.01);
    }
}
