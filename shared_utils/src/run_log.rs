//! Run log: the ordered, human-readable status lines of one execution.
//!
//! Lines are echoed to the console as they are produced and kept in memory
//! so the full log can be written verbatim to `stats.log` in the output
//! folder at the end of the run. The buffer is an explicit value passed by
//! `&mut` through the pipeline stages; there is no global accumulator.

use chrono::Local;
use std::fs;
use std::path::Path;

/// File name of the persisted run log inside the output folder.
pub const STATS_LOG_NAME: &str = "stats.log";

#[derive(Debug, Default)]
pub struct RunLog {
    lines: Vec<String>,
}

impl RunLog {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// New run log opened with a session header line.
    pub fn session_header(program_name: &str) -> Self {
        let mut log = Self::new();
        log.info(&format!(
            "==== {} run {} ====",
            program_name,
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        log
    }

    /// Status line: stdout + buffer.
    pub fn info(&mut self, line: &str) {
        println!("{}", line);
        self.lines.push(line.to_string());
    }

    /// Warning line: stderr + buffer, so load/save failures show up in
    /// `stats.log` too.
    pub fn warn(&mut self, line: &str) {
        let line = format!("⚠️  {}", line);
        eprintln!("{}", line);
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Write the buffered log verbatim. Callers treat a failure here as
    /// console-only news; it never affects the processing result.
    pub fn persist(&self, path: &Path) -> std::io::Result<()> {
        let mut body = self.lines.join("\n");
        body.push('\n');
        fs::write(path, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lines_buffered_in_order() {
        let mut log = RunLog::new();
        log.info("first");
        log.warn("second");
        log.info("third");

        assert_eq!(log.lines().len(), 3);
        assert_eq!(log.lines()[0], "first");
        assert!(log.lines()[1].contains("second"));
        assert_eq!(log.lines()[2], "third");
    }

    #[test]
    fn test_session_header_contains_program_name() {
        let log = RunLog::session_header("img-resize");
        assert_eq!(log.lines().len(), 1);
        assert!(log.lines()[0].contains("img-resize"));
    }

    #[test]
    fn test_persist_writes_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STATS_LOG_NAME);

        let mut log = RunLog::new();
        log.info("Processed: a.jpg | Original: 800x600 | New: 400x300 | Time: 12ms");
        log.info("Total files processed: 1");
        log.persist(&path).unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.contains("Processed: a.jpg"));
        assert!(body.ends_with("Total files processed: 1\n"));
    }

    #[test]
    fn test_persist_to_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope").join(STATS_LOG_NAME);

        let mut log = RunLog::new();
        log.info("line");
        assert!(log.persist(&path).is_err());
    }
}
