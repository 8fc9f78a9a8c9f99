//! Append-only run logs.
//!
//! A run produces two kinds of log lines: timestamped free-text events and
//! `x;y` scalar pairs (the conversion time series). Both go through
//! [`RunLog`], which flushes after every line so the conversion history
//! survives an aborted run. Log I/O failures are fatal to the simulation;
//! the history is part of the result.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch, zero if the clock is unreadable.
fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// A line-flushed text log for one simulation run.
pub struct RunLog {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl RunLog {
    /// Create `{name}_{timestamp}.asc` inside `dir`.
    pub fn create(dir: &Path, name: &str) -> io::Result<Self> {
        let path = dir.join(format!("{}_{}.asc", name, epoch_secs()));
        let writer = BufWriter::new(File::create(&path)?);
        Ok(Self { writer, path })
    }

    /// Where this log lives on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a timestamped free-text line.
    pub fn log_text(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.writer, "{}: {}", epoch_secs(), message)?;
        self.writer.flush()
    }

    /// Write a free-text line without a timestamp.
    pub fn log_simple_text(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", message)?;
        self.writer.flush()
    }

    /// Append one `x;y` pair to the scalar series.
    pub fn log_xy(&mut self, x: u64, y: f64) -> io::Result<()> {
        writeln!(self.writer, "{};{}", x, y)?;
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_land_on_disk_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = RunLog::create(dir.path(), "conversion").unwrap();
        log.log_simple_text("run started").unwrap();
        log.log_xy(100, 0.25).unwrap();

        // No drop, no explicit flush beyond the per-line one.
        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents, "run started\n100;0.25\n");
    }

    #[test]
    fn filename_carries_name_and_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let log = RunLog::create(dir.path(), "kagome").unwrap();
        let name = log.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("kagome_"));
        assert!(name.ends_with(".asc"));
    }

    #[test]
    fn timestamped_lines_have_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = RunLog::create(dir.path(), "events").unwrap();
        log.log_text("seeded 4 sites").unwrap();
        let contents = std::fs::read_to_string(log.path()).unwrap();
        let (stamp, rest) = contents.split_once(": ").unwrap();
        assert!(stamp.parse::<u64>().is_ok());
        assert_eq!(rest, "seeded 4 sites\n");
    }
}
