//! Tension Trace Logger
//!
//! Append-only JSONL log of tension samples, one line per step.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use bias_events::TensionSample;

use crate::error::SimError;

/// Writes tension samples to a JSONL file
pub struct TraceLogger {
    writer: Option<BufWriter<File>>,
    sample_count: u64,
}

impl TraceLogger {
    /// Create a new logger writing to the specified path
    pub fn new(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            sample_count: 0,
        })
    }

    /// Create a logger that discards samples (for testing)
    pub fn null() -> Self {
        Self {
            writer: None,
            sample_count: 0,
        }
    }

    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// Log a sample to the file
    pub fn log(&mut self, sample: &TensionSample) -> Result<(), SimError> {
        self.sample_count += 1;
        if let Some(ref mut writer) = self.writer {
            writeln!(writer, "{}", sample.to_jsonl()?)?;
        }
        Ok(())
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> Result<(), SimError> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for TraceLogger {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_logger_counts() {
        let mut logger = TraceLogger::null();
        for sample in bias_events::fixtures::sample_trace() {
            logger.log(&sample).unwrap();
        }
        assert_eq!(logger.sample_count(), 3);
    }

    #[test]
    fn test_trace_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tension.jsonl");
        let samples = bias_events::fixtures::sample_trace();

        {
            let mut logger = TraceLogger::new(&path).unwrap();
            for sample in &samples {
                logger.log(sample).unwrap();
            }
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<TensionSample> = content
            .lines()
            .map(|l| TensionSample::from_jsonl(l).unwrap())
            .collect();
        assert_eq!(parsed, samples);
    }
}
