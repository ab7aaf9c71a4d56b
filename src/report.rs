//! Per-record outcome reporting for batch stages.
//!
//! Each orchestration stage processes a list of records (files, class
//! definitions, image entries) and skips the ones that fail their
//! required-field contract or cannot be resolved. Instead of exception-style
//! control flow, skips are recorded here with a structured reason so the
//! summary printed at the end of a stage can say exactly what was left out.

use std::fmt;
use std::path::PathBuf;

/// Why a record was skipped rather than processed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// A required manifest field was absent or empty.
    MissingField { field: &'static str },

    /// The service refused the file content during upload.
    RejectedUpload { path: PathBuf, reason: String },

    /// The manifest names an image that was never uploaded.
    UnknownImage { image_name: String },

    /// Every label on the entry referenced a class that was never created.
    NoResolvableLabels,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingField { field } => write!(f, "missing required field '{field}'"),
            SkipReason::RejectedUpload { path, reason } => {
                write!(f, "rejected by service ({}): {reason}", path.display())
            }
            SkipReason::UnknownImage { image_name } => {
                write!(f, "no uploaded image named '{image_name}'")
            }
            SkipReason::NoResolvableLabels => write!(f, "no label referenced a known class"),
        }
    }
}

/// One skipped record: where it sat in the batch plus why it was skipped.
#[derive(Clone, Debug)]
pub struct Skipped {
    /// Human-readable identity of the record (file name, class name, index).
    pub record: String,
    pub reason: SkipReason,
}

/// Outcome of one batch stage.
#[derive(Debug, Default)]
pub struct StageReport {
    stage: &'static str,
    processed: usize,
    succeeded: usize,
    pub skipped: Vec<Skipped>,
}

impl StageReport {
    pub fn new(stage: &'static str) -> Self {
        Self {
            stage,
            processed: 0,
            succeeded: 0,
            skipped: Vec::new(),
        }
    }

    /// Record a successfully processed record.
    pub fn succeed(&mut self) {
        self.processed += 1;
        self.succeeded += 1;
    }

    /// Record a skipped record with its reason.
    pub fn skip(&mut self, record: impl Into<String>, reason: SkipReason) {
        self.processed += 1;
        self.skipped.push(Skipped {
            record: record.into(),
            reason,
        });
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

impl fmt::Display for StageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} of {} record(s)",
            self.stage, self.succeeded, self.processed
        )?;
        if self.skipped.is_empty() {
            return Ok(());
        }

        writeln!(f, ", {} skipped:", self.skipped.len())?;
        for skip in &self.skipped {
            writeln!(f, "  - {}: {}", skip.record, skip.reason)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_report_has_no_skip_list() {
        let mut report = StageReport::new("uploaded");
        report.succeed();
        report.succeed();

        assert_eq!(report.processed(), 2);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.to_string(), "uploaded: 2 of 2 record(s)");
    }

    #[test]
    fn skips_are_listed_with_reasons() {
        let mut report = StageReport::new("created label classes");
        report.succeed();
        report.skip("entry #2", SkipReason::MissingField { field: "class_name" });

        let rendered = report.to_string();
        assert!(rendered.contains("1 of 2 record(s), 1 skipped"));
        assert!(rendered.contains("entry #2: missing required field 'class_name'"));
    }
}
