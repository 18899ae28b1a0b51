// Result aggregation module
// Builds the text log and report rows from results in arrival order

use std::path::PathBuf;
use super::hash::{HashOutcome, HashResult};

/// One row of the tabular report (successful results only)
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ReportRow {
    pub filename: String,
    pub path: PathBuf,
    pub digest: String,
}

/// Accumulates results into a text log and a row set
#[derive(Debug, Default)]
pub struct ResultAggregator {
    text_log: String,
    rows: Vec<ReportRow>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Format the log line for a result, including the trailing newline
    pub fn format_line(result: &HashResult) -> String {
        match &result.outcome {
            HashOutcome::Digest(digest) => format!("{}: {}\n", result.full_path.display(), digest),
            HashOutcome::Error(error) => {
                format!("Error hashing {}: {}\n", result.full_path.display(), error)
            }
        }
    }

    /// Record a result and return its log line for live display
    pub fn push(&mut self, result: &HashResult) -> String {
        let line = Self::format_line(result);
        self.text_log.push_str(&line);

        if let HashOutcome::Digest(digest) = &result.outcome {
            self.rows.push(ReportRow {
                filename: result.filename.clone(),
                path: result.full_path.clone(),
                digest: digest.clone(),
            });
        }

        line
    }

    pub fn text_log(&self) -> &str {
        &self.text_log
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn into_parts(self) -> (String, Vec<ReportRow>) {
        (self.text_log, self.rows)
    }
}
