// Report writer module
// Writes the plain-text log and the CSV table of successful hashes

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use super::aggregate::ReportRow;
use super::error::HashUtilityError;

/// Header row of the CSV report
pub const CSV_HEADER: [&str; 3] = ["Filename", "Path", "MD5 Hash"];

/// Where reports should be written; each is optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportTargets {
    pub text: Option<PathBuf>,
    pub csv: Option<PathBuf>,
}

impl ReportTargets {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.csv.is_none()
    }
}

/// Writes finished run output to disk
pub struct ReportWriter {
    sort_rows: bool,
}

impl ReportWriter {
    pub fn new() -> Self {
        Self { sort_rows: false }
    }

    /// Sort CSV rows by path instead of keeping arrival order
    pub fn with_sorted_rows(mut self, sort_rows: bool) -> Self {
        self.sort_rows = sort_rows;
        self
    }

    /// Write every requested report
    ///
    /// A failure on one report does not prevent writing the other; all
    /// failures are returned.
    pub fn write_all(
        &self,
        targets: &ReportTargets,
        text_log: &str,
        rows: &[ReportRow],
    ) -> Vec<HashUtilityError> {
        let mut errors = Vec::new();

        if let Some(path) = &targets.text {
            if let Err(e) = self.write_text(path, text_log) {
                errors.push(e);
            }
        }
        if let Some(path) = &targets.csv {
            if let Err(e) = self.write_csv(path, rows) {
                errors.push(e);
            }
        }

        errors
    }

    /// Overwrite `path` with the text log verbatim
    pub fn write_text(&self, path: &Path, text_log: &str) -> Result<(), HashUtilityError> {
        std::fs::write(path, text_log).map_err(|e| report_error(path, e))?;
        tracing::info!("Text report written to {}", path.display());
        Ok(())
    }

    /// Overwrite `path` with a CSV table of the rows
    pub fn write_csv(&self, path: &Path, rows: &[ReportRow]) -> Result<(), HashUtilityError> {
        let file = File::create(path).map_err(|e| report_error(path, e))?;
        let mut writer = BufWriter::new(file);

        let mut ordered: Vec<&ReportRow> = rows.iter().collect();
        if self.sort_rows {
            ordered.sort_by(|a, b| a.path.cmp(&b.path));
        }

        Self::write_csv_rows(&mut writer, &ordered)
            .and_then(|_| writer.flush())
            .map_err(|e| report_error(path, e))?;

        tracing::info!("CSV report written to {} ({} rows)", path.display(), rows.len());
        Ok(())
    }

    /// Write the header and rows, one `\r\n`-terminated record each
    pub fn write_csv_rows(writer: &mut impl Write, rows: &[&ReportRow]) -> io::Result<()> {
        write_record(writer, &CSV_HEADER)?;
        for row in rows {
            let path = row.path.to_string_lossy();
            write_record(writer, &[row.filename.as_str(), &*path, row.digest.as_str()])?;
        }
        Ok(())
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn report_error(path: &Path, err: io::Error) -> HashUtilityError {
    HashUtilityError::ReportWriteError {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

fn write_record(writer: &mut impl Write, fields: &[&str]) -> io::Result<()> {
    let line: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
    write!(writer, "{}\r\n", line.join(","))
}

/// Quote a field when it contains a delimiter, quote or line break
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
