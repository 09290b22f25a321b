//! JSON report sink.
//!
//! The artifact is pretty-printed JSON; field names are fixed by
//! [`AnalysisReport`]'s serde derive. Saving goes through a temporary file in
//! the destination directory and is renamed into place, so a failed write
//! never leaves a truncated report behind.

use crate::domain::ExportError;
use crate::report::AnalysisReport;
use log::info;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File name used when no output path is given.
pub const DEFAULT_REPORT_PATH: &str = "analysis_report.json";

/// Serialize `report` as pretty JSON to any writer.
pub fn write_report<W: Write>(report: &AnalysisReport, writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

/// Write `report` to `path`, replacing any existing file.
pub fn save_report(report: &AnalysisReport, path: &Path) -> Result<(), ExportError> {
    let write_failed = |source: std::io::Error| ExportError::WriteFailed { path: path.to_path_buf(), source };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let tmp = NamedTempFile::new_in(&dir).map_err(write_failed)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        write_report(report, &mut writer)?;
        writer.write_all(b"\n").map_err(write_failed)?;
        writer.flush().map_err(write_failed)?;
    }
    tmp.persist(path).map_err(|e| write_failed(e.error))?;

    info!("wrote {} results to {}", report.total_probes, path.display());
    Ok(())
}

/// Read a report previously written by [`save_report`].
pub fn load_report(path: &Path) -> Result<AnalysisReport, ExportError> {
    let file = File::open(path).map_err(|source| ExportError::ReadFailed { path: path.to_path_buf(), source })?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|source| ExportError::InvalidReport { path: path.to_path_buf(), source })
}
