use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{ Path, PathBuf };

use crate::errors::CheckerResult;
use crate::models::report::{ ErrorReport, Report };

pub const ERROR_REPORT_FILE: &str = "error.json";
pub const SUBMISSION_REPORT_FILE: &str = "data.json";

/// `<root>/<version>/<file_name>`
pub fn report_path(root: &Path, version: &str, file_name: &str) -> PathBuf {
    root.join(version).join(file_name)
}

/// Write a report as pretty-printed JSON under its version directory
pub fn write_report<T: Serialize>(
    root: &Path,
    file_name: &str,
    report: &Report<T>
) -> CheckerResult<PathBuf> {
    let path = report_path(root, &report.version, file_name);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let json = serde_json::to_string_pretty(report)?;
    fs::write(&path, json)?;

    info!("Wrote {} entries to {}", report.content.len(), path.display());
    Ok(path)
}

pub fn write_error_report(root: &Path, report: &ErrorReport) -> CheckerResult<PathBuf> {
    write_report(root, ERROR_REPORT_FILE, report)
}

pub fn read_report<T: DeserializeOwned>(path: &Path) -> CheckerResult<Report<T>> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
