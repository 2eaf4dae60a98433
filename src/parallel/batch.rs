//! Parallel parsing of a directory of saved combat reports.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

use crate::parallel::pool::WorkerPool;
use crate::report::{normalize_payload, parse_combat_report, ParsedReport};

/// File extensions picked up by [load_report_dir].
pub const REPORT_EXTENSIONS: &[&str] = &["txt", "xml", "html", "htm"];

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// A report file's name and raw contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub name: String,
    pub contents: String,
}

fn has_report_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| REPORT_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Read every report file directly inside `dir`, sorted by file name.
pub fn load_report_dir(dir: &Path) -> Result<Vec<ReportFile>, BatchError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| BatchError::Io { path, source }
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err(dir))? {
        let path = entry.map_err(io_err(dir))?.path();
        if !path.is_file() || !has_report_extension(&path) {
            continue;
        }
        let contents = fs::read_to_string(&path).map_err(io_err(&path))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        files.push(ReportFile { name, contents });
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(dir = %dir.display(), files = files.len(), "loaded report directory");
    Ok(files)
}

/// Parse all files on `pool`; results are keyed by file name.
pub fn parse_reports_parallel(
    files: &[ReportFile],
    pool: &WorkerPool,
) -> Result<BTreeMap<String, ParsedReport>, BatchError> {
    let parsed = pool.install(|| {
        files
            .par_iter()
            .map(|file| (file.name.clone(), parse_combat_report(&normalize_payload(&file.contents))))
            .collect::<BTreeMap<_, _>>()
    })?;
    info!(reports = parsed.len(), workers = pool.workers, "batch parse finished");
    Ok(parsed)
}

pub fn parse_report_dir(dir: &Path, pool: &WorkerPool) -> Result<BTreeMap<String, ParsedReport>, BatchError> {
    let files = load_report_dir(dir)?;
    parse_reports_parallel(&files, pool)
}
