//! Metric file naming and discovery.

use std::fmt;
use std::path::{Path, PathBuf};

use iku_model::IkuCode;

use crate::error::{IngestError, Result};

const FILE_PREFIX: &str = "monitoring-iku-";
const FILE_EXTENSION: &str = "xlsx";

/// Which side of the ratio a spreadsheet holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileKind {
    /// Qualifying records.
    Pembilang,
    /// All eligible records.
    Penyebut,
}

impl FileKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            FileKind::Pembilang => "pembilang",
            FileKind::Penyebut => "penyebut",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metric spreadsheet found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub code: IkuCode,
    pub kind: FileKind,
}

/// `monitoring-iku-<code>-<kind>.xlsx`
pub fn metric_file_name(code: IkuCode, kind: FileKind) -> String {
    format!("{FILE_PREFIX}{code}-{kind}.{FILE_EXTENSION}")
}

pub fn metric_file_path(base: &Path, code: IkuCode, kind: FileKind) -> PathBuf {
    base.join(metric_file_name(code, kind))
}

/// Parses a file name produced by [`metric_file_name`].
pub fn parse_metric_file_name(name: &str) -> Option<(IkuCode, FileKind)> {
    let stem = name
        .strip_prefix(FILE_PREFIX)?
        .strip_suffix(FILE_EXTENSION)?
        .strip_suffix('.')?;
    let (code, kind) = stem.rsplit_once('-')?;
    let kind = match kind {
        "pembilang" => FileKind::Pembilang,
        "penyebut" => FileKind::Penyebut,
        _ => return None,
    };
    let code = code.parse::<IkuCode>().ok()?;
    Some((code, kind))
}

/// Lists metric spreadsheets in a directory.
///
/// Files that do not follow the naming convention are ignored. Returns files
/// sorted by filename.
pub fn list_metric_files(dir: &Path) -> Result<Vec<DiscoveredFile>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let parsed = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(parse_metric_file_name);
        if let Some((code, kind)) = parsed {
            files.push(DiscoveredFile { path, code, kind });
        }
    }

    files.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));

    Ok(files)
}
