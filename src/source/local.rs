use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::Source;
use crate::types::{Origin, Record, SourceError};

/// The bundled data file tier: a JSON array of records at a fixed path.
/// Invalid rows are skipped individually; only a missing, unreadable or
/// entirely invalid file falls through to the next tier.
pub struct LocalSource {
    path: PathBuf,
}

impl LocalSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn parse(&self, contents: &str) -> Result<Vec<Record>, SourceError> {
        let rows: Vec<serde_json::Value> = serde_json::from_str(contents)
            .map_err(|err| SourceError::ParseFailed(err.to_string()))?;
        let total = rows.len();

        let records: Vec<Record> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value(row) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!("skipping invalid row in {}: {}", self.path.display(), err);
                    None
                }
            })
            .collect();

        if records.is_empty() {
            return Err(SourceError::ParseFailed(format!(
                "no valid records among {total} rows"
            )));
        }
        Ok(records)
    }
}

impl Source for LocalSource {
    fn origin(&self) -> Origin {
        Origin::LocalFile
    }

    fn load(&self) -> Result<Vec<Record>, SourceError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => self.parse(&contents),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(SourceError::NotFound),
            Err(err) => Err(SourceError::ParseFailed(err.to_string())),
        }
    }
}
