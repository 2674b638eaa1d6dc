use std::fmt;

use super::Record;

/// Which tier of the fallback chain produced a dataset. Informational only:
/// consumers treat records the same regardless of where they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    RemoteStore,
    LocalFile,
    BuiltinTable,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Origin::RemoteStore => "remote store",
            Origin::LocalFile => "local file",
            Origin::BuiltinTable => "built-in table",
        };
        f.write_str(name)
    }
}

/// The resolved collection of records, tagged with the source that served it.
/// Insertion order carries no meaning; consumers sort and filter as needed.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub origin: Origin,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(origin: Origin, records: Vec<Record>) -> Self {
        Self { origin, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keep only records inside the inclusive year range and, when
    /// `pathogens` is non-empty, matching one of the named pathogens.
    pub fn filtered(
        &self,
        from_year: Option<i32>,
        to_year: Option<i32>,
        pathogens: &[String],
    ) -> Dataset {
        let records = self
            .records
            .iter()
            .filter(|record| from_year.map_or(true, |from| record.year >= from))
            .filter(|record| to_year.map_or(true, |to| record.year <= to))
            .filter(|record| {
                pathogens.is_empty() || pathogens.iter().any(|name| name == &record.pathogen)
            })
            .cloned()
            .collect();

        Dataset::new(self.origin, records)
    }
}
