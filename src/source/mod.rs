mod builtin;
mod local;
mod remote;

pub use builtin::BuiltinSource;
pub use local::LocalSource;
pub use remote::RemoteSource;

use tracing::{info, warn};

use crate::configuration::Settings;
use crate::types::{Dataset, Origin, Record, SourceError};

/// One tier of the fallback chain.
pub trait Source {
    fn origin(&self) -> Origin;
    fn load(&self) -> Result<Vec<Record>, SourceError>;
}

/// Tries the remote store, the local data file and the built-in table in that
/// order and returns the first dataset that loads. Holds no state between
/// calls; repeated resolutions are independent.
pub struct Resolver {
    sources: Vec<Box<dyn Source>>,
}

impl Resolver {
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(vec![
            Box::new(RemoteSource::new(settings)),
            Box::new(LocalSource::new(&settings.data_file)),
            Box::new(BuiltinSource),
        ])
    }

    fn new(sources: Vec<Box<dyn Source>>) -> Self {
        Self { sources }
    }

    /// Resolve a dataset. Never fails: every source error is absorbed and
    /// logged, and the built-in table at the end of the chain cannot fail.
    pub fn resolve(&self) -> Dataset {
        for source in &self.sources {
            match source.load() {
                Ok(records) => {
                    info!("resolved {} records from {}", records.len(), source.origin());
                    return Dataset::new(source.origin(), records);
                }
                Err(err) => {
                    warn!("{} unavailable: {}", source.origin(), err);
                }
            }
        }
        Dataset::new(Origin::BuiltinTable, builtin::table())
    }

    /// Probe every source independently and report what each would yield.
    /// Advisory only: probing never changes what `resolve` picks.
    pub fn probe(&self) -> Vec<(Origin, Result<usize, SourceError>)> {
        self.sources
            .iter()
            .map(|source| (source.origin(), source.load().map(|records| records.len())))
            .collect()
    }
}
