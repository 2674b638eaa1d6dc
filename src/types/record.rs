use serde::{Deserialize, Serialize};

/// One (year, pathogen) observation: counts of positive, negative and
/// optionally unknown screening results.
///
/// Field names are fixed by the data contract: the local data file and the
/// remote store documents both use `Year`, `Pathogen`, `Positive`,
/// `Negative` and `Unknown`. When `Unknown` is present,
/// `positive + negative + unknown` equals the total tested for the pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    pub year: i32,
    pub pathogen: String,
    pub positive: u32,
    pub negative: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown: Option<u32>,
}

impl Record {
    /// Total evaluable tests for this row. Unknown results are reported
    /// separately and never folded into the total.
    pub fn total(&self) -> u32 {
        self.positive + self.negative
    }
}
