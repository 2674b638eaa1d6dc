//! Plain-text rendering of the resolved dataset: overall statistics plus a
//! per-pathogen summary table grouped by taxonomy.

use std::fmt::Write;

use crate::stats::{self, PathogenGroup, SummaryRow};
use crate::types::Dataset;

pub fn render(dataset: &Dataset) -> String {
    let mut out = String::new();
    let stats = stats::statistics(&dataset.records);

    let _ = writeln!(
        out,
        "{} records from {}",
        dataset.len(),
        dataset.origin
    );
    if let Some((first, last)) = stats.year_range {
        let _ = writeln!(
            out,
            "{} pathogens, {} years ({first}-{last})",
            stats.pathogen_count, stats.years_count
        );
    }
    let _ = writeln!(
        out,
        "samples: {} ({} positive / {} negative, {:.1}% positive)",
        stats.total_samples,
        stats.total_positive,
        stats.total_negative,
        stats.positive_ratio * 100.0
    );

    let rows = stats::summary_rows(&dataset.records);
    for group in PathogenGroup::ALL {
        let members: Vec<&SummaryRow> = rows
            .iter()
            .filter(|row| PathogenGroup::of(&row.pathogen) == group)
            .collect();
        if members.is_empty() {
            continue;
        }

        let _ = writeln!(out, "\n{}", group.label());
        let _ = writeln!(
            out,
            "  {:<18} {:>8} {:>8} {:>8} {:>7}",
            "pathogen", "pos", "neg", "total", "pos%"
        );
        for row in members {
            let _ = writeln!(
                out,
                "  {:<18} {:>8} {:>8} {:>8} {:>6.1}%",
                row.pathogen, row.positive_sum, row.negative_sum, row.total_sum, row.positive_pct
            );
        }
    }

    out
}
