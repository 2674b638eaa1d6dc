//! Chart-feed aggregation: pure functions over resolved records that prepare
//! the tables an external presentation layer draws from.
//!
//! Totals always mean `positive + negative`. Unknown results are reported
//! where present but never folded into a total.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::types::Record;

/// Which count a grid or series reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Metric {
    Positive,
    Negative,
    Total,
}

impl Metric {
    pub fn of(self, record: &Record) -> u32 {
        match self {
            Metric::Positive => record.positive,
            Metric::Negative => record.negative,
            Metric::Total => record.total(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Positive => "Positive",
            Metric::Negative => "Negative",
            Metric::Total => "Total",
        }
    }
}

/// Taxonomy group a pathogen belongs to, matching the dashboard's category
/// tabs. Names outside the known lists fall into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PathogenGroup {
    Bacteria,
    Viruses,
    Fungi,
    Parasites,
    Other,
}

const BACTERIA: &[&str] = &[
    "Bartonella",
    "Borrelia",
    "Brucella",
    "Chlamydia",
    "Eubacteria",
    "Helicobacter",
    "Lues",
    "Mycobacteria",
    "Nocardien",
    "Tropheryma whipp",
    "Tularensis",
    "Yersina",
];
const VIRUSES: &[&str] = &[
    "SARS-CoV2",
    "EBV",
    "HHV8",
    "HPV",
    "HSV1&2",
    "MCPyV",
    "MV Zytomeg",
    "Varizella",
];
const FUNGI: &[&str] = &["Aspergilus", "Mucor-Mykosen", "Panfungal"];
const PARASITES: &[&str] = &["Echinococcus", "Leishmania"];

impl PathogenGroup {
    pub const ALL: [PathogenGroup; 5] = [
        PathogenGroup::Bacteria,
        PathogenGroup::Viruses,
        PathogenGroup::Fungi,
        PathogenGroup::Parasites,
        PathogenGroup::Other,
    ];

    pub fn of(pathogen: &str) -> Self {
        if BACTERIA.contains(&pathogen) {
            PathogenGroup::Bacteria
        } else if VIRUSES.contains(&pathogen) {
            PathogenGroup::Viruses
        } else if FUNGI.contains(&pathogen) {
            PathogenGroup::Fungi
        } else if PARASITES.contains(&pathogen) {
            PathogenGroup::Parasites
        } else {
            PathogenGroup::Other
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PathogenGroup::Bacteria => "Bacteria",
            PathogenGroup::Viruses => "Viruses",
            PathogenGroup::Fungi => "Fungi",
            PathogenGroup::Parasites => "Parasites",
            PathogenGroup::Other => "Other",
        }
    }
}

/// Summed counts for one year across all pathogens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearTotals {
    pub year: i32,
    pub positive: u64,
    pub negative: u64,
    pub total: u64,
}

/// Summed counts for one pathogen across all years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathogenTotals {
    pub pathogen: String,
    pub positive: u64,
    pub negative: u64,
    pub total: u64,
}

pub fn totals_by_year(records: &[Record]) -> Vec<YearTotals> {
    let mut sums: BTreeMap<i32, (u64, u64)> = BTreeMap::new();
    for record in records {
        let entry = sums.entry(record.year).or_default();
        entry.0 += u64::from(record.positive);
        entry.1 += u64::from(record.negative);
    }
    sums.into_iter()
        .map(|(year, (positive, negative))| YearTotals {
            year,
            positive,
            negative,
            total: positive + negative,
        })
        .collect()
}

pub fn totals_by_pathogen(records: &[Record]) -> Vec<PathogenTotals> {
    let mut sums: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for record in records {
        let entry = sums.entry(record.pathogen.as_str()).or_default();
        entry.0 += u64::from(record.positive);
        entry.1 += u64::from(record.negative);
    }
    sums.into_iter()
        .map(|(pathogen, (positive, negative))| PathogenTotals {
            pathogen: pathogen.to_string(),
            positive,
            negative,
            total: positive + negative,
        })
        .collect()
}

/// Overall dataset statistics plus the per-year and per-pathogen breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total_positive: u64,
    pub total_negative: u64,
    pub total_samples: u64,
    pub positive_ratio: f64,
    pub negative_ratio: f64,
    pub pathogen_count: usize,
    pub years_count: usize,
    pub year_range: Option<(i32, i32)>,
    pub by_year: Vec<YearTotals>,
    pub by_pathogen: Vec<PathogenTotals>,
}

pub fn statistics(records: &[Record]) -> Statistics {
    let by_year = totals_by_year(records);
    let by_pathogen = totals_by_pathogen(records);

    let total_positive: u64 = by_year.iter().map(|totals| totals.positive).sum();
    let total_negative: u64 = by_year.iter().map(|totals| totals.negative).sum();
    let total_samples = total_positive + total_negative;

    let ratio = |part: u64| {
        if total_samples > 0 {
            part as f64 / total_samples as f64
        } else {
            0.0
        }
    };

    let year_range = match (by_year.first(), by_year.last()) {
        (Some(first), Some(last)) => Some((first.year, last.year)),
        _ => None,
    };

    Statistics {
        total_positive,
        total_negative,
        total_samples,
        positive_ratio: ratio(total_positive),
        negative_ratio: ratio(total_negative),
        pathogen_count: by_pathogen.len(),
        years_count: by_year.len(),
        year_range,
        by_year,
        by_pathogen,
    }
}

/// One pathogen's row in the summary table: sum/mean/max of each count plus
/// its positive and negative shares of the total, as percentages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub pathogen: String,
    pub positive_sum: u64,
    pub positive_mean: f64,
    pub positive_max: u32,
    pub negative_sum: u64,
    pub negative_mean: f64,
    pub negative_max: u32,
    pub total_sum: u64,
    pub total_mean: f64,
    pub total_max: u32,
    pub positive_pct: f64,
    pub negative_pct: f64,
}

pub fn summary_rows(records: &[Record]) -> Vec<SummaryRow> {
    let mut groups: BTreeMap<&str, Vec<&Record>> = BTreeMap::new();
    for record in records {
        groups.entry(record.pathogen.as_str()).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(pathogen, rows)| {
            let count = rows.len() as f64;
            let positive_sum: u64 = rows.iter().map(|r| u64::from(r.positive)).sum();
            let negative_sum: u64 = rows.iter().map(|r| u64::from(r.negative)).sum();
            let total_sum = positive_sum + negative_sum;

            let pct = |part: u64| {
                if total_sum > 0 {
                    round1(part as f64 / total_sum as f64 * 100.0)
                } else {
                    0.0
                }
            };

            SummaryRow {
                pathogen: pathogen.to_string(),
                positive_sum,
                positive_mean: positive_sum as f64 / count,
                positive_max: rows.iter().map(|r| r.positive).max().unwrap_or(0),
                negative_sum,
                negative_mean: negative_sum as f64 / count,
                negative_max: rows.iter().map(|r| r.negative).max().unwrap_or(0),
                total_sum,
                total_mean: total_sum as f64 / count,
                total_max: rows.iter().map(|r| r.total()).max().unwrap_or(0),
                positive_pct: pct(positive_sum),
                negative_pct: pct(negative_sum),
            }
        })
        .collect()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Dense year-by-pathogen matrix of one metric, zero-filled, both axes
/// sorted. `values[p][y]` holds the metric for `pathogens[p]` in `years[y]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapGrid {
    pub years: Vec<i32>,
    pub pathogens: Vec<String>,
    pub values: Vec<Vec<u64>>,
}

pub fn heatmap_grid(records: &[Record], metric: Metric) -> HeatmapGrid {
    let years: Vec<i32> = records.iter().map(|r| r.year).collect::<BTreeSet<_>>().into_iter().collect();
    let pathogens: Vec<String> = records
        .iter()
        .map(|r| r.pathogen.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut values = vec![vec![0u64; years.len()]; pathogens.len()];
    for record in records {
        let row = pathogens.iter().position(|p| *p == record.pathogen);
        let col = years.iter().position(|y| *y == record.year);
        if let (Some(row), Some(col)) = (row, col) {
            values[row][col] += u64::from(metric.of(record));
        }
    }

    HeatmapGrid {
        years,
        pathogens,
        values,
    }
}

/// One pathogen's year-sorted line for time-series charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathogenSeries {
    pub pathogen: String,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: u64,
}

pub fn year_series(records: &[Record], metric: Metric) -> Vec<PathogenSeries> {
    let mut sums: BTreeMap<&str, BTreeMap<i32, u64>> = BTreeMap::new();
    for record in records {
        *sums
            .entry(record.pathogen.as_str())
            .or_default()
            .entry(record.year)
            .or_default() += u64::from(metric.of(record));
    }

    sums.into_iter()
        .map(|(pathogen, by_year)| PathogenSeries {
            pathogen: pathogen.to_string(),
            points: by_year
                .into_iter()
                .map(|(year, value)| SeriesPoint { year, value })
                .collect(),
        })
        .collect()
}

/// Zero-fill every missing (year, pathogen) combination so grids and grouped
/// bars line up. Existing rows are kept as-is.
pub fn complete(records: &[Record]) -> Vec<Record> {
    let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
    let pathogens: BTreeSet<&str> = records.iter().map(|r| r.pathogen.as_str()).collect();

    let mut filled = Vec::with_capacity(years.len() * pathogens.len());
    for &year in &years {
        for &pathogen in &pathogens {
            match records.iter().find(|r| r.year == year && r.pathogen == pathogen) {
                Some(existing) => filled.push(existing.clone()),
                None => filled.push(Record {
                    year,
                    pathogen: pathogen.to_string(),
                    positive: 0,
                    negative: 0,
                    unknown: Some(0),
                }),
            }
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, pathogen: &str, positive: u32, negative: u32) -> Record {
        Record {
            year,
            pathogen: pathogen.to_string(),
            positive,
            negative,
            unknown: None,
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            record(2020, "Brucella", 5, 15),
            record(2021, "Brucella", 7, 13),
            record(2020, "EBV", 10, 10),
            record(2022, "Aspergilus", 2, 8),
        ]
    }

    #[test]
    fn year_totals_are_sorted_and_summed() {
        let totals = totals_by_year(&sample());
        assert_eq!(totals.len(), 3);
        assert_eq!(totals[0].year, 2020);
        assert_eq!(totals[0].positive, 15);
        assert_eq!(totals[0].negative, 25);
        assert_eq!(totals[0].total, 40);
        assert_eq!(totals[2].year, 2022);
    }

    #[test]
    fn pathogen_totals_are_sorted_by_name() {
        let totals = totals_by_pathogen(&sample());
        let names: Vec<&str> = totals.iter().map(|t| t.pathogen.as_str()).collect();
        assert_eq!(names, vec!["Aspergilus", "Brucella", "EBV"]);
        assert_eq!(totals[1].positive, 12);
        assert_eq!(totals[1].total, 40);
    }

    #[test]
    fn statistics_cover_totals_ratios_and_range() {
        let stats = statistics(&sample());
        assert_eq!(stats.total_positive, 24);
        assert_eq!(stats.total_negative, 46);
        assert_eq!(stats.total_samples, 70);
        assert!((stats.positive_ratio - 24.0 / 70.0).abs() < 1e-9);
        assert_eq!(stats.pathogen_count, 3);
        assert_eq!(stats.years_count, 3);
        assert_eq!(stats.year_range, Some((2020, 2022)));
    }

    #[test]
    fn statistics_of_nothing_are_all_zero() {
        let stats = statistics(&[]);
        assert_eq!(stats.total_samples, 0);
        assert_eq!(stats.positive_ratio, 0.0);
        assert_eq!(stats.year_range, None);
    }

    #[test]
    fn summary_rows_carry_sum_mean_max_and_shares() {
        let rows = summary_rows(&sample());
        let brucella = rows.iter().find(|r| r.pathogen == "Brucella").unwrap();
        assert_eq!(brucella.positive_sum, 12);
        assert_eq!(brucella.positive_mean, 6.0);
        assert_eq!(brucella.positive_max, 7);
        assert_eq!(brucella.total_sum, 40);
        assert_eq!(brucella.total_max, 20);
        assert_eq!(brucella.positive_pct, 30.0);
        assert_eq!(brucella.negative_pct, 70.0);
    }

    #[test]
    fn summary_percentages_round_to_one_decimal() {
        let rows = summary_rows(&[record(2020, "EBV", 1, 2)]);
        assert_eq!(rows[0].positive_pct, 33.3);
        assert_eq!(rows[0].negative_pct, 66.7);
    }

    #[test]
    fn heatmap_grid_is_dense_and_zero_filled() {
        let grid = heatmap_grid(&sample(), Metric::Total);
        assert_eq!(grid.years, vec![2020, 2021, 2022]);
        assert_eq!(grid.pathogens, vec!["Aspergilus", "Brucella", "EBV"]);
        // Aspergilus has data only in 2022.
        assert_eq!(grid.values[0], vec![0, 0, 10]);
        assert_eq!(grid.values[1], vec![20, 20, 0]);
        assert_eq!(grid.values[2], vec![20, 0, 0]);
    }

    #[test]
    fn heatmap_grid_sums_duplicate_rows() {
        let records = vec![
            record(2020, "EBV", 1, 2),
            record(2020, "EBV", 3, 4),
        ];
        let grid = heatmap_grid(&records, Metric::Positive);
        assert_eq!(grid.values, vec![vec![4]]);
    }

    #[test]
    fn year_series_is_per_pathogen_and_year_sorted() {
        let series = year_series(&sample(), Metric::Positive);
        let brucella = series.iter().find(|s| s.pathogen == "Brucella").unwrap();
        assert_eq!(
            brucella.points,
            vec![
                SeriesPoint { year: 2020, value: 5 },
                SeriesPoint { year: 2021, value: 7 },
            ]
        );
    }

    #[test]
    fn complete_fills_missing_combinations_with_zeros() {
        let filled = complete(&sample());
        assert_eq!(filled.len(), 9);
        let gap = filled
            .iter()
            .find(|r| r.year == 2022 && r.pathogen == "Brucella")
            .unwrap();
        assert_eq!(gap.positive, 0);
        assert_eq!(gap.negative, 0);
        assert_eq!(gap.unknown, Some(0));
        // Existing rows survive untouched.
        assert!(filled.contains(&record(2021, "Brucella", 7, 13)));
    }

    #[test]
    fn taxonomy_groups_known_and_unknown_names() {
        assert_eq!(PathogenGroup::of("Brucella"), PathogenGroup::Bacteria);
        assert_eq!(PathogenGroup::of("SARS-CoV2"), PathogenGroup::Viruses);
        assert_eq!(PathogenGroup::of("Panfungal"), PathogenGroup::Fungi);
        assert_eq!(PathogenGroup::of("Leishmania"), PathogenGroup::Parasites);
        assert_eq!(PathogenGroup::of("Unheard-of"), PathogenGroup::Other);
    }

    #[test]
    fn metric_picks_the_right_count() {
        let r = record(2020, "EBV", 3, 9);
        assert_eq!(Metric::Positive.of(&r), 3);
        assert_eq!(Metric::Negative.of(&r), 9);
        assert_eq!(Metric::Total.of(&r), 12);
    }
}
