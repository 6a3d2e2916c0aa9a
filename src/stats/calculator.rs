//! Statistics Calculator Module
//! Per-group descriptive statistics, category breakdown and chart summaries.

use crate::data::{Category, Table};
use log::debug;
use rayon::prelude::*;
use statrs::statistics::{Data, OrderStatistics, Statistics};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Group '{0}' not found")]
    UnknownGroup(String),
    #[error("Column '{0}' not found in the grade sheet")]
    ColumnMissing(String),
    #[error("No {field} scores available for group {group}")]
    Empty { group: String, field: String },
}

/// Five-number summary used by the boxplot (Tukey whiskers at 1.5 IQR).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

/// One histogram bar: `[start, end)`, the last bin is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Statistics of one field over one group's non-missing values.
///
/// With a single value, `variance` and `std` are `NaN` (sample estimators
/// are undefined for N = 1).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStatistics {
    pub group: String,
    pub field: String,
    pub count: usize,
    pub mean: f64,
    pub variance: f64,
    pub std: f64,
    pub median: f64,
    /// Counts per graded category, lowest bucket first
    pub distribution: Vec<(Category, usize)>,
    pub box_summary: BoxSummary,
    /// Non-missing values in source order
    pub values: Vec<f64>,
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute statistics of `field` for the records of `group`.
    pub fn group_statistics(
        table: &Table,
        group: &str,
        field: &str,
    ) -> Result<GroupStatistics, StatsError> {
        let records = table
            .group_records(group)
            .ok_or_else(|| StatsError::UnknownGroup(group.to_string()))?;
        if !table.has_field(field) {
            return Err(StatsError::ColumnMissing(field.to_string()));
        }

        let scored: Vec<(f64, Category)> = records
            .iter()
            .filter_map(|r| r.score(field))
            .filter_map(|s| s.value.map(|v| (v, s.category)))
            .collect();

        if scored.is_empty() {
            return Err(StatsError::Empty {
                group: group.to_string(),
                field: field.to_string(),
            });
        }

        let values: Vec<f64> = scored.iter().map(|(v, _)| *v).collect();
        let distribution = Category::GRADED
            .iter()
            .map(|&cat| (cat, scored.iter().filter(|(_, c)| *c == cat).count()))
            .collect();

        let stats = GroupStatistics {
            group: group.to_string(),
            field: field.to_string(),
            count: values.len(),
            mean: values.iter().mean(),
            variance: values.iter().variance(),
            std: values.iter().std_dev(),
            median: Self::median(&values),
            distribution,
            box_summary: Self::box_summary(&values),
            values,
        };

        debug!(
            "Stats {} / {}: n={} mean={:.3} std={:.3}",
            group, field, stats.count, stats.mean, stats.std
        );
        Ok(stats)
    }

    /// Compute several fields of the same group in parallel, keeping field order.
    pub fn group_statistics_for_fields(
        table: &Table,
        group: &str,
        fields: &[String],
    ) -> Vec<(String, Result<GroupStatistics, StatsError>)> {
        fields
            .par_iter()
            .map(|field| {
                (
                    field.clone(),
                    Self::group_statistics(table, group, field),
                )
            })
            .collect()
    }

    /// Middle value, or the mean of the two middle values.
    pub fn median(values: &[f64]) -> f64 {
        let n = values.len();
        if n == 0 {
            return f64::NAN;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        }
    }

    /// Quartiles and whiskers for a boxplot.
    pub fn box_summary(values: &[f64]) -> BoxSummary {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mut data = Data::new(sorted.clone());
        let q1 = data.lower_quartile();
        let q3 = data.upper_quartile();
        let iqr = q3 - q1;

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= q1 - 1.5 * iqr)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= q3 + 1.5 * iqr)
            .unwrap_or(q3);

        BoxSummary {
            lower_whisker,
            q1,
            median: Self::median(&sorted),
            q3,
            upper_whisker,
        }
    }

    /// Equal-width bins over `[min, max]`.
    pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<HistogramBin> {
        if values.is_empty() || bins == 0 {
            return Vec::new();
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if min == max {
            return vec![HistogramBin {
                start: min - 0.5,
                end: max + 0.5,
                count: values.len(),
            }];
        }

        let width = (max - min) / bins as f64;
        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - min) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                start: min + i as f64 * width,
                end: min + (i + 1) as f64 * width,
                count,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SheetSchema, TableLoader};
    use std::collections::HashMap;

    fn create_test_table(rows: &[(&str, &str, &str)]) -> Table {
        let mut columns: HashMap<String, Vec<Option<String>>> = HashMap::new();
        let cell = |s: &str| (!s.is_empty()).then(|| s.to_string());
        columns.insert("GR".to_string(), rows.iter().map(|r| cell(r.0)).collect());
        columns.insert("DS".to_string(), rows.iter().map(|r| cell(r.1)).collect());
        columns.insert("TP".to_string(), rows.iter().map(|r| cell(r.2)).collect());
        TableLoader::normalize(columns, rows.len(), &SheetSchema::default())
    }

    #[test]
    fn test_group_statistics_basic() {
        let table = create_test_table(&[
            ("G1", "8", ""),
            ("G1", "10,5", ""),
            ("G2", "20", ""),
            ("G1", "abs", ""),
            ("G1", "12", ""),
            ("G1", "15,5", ""),
        ]);

        let stats = StatsCalculator::group_statistics(&table, "G1", "DS").unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.values, vec![8.0, 10.5, 12.0, 15.5]);
        assert!((stats.mean - 11.5).abs() < 1e-9);
        assert!((stats.median - 11.25).abs() < 1e-9);
        // Sample variance: (12.25 + 1 + 0.25 + 16) / 3
        assert!((stats.variance - 29.5 / 3.0).abs() < 1e-9);
        assert!((stats.std - (29.5f64 / 3.0).sqrt()).abs() < 1e-9);

        assert_eq!(
            stats.distribution,
            vec![
                (Category::Insufficient, 1),
                (Category::Passing, 1),
                (Category::FairlyGood, 1),
                (Category::Good, 1),
                (Category::VeryGood, 0),
            ]
        );
    }

    #[test]
    fn test_group_statistics_single_value() {
        let table = create_test_table(&[("G1", "13", "")]);

        let stats = StatsCalculator::group_statistics(&table, "G1", "DS").unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, 13.0);
        assert_eq!(stats.median, 13.0);
        assert!(stats.variance.is_nan());
        assert!(stats.std.is_nan());
    }

    #[test]
    fn test_group_statistics_empty() {
        let table = create_test_table(&[("G1", "-", ""), ("G1", "", "")]);

        assert_eq!(
            StatsCalculator::group_statistics(&table, "G1", "DS"),
            Err(StatsError::Empty {
                group: "G1".to_string(),
                field: "DS".to_string(),
            })
        );
    }

    #[test]
    fn test_group_statistics_unknown_group_and_field() {
        let table = create_test_table(&[("G1", "12", "")]);

        assert_eq!(
            StatsCalculator::group_statistics(&table, "G9", "DS"),
            Err(StatsError::UnknownGroup("G9".to_string()))
        );
        assert_eq!(
            StatsCalculator::group_statistics(&table, "G1", "TPEX"),
            Err(StatsError::ColumnMissing("TPEX".to_string()))
        );
    }

    #[test]
    fn test_group_statistics_for_fields_keeps_order() {
        let table = create_test_table(&[("G1", "12", "14"), ("G1", "16", "")]);
        let fields = vec!["DS".to_string(), "TP".to_string(), "D".to_string()];

        let results = StatsCalculator::group_statistics_for_fields(&table, "G1", &fields);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, "DS");
        assert_eq!(results[0].1.as_ref().unwrap().count, 2);
        assert_eq!(results[1].0, "TP");
        assert_eq!(results[1].1.as_ref().unwrap().count, 1);
        assert!(matches!(results[2].1, Err(StatsError::ColumnMissing(_))));
    }

    #[test]
    fn test_median() {
        assert_eq!(StatsCalculator::median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(StatsCalculator::median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert!(StatsCalculator::median(&[]).is_nan());
    }

    #[test]
    fn test_box_summary_whiskers() {
        let values = [10.0, 11.0, 12.0, 13.0, 14.0, 40.0];
        let summary = StatsCalculator::box_summary(&values);

        assert!(summary.q1 <= summary.median && summary.median <= summary.q3);
        assert_eq!(summary.lower_whisker, 10.0);
        // The outlier lies beyond the upper fence
        assert!(summary.upper_whisker < 40.0);
    }

    #[test]
    fn test_histogram_bins() {
        let values = [0.0, 5.0, 9.9, 10.0, 20.0];
        let bins = StatsCalculator::histogram_bins(&values, 10);

        assert_eq!(bins.len(), 10);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[9].end, 20.0);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 5);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[2].count, 1);
        assert_eq!(bins[4].count, 1);
        assert_eq!(bins[5].count, 1);
        assert_eq!(bins[9].count, 1);
    }

    #[test]
    fn test_histogram_bins_constant_values() {
        let bins = StatsCalculator::histogram_bins(&[12.0, 12.0], 10);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 2);
        assert!(StatsCalculator::histogram_bins(&[], 10).is_empty());
    }
}
