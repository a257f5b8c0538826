//! Statistics Calculator Module
//! Summary statistics for activities and health metrics.

use crate::data::{ActivityRow, MetricDay, MetricsSeries};
use rayon::prelude::*;
use statrs::distribution::{ContinuousCDF, StudentsT};
use std::collections::{BTreeMap, BTreeSet};

/// Significance threshold for the association test.
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

const MONTH_FORMAT: &str = "%Y-%m";

/// Aggregate numbers over a set of activities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivitySummary {
    pub activity_count: usize,
    pub active_days: usize,
    pub total_duration_min: f64,
    pub mean_duration_per_day: f64,
    pub total_distance_km: f64,
    pub type_counts: BTreeMap<String, usize>,
}

/// Averages over a set of metric days, counting non-null values only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSummary {
    pub day_count: usize,
    pub avg_hrv: Option<f64>,
    pub avg_recovery: Option<f64>,
    pub avg_resting_hr: Option<f64>,
}

/// Pearson correlation between HRV and recovery score with a two-tailed
/// t-test p-value.
#[derive(Debug, Clone, PartialEq)]
pub struct HrvRecoveryAssociation {
    pub n: usize,
    pub r: f64,
    pub p_value: f64,
    pub is_significant: bool,
}

/// One row of the per-month table, newest month first.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub month: String,
    pub activities: ActivitySummary,
    pub metrics: MetricsSummary,
}

/// Computes summaries, association tests, and the monthly table.
pub struct StatsCalculator;

impl StatsCalculator {
    pub fn activity_summary(rows: &[ActivityRow]) -> ActivitySummary {
        let mut summary = ActivitySummary {
            activity_count: rows.len(),
            ..Default::default()
        };

        let mut days: BTreeSet<_> = BTreeSet::new();
        for row in rows {
            days.insert(row.date);
            summary.total_duration_min += row.duration_min;
            summary.total_distance_km += row.distance_km.unwrap_or(0.0);
            *summary
                .type_counts
                .entry(row.activity_type.clone())
                .or_insert(0) += 1;
        }

        summary.active_days = days.len();
        if summary.active_days > 0 {
            summary.mean_duration_per_day =
                summary.total_duration_min / summary.active_days as f64;
        }
        summary
    }

    pub fn metrics_summary(days: &[MetricDay]) -> MetricsSummary {
        MetricsSummary {
            day_count: days.len(),
            avg_hrv: mean_of(days.iter().filter_map(|d| d.hrv)),
            avg_recovery: mean_of(days.iter().filter_map(|d| d.recovery)),
            avg_resting_hr: mean_of(days.iter().filter_map(|d| d.resting_heart_rate)),
        }
    }

    /// Pearson correlation over the aligned series. Needs at least three
    /// points; returns None below that or when either side is constant.
    pub fn hrv_recovery_association(series: &MetricsSeries) -> Option<HrvRecoveryAssociation> {
        let n = series.hrv.len().min(series.recovery.len());
        if n < 3 {
            return None;
        }

        let xs = &series.hrv[..n];
        let ys = &series.recovery[..n];
        let mean_x = xs.iter().sum::<f64>() / n as f64;
        let mean_y = ys.iter().sum::<f64>() / n as f64;

        let mut cov = 0.0;
        let mut var_x = 0.0;
        let mut var_y = 0.0;
        for i in 0..n {
            let dx = xs[i] - mean_x;
            let dy = ys[i] - mean_y;
            cov += dx * dy;
            var_x += dx * dx;
            var_y += dy * dy;
        }
        if var_x == 0.0 || var_y == 0.0 {
            return None;
        }

        let r = cov / (var_x.sqrt() * var_y.sqrt());
        let p_value = correlation_p_value(r, n);
        Some(HrvRecoveryAssociation {
            n,
            r,
            p_value,
            is_significant: p_value <= SIGNIFICANCE_THRESHOLD,
        })
    }

    /// Per-month summaries, newest month first, computed in parallel.
    pub fn monthly_summaries(
        rows: &[ActivityRow],
        days: &[MetricDay],
    ) -> Vec<MonthlySummary> {
        let mut activity_months: BTreeMap<String, Vec<ActivityRow>> = BTreeMap::new();
        for row in rows {
            activity_months
                .entry(row.date.format(MONTH_FORMAT).to_string())
                .or_default()
                .push(row.clone());
        }

        let mut metric_months: BTreeMap<String, Vec<MetricDay>> = BTreeMap::new();
        for day in days {
            metric_months
                .entry(day.date.format(MONTH_FORMAT).to_string())
                .or_default()
                .push(day.clone());
        }

        let months: BTreeSet<String> = activity_months
            .keys()
            .chain(metric_months.keys())
            .cloned()
            .collect();

        let mut summaries: Vec<MonthlySummary> = months
            .into_iter()
            .collect::<Vec<_>>()
            .par_iter()
            .map(|month| MonthlySummary {
                month: month.clone(),
                activities: Self::activity_summary(
                    activity_months.get(month).map(Vec::as_slice).unwrap_or(&[]),
                ),
                metrics: Self::metrics_summary(
                    metric_months.get(month).map(Vec::as_slice).unwrap_or(&[]),
                ),
            })
            .collect();

        summaries.sort_by(|a, b| b.month.cmp(&a.month));
        summaries
    }
}

fn mean_of(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Two-tailed p-value for a Pearson r via the t-distribution with n-2
/// degrees of freedom.
fn correlation_p_value(r: f64, n: usize) -> f64 {
    let df = (n - 2) as f64;
    let denom = 1.0 - r * r;
    if denom <= f64::EPSILON {
        return 0.0;
    }
    let t = r * (df / denom).sqrt();

    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => 2.0 * (1.0 - dist.cdf(t.abs())),
        Err(_) => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn run(day: u32, minutes: f64, km: Option<f64>) -> ActivityRow {
        ActivityRow {
            date: date(day),
            activity_type: "Run".to_string(),
            duration_min: minutes,
            distance_km: km,
            calories: None,
        }
    }

    fn metric_day(day: u32, hrv: Option<f64>, recovery: Option<f64>) -> MetricDay {
        MetricDay {
            date: date(day),
            resting_heart_rate: None,
            hrv,
            sleep_hours: None,
            recovery,
        }
    }

    #[test]
    fn activity_summary_totals_and_per_day_mean() {
        let rows = vec![
            run(1, 30.0, Some(5.0)),
            run(1, 60.0, Some(10.0)),
            run(2, 45.0, None),
        ];
        let summary = StatsCalculator::activity_summary(&rows);

        assert_eq!(summary.activity_count, 3);
        assert_eq!(summary.active_days, 2);
        assert_eq!(summary.total_duration_min, 135.0);
        assert_eq!(summary.mean_duration_per_day, 67.5);
        assert_eq!(summary.total_distance_km, 15.0);
        assert_eq!(summary.type_counts.get("Run"), Some(&3));
    }

    #[test]
    fn empty_activity_summary_is_all_zero() {
        let summary = StatsCalculator::activity_summary(&[]);
        assert_eq!(summary.activity_count, 0);
        assert_eq!(summary.mean_duration_per_day, 0.0);
        assert!(summary.type_counts.is_empty());
    }

    #[test]
    fn metrics_summary_averages_skip_missing_values() {
        let days = vec![
            metric_day(1, Some(60.0), Some(70.0)),
            metric_day(2, Some(62.0), None),
            metric_day(3, None, Some(80.0)),
        ];
        let summary = StatsCalculator::metrics_summary(&days);

        assert_eq!(summary.day_count, 3);
        assert_eq!(summary.avg_hrv, Some(61.0));
        assert_eq!(summary.avg_recovery, Some(75.0));
        assert_eq!(summary.avg_resting_hr, None);
    }

    #[test]
    fn association_detects_a_strong_positive_correlation() {
        let series = MetricsSeries {
            dates: (1..=6).map(|d| format!("2024-01-0{d}")).collect(),
            hrv: vec![50.0, 55.0, 60.0, 65.0, 70.0, 75.0],
            recovery: vec![40.0, 46.0, 55.0, 61.0, 70.0, 78.0],
        };
        let assoc = StatsCalculator::hrv_recovery_association(&series).unwrap();

        assert_eq!(assoc.n, 6);
        assert!(assoc.r > 0.99);
        assert!(assoc.p_value < 0.01);
        assert!(assoc.is_significant);
    }

    #[test]
    fn association_needs_three_points_and_variance() {
        let short = MetricsSeries {
            dates: vec!["2024-01-01".to_string(), "2024-01-02".to_string()],
            hrv: vec![60.0, 62.0],
            recovery: vec![70.0, 75.0],
        };
        assert!(StatsCalculator::hrv_recovery_association(&short).is_none());

        let flat = MetricsSeries {
            dates: (1..=4).map(|d| format!("2024-01-0{d}")).collect(),
            hrv: vec![60.0; 4],
            recovery: vec![70.0, 71.0, 72.0, 73.0],
        };
        assert!(StatsCalculator::hrv_recovery_association(&flat).is_none());
    }

    #[test]
    fn monthly_summaries_split_by_month_newest_first() {
        let rows = vec![
            run(1, 30.0, Some(5.0)),
            ActivityRow {
                date: NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
                activity_type: "Ride".to_string(),
                duration_min: 90.0,
                distance_km: Some(30.0),
                calories: Some(800.0),
            },
        ];
        let days = vec![metric_day(1, Some(60.0), Some(70.0))];

        let monthly = StatsCalculator::monthly_summaries(&rows, &days);
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].month, "2024-02");
        assert_eq!(monthly[0].activities.activity_count, 1);
        assert_eq!(monthly[0].metrics.day_count, 0);
        assert_eq!(monthly[1].month, "2024-01");
        assert_eq!(monthly[1].metrics.avg_hrv, Some(60.0));
    }
}
