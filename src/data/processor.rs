//! Data Processor Module
//! Extracts typed rows from the loaded frames and builds the per-date
//! series the charts consume.

use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::BTreeMap;
use thiserror::Error;

pub const ACTIVITY_SOURCE_DEFAULT: &str = "strava";
pub const METRICS_SOURCE_DEFAULT: &str = "whoop";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("column '{0}' is missing")]
    MissingColumn(String),
}

/// Row filter applied before aggregation. `source = None` accepts any
/// source; open date bounds accept everything on that side.
#[derive(Debug, Clone, Default)]
pub struct SeriesFilter {
    pub source: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl SeriesFilter {
    pub fn for_source(source: &str) -> Self {
        Self {
            source: Some(source.to_string()),
            ..Default::default()
        }
    }

    fn matches(&self, source: &str, date: NaiveDate) -> bool {
        if let Some(wanted) = &self.source {
            if wanted != source {
                return false;
            }
        }
        if let Some(from) = self.from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if date > to {
                return false;
            }
        }
        true
    }
}

/// One recorded activity.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRow {
    pub date: NaiveDate,
    pub activity_type: String,
    pub duration_min: f64,
    pub distance_km: Option<f64>,
    pub calories: Option<f64>,
}

/// One day of health metrics. Value cells may be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDay {
    pub date: NaiveDate,
    pub resting_heart_rate: Option<f64>,
    pub hrv: Option<f64>,
    pub sleep_hours: Option<f64>,
    pub recovery: Option<f64>,
}

/// Input to the activity bar chart: date labels and minutes, index-aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivitySeries {
    pub dates: Vec<String>,
    pub durations: Vec<f64>,
}

/// Input to the health metrics line chart: date labels with HRV and
/// recovery values, all index-aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSeries {
    pub dates: Vec<String>,
    pub hrv: Vec<f64>,
    pub recovery: Vec<f64>,
}

/// Extracts rows and builds chart series.
pub struct DataProcessor;

impl DataProcessor {
    /// Extract activity rows matching the filter, in file order.
    /// Rows with an unparseable date or missing duration are skipped.
    pub fn activity_rows(
        df: &DataFrame,
        filter: &SeriesFilter,
    ) -> Result<Vec<ActivityRow>, ProcessorError> {
        let dates = string_cells(df, "date")?;
        let types = string_cells(df, "activity_type")?;
        let sources = string_cells(df, "source")?;
        let durations = float_cells(df, "duration_min")?;
        let distances = optional_float_cells(df, "distance_km");
        let calories = optional_float_cells(df, "calories");

        let mut rows = Vec::new();
        for i in 0..df.height() {
            let Some(date) = dates[i].as_deref().and_then(parse_date) else {
                log::warn!("skipping activity row {i}: unparseable date");
                continue;
            };
            let Some(source) = sources[i].as_deref() else {
                continue;
            };
            if !filter.matches(source, date) {
                continue;
            }
            let Some(duration_min) = durations[i] else {
                log::warn!("skipping activity row {i}: missing duration");
                continue;
            };

            rows.push(ActivityRow {
                date,
                activity_type: types[i].clone().unwrap_or_default(),
                duration_min,
                distance_km: distances[i],
                calories: calories[i],
            });
        }
        Ok(rows)
    }

    /// Extract one metrics record per day matching the filter, ascending
    /// by date. When several rows share a date the later row wins.
    pub fn metric_days(
        df: &DataFrame,
        filter: &SeriesFilter,
    ) -> Result<Vec<MetricDay>, ProcessorError> {
        let dates = string_cells(df, "date")?;
        let sources = string_cells(df, "source")?;
        let hrv = float_cells(df, "hrv")?;
        let recovery = float_cells(df, "recovery_score")?;
        let resting_hr = optional_float_cells(df, "resting_heart_rate");
        let sleep = optional_float_cells(df, "sleep_hours");

        let mut by_date: BTreeMap<NaiveDate, MetricDay> = BTreeMap::new();
        for i in 0..df.height() {
            let Some(date) = dates[i].as_deref().and_then(parse_date) else {
                log::warn!("skipping metrics row {i}: unparseable date");
                continue;
            };
            let Some(source) = sources[i].as_deref() else {
                continue;
            };
            if !filter.matches(source, date) {
                continue;
            }

            by_date.insert(
                date,
                MetricDay {
                    date,
                    resting_heart_rate: resting_hr[i],
                    hrv: hrv[i],
                    sleep_hours: sleep[i],
                    recovery: recovery[i],
                },
            );
        }
        Ok(by_date.into_values().collect())
    }

    /// Sum duration minutes per calendar date, ascending by date.
    pub fn activity_series(rows: &[ActivityRow]) -> ActivitySeries {
        let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for row in rows {
            *by_date.entry(row.date).or_insert(0.0) += row.duration_min;
        }

        let mut series = ActivitySeries::default();
        for (date, total) in by_date {
            series.dates.push(date.format(DATE_FORMAT).to_string());
            series.durations.push(total);
        }
        series
    }

    /// Build the aligned HRV/recovery series. Only days carrying both
    /// values are included, so the three sequences stay index-aligned by
    /// construction.
    pub fn metrics_series(days: &[MetricDay]) -> MetricsSeries {
        let mut series = MetricsSeries::default();
        for day in days {
            let (Some(hrv), Some(recovery)) = (day.hrv, day.recovery) else {
                continue;
            };
            series.dates.push(day.date.format(DATE_FORMAT).to_string());
            series.hrv.push(hrv);
            series.recovery.push(recovery);
        }
        series
    }
}

/// Parse a calendar date from a `YYYY-MM-DD` cell, tolerating a trailing
/// time component (the original export stores activity timestamps).
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let day = cell.get(..10).unwrap_or(cell);
    NaiveDate::parse_from_str(day, DATE_FORMAT).ok()
}

fn string_cells(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, ProcessorError> {
    let column = df
        .column(name)
        .map_err(|_| ProcessorError::MissingColumn(name.to_string()))?;
    let column = column.cast(&DataType::String)?;

    let mut cells = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let value = column.get(i)?;
        if value.is_null() {
            cells.push(None);
        } else {
            cells.push(Some(value.to_string().trim_matches('"').to_string()));
        }
    }
    Ok(cells)
}

fn float_cells(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, ProcessorError> {
    let column = df
        .column(name)
        .map_err(|_| ProcessorError::MissingColumn(name.to_string()))?;
    let column = column.cast(&DataType::Float64)?;
    let ca = column.f64()?;

    Ok((0..df.height())
        .map(|i| ca.get(i).filter(|v| !v.is_nan()))
        .collect())
}

/// Like `float_cells` but treats an absent column as all-missing.
fn optional_float_cells(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    float_cells(df, name).unwrap_or_else(|_| vec![None; df.height()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn activities_frame() -> DataFrame {
        df!(
            "date" => &[
                "2024-01-01 07:30:00",
                "2024-01-01",
                "2024-01-02",
                "2024-01-03",
                "not-a-date",
            ],
            "activity_type" => &["Run", "Ride", "Run", "Swim", "Run"],
            "duration_min" => &[30.0, 60.0, 45.0, 20.0, 15.0],
            "distance_km" => &[Some(5.0), Some(20.0), Some(7.5), None, Some(2.0)],
            "source" => &["strava", "strava", "strava", "whoop", "strava"],
        )
        .unwrap()
    }

    fn metrics_frame() -> DataFrame {
        df!(
            "date" => &["2024-01-01", "2024-01-02", "2024-01-02", "2024-01-03"],
            "resting_heart_rate" => &[Some(52.0), Some(50.0), Some(51.0), None],
            "hrv" => &[Some(60.0), Some(55.0), Some(62.0), Some(64.0)],
            "recovery_score" => &[Some(70.0), Some(66.0), Some(75.0), None],
            "source" => &["whoop", "whoop", "whoop", "whoop"],
        )
        .unwrap()
    }

    #[test]
    fn activity_rows_filter_by_source_and_skip_bad_dates() {
        let filter = SeriesFilter::for_source("strava");
        let rows = DataProcessor::activity_rows(&activities_frame(), &filter).unwrap();

        // the whoop row and the unparseable-date row are gone
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.date.format("%Y").to_string() == "2024"));
        assert_eq!(rows[0].activity_type, "Run");
        assert_eq!(rows[0].distance_km, Some(5.0));
        assert_eq!(rows[0].calories, None);
    }

    #[test]
    fn activity_rows_honor_date_range() {
        let filter = SeriesFilter {
            source: Some("strava".to_string()),
            from: NaiveDate::from_ymd_opt(2024, 1, 2),
            to: None,
        };
        let rows = DataProcessor::activity_rows(&activities_frame(), &filter).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].duration_min, 45.0);
    }

    #[test]
    fn activity_series_sums_per_date_in_ascending_order() {
        let filter = SeriesFilter::for_source("strava");
        let rows = DataProcessor::activity_rows(&activities_frame(), &filter).unwrap();
        let series = DataProcessor::activity_series(&rows);

        assert_eq!(series.dates, vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(series.durations, vec![90.0, 45.0]);
    }

    #[test]
    fn metric_days_dedupe_with_later_row_winning() {
        let filter = SeriesFilter::for_source("whoop");
        let days = DataProcessor::metric_days(&metrics_frame(), &filter).unwrap();

        assert_eq!(days.len(), 3);
        let jan2 = &days[1];
        assert_eq!(jan2.hrv, Some(62.0));
        assert_eq!(jan2.recovery, Some(75.0));
        assert_eq!(jan2.resting_heart_rate, Some(51.0));
    }

    #[test]
    fn metrics_series_keeps_only_days_with_both_values() {
        let filter = SeriesFilter::for_source("whoop");
        let days = DataProcessor::metric_days(&metrics_frame(), &filter).unwrap();
        let series = DataProcessor::metrics_series(&days);

        // 2024-01-03 has no recovery score
        assert_eq!(series.dates, vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(series.hrv, vec![60.0, 62.0]);
        assert_eq!(series.recovery, vec![70.0, 75.0]);
    }

    #[test]
    fn empty_frames_produce_empty_series() {
        let frame = df!(
            "date" => Vec::<String>::new(),
            "activity_type" => Vec::<String>::new(),
            "duration_min" => Vec::<f64>::new(),
            "source" => Vec::<String>::new(),
        )
        .unwrap();

        let rows =
            DataProcessor::activity_rows(&frame, &SeriesFilter::default()).unwrap();
        let series = DataProcessor::activity_series(&rows);
        assert!(series.dates.is_empty());
        assert!(series.durations.is_empty());
    }

    #[test]
    fn parse_date_accepts_plain_and_timestamped_cells() {
        assert_eq!(
            parse_date("2024-03-09"),
            NaiveDate::from_ymd_opt(2024, 3, 9)
        );
        assert_eq!(
            parse_date("2024-03-09 18:04:00"),
            NaiveDate::from_ymd_opt(2024, 3, 9)
        );
        assert_eq!(parse_date("09/03/2024"), None);
        assert_eq!(parse_date(""), None);
    }
}
