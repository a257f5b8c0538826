//! Chart Configuration Module
//! Typed chart configurations in the shape the rendering surfaces consume:
//! `{ type, data: { labels, datasets }, options }`.

use crate::data::{ActivitySeries, MetricsSeries};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Plot id of the activity duration bar chart.
pub const ACTIVITY_CHART_TARGET: &str = "activity_chart";
/// Plot id of the HRV / recovery line chart.
pub const HEALTH_METRICS_CHART_TARGET: &str = "health_metrics_chart";

pub const DURATION_SERIES_LABEL: &str = "Duration (minutes)";
pub const HRV_SERIES_LABEL: &str = "HRV";
pub const RECOVERY_SERIES_LABEL: &str = "Recovery Score";

/// Series colors carried by the configs.
pub const ACTIVITY_FILL: SeriesColor = SeriesColor::with_alpha(54, 162, 235, 0.2);
pub const ACTIVITY_BORDER: SeriesColor = SeriesColor::opaque(54, 162, 235);
pub const HRV_COLOR: SeriesColor = SeriesColor::opaque(255, 99, 132);
pub const RECOVERY_COLOR: SeriesColor = SeriesColor::opaque(75, 192, 192);

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("series '{series}' has {values} values for {labels} labels")]
    SeriesLengthMismatch {
        series: &'static str,
        values: usize,
        labels: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

/// RGBA color, alpha in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl SeriesColor {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// One labeled value series plotted against the shared category axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<SeriesColor>,
    pub border_color: SeriesColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f32>,
    pub fill: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisOptions {
    pub begin_at_zero: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scales {
    pub y: AxisOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub responsive: bool,
    pub scales: Scales,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            responsive: true,
            scales: Scales {
                y: AxisOptions {
                    begin_at_zero: true,
                },
            },
        }
    }
}

/// Complete configuration for one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

fn ensure_aligned(
    series: &'static str,
    labels: usize,
    values: usize,
) -> Result<(), ChartError> {
    if labels != values {
        return Err(ChartError::SeriesLengthMismatch {
            series,
            values,
            labels,
        });
    }
    Ok(())
}

/// Build the bar chart of per-date activity duration.
///
/// Rendered into the `activity_chart` plot surface by the plotter.
pub fn activity_chart(series: &ActivitySeries) -> Result<ChartConfig, ChartError> {
    ensure_aligned(
        DURATION_SERIES_LABEL,
        series.dates.len(),
        series.durations.len(),
    )?;

    Ok(ChartConfig {
        kind: ChartKind::Bar,
        data: ChartData {
            labels: series.dates.clone(),
            datasets: vec![Dataset {
                label: DURATION_SERIES_LABEL.to_string(),
                data: series.durations.clone(),
                background_color: Some(ACTIVITY_FILL),
                border_color: ACTIVITY_BORDER,
                border_width: Some(1.0),
                fill: true,
            }],
        },
        options: ChartOptions::default(),
    })
}

/// Build the line chart of per-date HRV and recovery score.
///
/// Two unfilled series, rendered into the `health_metrics_chart` plot
/// surface by the plotter.
pub fn health_metrics_chart(series: &MetricsSeries) -> Result<ChartConfig, ChartError> {
    ensure_aligned(HRV_SERIES_LABEL, series.dates.len(), series.hrv.len())?;
    ensure_aligned(
        RECOVERY_SERIES_LABEL,
        series.dates.len(),
        series.recovery.len(),
    )?;

    Ok(ChartConfig {
        kind: ChartKind::Line,
        data: ChartData {
            labels: series.dates.clone(),
            datasets: vec![
                Dataset {
                    label: HRV_SERIES_LABEL.to_string(),
                    data: series.hrv.clone(),
                    background_color: None,
                    border_color: HRV_COLOR,
                    border_width: None,
                    fill: false,
                },
                Dataset {
                    label: RECOVERY_SERIES_LABEL.to_string(),
                    data: series.recovery.clone(),
                    background_color: None,
                    border_color: RECOVERY_COLOR,
                    border_width: None,
                    fill: false,
                },
            ],
        },
        options: ChartOptions::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity_input() -> ActivitySeries {
        ActivitySeries {
            dates: vec!["2024-01-01".to_string(), "2024-01-02".to_string()],
            durations: vec![30.0, 45.0],
        }
    }

    fn metrics_input() -> MetricsSeries {
        MetricsSeries {
            dates: vec!["2024-01-01".to_string(), "2024-01-02".to_string()],
            hrv: vec![60.0, 62.0],
            recovery: vec![70.0, 75.0],
        }
    }

    #[test]
    fn activity_chart_maps_labels_and_values_in_order() {
        let config = activity_chart(&activity_input()).unwrap();

        assert_eq!(config.kind, ChartKind::Bar);
        assert_eq!(config.data.labels, vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(config.data.datasets.len(), 1);

        let series = &config.data.datasets[0];
        assert_eq!(series.label, DURATION_SERIES_LABEL);
        assert_eq!(series.data, vec![30.0, 45.0]);
    }

    #[test]
    fn health_metrics_chart_has_two_unfilled_series_in_order() {
        let config = health_metrics_chart(&metrics_input()).unwrap();

        assert_eq!(config.kind, ChartKind::Line);
        assert_eq!(config.data.labels, vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(config.data.datasets.len(), 2);

        let hrv = &config.data.datasets[0];
        assert_eq!(hrv.label, HRV_SERIES_LABEL);
        assert_eq!(hrv.data, vec![60.0, 62.0]);
        assert!(!hrv.fill);

        let recovery = &config.data.datasets[1];
        assert_eq!(recovery.label, RECOVERY_SERIES_LABEL);
        assert_eq!(recovery.data, vec![70.0, 75.0]);
        assert!(!recovery.fill);
    }

    #[test]
    fn options_always_begin_at_zero_and_responsive() {
        let bar = activity_chart(&activity_input()).unwrap();
        let line = health_metrics_chart(&metrics_input()).unwrap();

        for config in [bar, line] {
            assert!(config.options.responsive);
            assert!(config.options.scales.y.begin_at_zero);
        }
    }

    #[test]
    fn empty_inputs_build_valid_empty_configs() {
        let bar = activity_chart(&ActivitySeries::default()).unwrap();
        assert!(bar.data.labels.is_empty());
        assert_eq!(bar.data.datasets.len(), 1);
        assert!(bar.data.datasets[0].data.is_empty());

        let line = health_metrics_chart(&MetricsSeries::default()).unwrap();
        assert!(line.data.labels.is_empty());
        assert_eq!(line.data.datasets.len(), 2);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let bad_activity = ActivitySeries {
            dates: vec!["2024-01-01".to_string()],
            durations: vec![30.0, 45.0],
        };
        assert!(matches!(
            activity_chart(&bad_activity),
            Err(ChartError::SeriesLengthMismatch { .. })
        ));

        let bad_metrics = MetricsSeries {
            dates: vec!["2024-01-01".to_string(), "2024-01-02".to_string()],
            hrv: vec![60.0, 62.0],
            recovery: vec![70.0],
        };
        assert!(matches!(
            health_metrics_chart(&bad_metrics),
            Err(ChartError::SeriesLengthMismatch { .. })
        ));
    }

    #[test]
    fn config_serializes_to_the_charting_surface_shape() {
        let config = activity_chart(&activity_input()).unwrap();
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["type"], "bar");
        assert_eq!(json["data"]["labels"][0], "2024-01-01");
        assert_eq!(json["data"]["datasets"][0]["label"], DURATION_SERIES_LABEL);
        assert_eq!(json["data"]["datasets"][0]["borderWidth"], 1.0);
        assert_eq!(json["options"]["responsive"], true);
        assert_eq!(json["options"]["scales"]["y"]["beginAtZero"], true);

        let line = health_metrics_chart(&metrics_input()).unwrap();
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["type"], "line");
        assert_eq!(json["data"]["datasets"][1]["fill"], false);
        // unset styling fields stay off the wire
        assert!(json["data"]["datasets"][0].get("borderWidth").is_none());
    }
}
