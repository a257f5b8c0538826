//! CSV Data Loader Module
//! Loads activity and health metric exports with Polars.

use polars::prelude::*;
use std::path::PathBuf;
use thiserror::Error;

/// Columns an activities CSV must carry. `distance_km` and `calories`
/// are optional extras.
pub const ACTIVITY_REQUIRED_COLUMNS: [&str; 4] =
    ["date", "activity_type", "duration_min", "source"];

/// Columns a health metrics CSV must carry. `resting_heart_rate` and
/// `sleep_hours` are optional extras; value cells may be empty.
pub const METRICS_REQUIRED_COLUMNS: [&str; 4] = ["date", "hrv", "recovery_score", "source"];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("{kind} file is missing required column '{column}'")]
    MissingColumn { kind: DataKind, column: String },
}

/// Which of the two data files a frame belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Activities,
    Metrics,
}

impl DataKind {
    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            DataKind::Activities => &ACTIVITY_REQUIRED_COLUMNS,
            DataKind::Metrics => &METRICS_REQUIRED_COLUMNS,
        }
    }
}

impl std::fmt::Display for DataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataKind::Activities => write!(f, "activities"),
            DataKind::Metrics => write!(f, "metrics"),
        }
    }
}

/// Holds the two loaded DataFrames and their file paths.
pub struct DataLoader {
    activities: Option<DataFrame>,
    metrics: Option<DataFrame>,
    activities_path: Option<PathBuf>,
    metrics_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            activities: None,
            metrics: None,
            activities_path: None,
            metrics_path: None,
        }
    }

    /// Read a CSV file using Polars lazy evaluation.
    pub fn read_csv(file_path: &str) -> Result<DataFrame, LoaderError> {
        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;
        Ok(df)
    }

    /// Verify that a frame carries the columns its kind requires.
    pub fn check_columns(kind: DataKind, df: &DataFrame) -> Result<(), LoaderError> {
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        for required in kind.required_columns() {
            if !columns.iter().any(|c| c == required) {
                return Err(LoaderError::MissingColumn {
                    kind,
                    column: (*required).to_string(),
                });
            }
        }
        Ok(())
    }

    /// Store an already-read frame (used for background loading).
    pub fn set_dataframe(&mut self, kind: DataKind, df: DataFrame, path: PathBuf) {
        match kind {
            DataKind::Activities => {
                self.activities = Some(df);
                self.activities_path = Some(path);
            }
            DataKind::Metrics => {
                self.metrics = Some(df);
                self.metrics_path = Some(path);
            }
        }
    }

    pub fn frame(&self, kind: DataKind) -> Option<&DataFrame> {
        match kind {
            DataKind::Activities => self.activities.as_ref(),
            DataKind::Metrics => self.metrics.as_ref(),
        }
    }

    #[allow(dead_code)]
    pub fn path(&self, kind: DataKind) -> Option<&PathBuf> {
        match kind {
            DataKind::Activities => self.activities_path.as_ref(),
            DataKind::Metrics => self.metrics_path.as_ref(),
        }
    }

    /// True once both files are loaded.
    pub fn is_complete(&self) -> bool {
        self.activities.is_some() && self.metrics.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn check_columns_accepts_a_complete_activities_frame() {
        let frame = df!(
            "date" => &["2024-01-01"],
            "activity_type" => &["Run"],
            "duration_min" => &[30.0],
            "distance_km" => &[5.2],
            "calories" => &[300.0],
            "source" => &["strava"],
        )
        .unwrap();

        assert!(DataLoader::check_columns(DataKind::Activities, &frame).is_ok());
    }

    #[test]
    fn check_columns_reports_the_missing_column() {
        let frame = df!(
            "date" => &["2024-01-01"],
            "hrv" => &[60.0],
            "source" => &["whoop"],
        )
        .unwrap();

        let err = DataLoader::check_columns(DataKind::Metrics, &frame).unwrap_err();
        match err {
            LoaderError::MissingColumn { kind, column } => {
                assert_eq!(kind, DataKind::Metrics);
                assert_eq!(column, "recovery_score");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn loader_tracks_frames_per_kind() {
        let mut loader = DataLoader::new();
        assert!(!loader.is_complete());

        let activities = df!(
            "date" => &["2024-01-01"],
            "activity_type" => &["Run"],
            "duration_min" => &[30.0],
            "source" => &["strava"],
        )
        .unwrap();
        loader.set_dataframe(
            DataKind::Activities,
            activities,
            PathBuf::from("activities.csv"),
        );

        assert_eq!(loader.frame(DataKind::Activities).unwrap().height(), 1);
        assert!(loader.frame(DataKind::Metrics).is_none());
        assert!(!loader.is_complete());

        let metrics = df!(
            "date" => &["2024-01-01"],
            "hrv" => &[60.0],
            "recovery_score" => &[70.0],
            "source" => &["whoop"],
        )
        .unwrap();
        loader.set_dataframe(DataKind::Metrics, metrics, PathBuf::from("metrics.csv"));

        assert!(loader.is_complete());
        assert_eq!(
            loader.path(DataKind::Metrics).unwrap(),
            &PathBuf::from("metrics.csv")
        );
    }
}
