//! Data module - CSV loading and series preparation

mod loader;
mod processor;

pub use loader::{DataKind, DataLoader, LoaderError};
pub use processor::{
    parse_date, ActivityRow, ActivitySeries, DataProcessor, MetricDay, MetricsSeries,
    ProcessorError, SeriesFilter, ACTIVITY_SOURCE_DEFAULT, METRICS_SOURCE_DEFAULT,
};
