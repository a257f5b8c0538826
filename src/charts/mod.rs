//! Charts module - chart configuration and rendering

mod config;
mod plotter;
mod renderer;

pub use config::{
    activity_chart, health_metrics_chart, ChartConfig, ChartError, ChartKind, Dataset,
    SeriesColor,
};
pub use plotter::ChartPlotter;
pub use renderer::{RenderError, StaticChartRenderer};
