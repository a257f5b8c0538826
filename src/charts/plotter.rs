//! Chart Plotter Module
//! Draws chart configurations into interactive egui_plot surfaces.

use crate::charts::config::{
    ChartConfig, ChartKind, Dataset, SeriesColor, ACTIVITY_CHART_TARGET,
    HEALTH_METRICS_CHART_TARGET,
};
use egui::Color32;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, PlotUi, Points};

/// Default plot height inside a dashboard card.
const CHART_HEIGHT: f32 = 300.0;
/// Fallback width when a config opts out of responsive sizing.
const FIXED_CHART_WIDTH: f32 = 640.0;

/// Draws chart configurations with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Render the activity duration chart into its plot surface.
    pub fn show_activity_chart(ui: &mut egui::Ui, config: &ChartConfig) {
        Self::draw(ui, ACTIVITY_CHART_TARGET, config);
    }

    /// Render the health metrics chart into its plot surface.
    pub fn show_health_metrics_chart(ui: &mut egui::Ui, config: &ChartConfig) {
        Self::draw(ui, HEALTH_METRICS_CHART_TARGET, config);
    }

    pub fn color32(color: SeriesColor) -> Color32 {
        Color32::from_rgba_unmultiplied(
            color.r,
            color.g,
            color.b,
            (color.a * 255.0).round() as u8,
        )
    }

    /// Draw a config into the plot surface named `target`.
    pub fn draw(ui: &mut egui::Ui, target: &str, config: &ChartConfig) {
        let labels = config.data.labels.clone();

        let mut plot = Plot::new(target.to_string())
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                // category axis: only integer positions carry a date label
                if idx < 0.0 || (mark.value - idx).abs() > 1e-6 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            });

        if config.options.scales.y.begin_at_zero {
            plot = plot.include_y(0.0);
        }
        if !config.options.responsive {
            plot = plot.width(FIXED_CHART_WIDTH);
        }

        plot.show(ui, |plot_ui| match config.kind {
            ChartKind::Bar => Self::draw_bars(plot_ui, &config.data.datasets),
            ChartKind::Line => Self::draw_lines(plot_ui, &config.data.datasets),
        });
    }

    fn draw_bars(plot_ui: &mut PlotUi, datasets: &[Dataset]) {
        for dataset in datasets {
            let border = Self::color32(dataset.border_color);
            let fill = dataset
                .background_color
                .map(Self::color32)
                .unwrap_or(border);

            let bars: Vec<Bar> = dataset
                .data
                .iter()
                .enumerate()
                .map(|(i, &value)| {
                    Bar::new(i as f64, value)
                        .width(0.6)
                        .fill(fill)
                        .stroke(egui::Stroke::new(
                            dataset.border_width.unwrap_or(1.0),
                            border,
                        ))
                })
                .collect();

            plot_ui.bar_chart(BarChart::new(bars).name(&dataset.label));
        }
    }

    fn draw_lines(plot_ui: &mut PlotUi, datasets: &[Dataset]) {
        for dataset in datasets {
            let color = Self::color32(dataset.border_color);
            let points: Vec<[f64; 2]> = dataset
                .data
                .iter()
                .enumerate()
                .map(|(i, &value)| [i as f64, value])
                .collect();

            let mut line = Line::new(PlotPoints::from_iter(points.iter().copied()))
                .color(color)
                .width(2.0)
                .name(&dataset.label);
            if dataset.fill {
                line = line.fill(0.0);
            }
            plot_ui.line(line);

            plot_ui.points(
                Points::new(PlotPoints::from_iter(points.iter().copied()))
                    .radius(3.0)
                    .color(color),
            );
        }
    }
}
