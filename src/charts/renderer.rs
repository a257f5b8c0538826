//! Static Chart Renderer
//! Renders chart configurations to in-memory PNG images for export.

use crate::charts::config::{ChartConfig, ChartKind, Dataset, SeriesColor};
use image::{DynamicImage, RgbImage};
use plotters::chart::ChartContext;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::RGBAColor;
use std::io::Cursor;
use thiserror::Error;

const BAR_HALF_WIDTH: f64 = 0.3;
/// Headroom above the tallest data point.
const Y_HEADROOM: f64 = 1.1;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("chart drawing failed: {0}")]
    Draw(String),
    #[error("could not assemble {0}x{1} image buffer")]
    Buffer(u32, u32),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Renders chart configurations with plotters.
pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render a config to PNG bytes at the given pixel size.
    pub fn render_to_png_bytes(
        config: &ChartConfig,
        title: &str,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let mut buf = vec![0u8; (width as usize) * (height as usize) * 3];
        Self::draw_into(&mut buf, config, title, width, height)?;

        let img = RgbImage::from_raw(width, height, buf)
            .ok_or(RenderError::Buffer(width, height))?;
        let mut png = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;
        Ok(png)
    }

    fn draw_into(
        buf: &mut [u8],
        config: &ChartConfig,
        title: &str,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::with_buffer(buf, (width, height)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| RenderError::Draw(e.to_string()))?;

        let labels = &config.data.labels;
        let n = labels.len();
        let x_max = n.max(1) as f64 - 0.5;
        let y_min = if config.options.scales.y.begin_at_zero {
            0.0
        } else {
            Self::y_axis_min(&config.data.datasets)
        };
        let y_max = Self::y_axis_max(&config.data.datasets);

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(14)
            .x_label_area_size(36)
            .y_label_area_size(48)
            .build_cartesian_2d(-0.5f64..x_max, y_min..y_max)
            .map_err(|e| RenderError::Draw(e.to_string()))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n.clamp(1, 12))
            .x_label_formatter(&|x| {
                let idx = x.round();
                if idx < 0.0 || (x - idx).abs() > 1e-6 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .y_labels(8)
            .draw()
            .map_err(|e| RenderError::Draw(e.to_string()))?;

        match config.kind {
            ChartKind::Bar => Self::draw_bars(&mut chart, &config.data.datasets)?,
            ChartKind::Line => Self::draw_lines(&mut chart, &config.data.datasets)?,
        }

        if !config.data.datasets.is_empty() {
            chart
                .configure_series_labels()
                .border_style(BLACK)
                .background_style(WHITE.mix(0.85))
                .draw()
                .map_err(|e| RenderError::Draw(e.to_string()))?;
        }

        root.present().map_err(|e| RenderError::Draw(e.to_string()))?;
        Ok(())
    }

    fn draw_bars<DB: DrawingBackend>(
        chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
        datasets: &[Dataset],
    ) -> Result<(), RenderError> {
        for dataset in datasets {
            let fill = Self::rgba(dataset.background_color.unwrap_or(dataset.border_color));
            let border = Self::rgb(dataset.border_color);

            chart
                .draw_series(dataset.data.iter().enumerate().map(|(i, &value)| {
                    let x = i as f64;
                    Rectangle::new(
                        [(x - BAR_HALF_WIDTH, 0.0), (x + BAR_HALF_WIDTH, value)],
                        fill.filled(),
                    )
                }))
                .map_err(|e| RenderError::Draw(e.to_string()))?
                .label(&dataset.label)
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], border.filled())
                });
        }
        Ok(())
    }

    fn draw_lines<DB: DrawingBackend>(
        chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
        datasets: &[Dataset],
    ) -> Result<(), RenderError> {
        for dataset in datasets {
            let color = Self::rgb(dataset.border_color);

            chart
                .draw_series(LineSeries::new(
                    dataset
                        .data
                        .iter()
                        .enumerate()
                        .map(|(i, &value)| (i as f64, value)),
                    color.stroke_width(2),
                ))
                .map_err(|e| RenderError::Draw(e.to_string()))?
                .label(&dataset.label)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2))
                });

            chart
                .draw_series(dataset.data.iter().enumerate().map(|(i, &value)| {
                    Circle::new((i as f64, value), 3, color.filled())
                }))
                .map_err(|e| RenderError::Draw(e.to_string()))?;
        }
        Ok(())
    }

    fn rgb(color: SeriesColor) -> RGBColor {
        RGBColor(color.r, color.g, color.b)
    }

    fn rgba(color: SeriesColor) -> RGBAColor {
        RGBColor(color.r, color.g, color.b).mix(color.a as f64)
    }

    fn y_axis_max(datasets: &[Dataset]) -> f64 {
        let mut max = f64::NEG_INFINITY;
        for dataset in datasets {
            for &value in &dataset.data {
                if value.is_finite() {
                    max = max.max(value);
                }
            }
        }
        if !max.is_finite() || max <= 0.0 {
            return 1.0;
        }
        max * Y_HEADROOM
    }

    fn y_axis_min(datasets: &[Dataset]) -> f64 {
        let mut min = f64::INFINITY;
        for dataset in datasets {
            for &value in &dataset.data {
                if value.is_finite() {
                    min = min.min(value);
                }
            }
        }
        if !min.is_finite() || min >= 0.0 {
            return 0.0;
        }
        min * Y_HEADROOM
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::config::{ACTIVITY_BORDER, HRV_COLOR};

    fn dataset(data: Vec<f64>) -> Dataset {
        Dataset {
            label: "test".to_string(),
            data,
            background_color: None,
            border_color: ACTIVITY_BORDER,
            border_width: None,
            fill: false,
        }
    }

    #[test]
    fn y_axis_max_pads_above_tallest_point() {
        let datasets = vec![dataset(vec![10.0, 40.0]), dataset(vec![25.0])];
        let max = StaticChartRenderer::y_axis_max(&datasets);
        assert!(max > 40.0);
        assert!(max <= 44.0 + 1e-9);
    }

    #[test]
    fn y_axis_max_defaults_for_empty_or_flat_data() {
        assert_eq!(StaticChartRenderer::y_axis_max(&[]), 1.0);
        assert_eq!(StaticChartRenderer::y_axis_max(&[dataset(vec![])]), 1.0);
        assert_eq!(
            StaticChartRenderer::y_axis_max(&[dataset(vec![0.0, 0.0])]),
            1.0
        );
    }

    #[test]
    fn y_axis_min_only_dips_below_zero_for_negative_data() {
        let mut ds = dataset(vec![5.0, 8.0]);
        assert_eq!(StaticChartRenderer::y_axis_min(&[ds.clone()]), 0.0);

        ds.border_color = HRV_COLOR;
        ds.data = vec![-4.0, 8.0];
        assert!(StaticChartRenderer::y_axis_min(&[ds]) < -4.0);
    }
}
