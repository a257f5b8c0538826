//! Dashboard Widget
//! Central panel showing the two chart cards and the summary tables.

use crate::charts::{ChartConfig, ChartPlotter};
use crate::stats::{ActivitySummary, HrvRecoveryAssociation, MetricsSummary, MonthlySummary};
use egui::{Color32, RichText, ScrollArea};

const CARD_SPACING: f32 = 15.0;
const CARD_BORDER: Color32 = Color32::from_rgb(100, 149, 237);
const SIGNIFICANT_COLOR: Color32 = Color32::from_rgb(220, 53, 69);

/// Everything one chart build produces.
pub struct DashboardData {
    pub activity_config: ChartConfig,
    pub metrics_config: ChartConfig,
    pub activity_summary: ActivitySummary,
    pub metrics_summary: MetricsSummary,
    pub association: Option<HrvRecoveryAssociation>,
    pub monthly: Vec<MonthlySummary>,
}

/// Scrollable dashboard with the two charts and the summary tables.
#[derive(Default)]
pub struct Dashboard {
    data: Option<DashboardData>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.data = None;
    }

    pub fn set_data(&mut self, data: DashboardData) {
        self.data = Some(data);
    }

    pub fn data(&self) -> Option<&DashboardData> {
        self.data.as_ref()
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some(data) = &self.data else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Self::chart_card(ui, "Activity Duration", &data.activity_config, |ui, cfg| {
                    ChartPlotter::show_activity_chart(ui, cfg);
                });
                ui.add_space(CARD_SPACING);

                Self::chart_card(ui, "Health Metrics", &data.metrics_config, |ui, cfg| {
                    ChartPlotter::show_health_metrics_chart(ui, cfg);
                });
                if let Some(assoc) = &data.association {
                    Self::association_line(ui, assoc);
                }
                ui.add_space(CARD_SPACING);

                Self::summary_card(ui, data);
            });
    }

    fn chart_card(
        ui: &mut egui::Ui,
        title: &str,
        config: &ChartConfig,
        show_plot: impl FnOnce(&mut egui::Ui, &ChartConfig),
    ) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.5, CARD_BORDER))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new(title).size(18.0).strong());
                    ui.add_space(6.0);
                    Self::legend_row(ui, config);
                    ui.add_space(8.0);
                    show_plot(ui, config);
                });
            });
    }

    fn legend_row(ui: &mut egui::Ui, config: &ChartConfig) {
        ui.horizontal(|ui| {
            for dataset in &config.data.datasets {
                let color = ChartPlotter::color32(dataset.border_color);
                let (rect, _) =
                    ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                ui.painter().rect_filled(rect, 3.0, color);
                ui.label(RichText::new(&dataset.label).size(12.0));
                ui.add_space(12.0);
            }
        });
    }

    fn association_line(ui: &mut egui::Ui, assoc: &HrvRecoveryAssociation) {
        let color = if assoc.is_significant {
            SIGNIFICANT_COLOR
        } else {
            ui.visuals().text_color()
        };
        let marker = if assoc.is_significant {
            " (significant)"
        } else {
            ""
        };
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!(
                "HRV vs Recovery over {} days: r = {:.3}, p = {:.4}{}",
                assoc.n, assoc.r, assoc.p_value, marker
            ))
            .size(12.0)
            .color(color),
        );
    }

    fn summary_card(ui: &mut egui::Ui, data: &DashboardData) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new("Summary").size(16.0).strong());
                ui.add_space(6.0);
                Self::overall_grid(ui, &data.activity_summary, &data.metrics_summary);

                if !data.monthly.is_empty() {
                    ui.add_space(10.0);
                    ui.label(RichText::new("By Month").size(14.0).strong());
                    ui.add_space(4.0);
                    Self::monthly_grid(ui, &data.monthly);
                }
            });
    }

    fn overall_grid(ui: &mut egui::Ui, activities: &ActivitySummary, metrics: &MetricsSummary) {
        egui::Grid::new("overall_summary")
            .striped(true)
            .min_col_width(110.0)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Activities").strong().size(11.0));
                ui.label(RichText::new("Active Days").strong().size(11.0));
                ui.label(RichText::new("Total Duration").strong().size(11.0));
                ui.label(RichText::new("Mean / Day").strong().size(11.0));
                ui.label(RichText::new("Distance").strong().size(11.0));
                ui.label(RichText::new("Avg HRV").strong().size(11.0));
                ui.label(RichText::new("Avg Recovery").strong().size(11.0));
                ui.label(RichText::new("Avg RHR").strong().size(11.0));
                ui.end_row();

                ui.label(RichText::new(activities.activity_count.to_string()).size(11.0));
                ui.label(RichText::new(activities.active_days.to_string()).size(11.0));
                ui.label(
                    RichText::new(format_minutes(activities.total_duration_min)).size(11.0),
                );
                ui.label(
                    RichText::new(format!("{:.0} min", activities.mean_duration_per_day))
                        .size(11.0),
                );
                ui.label(
                    RichText::new(format!("{:.1} km", activities.total_distance_km)).size(11.0),
                );
                ui.label(RichText::new(format_optional(metrics.avg_hrv)).size(11.0));
                ui.label(RichText::new(format_optional(metrics.avg_recovery)).size(11.0));
                ui.label(RichText::new(format_optional(metrics.avg_resting_hr)).size(11.0));
                ui.end_row();
            });

        if !activities.type_counts.is_empty() {
            let breakdown: Vec<String> = activities
                .type_counts
                .iter()
                .map(|(name, count)| format!("{name} ×{count}"))
                .collect();
            ui.add_space(4.0);
            ui.label(
                RichText::new(breakdown.join("  ·  "))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        }
    }

    fn monthly_grid(ui: &mut egui::Ui, monthly: &[MonthlySummary]) {
        egui::Grid::new("monthly_summary")
            .striped(true)
            .min_col_width(80.0)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Month").strong().size(11.0));
                ui.label(RichText::new("Activities").strong().size(11.0));
                ui.label(RichText::new("Duration").strong().size(11.0));
                ui.label(RichText::new("Distance").strong().size(11.0));
                ui.label(RichText::new("Avg HRV").strong().size(11.0));
                ui.label(RichText::new("Avg Recovery").strong().size(11.0));
                ui.label(RichText::new("Avg RHR").strong().size(11.0));
                ui.end_row();

                for row in monthly {
                    ui.label(RichText::new(&row.month).size(11.0));
                    ui.label(
                        RichText::new(row.activities.activity_count.to_string()).size(11.0),
                    );
                    ui.label(
                        RichText::new(format_minutes(row.activities.total_duration_min))
                            .size(11.0),
                    );
                    ui.label(
                        RichText::new(format!("{:.1} km", row.activities.total_distance_km))
                            .size(11.0),
                    );
                    ui.label(RichText::new(format_optional(row.metrics.avg_hrv)).size(11.0));
                    ui.label(
                        RichText::new(format_optional(row.metrics.avg_recovery)).size(11.0),
                    );
                    ui.label(
                        RichText::new(format_optional(row.metrics.avg_resting_hr)).size(11.0),
                    );
                    ui.end_row();
                }
            });
    }
}

fn format_minutes(minutes: f64) -> String {
    if minutes >= 90.0 {
        format!("{:.0} min ({:.1} h)", minutes, minutes / 60.0)
    } else {
        format!("{minutes:.0} min")
    }
}

fn format_optional(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.1}")).unwrap_or_else(|| "-".to_string())
}
