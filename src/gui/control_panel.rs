//! Control Panel Widget
//! Left side panel with data sources, filters, and actions.

use crate::data::{ACTIVITY_SOURCE_DEFAULT, METRICS_SOURCE_DEFAULT};
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// Source selector entries; "any" disables the source filter.
pub const SOURCE_CHOICES: [&str; 3] = ["any", "strava", "whoop"];

/// User settings for a chart build.
#[derive(Clone)]
pub struct UserSettings {
    pub activities_path: Option<PathBuf>,
    pub metrics_path: Option<PathBuf>,
    pub activity_source: String,
    pub metrics_source: String,
    pub date_from: String,
    pub date_to: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            activities_path: None,
            metrics_path: None,
            activity_source: ACTIVITY_SOURCE_DEFAULT.to_string(),
            metrics_source: METRICS_SOURCE_DEFAULT.to_string(),
            date_from: String::new(),
            date_to: String::new(),
        }
    }
}

/// Left side control panel with file selection and build controls.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub progress: f32,
    pub status: String,
    pub build_enabled: bool,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            progress: 0.0,
            status: "Ready".to_string(),
            build_enabled: false,
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📈 HealthDash")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Activity & Recovery")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Sources Section =====
        ui.label(RichText::new("📁 Data Files").size(14.0).strong());
        ui.add_space(5.0);

        let activities_path = self.settings.activities_path.clone();
        if Self::file_row(ui, "Activities:", &activities_path) {
            action = ControlPanelAction::BrowseActivities;
        }
        ui.add_space(5.0);
        let metrics_path = self.settings.metrics_path.clone();
        if Self::file_row(ui, "Metrics:", &metrics_path) {
            action = ControlPanelAction::BrowseMetrics;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters Section =====
        ui.label(RichText::new("🔧 Filters").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 110.0;
        let combo_width = 150.0;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Activity Source:"));
            ComboBox::from_id_salt("activity_source")
                .width(combo_width)
                .selected_text(&self.settings.activity_source)
                .show_ui(ui, |ui| {
                    for source in SOURCE_CHOICES {
                        if ui
                            .selectable_label(self.settings.activity_source == source, source)
                            .clicked()
                        {
                            self.settings.activity_source = source.to_string();
                        }
                    }
                });
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Metrics Source:"));
            ComboBox::from_id_salt("metrics_source")
                .width(combo_width)
                .selected_text(&self.settings.metrics_source)
                .show_ui(ui, |ui| {
                    for source in SOURCE_CHOICES {
                        if ui
                            .selectable_label(self.settings.metrics_source == source, source)
                            .clicked()
                        {
                            self.settings.metrics_source = source.to_string();
                        }
                    }
                });
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("From (inclusive):"));
            ui.add(
                egui::TextEdit::singleline(&mut self.settings.date_from)
                    .desired_width(combo_width)
                    .hint_text("YYYY-MM-DD"),
            );
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("To (inclusive):"));
            ui.add(
                egui::TextEdit::singleline(&mut self.settings.date_to)
                    .desired_width(combo_width)
                    .hint_text("YYYY-MM-DD"),
            );
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.build_enabled, |ui| {
                let button = egui::Button::new(RichText::new("▶ Build Charts").size(16.0))
                    .min_size(egui::vec2(200.0, 35.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Build;
                }
            });

            ui.add_space(8.0);

            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Complete") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// One file picker row; returns true when Browse was clicked.
    fn file_row(ui: &mut egui::Ui, label: &str, path: &Option<PathBuf>) -> bool {
        let mut clicked = false;

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.add_sized([70.0, 20.0], egui::Label::new(label));

                    let path_text = path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());
                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            clicked = true;
                        }
                    });
                });
            });

        clicked
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseActivities,
    BrowseMetrics,
    Build,
    ExportPng,
}
