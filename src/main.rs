//! HealthDash - Activity & Recovery Chart Viewer
//!
//! Loads activity and health metric CSV exports and renders an activity
//! duration bar chart and an HRV/recovery line chart.

mod charts;
mod data;
mod gui;
mod stats;

use eframe::egui;
use gui::HealthDashApp;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([1000.0, 640.0])
            .with_title("HealthDash"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "HealthDash",
        options,
        Box::new(|cc| Ok(Box::new(HealthDashApp::new(cc)))),
    )
}
