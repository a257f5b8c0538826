//! HealthDash Main Application
//! Main window with control panel and dashboard.

use crate::charts::{self, StaticChartRenderer};
use crate::data::{parse_date, DataKind, DataLoader, DataProcessor, SeriesFilter};
use crate::gui::{ControlPanel, ControlPanelAction, Dashboard, DashboardData};
use crate::stats::StatsCalculator;
use anyhow::Context as _;
use chrono::NaiveDate;
use egui::SidePanel;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

const EXPORT_WIDTH: u32 = 1200;
const EXPORT_HEIGHT: u32 = 700;

/// CSV loading result from background thread
enum LoadResult {
    Progress(String),
    Complete {
        kind: DataKind,
        df: DataFrame,
        path: PathBuf,
        rows: usize,
    },
    Error(String),
}

/// Chart build result from background thread
enum BuildResult {
    Progress(f32, String),
    Complete(Box<DashboardData>),
    Error(String),
}

/// Main application window.
pub struct HealthDashApp {
    loader: DataLoader,
    control_panel: ControlPanel,
    dashboard: Dashboard,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,

    // Async chart building
    build_rx: Option<Receiver<BuildResult>>,
    is_building: bool,
}

impl HealthDashApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            loader: DataLoader::new(),
            control_panel: ControlPanel::new(),
            dashboard: Dashboard::new(),
            load_rx: None,
            is_loading: false,
            build_rx: None,
            is_building: false,
        }
    }

    /// Handle CSV file selection for either data kind.
    fn handle_browse(&mut self, kind: DataKind) {
        if self.is_loading {
            return;
        }

        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };

        // Clear previous charts
        self.dashboard.clear();
        self.control_panel
            .set_progress(0.0, &format!("Loading {kind} file..."));
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        let path_str = path.to_string_lossy().to_string();

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress(format!("Reading {kind} CSV...")));

            let result = DataLoader::read_csv(&path_str)
                .and_then(|df| DataLoader::check_columns(kind, &df).map(|_| df));

            match result {
                Ok(df) => {
                    let rows = df.height();
                    let _ = tx.send(LoadResult::Complete {
                        kind,
                        df,
                        path,
                        rows,
                    });
                }
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_progress(0.0, &status);
                    }
                    LoadResult::Complete {
                        kind,
                        df,
                        path,
                        rows,
                    } => {
                        self.loader.set_dataframe(kind, df, path.clone());
                        match kind {
                            DataKind::Activities => {
                                self.control_panel.settings.activities_path = Some(path);
                            }
                            DataKind::Metrics => {
                                self.control_panel.settings.metrics_path = Some(path);
                            }
                        }
                        self.control_panel
                            .set_progress(0.0, &format!("Loaded {rows} {kind} rows"));
                        self.control_panel.build_enabled = self.loader.is_complete();
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {error}"));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Start a chart build in a background thread.
    fn start_build(&mut self) {
        let settings = self.control_panel.settings.clone();

        let from = match Self::parse_bound(&settings.date_from) {
            Ok(bound) => bound,
            Err(msg) => {
                self.control_panel.set_progress(0.0, &msg);
                return;
            }
        };
        let to = match Self::parse_bound(&settings.date_to) {
            Ok(bound) => bound,
            Err(msg) => {
                self.control_panel.set_progress(0.0, &msg);
                return;
            }
        };

        let (Some(activities), Some(metrics)) = (
            self.loader.frame(DataKind::Activities).cloned(),
            self.loader.frame(DataKind::Metrics).cloned(),
        ) else {
            self.control_panel.set_progress(0.0, "No data loaded");
            return;
        };

        let activity_filter = SeriesFilter {
            source: Self::source_filter(&settings.activity_source),
            from,
            to,
        };
        let metrics_filter = SeriesFilter {
            source: Self::source_filter(&settings.metrics_source),
            from,
            to,
        };

        let (tx, rx) = channel();
        self.build_rx = Some(rx);
        self.is_building = true;
        self.control_panel.set_progress(5.0, "Processing data...");

        thread::spawn(move || {
            Self::run_build(tx, activities, metrics, activity_filter, metrics_filter);
        });
    }

    /// Run a chart build (called from background thread)
    fn run_build(
        tx: Sender<BuildResult>,
        activities: DataFrame,
        metrics: DataFrame,
        activity_filter: SeriesFilter,
        metrics_filter: SeriesFilter,
    ) {
        let _ = tx.send(BuildResult::Progress(10.0, "Extracting rows...".to_string()));

        let rows = match DataProcessor::activity_rows(&activities, &activity_filter) {
            Ok(rows) => rows,
            Err(e) => {
                let _ = tx.send(BuildResult::Error(e.to_string()));
                return;
            }
        };
        let days = match DataProcessor::metric_days(&metrics, &metrics_filter) {
            Ok(days) => days,
            Err(e) => {
                let _ = tx.send(BuildResult::Error(e.to_string()));
                return;
            }
        };

        let _ = tx.send(BuildResult::Progress(
            40.0,
            "Computing statistics...".to_string(),
        ));

        let activity_summary = StatsCalculator::activity_summary(&rows);
        let metrics_summary = StatsCalculator::metrics_summary(&days);
        let monthly = StatsCalculator::monthly_summaries(&rows, &days);

        let _ = tx.send(BuildResult::Progress(70.0, "Building charts...".to_string()));

        let activity_series = DataProcessor::activity_series(&rows);
        let metrics_series = DataProcessor::metrics_series(&days);
        let association = StatsCalculator::hrv_recovery_association(&metrics_series);

        let activity_config = match charts::activity_chart(&activity_series) {
            Ok(config) => config,
            Err(e) => {
                let _ = tx.send(BuildResult::Error(e.to_string()));
                return;
            }
        };
        let metrics_config = match charts::health_metrics_chart(&metrics_series) {
            Ok(config) => config,
            Err(e) => {
                let _ = tx.send(BuildResult::Error(e.to_string()));
                return;
            }
        };

        let _ = tx.send(BuildResult::Complete(Box::new(DashboardData {
            activity_config,
            metrics_config,
            activity_summary,
            metrics_summary,
            association,
            monthly,
        })));
    }

    /// Check for chart build results
    fn check_build_results(&mut self) {
        let rx = self.build_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    BuildResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    BuildResult::Complete(data) => {
                        let active_days = data.activity_summary.active_days;
                        let metric_days = data.metrics_summary.day_count;
                        self.dashboard.set_data(*data);
                        self.control_panel.set_progress(
                            100.0,
                            &format!(
                                "Complete! {active_days} active days, {metric_days} metric days"
                            ),
                        );
                        self.is_building = false;
                        should_keep_receiver = false;
                    }
                    BuildResult::Error(error) => {
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {error}"));
                        self.is_building = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.build_rx = Some(rx);
            }
        }
    }

    /// Handle PNG export - render both charts and write one file each
    fn handle_export(&mut self) {
        let Some(data) = self.dashboard.data() else {
            self.control_panel.set_progress(0.0, "No charts to export");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("healthdash.png")
            .save_file()
        else {
            return; // User cancelled
        };

        self.control_panel.set_progress(10.0, "Rendering charts...");

        match Self::export_charts(data, &path) {
            Ok((activity_path, metrics_path)) => {
                self.control_panel.set_progress(
                    100.0,
                    &format!(
                        "Complete! Wrote {} and {}",
                        activity_path.display(),
                        metrics_path.display()
                    ),
                );
                if let Err(e) = open::that(&activity_path) {
                    log::warn!("could not open exported chart: {e}");
                }
            }
            Err(e) => {
                self.control_panel
                    .set_progress(0.0, &format!("Export error: {e:#}"));
            }
        }
    }

    fn export_charts(
        data: &DashboardData,
        path: &Path,
    ) -> anyhow::Result<(PathBuf, PathBuf)> {
        let activity_png = StaticChartRenderer::render_to_png_bytes(
            &data.activity_config,
            "Activity Duration",
            EXPORT_WIDTH,
            EXPORT_HEIGHT,
        )
        .context("rendering activity chart")?;
        let metrics_png = StaticChartRenderer::render_to_png_bytes(
            &data.metrics_config,
            "Health Metrics",
            EXPORT_WIDTH,
            EXPORT_HEIGHT,
        )
        .context("rendering health metrics chart")?;

        let activity_path = Self::suffixed(path, "activity");
        let metrics_path = Self::suffixed(path, "health_metrics");
        std::fs::write(&activity_path, activity_png)
            .with_context(|| format!("writing {}", activity_path.display()))?;
        std::fs::write(&metrics_path, metrics_png)
            .with_context(|| format!("writing {}", metrics_path.display()))?;

        Ok((activity_path, metrics_path))
    }

    fn suffixed(path: &Path, suffix: &str) -> PathBuf {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("healthdash");
        path.with_file_name(format!("{stem}_{suffix}.png"))
    }

    fn source_filter(choice: &str) -> Option<String> {
        if choice == "any" {
            None
        } else {
            Some(choice.to_string())
        }
    }

    fn parse_bound(text: &str) -> Result<Option<NaiveDate>, String> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        parse_date(text)
            .map(Some)
            .ok_or_else(|| format!("Error: '{text}' is not a YYYY-MM-DD date"))
    }
}

impl eframe::App for HealthDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();
        self.check_build_results();

        // Request repaint while loading or building
        if self.is_loading || self.is_building {
            ctx.request_repaint();
        }

        self.control_panel.export_enabled = self.dashboard.data().is_some();

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseActivities => {
                            self.handle_browse(DataKind::Activities)
                        }
                        ControlPanelAction::BrowseMetrics => {
                            self.handle_browse(DataKind::Metrics)
                        }
                        ControlPanelAction::Build => {
                            if !self.is_building {
                                self.start_build();
                            }
                        }
                        ControlPanelAction::ExportPng => {
                            self.handle_export();
                        }
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.dashboard.show(ui);
        });
    }
}
