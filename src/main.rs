use std::sync::Arc;

use anyhow::{Result, anyhow};
use eframe::egui::ViewportBuilder;

use trends_dashboard::app::{APP_TITLE, TrendsDashboardApp};
use trends_dashboard::config::DashboardConfig;
use trends_dashboard::controller::RefreshController;
use trends_dashboard::logging::init_logging;
use trends_dashboard::trends_client::TrendsClient;

fn main() -> Result<()> {
    init_logging();

    let config = DashboardConfig::default();
    let client = TrendsClient::new(&config)?;

    tracing::info!(
        event = "dashboard.startup",
        trends_url = %client.trends_url(),
        poll_interval_secs = config.poll_interval.as_secs()
    );

    let controller = RefreshController::new(Arc::new(client), config.poll_interval);

    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title(APP_TITLE),
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(TrendsDashboardApp::new(controller)))),
    )
    .map_err(|e| anyhow!("Failed to start {}: {}", APP_TITLE, e))
}
