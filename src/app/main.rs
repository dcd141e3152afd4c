//! Campus Connect desktop client - main entry point
//!
//! Loads configuration, restores any stored session and hands control to
//! eframe. All backend work runs on a tokio runtime owned by the app state.

use eframe::egui;
use tracing_subscriber::EnvFilter;

use campus_connect::app::{views, AppState, CampusClient, Config};

const DEFAULT_LOG_FILTER: &str = "campus_connect=info,campus_app=info";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::load()?;
    tracing::info!(api = config.server_url(), storage = %config.storage_path().display(), "Starting Campus Connect");

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let client = runtime.block_on(CampusClient::open(config))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Campus Connect",
        options,
        Box::new(move |_cc| Ok(Box::new(CampusApp { state: AppState::new(runtime, client) }))),
    )?;

    Ok(())
}

/// Main application state
struct CampusApp {
    state: AppState,
}

impl eframe::App for CampusApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll();

        views::render_top_bar(ctx, &mut self.state);
        views::render_sidebar(ctx, &mut self.state);
        views::render_main_panel(ctx, &mut self.state);

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
