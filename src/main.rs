mod api;
mod app;
mod client;
mod config;
mod diff;
mod event;
mod history;
mod markup;
mod model;
mod router;
mod session;
mod shell;
mod theme;
mod timeline;
mod ui;

use api::gateway::Gateway;
use api::http::HttpBlogApi;
use app::BlogDeskApp;
use client::BlogClient;
use config::ClientConfig;
use diff::DiffOptions;
use eframe::egui;
use session::store::FileSessionPersistence;
use session::SessionStore;
use std::sync::{mpsc, Arc};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("blogdesk=info")),
        )
        .init();

    let config = ClientConfig::from_env()?;
    tracing::info!(
        api_url = %config.api_url,
        data_dir = %config.data_dir.display(),
        diff_window = config.diff_window,
        "Starting blogdesk"
    );

    let (tx, rx) = mpsc::channel();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("blogdesk-runtime")
        .build()?;

    let session = Arc::new(SessionStore::load(Box::new(FileSessionPersistence::new(
        config.data_dir.clone(),
    ))));
    let api = Arc::new(HttpBlogApi::new(config.api_url.clone()));
    let gateway = Gateway::new(api, session);
    let client = BlogClient::new(gateway, tx, runtime.handle().clone());

    let app = BlogDeskApp::new(
        rx,
        client,
        DiffOptions {
            window: config.diff_window,
        },
    );
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1180.0, 780.0])
            .with_min_inner_size([860.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Blogdesk",
        native_options,
        Box::new(move |_creation_context| Ok(Box::new(app))),
    )?;

    Ok(())
}
