// Terminal browser for a remote table.
// Wires config, session, transport, and notifications into the store and runs the UI.

mod app;
mod ui;

use std::fs::{self, File};
use std::sync::Arc;

use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use tabsync::api::ReqwestTransport;
use tabsync::{Config, NotificationLog, TableDataStore, TokenFile, paths};

use crate::app::App;

/// Log to a file so output never lands on the terminal UI.
fn init_logging() {
    let Some(path) = paths::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    if let Ok(file) = File::create(&path) {
        let config = ConfigBuilder::new().build();
        let _ = WriteLogger::init(LevelFilter::Debug, config, file);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::load()?;
    let session = TokenFile::default_location()?;
    session.seed_from_env()?;
    log::info!("opening {}", config.resource_url());

    let notifications = Arc::new(NotificationLog::new());
    let store = TableDataStore::new(
        &config,
        Arc::new(ReqwestTransport::new()?),
        Arc::new(session),
        notifications.clone(),
    );

    let mut terminal = ratatui::init();
    let mut app = App::new(store, notifications, config.resource_url());
    let result = app.run(&mut terminal);
    ratatui::restore();

    result?;
    Ok(())
}
