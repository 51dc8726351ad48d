use std::fs::File;

use directories::ProjectDirs;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "BANDSTAND_LOG";
pub const LOG_FILE: &str = "bandstand.log";

/// Logs go to a file, never to the terminal the UI owns.
pub fn initialize_logging() -> color_eyre::Result<()> {
    let directory = ProjectDirs::from("com", "bandstand", "bandstand")
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(|| std::path::PathBuf::from("."));
    std::fs::create_dir_all(&directory)?;

    let log_file = File::create(directory.join(LOG_FILE))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(log_file)
                .with_ansi(false)
                .with_target(true),
        )
        .with(ErrorLayer::default())
        .init();

    Ok(())
}
