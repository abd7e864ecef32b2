mod app;
mod config;
mod effects;
mod render;

use std::path::{Path, PathBuf};

use log::LevelFilter;

use crate::config::AppConfig;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;

    feed_logging::initialize(
        config.log_destination,
        LevelFilter::Info,
        Path::new("./shuffle.log"),
    );

    app::run(config)
}
