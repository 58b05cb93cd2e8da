//! The `hotelquiz progress` command.

use std::path::PathBuf;

use anyhow::Result;

use hotelquiz_core::config::load_config_from;
use hotelquiz_core::progress::{load_progress, JsonFileStore};

use crate::render;

pub fn execute(format: String, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = JsonFileStore::new(&config.progress_path);
    let progress = load_progress(&store);

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&progress)?),
        "text" => {
            println!("Progress file: {}", store.path().display());
            println!("{}", render::progress_table(&progress));
        }
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}
