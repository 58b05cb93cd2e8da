//! The `hotelquiz init` command.

use std::path::Path;

use anyhow::Result;

use hotelquiz_core::bank::BUILTIN_BANK_TOML;
use hotelquiz_core::config::sample_config;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("hotelquiz.toml"), sample_config())?;

    std::fs::create_dir_all("banks")?;
    write_if_missing(Path::new("banks/hotel.toml"), BUILTIN_BANK_TOML)?;

    println!("\nNext steps:");
    println!("  1. Edit hotelquiz.toml (time limit, locale, bank location)");
    println!("  2. Run: hotelquiz validate --bank banks/hotel.toml");
    println!("  3. Run: hotelquiz quiz --bank banks/hotel.toml");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}
