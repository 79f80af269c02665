use std::path::Path;

use anyhow::Result;
use daybook_core::DaybookConfig;
use owo_colors::OwoColorize;

pub fn run(config_path: &Path, init: bool) -> Result<()> {
    if init {
        if config_path.exists() {
            println!(
                "{}",
                format!("Config already exists: {}", config_path.display()).dimmed()
            );
        } else {
            DaybookConfig::create_default_config(config_path)?;
            println!(
                "{}",
                format!("Created config: {}", config_path.display()).green()
            );
        }
        println!();
    }

    let config = DaybookConfig::load_from(config_path)?;

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!();
    println!("{}", "Effective settings".bold());
    for line in config.to_toml()?.lines() {
        println!("  {line}");
    }

    Ok(())
}
