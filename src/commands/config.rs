//! `dwmstat config`: show the effective configuration.

use anyhow::{Context, Result};
use clap::ArgMatches;

use super::run::load_config;
use crate::core::Config;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    if matches.get_flag("path") {
        let path = match matches.get_one::<std::path::PathBuf>("config") {
            Some(path) => path.clone(),
            None => Config::get_config_path()?,
        };
        println!("{}", path.display());
        return Ok(());
    }

    let config = load_config(matches)?;
    let json = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
    println!("{}", json);
    Ok(())
}
