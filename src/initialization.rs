use std::env;
use std::fs;
use std::str::FromStr;
use log::{info, LevelFilter};
use serde::Deserialize;
use crate::errors::ConfigError;
use crate::logging::setup_logger;

#[derive(Deserialize, Debug)]
pub struct WebServer {
    pub bind_address: String,
    pub bind_port: u16,
}

#[derive(Deserialize, Debug)]
pub struct DB {
    pub db_path: String,
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_secs: u64,
}

#[derive(Deserialize, Debug)]
pub struct Forecast {
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_max_samples")]
    pub max_samples: usize,
}

impl Default for Forecast {
    fn default() -> Self {
        Forecast { location: default_location(), max_samples: default_max_samples() }
    }
}

#[derive(Deserialize, Debug)]
pub struct General {
    pub log_path: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_to_stdout")]
    pub log_to_stdout: bool,
}

#[derive(Deserialize, Debug)]
pub struct Config {
    pub web_server: WebServer,
    pub db: DB,
    #[serde(default)]
    pub forecast: Forecast,
    pub general: General,
}

fn default_busy_timeout() -> u64 { 30 }
fn default_location() -> String { "Moscow".to_string() }
fn default_max_samples() -> usize { 48 }
fn default_log_level() -> String { "info".to_string() }
fn default_log_to_stdout() -> bool { true }

/// Loads the configuration given by the `--config=<path>` argument and sets up logging
///
pub fn config() -> Result<Config, ConfigError> {
    let args: Vec<String> = env::args().collect();
    let config_path = config_path(&args)?;
    let config = load_config(config_path)?;

    let log_level = LevelFilter::from_str(&config.general.log_level)?;
    setup_logger(&config.general.log_path, log_level, config.general.log_to_stdout)?;
    info!("configuration loaded from {}", config_path);

    Ok(config)
}

/// Finds the config file path among command line arguments
///
/// # Arguments
///
/// * 'args' - command line arguments
fn config_path(args: &[String]) -> Result<&str, ConfigError> {
    args.iter()
        .find_map(|a| a.strip_prefix("--config="))
        .filter(|p| !p.is_empty())
        .ok_or(ConfigError::from("missing argument '--config=<config file>'"))
}

/// Reads and parses a toml config file
///
/// # Arguments
///
/// * 'config_path' - path to the config file
fn load_config(config_path: &str) -> Result<Config, ConfigError> {
    let toml = fs::read_to_string(config_path)?;
    parse_config(&toml)
}

fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(toml)?)
}
