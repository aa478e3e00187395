use serde::{Deserialize, Serialize};
use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::cities::{default_catalog, CityRef};
use crate::constants::{BASE_DELAY_MS, ICON_FOLDER};
use crate::units::TemperatureUnits;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    pub units: Option<TemperatureUnits>,
    /// canned forecasts instead of the network
    pub demo: Option<bool>,
    /// travel catalog; the classic line-up when absent
    pub cities: Option<Vec<CityRef>>,
    pub forecast: Option<ForecastConfig>,
    pub panel: Option<PanelConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ForecastConfig {
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
    pub connect_timeout_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
    pub endpoint_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PanelConfig {
    pub base_delay_ms: Option<u64>,
    pub icon_folder: Option<String>,
    /// write the visible canvas here (png) after each cycle
    pub snapshot: Option<PathBuf>,
    /// stop after this many activation cycles; run until signalled when absent
    pub cycles: Option<u32>,
}

impl Config {
    pub fn catalog(&self) -> Vec<CityRef> {
        self.cities.clone().unwrap_or_else(default_catalog)
    }

    pub fn units(&self) -> TemperatureUnits {
        self.units.unwrap_or_default()
    }

    pub fn demo(&self) -> bool {
        self.demo.unwrap_or(false)
    }

    pub fn base_delay_ms(&self) -> u64 {
        self.panel.as_ref().and_then(|p| p.base_delay_ms).unwrap_or(BASE_DELAY_MS)
    }

    pub fn icon_folder(&self) -> String {
        self.panel
            .as_ref()
            .and_then(|p| p.icon_folder.clone())
            .unwrap_or_else(|| ICON_FOLDER.to_string())
    }
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "travelboard", about = "Travel Forecast board", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// shorthand for --log-level debug
    #[arg(long, action = ArgAction::SetTrue)]
    pub debug: bool,
    /// imperial | metric (f/c aliases accepted)
    #[arg(long)]
    pub units: Option<TemperatureUnits>,
    #[arg(long)]
    pub base_delay_ms: Option<u64>,
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub icon_folder: Option<String>,
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub snapshot: Option<PathBuf>,
    #[arg(long)]
    pub cycles: Option<u32>,
    /// run offline on canned forecasts
    #[arg(long, action = ArgAction::SetTrue)]
    pub demo: bool,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    let cli = Cli::parse();
    let cfg = load_with(&cli)?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Layer defaults, YAML and the given CLI overrides, then validate.
pub fn load_with(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;

    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/travelboard/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/travelboard/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/travelboard.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["travelboard.yaml", "config.yaml", "config/travelboard.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    parse_yaml(&s)
}

pub fn parse_yaml(s: &str) -> Result<Config, ConfigError> {
    let cfg: Config = serde_yaml::from_str(s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    // top-level
    if src.log_level.is_some() { dst.log_level = src.log_level; }
    if src.units.is_some()     { dst.units = src.units; }
    if src.demo.is_some()      { dst.demo = src.demo; }
    if src.cities.is_some()    { dst.cities = src.cities; }
    // forecast
    match (&mut dst.forecast, src.forecast) {
        (None, Some(c)) => dst.forecast = Some(c),
        (Some(d), Some(s)) => merge_forecast(d, s),
        _ => {}
    }
    // panel
    match (&mut dst.panel, src.panel) {
        (None, Some(c)) => dst.panel = Some(c),
        (Some(d), Some(s)) => merge_panel(d, s),
        _ => {}
    }
}

fn merge_forecast(dst: &mut ForecastConfig, src: ForecastConfig) {
    if src.base_url.is_some()            { dst.base_url = src.base_url; }
    if src.user_agent.is_some()          { dst.user_agent = src.user_agent; }
    if src.connect_timeout_ms.is_some()  { dst.connect_timeout_ms = src.connect_timeout_ms; }
    if src.timeout_ms.is_some()          { dst.timeout_ms = src.timeout_ms; }
    if src.endpoint_cache_size.is_some() { dst.endpoint_cache_size = src.endpoint_cache_size; }
}

fn merge_panel(dst: &mut PanelConfig, src: PanelConfig) {
    if src.base_delay_ms.is_some() { dst.base_delay_ms = src.base_delay_ms; }
    if src.icon_folder.is_some()   { dst.icon_folder = src.icon_folder; }
    if src.snapshot.is_some()      { dst.snapshot = src.snapshot; }
    if src.cycles.is_some()        { dst.cycles = src.cycles; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some() { cfg.log_level = cli.log_level.clone(); }
    if cli.debug               { cfg.log_level = Some("debug".to_string()); }
    if cli.units.is_some()     { cfg.units = cli.units; }
    if cli.demo                { cfg.demo = Some(true); }

    let any_panel = cli.base_delay_ms.is_some()
        || cli.icon_folder.is_some()
        || cli.snapshot.is_some()
        || cli.cycles.is_some();

    if any_panel && cfg.panel.is_none() {
        cfg.panel = Some(PanelConfig::default());
    }
    if let Some(panel) = cfg.panel.as_mut() {
        if cli.base_delay_ms.is_some() { panel.base_delay_ms = cli.base_delay_ms; }
        if cli.icon_folder.is_some()   { panel.icon_folder = cli.icon_folder.clone(); }
        if cli.snapshot.is_some()      { panel.snapshot = cli.snapshot.clone(); }
        if cli.cycles.is_some()        { panel.cycles = cli.cycles; }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(cities) = cfg.cities.as_ref() {
        if cities.is_empty() {
            return Err(ConfigError::Validation("cities must list at least one city".into()));
        }
        for city in cities {
            if city.name.trim().is_empty() {
                return Err(ConfigError::Validation("city name must not be empty".into()));
            }
            if !city.has_valid_coordinates() {
                return Err(ConfigError::Validation(format!(
                    "{} has out of range coordinates ({}, {})",
                    city.name, city.latitude, city.longitude
                )));
            }
        }
    }
    if let Some(forecast) = cfg.forecast.as_ref() {
        if forecast.connect_timeout_ms == Some(0) || forecast.timeout_ms == Some(0) {
            return Err(ConfigError::Validation("forecast timeouts must be > 0".into()));
        }
    }
    if let Some(panel) = cfg.panel.as_ref() {
        if panel.base_delay_ms == Some(0) {
            return Err(ConfigError::Validation("panel base_delay_ms must be > 0".into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
log_level: debug
units: metric
cities:
  - name: Denver
    latitude: 39.7391
    longitude: -104.9847
  - name: Boston
    latitude: 42.3584
    longitude: -71.0598
panel:
  base_delay_ms: 40
"#;

    #[test]
    fn test_yaml_parses() {
        let cfg = parse_yaml(SAMPLE).unwrap();
        assert_eq!(cfg.units(), TemperatureUnits::Metric);
        assert_eq!(cfg.catalog().len(), 2);
        assert_eq!(cfg.base_delay_ms(), 40);
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn test_defaults_when_unset() {
        let cfg = Config::default();
        assert_eq!(cfg.units(), TemperatureUnits::Imperial);
        assert_eq!(cfg.catalog().len(), 24);
        assert_eq!(cfg.base_delay_ms(), BASE_DELAY_MS);
        assert_eq!(cfg.icon_folder(), ICON_FOLDER);
    }

    #[test]
    fn test_cli_overrides_yaml() {
        let mut cfg = parse_yaml(SAMPLE).unwrap();
        let cli = Cli {
            units: Some(TemperatureUnits::Imperial),
            base_delay_ms: Some(10),
            debug: true,
            demo: true,
            ..Cli::default()
        };
        assert!(!cfg.demo());
        apply_cli_overrides(&mut cfg, &cli);
        assert!(cfg.demo());
        assert_eq!(cfg.units(), TemperatureUnits::Imperial);
        assert_eq!(cfg.base_delay_ms(), 10);
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut cfg = parse_yaml(SAMPLE).unwrap();
        let overlay = parse_yaml("panel:\n  cycles: 3\n").unwrap();
        merge(&mut cfg, overlay);
        assert_eq!(cfg.base_delay_ms(), 40);
        assert_eq!(cfg.panel.as_ref().and_then(|p| p.cycles), Some(3));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let bad_city = parse_yaml("cities:\n  - name: Mars\n    latitude: 120.0\n    longitude: 0.0\n").unwrap();
        assert!(matches!(validate(&bad_city), Err(ConfigError::Validation(_))));

        let empty = parse_yaml("cities: []\n").unwrap();
        assert!(validate(&empty).is_err());

        let zero_delay = parse_yaml("panel:\n  base_delay_ms: 0\n").unwrap();
        assert!(validate(&zero_delay).is_err());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/travelboard.yaml")),
            ..Cli::default()
        };
        assert!(matches!(load_with(&cli), Err(ConfigError::Validation(_))));
    }
}
