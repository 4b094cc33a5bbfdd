use crate::canvas::viewport::ZoomSettings;
use crate::canvas::CanvasSettings;
use crate::store::StoreOptions;
use crate::theme::{FontFamily, LayoutStyle, Theme};
use crate::ui::{CELL_HEIGHT, CELL_WIDTH};
use clap::Parser;
use config::{
    Config as ConfigCrate, ConfigError as ConfigCrateError, Environment, File, Map, Source, Value,
};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_NAME: &str = "mindcanvas";
const ENV_PREFIX: &str = "MINDCANVAS";

const DEFAULT_STATE_FILE: &str = "state.json";
const DEFAULT_LOG_FILE: &str = "mindcanvas.log";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_AUTO_SAVE: bool = true;
const DEFAULT_MIN_ZOOM: f64 = 0.2;
const DEFAULT_MAX_ZOOM: f64 = 2.0;
const DEFAULT_ZOOM_STEP: f64 = 1.1;
const DEFAULT_CLICK_THRESHOLD: f64 = 5.0;
const DEFAULT_DOUBLE_CLICK_MS: u64 = 300;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] ConfigCrateError),
    #[error("Validation error: {0}")]
    Validation(String),
}

// Every field optional so file and environment layers can be partial.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
struct FileConfig {
    state_file: Option<PathBuf>,
    log_file: Option<PathBuf>,
    log_level: Option<String>,
    auto_save: Option<bool>,
    max_undo_steps: Option<usize>,
    min_zoom: Option<f64>,
    max_zoom: Option<f64>,
    zoom_step: Option<f64>,
    click_threshold: Option<f64>,
    double_click_ms: Option<u64>,
    default_theme: Option<String>,
    default_font: Option<String>,
    default_layout: Option<String>,
    suggest_command: Option<String>,
    export_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub state_file: PathBuf,
    pub log_file: PathBuf,
    pub log_level: String,
    pub auto_save: bool,
    /// `None` keeps every undo step.
    pub max_undo_steps: Option<usize>,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
    pub click_threshold: f64,
    pub double_click_ms: u64,
    pub default_theme: Theme,
    pub default_font: FontFamily,
    pub default_layout: LayoutStyle,
    pub suggest_command: Option<String>,
    pub export_dir: PathBuf,

    // Command line only
    pub fresh: bool,
    pub export_html: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = default_data_dir();
        AppConfig {
            state_file: data_dir.join(DEFAULT_STATE_FILE),
            log_file: data_dir.join(DEFAULT_LOG_FILE),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            auto_save: DEFAULT_AUTO_SAVE,
            max_undo_steps: None,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            zoom_step: DEFAULT_ZOOM_STEP,
            click_threshold: DEFAULT_CLICK_THRESHOLD,
            double_click_ms: DEFAULT_DOUBLE_CLICK_MS,
            default_theme: Theme::default(),
            default_font: FontFamily::default(),
            default_layout: LayoutStyle::default(),
            suggest_command: None,
            export_dir: PathBuf::from("."),
            fresh: false,
            export_html: None,
        }
    }
}

impl AppConfig {
    pub fn canvas_settings(&self) -> CanvasSettings {
        CanvasSettings {
            zoom: ZoomSettings {
                min: self.min_zoom,
                max: self.max_zoom,
                step: self.zoom_step,
            },
            click_threshold: self.click_threshold,
            double_click_ms: self.double_click_ms,
            // Glyphs are drawn one cell wide; any point of that cell must hit
            min_glyph_hit: CELL_WIDTH.hypot(CELL_HEIGHT) / 2.0,
        }
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            max_undo_steps: self.max_undo_steps,
            auto_save: self.auto_save,
            default_theme: self.default_theme,
            default_font: self.default_font,
            default_layout: self.default_layout,
            fresh: self.fresh,
        }
    }
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".").join(format!(".{APP_NAME}")))
}

fn default_config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join("config.toml"))
}

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about = "Terminal mind map editor", long_about = None)]
pub struct CliArgs {
    /// Path to a custom configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Ignore the saved session and start from a fresh map
    #[arg(long)]
    pub fresh: bool,

    /// Print the resolved configuration and exit
    #[arg(long)]
    pub debug_config: bool,

    /// Export the active map as HTML to PATH and exit
    #[arg(long, value_name = "PATH")]
    pub export_html: Option<PathBuf>,

    #[arg(long)]
    pub state_file: Option<PathBuf>,
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long)]
    pub auto_save: Option<bool>,
    #[arg(long)]
    pub max_undo_steps: Option<usize>,
    #[arg(long)]
    pub min_zoom: Option<f64>,
    #[arg(long)]
    pub max_zoom: Option<f64>,
    #[arg(long)]
    pub zoom_step: Option<f64>,
    #[arg(long)]
    pub click_threshold: Option<f64>,
    #[arg(long)]
    pub double_click_ms: Option<u64>,
    #[arg(long)]
    pub default_theme: Option<String>,
    #[arg(long)]
    pub default_font: Option<String>,
    #[arg(long)]
    pub default_layout: Option<String>,
    #[arg(long)]
    pub suggest_command: Option<String>,
    #[arg(long)]
    pub export_dir: Option<PathBuf>,
}

/// Loads configuration from all sources: args > environment > file > defaults.
pub fn load_config(args: &CliArgs) -> Result<AppConfig, ConfigError> {
    let env_source = Environment::with_prefix(ENV_PREFIX).separator("__");
    // Missing variables are fine; only a broken environment fails to collect
    let env_map: Map<String, Value> = env_source.collect().unwrap_or_default();

    build_config_from_args(args.clone(), Some(env_map))
}

// Separate from load_config so tests can supply their own override layer
pub fn build_config_from_args(
    args: CliArgs,
    override_source: Option<Map<String, Value>>,
) -> Result<AppConfig, ConfigError> {
    let config_file_path = args.config.clone().or_else(default_config_file);

    let mut config_builder = ConfigCrate::builder();

    if let Some(ref path) = config_file_path {
        config_builder = config_builder.add_source(File::from(path.clone()).required(false));
    }

    // Overrides beat the file layer
    if let Some(overrides) = override_source {
        for (key, value) in overrides {
            config_builder = config_builder.set_override(&key, value)?;
        }
    }

    let loaded: FileConfig = config_builder.build()?.try_deserialize()?;
    let defaults = AppConfig::default();

    let config = AppConfig {
        state_file: args
            .state_file
            .or(loaded.state_file)
            .unwrap_or(defaults.state_file),
        log_file: args.log_file.or(loaded.log_file).unwrap_or(defaults.log_file),
        log_level: args
            .log_level
            .or(loaded.log_level)
            .unwrap_or(defaults.log_level),
        auto_save: args
            .auto_save
            .or(loaded.auto_save)
            .unwrap_or(DEFAULT_AUTO_SAVE),
        max_undo_steps: args.max_undo_steps.or(loaded.max_undo_steps),
        min_zoom: args.min_zoom.or(loaded.min_zoom).unwrap_or(DEFAULT_MIN_ZOOM),
        max_zoom: args.max_zoom.or(loaded.max_zoom).unwrap_or(DEFAULT_MAX_ZOOM),
        zoom_step: args
            .zoom_step
            .or(loaded.zoom_step)
            .unwrap_or(DEFAULT_ZOOM_STEP),
        click_threshold: args
            .click_threshold
            .or(loaded.click_threshold)
            .unwrap_or(DEFAULT_CLICK_THRESHOLD),
        double_click_ms: args
            .double_click_ms
            .or(loaded.double_click_ms)
            .unwrap_or(DEFAULT_DOUBLE_CLICK_MS),
        default_theme: parse_named(args.default_theme.or(loaded.default_theme))?,
        default_font: parse_named(args.default_font.or(loaded.default_font))?,
        default_layout: parse_named(args.default_layout.or(loaded.default_layout))?,
        suggest_command: args
            .suggest_command
            .or(loaded.suggest_command)
            .filter(|c| !c.trim().is_empty()),
        export_dir: args
            .export_dir
            .or(loaded.export_dir)
            .unwrap_or(defaults.export_dir),
        fresh: args.fresh,
        export_html: args.export_html,
    };

    validate_config(&config)?;
    Ok(config)
}

fn parse_named<T>(value: Option<String>) -> Result<T, ConfigError>
where
    T: std::str::FromStr<Err = crate::theme::UnknownName> + Default,
{
    match value {
        Some(name) => name
            .parse()
            .map_err(|e: crate::theme::UnknownName| ConfigError::Validation(e.to_string())),
        None => Ok(T::default()),
    }
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let positive = [
        ("min_zoom", config.min_zoom),
        ("max_zoom", config.max_zoom),
        ("click_threshold", config.click_threshold),
    ];
    for (name, value) in positive {
        if !(value.is_finite() && value > 0.0) {
            return Err(ConfigError::Validation(format!(
                "{name} must be a positive number, got {value}"
            )));
        }
    }
    if config.min_zoom > config.max_zoom {
        return Err(ConfigError::Validation(format!(
            "min_zoom ({}) is larger than max_zoom ({})",
            config.min_zoom, config.max_zoom
        )));
    }
    if !(config.zoom_step.is_finite() && config.zoom_step > 1.0) {
        return Err(ConfigError::Validation(format!(
            "zoom_step must be greater than 1, got {}",
            config.zoom_step
        )));
    }
    if config.max_undo_steps == Some(0) {
        return Err(ConfigError::Validation(
            "max_undo_steps must be at least 1".to_string(),
        ));
    }
    if config.log_level.trim().is_empty() {
        return Err(ConfigError::Validation("log_level is empty".to_string()));
    }
    Ok(())
}

/// Resolves `name` inside the export directory unless it is already absolute.
pub fn export_path(config: &AppConfig, name: impl AsRef<Path>) -> PathBuf {
    let name = name.as_ref();
    if name.is_absolute() {
        name.to_path_buf()
    } else {
        config.export_dir.join(name)
    }
}
