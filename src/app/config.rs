//! Runtime configuration: defaults, TOML file and CLI overrides
//!
//! Values are layered in increasing precedence: built-in defaults, then the
//! configuration file, then command-line arguments. The merged result is
//! validated once before anything is started.

use crate::app::cli::args::Args;
use crate::core::error::{ConfigError, ConfigResult};
use crate::core::version::config_dir_name;
use crate::report::ReportFormat;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CAPACITY: usize = 10;
pub const DEFAULT_PRODUCERS: usize = 5;
pub const DEFAULT_CONSUMERS: usize = 2;
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);
pub const DEFAULT_MAX_COUNT: u64 = 100;
pub const DEFAULT_SOURCE_PREFIX: &str = "TrafficLight";
pub const CONFIG_FILE_NAME: &str = "signalrank.toml";

const LOG_FORMATS: [&str; 3] = ["text", "ext", "json"];

const KNOWN_KEYS: [&str; 15] = [
    "capacity",
    "producers",
    "consumers",
    "interval-ms",
    "max-count",
    "max-signals",
    "duration",
    "seed",
    "source-prefix",
    "report",
    "log-level",
    "log-format",
    "log-file",
    "color",
    "no-color",
];

/// Everything needed to build and run a simulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    pub capacity: usize,
    pub producers: usize,
    pub consumers: usize,
    pub interval: Duration,
    pub max_count: u64,
    /// Per-producer limit; `None` runs until cancelled
    pub max_signals: Option<u64>,
    /// Wall-clock limit for the whole run
    pub duration: Option<Duration>,
    pub seed: Option<u64>,
    pub source_prefix: String,
    pub report: ReportFormat,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            producers: DEFAULT_PRODUCERS,
            consumers: DEFAULT_CONSUMERS,
            interval: DEFAULT_INTERVAL,
            max_count: DEFAULT_MAX_COUNT,
            max_signals: None,
            duration: None,
            seed: None,
            source_prefix: DEFAULT_SOURCE_PREFIX.to_string(),
            report: ReportFormat::default(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.capacity == 0 {
            return Err(ConfigError::InvalidCapacity { capacity: 0 });
        }
        if self.source_prefix.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "source-prefix",
                "location prefix cannot be empty",
            ));
        }
        Ok(())
    }
}

/// Logging settings gathered from the file and the CLI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
    pub file: Option<PathBuf>,
    pub color: Option<bool>,
}

impl LoggingConfig {
    /// Apply the logging flags given on the command line
    pub fn apply_args(&mut self, args: &Args) {
        if args.log_level.is_some() {
            self.level = args.log_level.clone();
        }
        if args.log_format.is_some() {
            self.format = args.log_format.clone();
        }
        if args.log_file.is_some() {
            self.file = args.log_file.clone();
        }
        if let Some(color) = args.color_override() {
            self.color = Some(color);
        }
    }

    /// CLI logging flags on their own, for when the file could not be loaded
    pub fn from_args(args: &Args) -> Self {
        let mut logging = Self::default();
        logging.apply_args(args);
        logging
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub logging: LoggingConfig,
    /// The configuration file that was applied, if any
    pub source: Option<PathBuf>,
    /// Keys in the file that were not recognised
    pub ignored_keys: Vec<String>,
}

impl AppConfig {
    /// Merge defaults, the configuration file and `args`, then validate
    pub fn load(args: &Args) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = resolve_config_path(args.config_file.as_deref())? {
            let table = read_config_file(&path)?;
            config.apply_toml_values(&table)?;
            config.source = Some(path);
        }

        config.apply_args(args)?;
        config.simulation.validate()?;
        Ok(config)
    }

    /// Apply TOML configuration values
    ///
    /// Unknown keys are collected in `ignored_keys` rather than logged, since
    /// the file is read before the logger is installed.
    pub fn apply_toml_values(&mut self, table: &toml::Table) -> ConfigResult<()> {
        self.ignored_keys.extend(
            table
                .keys()
                .filter(|key| !KNOWN_KEYS.contains(&key.as_str()))
                .cloned(),
        );

        let sim = &mut self.simulation;
        if let Some(value) = toml_integer(table, "capacity")? {
            sim.capacity = capacity_value(value)?;
        }
        if let Some(value) = toml_integer(table, "producers")? {
            sim.producers = worker_count("producers", value)?;
        }
        if let Some(value) = toml_integer(table, "consumers")? {
            sim.consumers = worker_count("consumers", value)?;
        }
        if let Some(value) = toml_integer(table, "interval-ms")? {
            sim.interval = Duration::from_millis(non_negative("interval-ms", value)?);
        }
        if let Some(value) = toml_integer(table, "max-count")? {
            sim.max_count = non_negative("max-count", value)?;
        }
        if let Some(value) = toml_integer(table, "max-signals")? {
            sim.max_signals = Some(non_negative("max-signals", value)?);
        }
        if let Some(value) = toml_integer(table, "duration")? {
            sim.duration = Some(Duration::from_secs(non_negative("duration", value)?));
        }
        if let Some(value) = toml_integer(table, "seed")? {
            sim.seed = Some(value as u64);
        }
        if let Some(value) = toml_string(table, "source-prefix")? {
            sim.source_prefix = value.to_string();
        }
        if let Some(value) = toml_string(table, "report")? {
            sim.report = value
                .parse()
                .map_err(|e: String| ConfigError::invalid_value("report", e))?;
        }

        let logging = &mut self.logging;
        if let Some(value) = toml_string(table, "log-level")? {
            logging.level = Some(value.to_string());
        }
        if let Some(value) = toml_string(table, "log-format")? {
            if !LOG_FORMATS.contains(&value) {
                return Err(ConfigError::invalid_value(
                    "log-format",
                    format!("expected one of: {}", LOG_FORMATS.join(", ")),
                ));
            }
            logging.format = Some(value.to_string());
        }
        if let Some(value) = toml_string(table, "log-file")? {
            logging.file = Some(PathBuf::from(value));
        }
        if let Some(value) = toml_bool(table, "color")? {
            logging.color = Some(value);
        }
        if let Some(true) = toml_bool(table, "no-color")? {
            logging.color = Some(false);
        }

        Ok(())
    }

    /// Apply command-line overrides
    pub fn apply_args(&mut self, args: &Args) -> ConfigResult<()> {
        let sim = &mut self.simulation;
        if let Some(value) = args.capacity {
            sim.capacity = capacity_value(value)?;
        }
        if let Some(value) = args.producers {
            sim.producers = worker_count("producers", value)?;
        }
        if let Some(value) = args.consumers {
            sim.consumers = worker_count("consumers", value)?;
        }
        if let Some(value) = args.interval_ms {
            sim.interval = Duration::from_millis(value);
        }
        if let Some(value) = args.max_count {
            sim.max_count = value;
        }
        if args.max_signals.is_some() {
            sim.max_signals = args.max_signals;
        }
        if let Some(value) = args.duration {
            sim.duration = Some(Duration::from_secs(value));
        }
        if args.seed.is_some() {
            sim.seed = args.seed;
        }
        if let Some(value) = &args.source_prefix {
            sim.source_prefix = value.clone();
        }
        if let Some(value) = &args.report {
            sim.report = value
                .parse()
                .map_err(|e: String| ConfigError::invalid_value("report", e))?;
        }

        self.logging.apply_args(args);
        Ok(())
    }
}

/// Explicit paths must exist; the default location is optional
fn resolve_config_path(explicit: Option<&Path>) -> ConfigResult<Option<PathBuf>> {
    match explicit {
        Some(path) if path.exists() => Ok(Some(path.to_path_buf())),
        Some(path) => Err(ConfigError::Io {
            path: path.display().to_string(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "the specified configuration file does not exist",
            ),
        }),
        None => Ok(default_config_path().filter(|path| path.exists())),
    }
}

/// `<config dir>/Signalrank/signalrank.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(config_dir_name()).join(CONFIG_FILE_NAME))
}

fn read_config_file(path: &Path) -> ConfigResult<toml::Table> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str::<toml::Table>(&contents).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn toml_integer(table: &toml::Table, key: &str) -> ConfigResult<Option<i64>> {
    match table.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_integer()
            .map(Some)
            .ok_or_else(|| ConfigError::invalid_value(key, "expected an integer")),
    }
}

fn toml_string<'a>(table: &'a toml::Table, key: &str) -> ConfigResult<Option<&'a str>> {
    match table.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| ConfigError::invalid_value(key, "expected a string")),
    }
}

fn toml_bool(table: &toml::Table, key: &str) -> ConfigResult<Option<bool>> {
    match table.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_bool()
            .map(Some)
            .ok_or_else(|| ConfigError::invalid_value(key, "expected true or false")),
    }
}

fn capacity_value(value: i64) -> ConfigResult<usize> {
    if value < 1 {
        return Err(ConfigError::InvalidCapacity { capacity: value });
    }
    usize::try_from(value).map_err(|_| ConfigError::invalid_value("capacity", "value too large"))
}

fn worker_count(field: &str, value: i64) -> ConfigResult<usize> {
    if value < 0 {
        return Err(ConfigError::NegativeWorkerCount {
            field: field.to_string(),
            value,
        });
    }
    usize::try_from(value).map_err(|_| ConfigError::invalid_value(field, "value too large"))
}

fn non_negative(field: &str, value: i64) -> ConfigResult<u64> {
    u64::try_from(value).map_err(|_| ConfigError::invalid_value(field, "must not be negative"))
}
