//! TOML configuration tests
//!
//! Layering of defaults, configuration file and CLI overrides.

use clap::Parser;
use signalrank::app::cli::Args;
use signalrank::app::config::AppConfig;
use signalrank::core::error::ConfigError;
use signalrank::core::error_handling::ContextualError;
use std::io::Write;
use tempfile::NamedTempFile;
use toml::Table;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

#[test]
fn test_each_setting_overridable_independently() {
    let file = write_config("capacity = 7\nproducers = 9\nconsumers = 4\n");
    let path = file.path().to_string_lossy().to_string();

    let only_capacity =
        AppConfig::load(&Args::try_parse_from(["signalrank", "-c", &path, "-b", "2"]).unwrap()).unwrap();
    assert_eq!(only_capacity.simulation.capacity, 2);
    assert_eq!(only_capacity.simulation.producers, 9);
    assert_eq!(only_capacity.simulation.consumers, 4);

    let only_consumers =
        AppConfig::load(&Args::try_parse_from(["signalrank", "-c", &path, "-n", "1"]).unwrap()).unwrap();
    assert_eq!(only_consumers.simulation.capacity, 7);
    assert_eq!(only_consumers.simulation.producers, 9);
    assert_eq!(only_consumers.simulation.consumers, 1);
}

#[test]
fn test_apply_toml_values_on_defaults() {
    let mut config = AppConfig::default();
    let mut table = Table::new();
    table.insert("source-prefix".to_string(), toml::Value::String("Crossing".to_string()));
    table.insert("max-count".to_string(), toml::Value::Integer(5));
    table.insert("color".to_string(), toml::Value::Boolean(true));

    config.apply_toml_values(&table).unwrap();

    assert_eq!(config.simulation.source_prefix, "Crossing");
    assert_eq!(config.simulation.max_count, 5);
    assert_eq!(config.logging.color, Some(true));
    assert_eq!(config.simulation.capacity, 10);
}

#[test]
fn test_configuration_errors_are_user_actionable() {
    let file = write_config("consumers = -2\n");
    let path = file.path().to_string_lossy().to_string();

    let err = AppConfig::load(&Args::try_parse_from(["signalrank", "-c", &path]).unwrap()).unwrap_err();

    assert!(matches!(err, ConfigError::NegativeWorkerCount { .. }));
    assert!(err.is_user_actionable());
    let message = err.user_message().unwrap();
    assert!(message.contains("consumers"), "got: {}", message);
}

#[test]
fn test_cli_rescues_invalid_file_value_only_when_file_is_valid() {
    // The file is applied before the CLI, so a bad file value still fails
    let file = write_config("capacity = 0\n");
    let path = file.path().to_string_lossy().to_string();

    let result = AppConfig::load(&Args::try_parse_from(["signalrank", "-c", &path, "-b", "5"]).unwrap());

    assert!(matches!(result, Err(ConfigError::InvalidCapacity { capacity: 0 })));
}
