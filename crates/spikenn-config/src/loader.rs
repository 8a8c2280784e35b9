// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later tiers win:
//! 1. TOML file (base values)
//! 2. Environment variables
//! 3. CLI arguments

use crate::{validate_config, ConfigError, ConfigResult, SpikennConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "spikenn.toml";

/// Find the SpikeNN configuration file
///
/// Search order:
/// 1. `SPIKENN_CONFIG_PATH` environment variable
/// 2. Current working directory
/// 3. Up to 5 parent directories
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("SPIKENN_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by SPIKENN_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(found) = search_paths.iter().find(|p| p.exists()) {
        return Ok(found.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet SPIKENN_CONFIG_PATH to specify a custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load, override and validate the configuration
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, the file is searched for.
/// * `cli_args` - Optional CLI argument overrides
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SpikennConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: SpikennConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    validate_config(&config)?;
    Ok(config)
}

/// Apply environment variable overrides
///
/// Supported variables:
/// - `SPIKENN_TIME_STEP` -> `simulation.time_step`
/// - `SPIKENN_SEED` -> `simulation.seed`
/// - `SPIKENN_TICKS` -> `simulation.ticks`
/// - `SPIKENN_STDP_PERIOD` -> `learning.stdp_period`
/// - `SPIKENN_FANOUT_RETRY_BUDGET` -> `construction.fanout_retry_budget`
/// - `SPIKENN_LOG_LEVEL` -> `logging.log_level`
/// - `SPIKENN_ACTIVITY_DIR` -> `logging.activity_dir`
pub fn apply_environment_overrides(config: &mut SpikennConfig) {
    let vars: HashMap<String, String> = [
        ("time_step", "SPIKENN_TIME_STEP"),
        ("seed", "SPIKENN_SEED"),
        ("ticks", "SPIKENN_TICKS"),
        ("stdp_period", "SPIKENN_STDP_PERIOD"),
        ("fanout_retry_budget", "SPIKENN_FANOUT_RETRY_BUDGET"),
        ("log_level", "SPIKENN_LOG_LEVEL"),
        ("activity_dir", "SPIKENN_ACTIVITY_DIR"),
    ]
    .into_iter()
    .filter_map(|(key, var)| env::var(var).ok().map(|value| (key.to_string(), value)))
    .collect();

    apply_overrides(config, &vars);
}

/// Apply CLI argument overrides
///
/// Keys: `time_step`, `seed`, `ticks`, `stdp_period`, `fanout_retry_budget`,
/// `log_level`, `activity_dir`. Values that fail to parse are ignored.
pub fn apply_cli_overrides(config: &mut SpikennConfig, cli_args: &HashMap<String, String>) {
    apply_overrides(config, cli_args);
}

fn apply_overrides(config: &mut SpikennConfig, values: &HashMap<String, String>) {
    if let Some(step) = values.get("time_step").and_then(|v| v.parse::<f64>().ok()) {
        config.simulation.time_step = step;
    }
    if let Some(seed) = values.get("seed").and_then(|v| v.parse::<u64>().ok()) {
        config.simulation.seed = Some(seed);
    }
    if let Some(ticks) = values.get("ticks").and_then(|v| v.parse::<u64>().ok()) {
        config.simulation.ticks = ticks;
    }
    if let Some(period) = values.get("stdp_period").and_then(|v| v.parse::<f64>().ok()) {
        config.learning.stdp_period = period;
    }
    if let Some(budget) = values
        .get("fanout_retry_budget")
        .and_then(|v| v.parse::<usize>().ok())
    {
        config.construction.fanout_retry_budget = budget;
    }
    if let Some(level) = values.get("log_level") {
        config.logging.log_level = level.clone();
    }
    if let Some(dir) = values.get("activity_dir") {
        config.logging.activity_dir = PathBuf::from(dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom.toml");
        File::create(&config_path).unwrap();

        env::set_var("SPIKENN_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("SPIKENN_CONFIG_PATH");

        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_find_config_file_env_var_missing() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        env::set_var("SPIKENN_CONFIG_PATH", "/definitely/not/here/spikenn.toml");
        let result = find_config_file();
        env::remove_var("SPIKENN_CONFIG_PATH");

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        env::remove_var("SPIKENN_TIME_STEP");
        env::remove_var("SPIKENN_STDP_PERIOD");
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("spikenn.toml");

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[simulation]").unwrap();
        writeln!(file, "time_step = 0.5").unwrap();
        writeln!(file, "seed = 7").unwrap();
        writeln!(file, "[learning]").unwrap();
        writeln!(file, "stdp_period = 250.0").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.simulation.time_step, 0.5);
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.learning.stdp_period, 250.0);
        // untouched sections keep their defaults
        assert_eq!(config.bounds.ex_max_weight, 10.0);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        env::remove_var("SPIKENN_TIME_STEP");
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("spikenn.toml");

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[simulation]").unwrap();
        writeln!(file, "time_step = 0.0").unwrap();

        let result = load_config(Some(&config_path), None);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = SpikennConfig::default();

        env::set_var("SPIKENN_TIME_STEP", "0.25");
        env::set_var("SPIKENN_SEED", "99");
        env::set_var("SPIKENN_STDP_PERIOD", "not-a-number");

        apply_environment_overrides(&mut config);

        env::remove_var("SPIKENN_TIME_STEP");
        env::remove_var("SPIKENN_SEED");
        env::remove_var("SPIKENN_STDP_PERIOD");

        assert_eq!(config.simulation.time_step, 0.25);
        assert_eq!(config.simulation.seed, Some(99));
        assert_eq!(config.learning.stdp_period, 100.0);
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("spikenn.toml");

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[simulation]").unwrap();
        writeln!(file, "time_step = 1.0").unwrap();
        writeln!(file, "ticks = 10").unwrap();

        env::set_var("SPIKENN_TIME_STEP", "0.5");
        env::set_var("SPIKENN_TICKS", "20");

        let mut cli_args = HashMap::new();
        cli_args.insert("ticks".to_string(), "30".to_string());

        let config = load_config(Some(&config_path), Some(&cli_args)).unwrap();

        env::remove_var("SPIKENN_TIME_STEP");
        env::remove_var("SPIKENN_TICKS");

        // CLI wins for ticks, env wins for time_step
        assert_eq!(config.simulation.ticks, 30);
        assert_eq!(config.simulation.time_step, 0.5);
    }
}
