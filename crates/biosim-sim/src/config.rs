//! Runner configuration
//!
//! Layers, later wins:
//! 1. `SimulationConfig::default()` (the reference experiment)
//! 2. `.env` file, if present
//! 3. File named by `BIOSIM_CONFIG` (TOML, JSON or YAML by extension)
//! 4. `BIOSIM_`-prefixed environment variables, `__` between nested keys,
//!    e.g. `BIOSIM_DEATH__CUMULATIVE_THRESHOLD=1000`

use std::path::PathBuf;

use anyhow::{Context, Result};
use biosim_darwinian::SimulationConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};

/// Variable naming an optional configuration file
pub const CONFIG_FILE_VAR: &str = "BIOSIM_CONFIG";

/// Variable naming the JSON-lines history output
pub const HISTORY_PATH_VAR: &str = "BIOSIM_HISTORY_PATH";

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub simulation: SimulationConfig,
    /// Where to write the generation history, one JSON object per line
    pub history_path: Option<PathBuf>,
}

impl SimConfig {
    /// Load configuration from `.env`, the optional file and the environment
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        let mut builder = Config::builder();
        if let Ok(path) = std::env::var(CONFIG_FILE_VAR) {
            builder = builder.add_source(File::with_name(&path));
        }
        builder = builder.add_source(env_source());

        Ok(Self {
            simulation: simulation_from(builder)?,
            history_path: std::env::var_os(HISTORY_PATH_VAR).map(PathBuf::from),
        })
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("BIOSIM")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Deserialize and validate a simulation config from assembled sources.
///
/// Missing keys fall back to the reference defaults.
pub fn simulation_from(builder: ConfigBuilder<DefaultState>) -> Result<SimulationConfig> {
    let simulation: SimulationConfig = builder
        .build()
        .context("Failed to read configuration sources")?
        .try_deserialize()
        .context("Failed to parse simulation configuration")?;
    simulation
        .validate()
        .context("Invalid simulation configuration")?;
    Ok(simulation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn env_with(vars: &[(&str, &str)]) -> Environment {
        env_source().source(Some(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ))
    }

    #[test]
    fn test_no_sources_gives_reference_defaults() {
        let simulation = simulation_from(Config::builder().add_source(env_with(&[]))).unwrap();
        assert_eq!(simulation, SimulationConfig::default());
    }

    #[test]
    fn test_env_overrides_nested_keys() {
        let simulation = simulation_from(Config::builder().add_source(env_with(&[
            ("BIOSIM_POPULATION_SIZE", "24"),
            ("BIOSIM_DEATH__CUMULATIVE_THRESHOLD", "1000"),
            ("BIOSIM_BREEDING__MUTATION_RATE", "0.05"),
        ])))
        .unwrap();
        assert_eq!(simulation.population_size, 24);
        assert_eq!(simulation.death.cumulative_threshold, 1000.0);
        assert_eq!(simulation.breeding.mutation_rate, 0.05);
        assert_eq!(simulation.genome_size, 2);
    }

    #[test]
    fn test_file_then_env() {
        let file = File::from_str(
            r#"{"population_size": 30, "seed": 7, "cycles_per_generation": 20}"#,
            FileFormat::Json,
        );
        let simulation = simulation_from(
            Config::builder()
                .add_source(file)
                .add_source(env_with(&[("BIOSIM_SEED", "9")])),
        )
        .unwrap();
        assert_eq!(simulation.population_size, 30);
        assert_eq!(simulation.cycles_per_generation, 20);
        assert_eq!(simulation.seed, 9);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = simulation_from(
            Config::builder().add_source(env_with(&[("BIOSIM_POPULATION_SIZE", "0")])),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("Population size"));
    }
}
