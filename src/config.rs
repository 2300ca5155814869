use std::path::PathBuf;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::SpeciesDraft;

pub const DATA_DIR_ENV: &str = "PETKEEPER_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Lower hunger bound for species that don't set their own.
    /// When unset, each species uses the negative of its `max_hunger`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_min_hunger: Option<Decimal>,
    /// Species registered the first time the registry is opened.
    #[serde(default)]
    pub starter_species: Vec<SpeciesDraft>,
}

impl Config {
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = data_dir
            .or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(|| {
                dirs::config_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("petkeeper")
            });

        // Ensure data directory exists
        std::fs::create_dir_all(&data_dir).context("Failed to create data directory")?;

        let config_path = data_dir.join("config.json");

        if config_path.exists() {
            let config_str =
                std::fs::read_to_string(&config_path).context("Failed to read config.json")?;

            if config_str.trim().is_empty() {
                log::warn!("{} is empty, recreating defaults", config_path.display());
            } else {
                let mut config: Config = serde_json::from_str(&config_str)
                    .with_context(|| format!("Failed to parse {}", config_path.display()))?;
                config.data_dir = data_dir;
                return Ok(config);
            }
        }

        let config = Self::default_config(data_dir);
        config.save()?;
        log::info!("wrote default config to {}", config_path.display());
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = self.data_dir.join("config.json");
        let json_str = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, json_str).context("Failed to write config.json")?;
        Ok(())
    }

    fn default_config(data_dir: PathBuf) -> Self {
        Config {
            data_dir,
            default_min_hunger: None,
            starter_species: vec![
                starter("Cat", Decimal::new(2, 2), Decimal::new(1, 2)),
                starter("Dog", Decimal::new(3, 2), Decimal::new(2, 2)),
                starter("Dragon", Decimal::new(1, 1), Decimal::new(5, 3)),
            ],
        }
    }

    pub fn registry_file(&self) -> PathBuf {
        self.data_dir.join("registry.json")
    }
}

fn starter(type_name: &str, hunger_per_second: Decimal, sadness_per_second: Decimal) -> SpeciesDraft {
    SpeciesDraft {
        type_name: type_name.to_string(),
        hunger_per_second,
        sadness_per_second,
        max_hunger: Decimal::ONE_HUNDRED,
        min_hunger: Some(Decimal::ZERO),
        min_happiness: -Decimal::ONE_HUNDRED,
        max_happiness: Decimal::ONE_HUNDRED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_written() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("petkeeper");
        let config = Config::new(Some(dir.clone())).unwrap();

        assert!(dir.join("config.json").exists());
        assert_eq!(config.starter_species.len(), 3);
        assert_eq!(config.registry_file(), dir.join("registry.json"));
    }

    #[test]
    fn test_existing_config_is_loaded() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().to_path_buf();
        std::fs::write(
            dir.join("config.json"),
            r#"{
                "default_min_hunger": "-2",
                "starter_species": [{
                    "type_name": "Axolotl",
                    "hunger_per_second": "0.5",
                    "sadness_per_second": "0.25",
                    "max_hunger": "1",
                    "min_happiness": "-1",
                    "max_happiness": "1"
                }]
            }"#,
        )
        .unwrap();

        let config = Config::new(Some(dir.clone())).unwrap();
        assert_eq!(config.default_min_hunger, Some("-2".parse().unwrap()));
        assert_eq!(config.starter_species[0].type_name, "Axolotl");
        assert_eq!(config.starter_species[0].min_hunger, None);
        assert_eq!(config.data_dir, dir);
    }

    #[test]
    fn test_broken_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.json"), "{ not json").unwrap();

        assert!(Config::new(Some(temp.path().to_path_buf())).is_err());
    }

    #[test]
    fn test_default_starters_are_valid_species() {
        let config = Config::default_config(PathBuf::from("."));
        let mut registry = crate::registry::Registry::new();
        let added = registry
            .seed_species(&config.starter_species, config.default_min_hunger)
            .unwrap();
        assert_eq!(added, 3);
    }
}
