use std::{fs, path::Path, sync::LazyLock};

use log::warn;
use logging::LoggingConfig;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub mod logging;

/// The engine configuration, loaded from `holograph.toml` next to the host
/// working directory. A default file is written on first run.
pub static CONFIG: LazyLock<HoloConfig> = LazyLock::new(HoloConfig::load);

const CONFIG_FILE_NAME: &str = "holograph.toml";

#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct HoloConfig {
    /// Directory holding one record file per hologram definition.
    pub data_dir: String,
    /// Directory holding one TOML file per text animation.
    pub animations_dir: String,
    /// Write the built-in animation files into `animations_dir` when the
    /// directory does not exist yet.
    pub write_default_animations: bool,
    /// Simulation rate of the host, in ticks per second. Drives the refresh
    /// scheduler and all per-hologram tasks.
    pub tps: f32,
    /// Ticks the refresh scheduler waits before its first pass, giving the
    /// host time to finish loading worlds.
    pub refresh_start_delay_ticks: u32,
    pub logging: LoggingConfig,
}

impl Default for HoloConfig {
    fn default() -> Self {
        Self {
            data_dir: "holograms".to_string(),
            animations_dir: "text-animations".to_string(),
            write_default_animations: true,
            tps: 20.0,
            refresh_start_delay_ticks: 20,
            logging: Default::default(),
        }
    }
}

trait LoadConfiguration {
    fn load() -> Self
    where
        Self: Sized + Default + Serialize + DeserializeOwned,
    {
        let path = Self::get_path();

        let config = if path.exists() {
            let file_content = fs::read_to_string(path)
                .unwrap_or_else(|_| panic!("Couldn't read configuration file at {:?}", path));

            toml::from_str(&file_content).unwrap_or_else(|err| {
                panic!(
                    "Couldn't parse config at {:?}. Reason: {}",
                    path,
                    err.message()
                )
            })
        } else {
            let content = Self::default();

            if let Err(err) = fs::write(path, toml::to_string(&content).unwrap()) {
                warn!(
                    "Couldn't write default config to {:?}. Reason: {}",
                    path, err
                );
            }

            content
        };

        config.validate();
        config
    }

    fn get_path() -> &'static Path;

    fn validate(&self);
}

impl LoadConfiguration for HoloConfig {
    fn get_path() -> &'static Path {
        Path::new(CONFIG_FILE_NAME)
    }

    fn validate(&self) {
        assert!(self.tps > 0.0, "tps must be greater than zero");
        assert!(!self.data_dir.is_empty(), "data_dir must not be empty");
        assert!(
            !self.animations_dir.is_empty(),
            "animations_dir must not be empty"
        );
    }
}

impl HoloConfig {
    fn load() -> Self {
        <Self as LoadConfiguration>::load()
    }

    /// Length of one host tick at the configured rate.
    pub fn tick_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis((1000.0 / self.tps) as u64)
    }
}
