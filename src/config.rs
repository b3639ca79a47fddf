//! User settings stored as TOML in the OS config directory.

use std::path::{Path, PathBuf};

use chrono::Weekday;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::Result;

const SETTINGS_FILE: &str = "settings.toml";
const DATA_FILE: &str = "schedule.json";

/// Chart geometry and window rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Narrowest a day column may get, in pixels.
    pub min_day_width: f32,
    /// Widest a day column may get, in pixels.
    pub max_day_width: f32,
    /// Total width the day columns aim to fill.
    pub target_width: f32,
    /// Calendar days added before the earliest and after the latest task.
    pub padding_days: i64,
    /// Window length, in months, when there are no tasks.
    pub empty_window_months: u32,
    /// First day of the week used when snapping the window.
    pub week_start: Weekday,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            min_day_width: 35.0,
            max_day_width: 60.0,
            target_width: 1400.0,
            padding_days: 7,
            empty_window_months: 1,
            week_start: Weekday::Sun,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Overrides the schedule file location.
    pub data_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub chart: ChartConfig,
    pub store: StoreConfig,
}

impl AppConfig {
    /// Read settings from `path`. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Load the user's settings, writing defaults on first run.
    ///
    /// Never fails: a broken settings file is reported and ignored.
    pub fn load_or_default() -> Self {
        let Some(path) = settings_path() else {
            log::warn!("no config directory available, using default settings");
            return Self::default();
        };

        if !path.exists() {
            let config = Self::default();
            if let Err(e) = config.save(&path) {
                log::warn!("could not write default settings to {:?}: {}", path, e);
            }
            return config;
        }

        match Self::load(&path) {
            Ok(config) => {
                log::info!("loaded settings from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("ignoring settings file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Where the JSON schedule lives.
    pub fn data_file(&self) -> PathBuf {
        self.store
            .data_file
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().join(DATA_FILE)))
            .unwrap_or_else(|| PathBuf::from(DATA_FILE))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "TeamGantt", "TeamGantt")
}

pub fn settings_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
}
