//! Cadence configuration file handling

use anyhow::{Context, Result};
use cadence_tween::SchedulerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "cadence.toml";

/// Top-level configuration (cadence.toml)
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct CadenceConfig {
    #[serde(default)]
    pub scheduler: SchedulerSection,
    #[serde(default)]
    pub run: RunSection,
}

/// Scheduler tuning
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct SchedulerSection {
    /// Multiplier applied to every tick delta
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
    /// Clamp for a single tick delta, in seconds
    #[serde(default)]
    pub max_delta: Option<f64>,
}

fn default_time_scale() -> f64 {
    1.0
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            time_scale: default_time_scale(),
            max_delta: None,
        }
    }
}

/// Driver loop settings
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct RunSection {
    /// Ticks per second
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Stop after this many seconds even if tweens are still running
    #[serde(default = "default_seconds")]
    pub seconds: f64,
    /// Sleep between frames and tick by measured wall-clock time
    #[serde(default)]
    pub realtime: bool,
}

fn default_fps() -> u32 {
    60
}

fn default_seconds() -> f64 {
    10.0
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            seconds: default_seconds(),
            realtime: false,
        }
    }
}

impl CadenceConfig {
    /// Load configuration from a file or a directory containing cadence.toml
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = if path.is_dir() {
            path.join(CONFIG_FILE)
        } else {
            path.to_path_buf()
        };

        if !config_path.exists() {
            anyhow::bail!(
                "No {} found at {}. Run `cadence init` to create one.",
                CONFIG_FILE,
                path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// Parse and validate TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: CadenceConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let scale = self.scheduler.time_scale;
        if !(scale.is_finite() && scale >= 0.0) {
            anyhow::bail!("scheduler.time_scale must be a non-negative number, got {}", scale);
        }
        if let Some(max) = self.scheduler.max_delta {
            if !(max.is_finite() && max > 0.0) {
                anyhow::bail!("scheduler.max_delta must be positive, got {}", max);
            }
        }
        if self.run.fps == 0 {
            anyhow::bail!("run.fps must be at least 1");
        }
        if !(self.run.seconds.is_finite() && self.run.seconds >= 0.0) {
            anyhow::bail!("run.seconds must be a non-negative number, got {}", self.run.seconds);
        }
        Ok(())
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            time_scale: self.scheduler.time_scale,
            max_delta: self.scheduler.max_delta,
        }
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = CadenceConfig::parse("").unwrap();
        assert_eq!(config, CadenceConfig::default());
        assert_eq!(config.scheduler_config(), SchedulerConfig::default());
        assert_eq!(config.run.fps, 60);
    }

    #[test]
    fn test_partial_sections() {
        let config = CadenceConfig::parse(
            r#"
            [scheduler]
            time_scale = 0.5

            [run]
            realtime = true
            "#,
        )
        .unwrap();
        assert_eq!(config.scheduler.time_scale, 0.5);
        assert_eq!(config.scheduler.max_delta, None);
        assert!(config.run.realtime);
        assert_eq!(config.run.seconds, 10.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(CadenceConfig::parse("[run]\nfps = 0").is_err());
        assert!(CadenceConfig::parse("[scheduler]\ntime_scale = -1.0").is_err());
        assert!(CadenceConfig::parse("[scheduler]\nmax_delta = 0.0").is_err());
        assert!(CadenceConfig::parse("[run]\nfps = \"fast\"").is_err());
    }

    #[test]
    fn test_toml_output_parses_back() {
        let mut config = CadenceConfig::default();
        config.scheduler.max_delta = Some(0.1);
        let text = config.to_toml().unwrap();
        assert!(text.contains("[scheduler]"));
        assert_eq!(CadenceConfig::parse(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let err = CadenceConfig::load(Path::new("/nonexistent/cadence.toml")).unwrap_err();
        assert!(err.to_string().contains("cadence init"));
    }
}
