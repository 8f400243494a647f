// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::logging::{LogConfig, LogFormat, parse_level};
use anyhow::{Context, Result, anyhow, bail};
use gridstate_controller::Debounce;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_DEBOUNCE: &str = "250ms";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub controller: Controller,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            controller: Controller::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Controller {
    /// Quiet period of the trailing channel.
    pub debounce: Option<String>,
    /// Quiet period of the leading channel.
    pub instant_debounce: Option<String>,
}

impl Default for Controller {
    fn default() -> Self {
        Self {
            debounce: Some(DEFAULT_DEBOUNCE.to_owned()),
            instant_debounce: Some(DEFAULT_DEBOUNCE.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub format: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            format: Some(LogFormat::default().as_str().to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("GRIDSTATE_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set GRIDSTATE_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(gridstate_db::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version; add `version = 1` and put values under [storage], [controller], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(db_path) = &self.storage.db_path {
            gridstate_db::validate_db_path(db_path)?;
        }

        for (name, value) in [
            ("controller.debounce", &self.controller.debounce),
            ("controller.instant_debounce", &self.controller.instant_debounce),
        ] {
            if let Some(raw) = value {
                let parsed = parse_duration(raw)?;
                if parsed <= Duration::ZERO {
                    bail!(
                        "{name} in {} must be positive, got {raw}",
                        path.display()
                    );
                }
            }
        }

        if let Some(level) = &self.log.level {
            parse_level(level).with_context(|| format!("log.level in {}", path.display()))?;
        }
        if let Some(format) = &self.log.format {
            LogFormat::parse(format).with_context(|| format!("log.format in {}", path.display()))?;
        }

        Ok(())
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => gridstate_db::default_db_path(),
        }
    }

    pub fn debounce(&self) -> Result<Debounce> {
        Ok(Debounce {
            trailing: parse_duration(
                self.controller
                    .debounce
                    .as_deref()
                    .unwrap_or(DEFAULT_DEBOUNCE),
            )?,
            leading: parse_duration(
                self.controller
                    .instant_debounce
                    .as_deref()
                    .unwrap_or(DEFAULT_DEBOUNCE),
            )?,
        })
    }

    pub fn log_config(&self) -> Result<LogConfig> {
        let level = parse_level(self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL))?;
        let format = match self.log.format.as_deref() {
            Some(raw) => LogFormat::parse(raw)?,
            None => LogFormat::default(),
        };
        Ok(LogConfig {
            level,
            format,
            ..LogConfig::default()
        })
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# gridstate config\n# Place this file at: {}\n\nversion = 1\n\n[storage]\n# Optional. Default is platform data dir (for example ~/.local/share/gridstate/gridstate.db)\n# db_path = \"/absolute/path/to/gridstate.db\"\n\n[controller]\n# Quiet period for coalesced typing input (trailing channel)\ndebounce = \"{DEFAULT_DEBOUNCE}\"\n# Window in which repeated taps are dropped (leading channel)\ninstant_debounce = \"{DEFAULT_DEBOUNCE}\"\n\n[log]\n# error, warn, info, debug, trace (RUST_LOG overrides)\nlevel = \"{DEFAULT_LOG_LEVEL}\"\n# pretty, compact, json\nformat = \"{}\"\n",
            path.display(),
            LogFormat::default().as_str(),
        )
    }
}

pub fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 250ms or 1s)")
}
