// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Global `tracing` subscriber for the `gridstate` binary. Logs go to
//! stderr; stdout carries the view snapshot.

use anyhow::{Result, anyhow, bail};
use std::io;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const WORKSPACE_TARGETS: [&str; 4] = [
    "gridstate",
    "gridstate_app",
    "gridstate_controller",
    "gridstate_db",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    pub const ALL: [Self; 3] = [Self::Pretty, Self::Compact, Self::Json];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Compact => "compact",
            Self::Json => "json",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match Self::ALL.into_iter().find(|format| format.as_str() == value) {
            Some(format) => Ok(format),
            None => bail!("unknown log format {value:?}; use one of: pretty, compact, json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: Level,
    pub format: LogFormat,
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::default(),
            with_target: false,
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Raise the level to at least `floor`. Never lowers it.
    #[must_use]
    pub fn at_least(self, floor: Level) -> Self {
        // tracing orders levels by verbosity, TRACE being the greatest.
        if self.level < floor {
            self.with_level(floor)
        } else {
            self
        }
    }
}

pub fn parse_level(raw: &str) -> Result<Level> {
    raw.parse::<Level>().map_err(|_| {
        anyhow!("unknown log level {raw:?}; use one of: error, warn, info, debug, trace")
    })
}

/// Install the subscriber. `RUST_LOG`, when set, replaces the configured
/// filter.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = build_env_filter(config.level);
    let installed = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_target(config.with_target),
            )
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(io::stderr)
                    .with_target(config.with_target)
                    .without_time(),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .pretty()
                    .with_writer(io::stderr)
                    .with_target(config.with_target),
            )
            .try_init(),
    };
    installed.map_err(|error| anyhow!("install log subscriber: {error}"))
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

/// Our crates log at `level`; dependencies stay at warn.
fn default_directives(level: Level) -> String {
    let level = level.as_str().to_lowercase();
    let mut directives = vec!["warn".to_owned()];
    directives.extend(
        WORKSPACE_TARGETS
            .iter()
            .map(|target| format!("{target}={level}")),
    );
    directives.join(",")
}

#[cfg(test)]
mod tests {
    use super::{LogConfig, LogFormat, default_directives, parse_level};
    use anyhow::Result;
    use tracing::Level;

    #[test]
    fn formats_parse_their_own_names() -> Result<()> {
        for format in LogFormat::ALL {
            assert_eq!(LogFormat::parse(format.as_str())?, format);
        }
        assert!(LogFormat::parse("xml").is_err());
        Ok(())
    }

    #[test]
    fn levels_parse_case_insensitively() -> Result<()> {
        assert_eq!(parse_level("debug")?, Level::DEBUG);
        assert_eq!(parse_level("WARN")?, Level::WARN);
        assert!(parse_level("loud").is_err());
        Ok(())
    }

    #[test]
    fn verbose_raises_but_never_lowers_the_level() {
        let quiet = LogConfig::default().with_level(Level::WARN);
        assert_eq!(quiet.at_least(Level::DEBUG).level, Level::DEBUG);
        let noisy = LogConfig::default().with_level(Level::TRACE);
        assert_eq!(noisy.at_least(Level::DEBUG).level, Level::TRACE);
    }

    #[test]
    fn default_filter_keeps_dependencies_at_warn() {
        let directives = default_directives(Level::DEBUG);
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("gridstate_controller=debug"));
    }
}
