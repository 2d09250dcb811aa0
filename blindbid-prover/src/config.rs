// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::path::PathBuf;
use std::str::FromStr;

use dusk_blindbid::{AmountRange, MembershipRule};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::args::Args;

/// Default log_level.
const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log_type.
const DEFAULT_LOG_TYPE: &str = "coloured";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid log level '{0}'")]
    LogLevel(String),
    #[error("Invalid log type '{0}'")]
    LogType(String),
    #[error("Invalid membership rule '{0}'")]
    Membership(String),
    #[error("Invalid amount bounds: {0}")]
    Amounts(#[from] dusk_blindbid::Error),
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct Config {
    log_level: Option<String>,
    log_type: Option<String>,
    log_filter: Option<String>,

    #[serde(default)]
    pub(crate) protocol: dusk_blindbid::Config,
}

impl TryFrom<&Args> for Config {
    type Error = ConfigError;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        let mut config = match &args.config {
            Some(path) => {
                let toml = std::fs::read_to_string(path).map_err(|source| {
                    ConfigError::Read {
                        path: path.clone(),
                        source,
                    }
                })?;
                toml::from_str(&toml)?
            }
            None => Config::default(),
        };

        // Overwrite config log-level
        if let Some(log_level) = args.log_level {
            config.log_level = Some(log_level.to_string());
        }

        // Overwrite config log-type
        if let Some(log_type) = &args.log_type {
            config.log_type = Some(log_type.into());
        }

        // Overwrite config log-filter
        if let Some(log_filter) = &args.log_filter {
            config.log_filter = Some(log_filter.into());
        }

        if let Some(membership) = &args.membership {
            config.protocol.membership = parse_membership(membership)?;
        }

        if args.amount_min.is_some() || args.amount_max.is_some() {
            let amounts = config.protocol.amounts;
            config.protocol.amounts = AmountRange::new(
                args.amount_min.unwrap_or(amounts.min()),
                args.amount_max.unwrap_or(amounts.max()),
            )?;
        }

        // Fail early rather than when installing the subscriber
        config.log_level()?;
        config.log_type()?;

        Ok(config)
    }
}

impl Config {
    pub(crate) fn log_type(&self) -> Result<String, ConfigError> {
        let log_type = self.log_type.as_deref().unwrap_or(DEFAULT_LOG_TYPE);
        match log_type {
            "coloured" | "plain" | "json" => Ok(log_type.into()),
            _ => Err(ConfigError::LogType(log_type.into())),
        }
    }

    pub(crate) fn log_level(&self) -> Result<tracing::Level, ConfigError> {
        let log_level = self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL);
        tracing::Level::from_str(log_level)
            .map_err(|_| ConfigError::LogLevel(log_level.into()))
    }

    pub(crate) fn log_filter(&self) -> String {
        self.log_filter.clone().unwrap_or_default()
    }
}

fn parse_membership(value: &str) -> Result<MembershipRule, ConfigError> {
    match value {
        "inclusion" => Ok(MembershipRule::Inclusion),
        "echo-only" => Ok(MembershipRule::EchoOnly),
        _ => Err(ConfigError::Membership(value.into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_file_parses() {
        let toml = include_str!("../default.config.toml");
        let config: Config = toml::from_str(toml).expect("default config");

        assert_eq!(config.log_level().unwrap(), tracing::Level::INFO);
        assert_eq!(config.log_type().unwrap(), "coloured");
        assert_eq!(config.log_filter(), "");
        assert_eq!(config.protocol.membership, MembershipRule::Inclusion);
        assert_eq!(config.protocol.amounts, AmountRange::default());
    }

    #[test]
    fn defaults_without_file() {
        let config = Config::try_from(&Args::default()).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.log_level().unwrap(), tracing::Level::INFO);
        assert_eq!(config.log_type().unwrap(), DEFAULT_LOG_TYPE);
    }

    #[test]
    fn args_override_file() {
        let path = std::env::temp_dir().join(format!(
            "blindbid-prover-{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "log_level = \"warn\"\n[protocol]\nmembership = \"inclusion\"\n",
        )
        .unwrap();

        let args = Args {
            config: Some(path.clone()),
            log_level: Some(tracing::Level::DEBUG),
            membership: Some("echo-only".into()),
            ..Default::default()
        };
        let config = Config::try_from(&args);
        std::fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.log_level().unwrap(), tracing::Level::DEBUG);
        assert_eq!(config.protocol.membership, MembershipRule::EchoOnly);
    }

    #[test]
    fn amount_bounds_from_file_and_args() {
        let path = std::env::temp_dir().join(format!(
            "blindbid-prover-amounts-{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[protocol.amounts]\nmin = 50000\nmax = 250000\n",
        )
        .unwrap();

        let from_file = Args {
            config: Some(path.clone()),
            ..Default::default()
        };
        let overridden = Args {
            amount_max: Some(100_000),
            ..from_file.clone()
        };
        let (file, args) = (
            Config::try_from(&from_file),
            Config::try_from(&overridden),
        );
        std::fs::remove_file(&path).unwrap();

        assert_eq!(file.unwrap().protocol.amounts, AmountRange::STAKE);
        assert_eq!(
            args.unwrap().protocol.amounts,
            AmountRange::new(50_000, 100_000).unwrap()
        );
    }

    #[test]
    fn rejects_invalid_values() {
        let config: Config = toml::from_str("log_level = \"loud\"").unwrap();
        assert!(matches!(config.log_level(), Err(ConfigError::LogLevel(_))));

        let config: Config = toml::from_str("log_type = \"xml\"").unwrap();
        assert!(matches!(config.log_type(), Err(ConfigError::LogType(_))));

        assert!(toml::from_str::<Config>(
            "[protocol]\nmembership = \"everyone\""
        )
        .is_err());

        let inverted = Args {
            amount_min: Some(u64::MAX),
            ..Default::default()
        };
        assert!(matches!(
            Config::try_from(&inverted),
            Err(ConfigError::Amounts(_))
        ));

        let missing = Args {
            config: Some("/nonexistent/blindbid.toml".into()),
            ..Default::default()
        };
        assert!(matches!(
            Config::try_from(&missing),
            Err(ConfigError::Read { .. })
        ));
    }
}
