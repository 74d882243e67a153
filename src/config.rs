// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup and passed
//! down explicitly through [`crate::state::AppState`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for documents and images | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `5000` |
//! | `JWT_SECRET` | Shared secret used to sign bearer tokens | Required |
//! | `BCRYPT_COST` | bcrypt cost factor for password hashing | `12` |
//! | `MAX_UPLOAD_BYTES` | Request body limit for multipart uploads | `10485760` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const BCRYPT_COST_ENV: &str = "BCRYPT_COST";
pub const MAX_UPLOAD_BYTES_ENV: &str = "MAX_UPLOAD_BYTES";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;
/// Cost factor range bcrypt accepts.
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Secrets shorter than this are rejected at startup.
const MIN_SECRET_LEN: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
    #[error("JWT_SECRET must be at least 16 characters")]
    WeakSecret,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
    pub max_upload_bytes: usize,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup(JWT_SECRET_ENV)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret);
        }

        let port = parse_or(&lookup, PORT_ENV, DEFAULT_PORT)?;
        let bcrypt_cost = parse_or(&lookup, BCRYPT_COST_ENV, DEFAULT_BCRYPT_COST)?;
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: BCRYPT_COST_ENV,
                value: bcrypt_cost.to_string(),
            });
        }
        let max_upload_bytes = parse_or(&lookup, MAX_UPLOAD_BYTES_ENV, DEFAULT_MAX_UPLOAD_BYTES)?;

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            data_dir: lookup(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            host: lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            jwt_secret,
            bcrypt_cost,
            max_upload_bytes,
            log_format,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::Invalid {
            name: HOST_ENV,
            value: raw,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config =
            Config::from_lookup(lookup_from(&[(JWT_SECRET_ENV, "a-sufficiently-long-secret")]))
                .unwrap();

        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.bcrypt_cost, 12);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.bind_addr().unwrap().port(), 5000);
    }

    #[test]
    fn missing_secret_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing(JWT_SECRET_ENV));
    }

    #[test]
    fn short_secret_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[(JWT_SECRET_ENV, "meusecret")]));
        assert_eq!(result.unwrap_err(), ConfigError::WeakSecret);
    }

    #[test]
    fn invalid_port_and_format_are_reported() {
        let result = Config::from_lookup(lookup_from(&[
            (JWT_SECRET_ENV, "a-sufficiently-long-secret"),
            (PORT_ENV, "eighty"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { name: PORT_ENV, .. })
        ));

        let result = Config::from_lookup(lookup_from(&[
            (JWT_SECRET_ENV, "a-sufficiently-long-secret"),
            (LOG_FORMAT_ENV, "xml"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { name: LOG_FORMAT_ENV, .. })
        ));
    }

    #[test]
    fn bcrypt_cost_out_of_range_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            (JWT_SECRET_ENV, "a-sufficiently-long-secret"),
            (BCRYPT_COST_ENV, "2"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { name: BCRYPT_COST_ENV, .. })
        ));

        let result = Config::from_lookup(lookup_from(&[
            (JWT_SECRET_ENV, "a-sufficiently-long-secret"),
            (BCRYPT_COST_ENV, "32"),
        ]));
        assert!(result.is_err());

        let config = Config::from_lookup(lookup_from(&[
            (JWT_SECRET_ENV, "a-sufficiently-long-secret"),
            (BCRYPT_COST_ENV, "4"),
        ]))
        .unwrap();
        assert_eq!(config.bcrypt_cost, MIN_BCRYPT_COST);
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::from_lookup(lookup_from(&[
            (JWT_SECRET_ENV, "a-sufficiently-long-secret"),
            (DATA_DIR_ENV, "/var/lib/pets"),
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "8081"),
            (BCRYPT_COST_ENV, "10"),
            (LOG_FORMAT_ENV, "json"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/var/lib/pets"));
        assert_eq!(config.bcrypt_cost, 10);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:8081");
    }
}
