//! This module contains structs which represent route requests as they are
//! received from the end user, along with the configuration of the service
//! itself. Service configuration is read from environment variables, with
//! sensible defaults for every value.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::routing::cost::{
    CostModel, DEFAULT_AVERAGE_RISK, DEFAULT_AVERAGE_SPEED_KMH,
};

pub const ADDR_VAR: &str = "ROUTE_ADVISOR_ADDR";
pub const NETWORK_VAR: &str = "ROUTE_ADVISOR_NETWORK";
pub const SPEED_VAR: &str = "ROUTE_ADVISOR_SPEED_KMH";
pub const RISK_VAR: &str = "ROUTE_ADVISOR_AVERAGE_RISK";

const DEFAULT_ADDR: &str = "0.0.0.0:5000";

/// Stores the user's requested route exactly as it is received from the API.
/// Either end may be missing, this is checked before any routing happens
#[derive(Deserialize, Debug, Default, PartialEq)]
pub struct UserRouteRequest {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl UserRouteRequest {
    /// Unpack the requested start and end cities. Returns None if either was
    /// not provided, or was provided as an empty string
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        let start = self.start.as_deref().filter(|s| !s.is_empty())?;
        let end = self.end.as_deref().filter(|s| !s.is_empty())?;
        Some((start, end))
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be set to a positive number, got '{value}'")]
    InvalidNumber { key: String, value: String },

    #[error("invalid cost model: {0}")]
    InvalidCostModel(String),
}

/// Settings for the HTTP service
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub addr: String,
    pub network_path: Option<PathBuf>,
    pub costs: CostModel,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: DEFAULT_ADDR.to_string(),
            network_path: None,
            costs: CostModel::default(),
        }
    }
}

impl ServerConfig {
    /// Read the service configuration from the process environment
    pub fn from_env() -> Result<ServerConfig, ConfigError> {
        ServerConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Generate the service configuration using the provided lookup in place
    /// of the process environment. Unset variables fall back to defaults,
    /// malformed ones are an error
    pub fn from_lookup<F>(lookup: F) -> Result<ServerConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup(ADDR_VAR).unwrap_or_else(|| DEFAULT_ADDR.to_string());

        let network_path = lookup(NETWORK_VAR)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);

        let average_speed_kmh =
            parse_positive(&lookup, SPEED_VAR, DEFAULT_AVERAGE_SPEED_KMH)?;
        let average_risk =
            parse_positive(&lookup, RISK_VAR, DEFAULT_AVERAGE_RISK)?;

        let costs = CostModel::new(average_speed_kmh, average_risk)
            .map_err(|err| ConfigError::InvalidCostModel(err.to_string()))?;

        Ok(ServerConfig {
            addr,
            network_path,
            costs,
        })
    }
}

fn parse_positive<F>(
    lookup: &F,
    key: &str,
    default: f64,
) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<f64>() {
            Ok(val) if val.is_finite() && val > 0.0 => Ok(val),
            _ => Err(ConfigError::InvalidNumber {
                key: key.to_string(),
                value: raw,
            }),
        },
        None => Ok(default),
    }
}
