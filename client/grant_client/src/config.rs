//! Client configuration loaded from environment variables.

use std::str::FromStr;

use crate::errors::{ClientError, Result};
use crate::types::{AccountId, Gas, DEFAULT_FUNCTION_CALL_GAS};

/// Networks with built-in RPC and contract defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    pub fn rpc_url(&self) -> &'static str {
        match self {
            Self::Mainnet => "https://rpc.mainnet.near.org",
            Self::Testnet => "https://rpc.testnet.near.org",
        }
    }

    pub fn contract_id(&self) -> &'static str {
        match self {
            Self::Mainnet => "grant.near",
            Self::Testnet => "dev-1652797280260-34149756559808",
        }
    }
}

impl FromStr for Network {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            other => Err(ClientError::Config(format!(
                "Unconfigured environment {other:?}; expected mainnet or testnet"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub network: Network,
    /// JSON-RPC endpoint (e.g. https://rpc.testnet.near.org)
    pub rpc_url: String,
    /// Account the grant contract is deployed to
    pub contract_id: AccountId,
    /// Gas attached to change calls that do not name a budget
    pub default_gas: Gas,
    /// How many times a failed view query is retried
    pub query_retries: u32,
    /// Per-request HTTP timeout in seconds
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    /// Defaults for `network` with no overrides.
    pub fn for_network(network: Network) -> Result<Self> {
        Ok(ClientConfig {
            network,
            rpc_url: network.rpc_url().to_string(),
            contract_id: network.contract_id().parse()?,
            default_gas: DEFAULT_FUNCTION_CALL_GAS,
            query_retries: 3,
            request_timeout_secs: 30,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source; `from_env` uses the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let network: Network = lookup("NEAR_ENV")
            .unwrap_or_else(|| "testnet".to_string())
            .parse()?;
        let defaults = Self::for_network(network)?;

        Ok(ClientConfig {
            network,
            rpc_url: lookup("RPC_URL").unwrap_or(defaults.rpc_url),
            contract_id: match lookup("CONTRACT_ID") {
                Some(id) => id
                    .parse()
                    .map_err(|_| ClientError::Config(format!("Invalid CONTRACT_ID {id:?}")))?,
                None => defaults.contract_id,
            },
            default_gas: parse_or("DEFAULT_GAS", &lookup, defaults.default_gas)?,
            query_retries: parse_or("QUERY_RETRIES", &lookup, defaults.query_retries)?,
            request_timeout_secs: parse_or(
                "REQUEST_TIMEOUT_SECS",
                &lookup,
                defaults.request_timeout_secs,
            )?,
        })
    }
}

fn parse_or<T: FromStr>(
    key: &str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T> {
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| ClientError::Config(format!("Invalid {key}"))),
        None => Ok(default),
    }
}
