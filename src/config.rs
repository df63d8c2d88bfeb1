use std::env;
use thiserror::Error;

use crate::faucet::DripConfig;
use crate::units::{UnitsError, parse_ether};
use crate::wallet::Address;

/// How long a signed request stays valid, in seconds.
pub const DEFAULT_SIGNATURE_TTL_SECS: u64 = 300;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}: {source}")]
    Amount {
        key: &'static str,
        #[source]
        source: UnitsError,
    },
    #[error("{key}: expected {expected}, got '{value}'")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Process settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub drip: DripConfig,
    /// Initial owner. When absent a dev keypair is generated at startup.
    pub owner: Option<Address>,
    /// Funds moved into the faucet right after deployment.
    pub initial_funds: u128,
    pub signature_ttl_secs: u64,
    pub dev_mint: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup; missing keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = DripConfig::default();

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_num(&lookup, "PORT", "a port number")?.unwrap_or(8080);

        let drip = DripConfig {
            drip_amount: parse_amount(&lookup, "FAUCET_DRIP_AMOUNT")?
                .unwrap_or(defaults.drip_amount),
            cooldown_time: parse_num(&lookup, "FAUCET_COOLDOWN_SECS", "seconds")?
                .unwrap_or(defaults.cooldown_time),
            min_balance: parse_amount(&lookup, "FAUCET_MIN_BALANCE")?
                .unwrap_or(defaults.min_balance),
        };

        let owner: Option<Address> = match lookup("FAUCET_OWNER") {
            Some(v) if !v.trim().is_empty() => {
                Some(v.parse().map_err(|_| ConfigError::Invalid {
                    key: "FAUCET_OWNER",
                    expected: "a 33-byte hex address",
                    value: v.clone(),
                })?)
            }
            _ => None,
        };

        let initial_funds = parse_amount(&lookup, "FAUCET_INITIAL_FUNDS")?.unwrap_or(0);
        let signature_ttl_secs = parse_num(&lookup, "FAUCET_SIGNATURE_TTL_SECS", "seconds")?
            .unwrap_or(DEFAULT_SIGNATURE_TTL_SECS);

        let dev_mint = match lookup("FAUCET_DEV_MINT") {
            None => true,
            Some(v) => match v.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "FAUCET_DEV_MINT",
                        expected: "a boolean",
                        value: v,
                    });
                }
            },
        };

        Ok(Self {
            host,
            port,
            drip,
            owner,
            initial_funds,
            signature_ttl_secs,
            dev_mint,
        })
    }
}

fn parse_num<F, T>(
    lookup: &F,
    key: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(v) => {
            let parsed = v.trim().parse::<T>();
            parsed.map(Some).map_err(|_| ConfigError::Invalid {
                key,
                expected,
                value: v,
            })
        }
    }
}

/// Amounts are written in whole native units, e.g. "0.01".
fn parse_amount<F>(lookup: &F, key: &'static str) -> Result<Option<u128>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| parse_ether(&v))
        .transpose()
        .map_err(|source| ConfigError::Amount { key, source })
}
