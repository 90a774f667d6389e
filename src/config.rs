// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

use crate::hardfork::Hardfork;
use serde::Deserialize;
use std::env;
use tracing::warn;

/// One thousand ether, in wei.
pub const DEFAULT_ACCOUNT_BALANCE: u128 = 1_000 * 1_000_000_000_000_000_000;
pub const DEFAULT_CHAIN_ID: u64 = 1337;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub hardfork: Hardfork,
    pub chain_id: u64,
    pub block_gas_limit: u64,
    /// Gas allowance for dry runs, and the upper bound for estimates.
    pub tx_gas_cap: u64,
    /// Wei credited to each simulated account at genesis.
    pub account_balance: u128,
    /// Seconds between mined blocks.
    pub block_time: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            hardfork: Hardfork::default(),
            chain_id: DEFAULT_CHAIN_ID,
            block_gas_limit: 30_000_000,
            tx_gas_cap: 25_000_000,
            account_balance: DEFAULT_ACCOUNT_BALANCE,
            block_time: 10,
        }
    }
}

impl SimConfig {
    /// Defaults overridden by `EVMSIM_HARDFORK` and `EVMSIM_CHAIN_ID`.
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = env::var("EVMSIM_HARDFORK") {
            match raw.parse() {
                Ok(fork) => config.hardfork = fork,
                Err(e) => warn!(error = %e, "ignoring EVMSIM_HARDFORK"),
            }
        }

        if let Ok(raw) = env::var("EVMSIM_CHAIN_ID") {
            match raw.trim().parse() {
                Ok(id) => config.chain_id = id,
                Err(e) => warn!(value = %raw, error = %e, "ignoring EVMSIM_CHAIN_ID"),
            }
        }

        config
    }

    pub fn with_hardfork(mut self, hardfork: Hardfork) -> Self {
        self.hardfork = hardfork;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimConfig::default();
        assert_eq!(config.hardfork, Hardfork::Merge);
        assert_eq!(config.chain_id, 1337);
        assert!(config.tx_gas_cap <= config.block_gas_limit);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: SimConfig =
            serde_json::from_str(r#"{"hardfork": "shanghai", "chain_id": 5}"#).unwrap();
        assert_eq!(config.hardfork, Hardfork::Shanghai);
        assert_eq!(config.chain_id, 5);
        assert_eq!(config.block_gas_limit, SimConfig::default().block_gas_limit);
    }

    // The only test in this crate that touches these variables.
    #[test]
    fn test_from_env_overrides_and_ignores_bad_values() {
        env::set_var("EVMSIM_HARDFORK", "shanghai");
        env::set_var("EVMSIM_CHAIN_ID", " 31337 ");
        let config = SimConfig::from_env();
        assert_eq!(config.hardfork, Hardfork::Shanghai);
        assert_eq!(config.chain_id, 31337);

        env::set_var("EVMSIM_HARDFORK", "glacier");
        env::set_var("EVMSIM_CHAIN_ID", "mainnet");
        let config = SimConfig::from_env();
        assert_eq!(config, SimConfig::default());

        env::remove_var("EVMSIM_HARDFORK");
        env::remove_var("EVMSIM_CHAIN_ID");
    }

    #[test]
    fn test_with_hardfork() {
        let config = SimConfig::default().with_hardfork(Hardfork::Cancun);
        assert_eq!(config.hardfork, Hardfork::Cancun);
    }
}
