// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

//! EVM hardforks known to the simulator.

use revm::primitives::SpecId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named EVM rule set. Variants are declared in activation order, so the
/// derived `Ord` answers "is this fork at least that one".
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Hardfork {
    Frontier,
    Homestead,
    Byzantium,
    Constantinople,
    Petersburg,
    Istanbul,
    Berlin,
    London,
    /// The Paris upgrade. Last fork without `PUSH0`.
    #[default]
    Merge,
    Shanghai,
    Cancun,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown hardfork: {0}")]
pub struct UnknownHardfork(pub String);

impl Hardfork {
    pub const ALL: [Hardfork; 11] = [
        Hardfork::Frontier,
        Hardfork::Homestead,
        Hardfork::Byzantium,
        Hardfork::Constantinople,
        Hardfork::Petersburg,
        Hardfork::Istanbul,
        Hardfork::Berlin,
        Hardfork::London,
        Hardfork::Merge,
        Hardfork::Shanghai,
        Hardfork::Cancun,
    ];

    pub fn spec_id(self) -> SpecId {
        match self {
            Hardfork::Frontier => SpecId::FRONTIER,
            Hardfork::Homestead => SpecId::HOMESTEAD,
            Hardfork::Byzantium => SpecId::BYZANTIUM,
            Hardfork::Constantinople => SpecId::CONSTANTINOPLE,
            Hardfork::Petersburg => SpecId::PETERSBURG,
            Hardfork::Istanbul => SpecId::ISTANBUL,
            Hardfork::Berlin => SpecId::BERLIN,
            Hardfork::London => SpecId::LONDON,
            Hardfork::Merge => SpecId::MERGE,
            Hardfork::Shanghai => SpecId::SHANGHAI,
            Hardfork::Cancun => SpecId::CANCUN,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Hardfork::Frontier => "frontier",
            Hardfork::Homestead => "homestead",
            Hardfork::Byzantium => "byzantium",
            Hardfork::Constantinople => "constantinople",
            Hardfork::Petersburg => "petersburg",
            Hardfork::Istanbul => "istanbul",
            Hardfork::Berlin => "berlin",
            Hardfork::London => "london",
            Hardfork::Merge => "merge",
            Hardfork::Shanghai => "shanghai",
            Hardfork::Cancun => "cancun",
        }
    }
}

impl fmt::Display for Hardfork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Hardfork {
    type Err = UnknownHardfork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        // "paris" is the execution-layer name of the merge fork.
        if lower == "paris" {
            return Ok(Hardfork::Merge);
        }
        Hardfork::ALL
            .into_iter()
            .find(|fork| fork.name() == lower)
            .ok_or_else(|| UnknownHardfork(s.to_string()))
    }
}
