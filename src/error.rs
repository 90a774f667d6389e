// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

use crate::artifact::ArtifactError;
use crate::opcodes::opcode_name;
use revm::primitives::{Bytes, HaltReason};
use std::fmt;

/// Execution reached an instruction the configured EVM cannot run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidOpcode {
    pub opcode: u8,
    /// Program counter of the offending instruction.
    pub pc: usize,
}

impl InvalidOpcode {
    /// Mnemonic of the opcode, in the form used by the error message.
    pub fn name(&self) -> String {
        match opcode_name(self.opcode) {
            Some(name) => name.to_string(),
            None => format!("opcode {:#04x} not defined", self.opcode),
        }
    }
}

impl fmt::Display for InvalidOpcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid opcode: {}", self.name())
    }
}

impl std::error::Error for InvalidOpcode {}

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error(transparent)]
    InvalidOpcode(#[from] InvalidOpcode),

    #[error("execution reverted{}", revert_suffix(.output))]
    Reverted { output: Bytes, gas_used: u64 },

    #[error("execution halted: {reason:?}")]
    Halted { reason: HaltReason, gas_used: u64 },

    #[error("evm error: {0}")]
    Evm(String),

    #[error("no simulated account at index {index} ({available} available)")]
    UnknownAccount { index: usize, available: usize },

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

impl SimError {
    /// Returns the invalid-opcode classification if this error carries one.
    pub fn invalid_opcode(&self) -> Option<&InvalidOpcode> {
        match self {
            SimError::InvalidOpcode(inner) => Some(inner),
            _ => None,
        }
    }

    /// Stable machine-readable identifier, used in CLI responses.
    pub fn code(&self) -> &'static str {
        match self {
            SimError::InvalidOpcode(_) => "invalid_opcode",
            SimError::Reverted { .. } => "reverted",
            SimError::Halted { .. } => "halted",
            SimError::Evm(_) => "evm",
            SimError::UnknownAccount { .. } => "unknown_account",
            SimError::Artifact(_) => "artifact",
        }
    }
}

fn revert_suffix(output: &Bytes) -> String {
    if output.is_empty() {
        String::new()
    } else {
        format!(": 0x{}", hex::encode(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_opcode_message_names_instruction() {
        let err = SimError::from(InvalidOpcode {
            opcode: 0x5f,
            pc: 21,
        });
        assert_eq!(err.to_string(), "invalid opcode: PUSH0");
        assert_eq!(err.code(), "invalid_opcode");
        assert_eq!(err.invalid_opcode().map(|e| e.pc), Some(21));
    }

    #[test]
    fn test_undefined_opcode_message() {
        let err = InvalidOpcode {
            opcode: 0xef,
            pc: 0,
        };
        assert_eq!(err.to_string(), "invalid opcode: opcode 0xef not defined");
    }

    #[test]
    fn test_other_errors_are_not_invalid_opcode() {
        let err = SimError::Reverted {
            output: Bytes::from_static(&[0xde, 0xad]),
            gas_used: 100,
        };
        assert!(err.invalid_opcode().is_none());
        assert_eq!(err.to_string(), "execution reverted: 0xdead");

        let err = SimError::Reverted {
            output: Bytes::new(),
            gas_used: 100,
        };
        assert_eq!(err.to_string(), "execution reverted");
    }
}
