// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

use crate::config::SimConfig;
use crate::error::SimError;
use crate::hardfork::Hardfork;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct DeploymentRequest {
    /// Hex creation code. Falls back to the bundled proposer bytecode.
    pub bytecode: Option<String>,
    /// Hex ABI-encoded constructor arguments, appended to the bytecode.
    pub constructor_args: Option<String>,
    /// Wei sent with the deployment, as a decimal string.
    pub value: Option<String>,
    pub hardfork: Option<Hardfork>,
    /// Reject the bytecode before execution if it contains any opcode the
    /// hardfork cannot run, reachable or not.
    #[serde(default)]
    pub static_check: bool,
    #[serde(default)]
    pub config: Option<SimConfig>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeploymentResponse {
    pub status: String,
    pub hardfork: Hardfork,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Mnemonic of the offending instruction for `invalid_opcode` errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pc: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<u64>,
    pub logs: Vec<String>,
}

impl DeploymentResponse {
    pub fn failure(hardfork: Hardfork, code: &str, message: String, logs: Vec<String>) -> Self {
        Self {
            status: "error".to_string(),
            hardfork,
            error: Some(message),
            error_code: Some(code.to_string()),
            opcode: None,
            pc: None,
            contract_address: None,
            transaction_hash: None,
            gas_used: None,
            logs,
        }
    }

    pub fn from_error(hardfork: Hardfork, err: &SimError, logs: Vec<String>) -> Self {
        let mut response = Self::failure(hardfork, err.code(), err.to_string(), logs);
        if let Some(invalid) = err.invalid_opcode() {
            response.opcode = Some(invalid.name());
            response.pc = Some(invalid.pc);
        }
        response
    }
}
