// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

use revm::primitives::{keccak256, Address, Bytes, Log, B256, U256};

/// Options for a state-changing call. Simulated accounts are unlocked, so
/// there is no signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactOpts {
    pub from: Address,
    /// Explicit nonce; the account's current nonce when unset.
    pub nonce: Option<u64>,
    pub value: U256,
    /// Explicit gas limit; estimated when unset.
    pub gas_limit: Option<u64>,
}

impl TransactOpts {
    pub fn new(from: Address) -> Self {
        Self {
            from,
            nonce: None,
            value: U256::ZERO,
            gas_limit: None,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }
}

/// A transaction accepted by the simulated chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub hash: B256,
    pub from: Address,
    /// `None` for contract creation.
    pub to: Option<Address>,
    pub nonce: u64,
    pub value: U256,
    pub gas_limit: u64,
    pub input: Bytes,
}

impl Transaction {
    pub fn new(
        from: Address,
        to: Option<Address>,
        nonce: u64,
        value: U256,
        gas_limit: u64,
        input: Bytes,
    ) -> Self {
        let hash = transaction_hash(from, to, nonce, value, gas_limit, &input);
        Self {
            hash,
            from,
            to,
            nonce,
            value,
            gas_limit,
            input,
        }
    }

    pub fn is_create(&self) -> bool {
        self.to.is_none()
    }
}

/// Simulator-local identifier: keccak over the fields that make a
/// transaction unique. There is no signature, so this is not the hash a
/// real network would assign.
fn transaction_hash(
    from: Address,
    to: Option<Address>,
    nonce: u64,
    value: U256,
    gas_limit: u64,
    input: &[u8],
) -> B256 {
    let mut preimage = Vec::with_capacity(20 + 1 + 20 + 8 + 32 + 8 + input.len());
    preimage.extend_from_slice(from.as_slice());
    match to {
        None => preimage.push(0),
        Some(to) => {
            preimage.push(1);
            preimage.extend_from_slice(to.as_slice());
        }
    }
    preimage.extend_from_slice(&nonce.to_be_bytes());
    preimage.extend_from_slice(&value.to_be_bytes::<32>());
    preimage.extend_from_slice(&gas_limit.to_be_bytes());
    preimage.extend_from_slice(input);
    keccak256(preimage)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_hash: B256,
    pub block_number: u64,
    pub status: ReceiptStatus,
    pub gas_used: u64,
    pub contract_address: Option<Address>,
    pub logs: Vec<Log>,
}
