// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

//! Typed contract bindings over any [`ContractBackend`].

pub mod nopush0;

use crate::backend::SimulatedBackend;
use crate::error::SimError;
use crate::transaction::{TransactOpts, Transaction};
use alloy_sol_types::SolCall;
use revm::primitives::{Address, Bytes};

/// The chain operations a binding needs to deploy and transact.
pub trait ContractBackend {
    fn deploy_code(
        &mut self,
        opts: &TransactOpts,
        init_code: Bytes,
    ) -> Result<(Address, Transaction), SimError>;

    fn transact(
        &mut self,
        opts: &TransactOpts,
        to: Address,
        input: Bytes,
    ) -> Result<Transaction, SimError>;
}

impl ContractBackend for SimulatedBackend {
    fn deploy_code(
        &mut self,
        opts: &TransactOpts,
        init_code: Bytes,
    ) -> Result<(Address, Transaction), SimError> {
        self.deploy(opts, init_code)
    }

    fn transact(
        &mut self,
        opts: &TransactOpts,
        to: Address,
        input: Bytes,
    ) -> Result<Transaction, SimError> {
        self.send_transaction(opts, to, input)
    }
}

/// Append ABI-encoded constructor arguments to creation code and deploy it.
pub fn deploy_contract<B: ContractBackend>(
    opts: &TransactOpts,
    backend: &mut B,
    bytecode: &[u8],
    constructor_args: &[u8],
) -> Result<(Address, Transaction), SimError> {
    let mut init_code = Vec::with_capacity(bytecode.len() + constructor_args.len());
    init_code.extend_from_slice(bytecode);
    init_code.extend_from_slice(constructor_args);
    backend.deploy_code(opts, init_code.into())
}

/// A deployed contract address plus helpers for sending typed calls to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundContract {
    address: Address,
}

impl BoundContract {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn transact<B: ContractBackend, C: SolCall>(
        &self,
        backend: &mut B,
        opts: &TransactOpts,
        call: &C,
    ) -> Result<Transaction, SimError> {
        backend.transact(opts, self.address, call.abi_encode().into())
    }
}
