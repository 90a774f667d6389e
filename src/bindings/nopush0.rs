// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

//! Binding for the SWAP2 proposer contract, compiled for Shanghai.
//!
//! The handle type is called `Nopush0` rather than after the contract: the
//! binding generator named it after the package the bytecode ships in. The
//! [`Swap2Proposer`] impl below is what pins down which contract it is.

use super::{deploy_contract, BoundContract, ContractBackend};
use crate::artifact::decode_bytecode;
use crate::error::SimError;
use crate::transaction::{TransactOpts, Transaction};
use alloy_sol_types::{sol, SolValue};
use revm::primitives::Address;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct Parties {
        address seller;
        address buyer;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct ERC721Token {
        address addr;
        uint256 id;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct MultiERC721Token {
        address addr;
        uint256[] ids;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct ERC20Consideration {
        address currency;
        uint256 amount;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct MultiERC721ForNativeSwap {
        Parties parties;
        MultiERC721Token[] offer;
        uint256 consideration;
        uint256 validUntilTime;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct MultiERC721ForERC20Swap {
        Parties parties;
        MultiERC721Token[] offer;
        ERC20Consideration consideration;
        uint256 validUntilTime;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct ERC721ForERC20Swap {
        Parties parties;
        ERC721Token offer;
        ERC20Consideration consideration;
        uint256 validUntilTime;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct ERC721ForNativeSwap {
        Parties parties;
        ERC721Token offer;
        uint256 consideration;
        uint256 validUntilTime;
    }

    /// Overloads are numbered in declaration order (`propose_0Call`, ...).
    interface ISWAP2Proposer {
        function propose(MultiERC721ForNativeSwap calldata swap) external returns (address);
        function propose(MultiERC721ForERC20Swap calldata swap) external returns (address);
        function propose(ERC721ForERC20Swap calldata swap) external returns (address);
        function propose(ERC721ForNativeSwap calldata swap) external returns (address);
    }
}

/// Creation code, as emitted by solc with the Shanghai EVM target.
pub const NOPUSH0_BIN: &str = include_str!("../../contracts/nopush0.bin");

/// The four proposal entry points of a SWAP2 proposer. Method names follow
/// the binding generator's overload numbering.
pub trait Swap2Proposer {
    fn propose<B: ContractBackend>(
        &self,
        backend: &mut B,
        opts: &TransactOpts,
        swap: MultiERC721ForNativeSwap,
    ) -> Result<Transaction, SimError>;

    fn propose0<B: ContractBackend>(
        &self,
        backend: &mut B,
        opts: &TransactOpts,
        swap: MultiERC721ForERC20Swap,
    ) -> Result<Transaction, SimError>;

    fn propose1<B: ContractBackend>(
        &self,
        backend: &mut B,
        opts: &TransactOpts,
        swap: ERC721ForERC20Swap,
    ) -> Result<Transaction, SimError>;

    fn propose2<B: ContractBackend>(
        &self,
        backend: &mut B,
        opts: &TransactOpts,
        swap: ERC721ForNativeSwap,
    ) -> Result<Transaction, SimError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nopush0 {
    contract: BoundContract,
}

impl Nopush0 {
    /// Bind to an already-deployed proposer.
    pub fn new(address: Address) -> Self {
        Self {
            contract: BoundContract::new(address),
        }
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    /// Deploy a new proposer whose constructor receives `deployer`.
    pub fn deploy<B: ContractBackend>(
        opts: &TransactOpts,
        backend: &mut B,
        deployer: Address,
    ) -> Result<(Address, Transaction, Nopush0), SimError> {
        let bytecode = decode_bytecode(NOPUSH0_BIN)?;
        let args = (deployer,).abi_encode_params();
        let (address, tx) = deploy_contract(opts, backend, &bytecode, &args)?;
        Ok((address, tx, Nopush0::new(address)))
    }
}

impl Swap2Proposer for Nopush0 {
    fn propose<B: ContractBackend>(
        &self,
        backend: &mut B,
        opts: &TransactOpts,
        swap: MultiERC721ForNativeSwap,
    ) -> Result<Transaction, SimError> {
        let call = ISWAP2Proposer::propose_0Call { swap };
        self.contract.transact(backend, opts, &call)
    }

    fn propose0<B: ContractBackend>(
        &self,
        backend: &mut B,
        opts: &TransactOpts,
        swap: MultiERC721ForERC20Swap,
    ) -> Result<Transaction, SimError> {
        let call = ISWAP2Proposer::propose_1Call { swap };
        self.contract.transact(backend, opts, &call)
    }

    fn propose1<B: ContractBackend>(
        &self,
        backend: &mut B,
        opts: &TransactOpts,
        swap: ERC721ForERC20Swap,
    ) -> Result<Transaction, SimError> {
        let call = ISWAP2Proposer::propose_2Call { swap };
        self.contract.transact(backend, opts, &call)
    }

    fn propose2<B: ContractBackend>(
        &self,
        backend: &mut B,
        opts: &TransactOpts,
        swap: ERC721ForNativeSwap,
    ) -> Result<Transaction, SimError> {
        let call = ISWAP2Proposer::propose_3Call { swap };
        self.contract.transact(backend, opts, &call)
    }
}

const _: fn() = || {
    fn assert_proposer<P: Swap2Proposer>() {}
    assert_proposer::<Nopush0>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardfork::Hardfork;
    use crate::opcodes::check_compatibility;
    use alloy_sol_types::SolCall;

    #[test]
    fn test_bytecode_targets_shanghai() {
        let code = decode_bytecode(NOPUSH0_BIN).unwrap();

        let err = check_compatibility(&code, Hardfork::Merge).unwrap_err();
        assert_eq!(err.to_string(), "invalid opcode: PUSH0");
        assert!(check_compatibility(&code, Hardfork::Shanghai).is_ok());
    }

    #[test]
    fn test_overloads_have_distinct_selectors() {
        let selectors = [
            ISWAP2Proposer::propose_0Call::SELECTOR,
            ISWAP2Proposer::propose_1Call::SELECTOR,
            ISWAP2Proposer::propose_2Call::SELECTOR,
            ISWAP2Proposer::propose_3Call::SELECTOR,
        ];
        for (i, a) in selectors.iter().enumerate() {
            for b in &selectors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(ISWAP2Proposer::propose_3Call::SIGNATURE.starts_with("propose("));
    }

    #[test]
    fn test_constructor_args_are_one_word() {
        let args = (Address::with_last_byte(0x42),).abi_encode_params();
        assert_eq!(args.len(), 32);
        assert_eq!(args[31], 0x42);
    }
}
