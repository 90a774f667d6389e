// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

//! In-memory EVM chain with pre-funded, unlocked accounts.
//!
//! Every accepted transaction is mined into its own block immediately.
//! Gas estimation and read-only calls run against the pending block and
//! never touch committed state.

use crate::config::SimConfig;
use crate::error::{InvalidOpcode, SimError};
use crate::hardfork::Hardfork;
use crate::tracer::OpcodeTracer;
use crate::transaction::{Receipt, ReceiptStatus, TransactOpts, Transaction};
use revm::db::InMemoryDB;
use revm::primitives::{
    keccak256, AccountInfo, Address, Bytes, ExecutionResult, HaltReason, Output, ResultAndState,
    TxKind, B256, U256,
};
use revm::{inspector_handle_register, DatabaseCommit, Evm};
use std::collections::HashMap;
use tracing::{debug, info, trace, warn};

/// Fields of a transaction that drive execution.
struct TxRequest {
    from: Address,
    kind: TxKind,
    data: Bytes,
    value: U256,
    /// `None` skips the nonce check, for read-only calls.
    nonce: Option<u64>,
}

struct Success {
    gas_used: u64,
    output: Output,
}

pub struct SimulatedBackend {
    db: InMemoryDB,
    config: SimConfig,
    accounts: Vec<Address>,
    block_number: u64,
    timestamp: u64,
    receipts: HashMap<B256, Receipt>,
}

impl SimulatedBackend {
    /// Backend with `num_accounts` funded accounts and the default config.
    pub fn new(num_accounts: usize) -> Self {
        Self::with_config(num_accounts, SimConfig::default())
    }

    pub fn with_config(num_accounts: usize, config: SimConfig) -> Self {
        let mut db = InMemoryDB::default();
        let balance = U256::from(config.account_balance);
        let accounts: Vec<Address> = (0..num_accounts).map(account_address).collect();
        for address in &accounts {
            db.insert_account_info(*address, AccountInfo::from_balance(balance));
        }

        debug!(
            hardfork = %config.hardfork,
            chain_id = config.chain_id,
            accounts = accounts.len(),
            "simulated backend initialised"
        );

        Self {
            db,
            config,
            accounts,
            block_number: 0,
            timestamp: 0,
            receipts: HashMap::new(),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn hardfork(&self) -> Hardfork {
        self.config.hardfork
    }

    pub fn accounts(&self) -> &[Address] {
        &self.accounts
    }

    pub fn addr(&self, index: usize) -> Result<Address, SimError> {
        self.accounts
            .get(index)
            .copied()
            .ok_or(SimError::UnknownAccount {
                index,
                available: self.accounts.len(),
            })
    }

    /// Transact options for the account at `index`.
    pub fn acc(&self, index: usize) -> Result<TransactOpts, SimError> {
        self.addr(index).map(TransactOpts::new)
    }

    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    pub fn balance_of(&self, address: Address) -> U256 {
        self.account_info(address)
            .map(|info| info.balance)
            .unwrap_or_default()
    }

    pub fn nonce_of(&self, address: Address) -> u64 {
        self.account_info(address).map_or(0, |info| info.nonce)
    }

    pub fn code_at(&self, address: Address) -> Bytes {
        let Some(info) = self.account_info(address) else {
            return Bytes::new();
        };
        match &info.code {
            Some(code) => code.original_bytes(),
            None => self
                .db
                .contracts
                .get(&info.code_hash)
                .map(|code| code.original_bytes())
                .unwrap_or_default(),
        }
    }

    pub fn storage_at(&self, address: Address, slot: U256) -> U256 {
        self.db
            .accounts
            .get(&address)
            .and_then(|account| account.storage.get(&slot).copied())
            .unwrap_or_default()
    }

    pub fn receipt(&self, hash: &B256) -> Option<&Receipt> {
        self.receipts.get(hash)
    }

    /// Credit `amount` wei to `address`, creating the account if needed.
    pub fn fund(&mut self, address: Address, amount: U256) {
        let mut info = self.account_info(address).cloned().unwrap_or_default();
        info.balance = info.balance.saturating_add(amount);
        self.db.insert_account_info(address, info);
    }

    /// Mine an empty block.
    pub fn commit(&mut self) {
        self.advance_block();
    }

    /// Smallest gas limit under which the transaction succeeds. Execution
    /// failures at the gas cap are returned as errors.
    pub fn estimate_gas(
        &mut self,
        opts: &TransactOpts,
        to: Option<Address>,
        input: Bytes,
    ) -> Result<u64, SimError> {
        let request = TxRequest {
            from: opts.from,
            kind: to.map_or(TxKind::Create, TxKind::Call),
            data: input,
            value: opts.value,
            nonce: Some(opts.nonce.unwrap_or_else(|| self.nonce_of(opts.from))),
        };
        self.estimate(&request)
    }

    /// Execute a read-only call against the pending block.
    pub fn call(&mut self, from: Address, to: Address, input: Bytes) -> Result<Bytes, SimError> {
        let request = TxRequest {
            from,
            kind: TxKind::Call(to),
            data: input,
            value: U256::ZERO,
            nonce: None,
        };
        let (result, tracer) = self.execute(&request, self.config.tx_gas_cap, false)?;
        let success = classify(result, &tracer)?;
        Ok(success.output.into_data())
    }

    /// Deploy `init_code` (creation code with encoded constructor arguments
    /// appended). Returns the new contract address and the mined transaction.
    pub fn deploy(
        &mut self,
        opts: &TransactOpts,
        init_code: Bytes,
    ) -> Result<(Address, Transaction), SimError> {
        let nonce = opts.nonce.unwrap_or_else(|| self.nonce_of(opts.from));
        let address = opts.from.create(nonce);
        let tx = self.send(opts, TxKind::Create, init_code)?;
        Ok((address, tx))
    }

    pub fn send_transaction(
        &mut self,
        opts: &TransactOpts,
        to: Address,
        input: Bytes,
    ) -> Result<Transaction, SimError> {
        self.send(opts, TxKind::Call(to), input)
    }

    fn account_info(&self, address: Address) -> Option<&AccountInfo> {
        self.db.accounts.get(&address).map(|account| &account.info)
    }

    fn send(
        &mut self,
        opts: &TransactOpts,
        kind: TxKind,
        input: Bytes,
    ) -> Result<Transaction, SimError> {
        let nonce = opts.nonce.unwrap_or_else(|| self.nonce_of(opts.from));
        let request = TxRequest {
            from: opts.from,
            kind,
            data: input,
            value: opts.value,
            nonce: Some(nonce),
        };

        let gas_limit = match opts.gas_limit {
            Some(limit) => limit,
            None => self.estimate(&request)?,
        };

        let (result, _) = self.execute(&request, gas_limit, true)?;
        let tx = Transaction::new(
            opts.from,
            kind.to().copied(),
            nonce,
            opts.value,
            gas_limit,
            request.data,
        );
        self.mine(&tx, result);
        Ok(tx)
    }

    fn estimate(&mut self, request: &TxRequest) -> Result<u64, SimError> {
        let cap = self.config.tx_gas_cap;
        let (result, tracer) = self.execute(request, cap, false)?;
        let used = match classify(result, &tracer) {
            Ok(success) => success.gas_used,
            Err(e) => {
                warn!(hardfork = %self.config.hardfork, error = %e, "gas estimation failed");
                return Err(e);
            }
        };

        // Refunds and the 63/64 call rule mean `used` is only a lower bound.
        let mut lo = used.saturating_sub(1);
        let mut hi = cap;
        while lo + 1 < hi {
            let mid = lo + (hi - lo) / 2;
            match self.execute(request, mid, false) {
                Ok((result, _)) if result.is_success() => hi = mid,
                _ => lo = mid,
            }
        }

        debug!(gas_used = used, estimate = hi, "gas estimated");
        Ok(hi)
    }

    /// Run one transaction on top of committed state, optionally committing it.
    fn execute(
        &mut self,
        request: &TxRequest,
        gas_limit: u64,
        commit: bool,
    ) -> Result<(ExecutionResult, OpcodeTracer), SimError> {
        let spec_id = self.config.hardfork.spec_id();
        let chain_id = self.config.chain_id;
        let block_gas_limit = self.config.block_gas_limit;
        let pending_number = self.block_number + 1;
        let pending_timestamp = self.timestamp + self.config.block_time;

        let mut evm = Evm::builder()
            .with_db(&mut self.db)
            .with_external_context(OpcodeTracer::default())
            .with_spec_id(spec_id)
            .modify_cfg_env(|cfg| cfg.chain_id = chain_id)
            .modify_block_env(|block| {
                block.number = U256::from(pending_number);
                block.timestamp = U256::from(pending_timestamp);
                block.gas_limit = U256::from(block_gas_limit);
            })
            .modify_tx_env(|tx| {
                tx.caller = request.from;
                tx.transact_to = request.kind;
                tx.data = request.data.clone();
                tx.value = request.value;
                tx.gas_limit = gas_limit;
                tx.gas_price = U256::ZERO;
                tx.nonce = request.nonce;
                tx.chain_id = Some(chain_id);
            })
            .append_handler_register(inspector_handle_register)
            .build();

        let outcome = evm.transact();
        let tracer = std::mem::take(&mut evm.context.external);
        drop(evm);

        let ResultAndState { result, state } = outcome.map_err(|e| SimError::Evm(e.to_string()))?;
        trace!(
            steps = tracer.steps,
            success = result.is_success(),
            commit,
            "transaction executed"
        );
        if commit {
            self.db.commit(state);
        }
        Ok((result, tracer))
    }

    fn mine(&mut self, tx: &Transaction, result: ExecutionResult) {
        self.advance_block();

        let status = if result.is_success() {
            ReceiptStatus::Success
        } else {
            ReceiptStatus::Failed
        };
        let contract_address = match &result {
            ExecutionResult::Success {
                output: Output::Create(_, address),
                ..
            } => *address,
            _ => None,
        };
        let receipt = Receipt {
            transaction_hash: tx.hash,
            block_number: self.block_number,
            status,
            gas_used: result.gas_used(),
            contract_address,
            logs: result.logs().to_vec(),
        };

        match status {
            ReceiptStatus::Success => info!(
                tx = %tx.hash,
                block = self.block_number,
                gas_used = receipt.gas_used,
                "transaction mined"
            ),
            ReceiptStatus::Failed => warn!(
                tx = %tx.hash,
                block = self.block_number,
                gas_used = receipt.gas_used,
                "transaction mined with failed status"
            ),
        }

        self.receipts.insert(tx.hash, receipt);
    }

    fn advance_block(&mut self) {
        self.block_number += 1;
        self.timestamp += self.config.block_time;
    }
}

/// Deterministic address of simulated account `index`.
pub fn account_address(index: usize) -> Address {
    Address::from_word(keccak256(format!("evm-simulator/account/{index}")))
}

fn classify(result: ExecutionResult, tracer: &OpcodeTracer) -> Result<Success, SimError> {
    match result {
        ExecutionResult::Success {
            gas_used, output, ..
        } => Ok(Success { gas_used, output }),
        ExecutionResult::Revert { gas_used, output } => {
            Err(SimError::Reverted { output, gas_used })
        }
        ExecutionResult::Halt { reason, gas_used } => Err(halt_error(reason, gas_used, tracer)),
    }
}

fn halt_error(reason: HaltReason, gas_used: u64, tracer: &OpcodeTracer) -> SimError {
    let opcode_fault = matches!(
        reason,
        HaltReason::NotActivated | HaltReason::OpcodeNotFound | HaltReason::InvalidFEOpcode
    );
    match tracer.last {
        Some(step) if opcode_fault => {
            debug!(
                opcode = step.opcode,
                pc = step.pc,
                depth = step.depth,
                ?reason,
                "halted on invalid opcode"
            );
            InvalidOpcode {
                opcode: step.opcode,
                pc: step.pc,
            }
            .into()
        }
        _ => SimError::Halted { reason, gas_used },
    }
}
