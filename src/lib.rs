// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

//! Simulated EVM chain for deployment tests.
//!
//! A [`SimulatedBackend`] runs transactions on `revm` under a configurable
//! [`Hardfork`]. Failures are classified into [`SimError`] variants, so a
//! contract compiled for a newer EVM surfaces as
//! [`SimError::InvalidOpcode`] naming the unsupported instruction.

pub mod artifact;
pub mod backend;
pub mod bindings;
pub mod config;
pub mod error;
pub mod hardfork;
pub mod opcodes;
pub mod tracer;
pub mod transaction;
pub mod types;

pub use backend::SimulatedBackend;
pub use config::SimConfig;
pub use error::{InvalidOpcode, SimError};
pub use hardfork::Hardfork;
pub use revm::primitives::{Address, Bytes, B256, U256};
pub use transaction::{Receipt, ReceiptStatus, TransactOpts, Transaction};
