// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

//! Step tracer used to attribute an EVM halt to the instruction that caused it.

use revm::interpreter::Interpreter;
use revm::{Database, EvmContext, Inspector};

/// Position of an executed instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub opcode: u8,
    pub pc: usize,
    pub depth: usize,
}

/// Records the most recent interpreter step. `step` fires before an
/// instruction runs, so after a halt `last` is the failing instruction.
#[derive(Debug, Default)]
pub struct OpcodeTracer {
    pub last: Option<Step>,
    pub steps: u64,
}

impl<DB: Database> Inspector<DB> for OpcodeTracer {
    fn step(&mut self, interp: &mut Interpreter, context: &mut EvmContext<DB>) {
        self.steps += 1;
        self.last = Some(Step {
            opcode: interp.current_opcode(),
            pc: interp.program_counter(),
            depth: context.journaled_state.depth,
        });
    }
}
