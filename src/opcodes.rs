// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

use crate::error::InvalidOpcode;
use crate::hardfork::Hardfork;
use revm::interpreter::OpCode;

const PUSH1: u8 = 0x60;
const PUSH32: u8 = 0x7f;

/// Mnemonic for an opcode byte, or `None` if the byte is unassigned.
pub fn opcode_name(opcode: u8) -> Option<&'static str> {
    OpCode::new(opcode).map(OpCode::as_str)
}

/// First hardfork that activates `opcode`. Opcodes missing from the table
/// date back to Frontier.
pub fn activation_fork(opcode: u8) -> Hardfork {
    match opcode {
        0xf4 => Hardfork::Homestead, // DELEGATECALL
        0x3d | 0x3e | 0xfa | 0xfd => Hardfork::Byzantium,
        0x1b | 0x1c | 0x1d | 0x3f | 0xf5 => Hardfork::Constantinople,
        0x46 | 0x47 => Hardfork::Istanbul,
        0x48 => Hardfork::London,   // BASEFEE
        0x5f => Hardfork::Shanghai, // PUSH0
        0x49 | 0x4a | 0x5c | 0x5d | 0x5e => Hardfork::Cancun,
        _ => Hardfork::Frontier,
    }
}

pub fn is_active(opcode: u8, hardfork: Hardfork) -> bool {
    opcode_name(opcode).is_some() && !is_eof_only(opcode) && activation_fork(opcode) <= hardfork
}

// EOF container instructions; legacy bytecode can never execute them.
fn is_eof_only(opcode: u8) -> bool {
    matches!(
        opcode,
        0xd0..=0xd3 | 0xe0..=0xe8 | 0xec | 0xee | 0xf7 | 0xf8 | 0xf9 | 0xfb
    )
}

/// Walk `code` without executing it and report the first instruction the
/// hardfork cannot run. Unreachable code is scanned too, so a pass here is
/// stricter than a successful execution.
pub fn check_compatibility(code: &[u8], hardfork: Hardfork) -> Result<(), InvalidOpcode> {
    let mut pc = 0;
    while pc < code.len() {
        let opcode = code[pc];
        // 0xfe is the designated INVALID instruction; solc uses it as a
        // separator before metadata and it is never a compatibility problem.
        if opcode != 0xfe && !is_active(opcode, hardfork) {
            return Err(InvalidOpcode { opcode, pc });
        }
        pc += 1 + immediate_len(opcode);
    }
    Ok(())
}

fn immediate_len(opcode: u8) -> usize {
    if (PUSH1..=PUSH32).contains(&opcode) {
        usize::from(opcode - PUSH1) + 1
    } else {
        0
    }
}
