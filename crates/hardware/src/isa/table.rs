//! Opcode dispatch table.
//!
//! A 256-entry table indexed by the first opcode byte. Each entry pairs the
//! instruction's mnemonic with the handler that decodes its operands,
//! performs its effects and returns the new flags value. The table is built
//! once per CPU and never modified afterwards.

use std::fmt;

use super::handlers::{arithmetic, control_flow, load_store, system};
use super::opcodes::{
    CALL_REL32, CMP_RM_R, GRP1_RM_IMM8, INT_IMM8, JE_REL8, JMP_REL8, MOV_R_IMM32, MOV_R_RM,
    MOV_RM_R, NOP, RET,
};
use crate::common::Result;
use crate::core::Cpu;
use crate::core::arch::RFlags;

/// Instruction handler.
///
/// Called with rip just past the opcode byte and the opcode itself (the
/// `B8+r` family encodes its register there). Consumes its operand bytes
/// through the CPU's cursor and returns the complete new flags word.
pub type ExecFn = fn(&mut Cpu, u8) -> Result<RFlags>;

/// One table entry.
#[derive(Clone, Copy)]
pub struct Instruction {
    /// Assembly mnemonic, used for tracing and statistics.
    pub mnemonic: &'static str,
    /// Handler.
    pub exec: ExecFn,
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instruction")
            .field("mnemonic", &self.mnemonic)
            .finish_non_exhaustive()
    }
}

/// First-byte opcode table.
#[derive(Clone)]
pub struct OpcodeTable {
    entries: [Option<Instruction>; 256],
}

impl fmt::Debug for OpcodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .enumerate()
                    .filter_map(|(op, e)| e.map(|e| (format!("{op:#04x}"), e.mnemonic))),
            )
            .finish()
    }
}

impl Default for OpcodeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl OpcodeTable {
    /// Table of the implemented subset.
    pub fn new() -> Self {
        let mut table = Self::empty();
        table.register(CMP_RM_R, "cmp", arithmetic::cmp_rm_r);
        table.register(GRP1_RM_IMM8, "add", arithmetic::grp1_rm_imm8);
        table.register(JE_REL8, "je", control_flow::je_rel8);
        table.register(JMP_REL8, "jmp", control_flow::jmp_rel8);
        table.register(CALL_REL32, "call", control_flow::call_rel32);
        table.register(RET, "ret", control_flow::ret);
        table.register(MOV_RM_R, "mov", load_store::mov_rm_r);
        table.register(MOV_R_RM, "mov", load_store::mov_r_rm);
        for op in MOV_R_IMM32..=MOV_R_IMM32 + 7 {
            table.register(op, "mov", load_store::mov_r_imm32);
        }
        table.register(NOP, "nop", system::nop);
        table.register(INT_IMM8, "int", system::int_imm8);
        table
    }

    /// Table with no entries.
    pub const fn empty() -> Self {
        Self {
            entries: [None; 256],
        }
    }

    /// Installs `exec` for `opcode`, replacing any existing entry.
    pub fn register(&mut self, opcode: u8, mnemonic: &'static str, exec: ExecFn) {
        self.entries[opcode as usize] = Some(Instruction { mnemonic, exec });
    }

    /// Entry for `opcode`, if implemented.
    #[inline]
    pub const fn lookup(&self, opcode: u8) -> Option<Instruction> {
        self.entries[opcode as usize]
    }

    /// Number of implemented opcodes.
    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    /// Whether no opcode is implemented.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
