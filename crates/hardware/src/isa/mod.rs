//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the opcode constants, operand decoding and instruction handlers for
//! the implemented x86-64 subset, plus the table that dispatches on the first
//! opcode byte.
//!
//! # Layout
//!
//! * `opcodes`: Opcode, prefix and escape byte values.
//! * `modrm`: ModR/M and SIB operand decoding.
//! * `table`: The 256-entry opcode dispatch table.
//! * `handlers`: One function per implemented instruction.

/// Instruction handlers grouped by kind.
pub mod handlers;

/// ModR/M and SIB operand decoding.
pub mod modrm;

/// Opcode, prefix and escape byte values.
pub mod opcodes;

/// Opcode dispatch table.
pub mod table;

pub use modrm::{ModRm, Operand};
pub use table::{ExecFn, Instruction, OpcodeTable};
