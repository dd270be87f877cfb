//! Instruction handlers.
//!
//! Every handler has the [`ExecFn`](super::ExecFn) signature: it is entered
//! with rip one byte past the opcode, reads its operand bytes through the
//! CPU cursor (which advances rip with them), applies its effects and
//! returns the full new flags word.

/// CMP and ADD.
pub mod arithmetic;

/// JE, JMP, CALL and RET.
pub mod control_flow;

/// The MOV forms.
pub mod load_store;

/// NOP and INT.
pub mod system;
