//! Software interrupts and the emulated OS.
//!
//! This module maps `INT n` and syscall numbers to behaviour. It provides:
//! 1. **Interrupt table:** Vector `0x80` enters the syscall gate; any other
//!    vector is an invalid instruction.
//! 2. **Syscall table:** `1` exit, `3` read, `4` write, using the 32-bit
//!    Linux convention (eax number, ebx/ecx/edx arguments, eax result).
//! 3. **Host I/O:** The [`HostIo`] capability `read` and `write` go through,
//!    with process-stream and in-memory implementations.

/// Host I/O capability.
pub mod io;

/// Interrupt and syscall tables and the syscall implementations.
pub mod table;

pub use io::{BufferIo, HostIo, SharedBuffer, StdIo};
pub use table::{InterruptTable, SyscallTable};
