//! ELF64 loader and x86-64 subset emulator library.
//!
//! This crate loads a 64-bit ELF executable and runs it on a small x86-64 interpreter:
//! 1. **Loading:** ELF64 header, program header and section header parsing, segment extraction.
//! 2. **Memory:** Paged virtual memory with read, write and execute permission checks.
//! 3. **Core:** Register file, flags, and the fetch, decode and execute cycle.
//! 4. **ISA:** Opcode table, ModR/M decoding and the instruction handlers.
//! 5. **Syscalls:** `INT 0x80` exit, read and write over a pluggable host I/O.
//! 6. **Simulation:** Configuration, program setup and statistics collection.

/// Common types and constants (addresses, errors, access types, sign helpers).
pub mod common;
/// Emulator configuration (tracing, stack page placement).
pub mod config;
/// CPU core (architectural state, execution, stack and operand access).
pub mod core;
/// Instruction set (opcodes, ModR/M, dispatch table, handlers).
pub mod isa;
/// Paged virtual memory.
pub mod memory;
/// ELF parsing, segment loading and the simulator.
pub mod sim;
/// Execution statistics collection and reporting.
pub mod stats;
/// Interrupt and syscall layer, host I/O.
pub mod syscall;

/// Crate-wide error type and result alias.
pub use crate::common::{EmuError, Result};
/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Main CPU type; holds registers, memory, tables and stats.
pub use crate::core::Cpu;
/// Loaded program plus CPU; construct with `Simulator::load` or `Simulator::from_path`.
pub use crate::sim::Simulator;
