//! Core processor implementation.
//!
//! This module contains the architectural state of the emulated x86-64
//! processor and the CPU that runs the fetch, decode and execute cycle over it.

/// Architectural state (register file, segment selectors, flags).
pub mod arch;

/// CPU core: cycle orchestration, stack and operand access.
pub mod cpu;

pub use self::cpu::Cpu;
