//! x86-64 architectural state.
//!
//! This module contains the register-level model of the emulated processor:
//! 1. **GPRs:** General-purpose registers and segment selectors.
//! 2. **Flags:** The RFLAGS bit layout and flag computations.

/// RFLAGS bit layout and flag computations.
pub mod flags;

/// General-purpose register file and segment selectors.
pub mod gpr;

pub use flags::RFlags;
pub use gpr::{Gpr, Reg, SegmentSelectors};
