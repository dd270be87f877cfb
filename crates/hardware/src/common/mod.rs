//! Common utilities and types used throughout the emulator.
//!
//! This module provides the building blocks shared by the loader, the virtual
//! memory and the CPU. It includes:
//! 1. **Address Types:** A strong type for virtual addresses.
//! 2. **Constants:** ELF layout constants and the default stack placement.
//! 3. **Memory Access:** Classification of accesses for permission checks.
//! 4. **Error Handling:** The emulator-wide error type and `Result` alias.
//! 5. **Sign Conversion:** Two's-complement helpers for displacements.

/// Address type definitions.
pub mod addr;

/// Common constants used throughout the emulator.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Error types.
pub mod error;

/// Two's-complement conversion helpers.
pub mod sign;

pub use addr::VirtAddr;
pub use data::AccessType;
pub use error::{EmuError, Result};
