//! Emulator error definitions.
//!
//! Every failure in the loader, the virtual memory and the executor is one of
//! the variants below. None of them is recoverable inside the core: an error
//! aborts the current cycle and the whole run. Each variant carries the
//! offending address, opcode or byte so the driver can report it.

use thiserror::Error;

use super::data::AccessType;

/// Emulator-wide result alias.
pub type Result<T> = std::result::Result<T, EmuError>;

/// Errors raised while loading or executing a program.
#[derive(Debug, Error)]
pub enum EmuError {
    /// Structural ELF violation (bad magic, wrong header size, truncated file).
    #[error("malformed binary: {0}")]
    MalformedBinary(String),

    /// A recognised construct that is deliberately not implemented.
    ///
    /// Raised for 32-bit ELF, compressed sections, extended header counts,
    /// non-LOAD segments, prefixed or multi-byte opcodes, unmodeled ModR/M
    /// patterns and unmapped syscalls.
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// An opcode, ModR/M byte or interrupt vector that decodes to nothing.
    #[error("invalid instruction byte {byte:#04x} at {address:#x}: {reason}")]
    InvalidInstruction {
        /// Address of the offending byte.
        address: u64,
        /// The offending byte value.
        byte: u8,
        /// What was being decoded.
        reason: &'static str,
    },

    /// A virtual address not covered by any mapped page.
    #[error("address {0:#x} is not mapped")]
    AddressOutOfBounds(u64),

    /// The resolved page lacks the permission bit the access requires.
    #[error("{access} access violation at {address:#x}")]
    AccessViolation {
        /// The faulting virtual address.
        address: u64,
        /// The kind of access that was denied.
        access: AccessType,
    },

    /// A configuration file that does not match the schema.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Host I/O failure while servicing a syscall or reading the binary.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EmuError {
    /// Shorthand for an [`EmuError::UnsupportedFeature`] with a formatted message.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedFeature(msg.into())
    }

    /// Shorthand for an [`EmuError::MalformedBinary`] with a formatted message.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedBinary(msg.into())
    }
}
