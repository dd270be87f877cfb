//! ModR/M operand decoding.
//!
//! Only the encodings the implemented instructions need are resolved:
//! 1. **Register R/M:** six of the eight R/M values name a register
//!    directly. R/M `100` needs a SIB byte and R/M `101` a disp32; both are
//!    rejected, and the `reg` field is held to the same six registers.
//! 2. **Absolute MOV forms:** `04 25 disp32` (eax) and `1C 25 disp32` (ebx).
//!    Every other memory form is rejected.

use std::fmt;

use super::opcodes::{MODRM_SIB_EAX, MODRM_SIB_EBX, SIB_DISP32};
use crate::common::{EmuError, Result, VirtAddr};
use crate::core::arch::Reg;

/// A ModR/M byte: `mod` (7-6), `reg` (5-3), `r/m` (2-0).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModRm(pub u8);

impl ModRm {
    /// Addressing mode bits.
    #[inline]
    pub const fn md(self) -> u8 {
        self.0 >> 6
    }

    /// Register (or opcode extension) field.
    #[inline]
    pub const fn reg(self) -> u8 {
        (self.0 >> 3) & 0b111
    }

    /// R/M field.
    #[inline]
    pub const fn rm(self) -> u8 {
        self.0 & 0b111
    }

    /// Whether the byte selects a register operand (`mod == 11`).
    #[inline]
    pub const fn is_register(self) -> bool {
        self.md() == 0b11
    }

    /// The register named by the `reg` field.
    ///
    /// # Errors
    ///
    /// [`EmuError::UnsupportedFeature`] for `100` (esp) and `101` (ebp).
    pub fn reg_register(self) -> Result<Reg> {
        match self.reg() {
            bits @ (0b100 | 0b101) => Err(EmuError::unsupported(format!(
                "register operand {} (ModR/M {:#04x})",
                Reg::from_bits(bits),
                self.0
            ))),
            bits => Ok(Reg::from_bits(bits)),
        }
    }

    /// The register named by the R/M field.
    ///
    /// # Errors
    ///
    /// [`EmuError::UnsupportedFeature`] for R/M `100` (SIB) and `101` (disp32).
    pub fn rm_register(self) -> Result<Reg> {
        match self.rm() {
            0b100 => Err(EmuError::unsupported(format!(
                "SIB addressing (ModR/M {:#04x})",
                self.0
            ))),
            0b101 => Err(EmuError::unsupported(format!(
                "disp32 addressing (ModR/M {:#04x})",
                self.0
            ))),
            rm => Ok(Reg::from_bits(rm)),
        }
    }
}

/// What an instruction operand refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    /// A general-purpose register.
    Register(Reg),
    /// A 32-bit memory location.
    Memory(VirtAddr),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register(reg) => write!(f, "{reg}"),
            Self::Memory(addr) => write!(f, "[{addr}]"),
        }
    }
}

/// Register selected by one of the two absolute MOV patterns.
///
/// `modrm` and `sib` are the bytes after the opcode. Checks run in order:
/// a known pattern wins, then `mod == 11` is rejected, then any R/M other
/// than `100`, then any remaining SIB form.
///
/// # Errors
///
/// [`EmuError::UnsupportedFeature`] for every other pattern.
pub fn absolute_register(modrm: ModRm, sib: Option<u8>) -> Result<Reg> {
    match (modrm.0, sib) {
        (MODRM_SIB_EAX, Some(SIB_DISP32)) => return Ok(Reg::Rax),
        (MODRM_SIB_EBX, Some(SIB_DISP32)) => return Ok(Reg::Rbx),
        _ => {}
    }
    if modrm.is_register() {
        return Err(EmuError::unsupported(format!(
            "register-direct MOV (ModR/M {:#04x})",
            modrm.0
        )));
    }
    if modrm.rm() != 0b100 {
        return Err(EmuError::unsupported(format!(
            "MOV with direct register addressing (ModR/M {:#04x})",
            modrm.0
        )));
    }
    Err(EmuError::unsupported(format!(
        "SIB addressing (ModR/M {:#04x}, SIB {:#04x})",
        modrm.0,
        sib.unwrap_or(0)
    )))
}
