//! x86-64 General-Purpose Register File.
//!
//! This module implements the register subset the emulator models. It performs
//! the following:
//! 1. **Storage:** Holds `rax`, `rcx`, `rdx`, `rbx`, `rsp`, `rbp`, `rsi` and `rdi`.
//! 2. **Sub-register Access:** Exposes each register's low 32 bits as an
//!    `eXX` view; writing the view zero-extends into the full register, as a
//!    32-bit operation does on hardware.
//! 3. **Debugging:** Dumps the complete register state.

use std::fmt;

/// A general-purpose register, numbered by its 3-bit x86 encoding.
///
/// The discriminant is the value found in a ModR/M `reg`/`r/m` field or in the
/// low three bits of a `B8+r` opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Reg {
    /// Accumulator; carries the syscall number.
    Rax = 0,
    /// Counter; second syscall argument.
    Rcx = 1,
    /// Data; third syscall argument.
    Rdx = 2,
    /// Base; first syscall argument.
    Rbx = 3,
    /// Stack pointer.
    Rsp = 4,
    /// Base pointer.
    Rbp = 5,
    /// Source index.
    Rsi = 6,
    /// Destination index.
    Rdi = 7,
}

impl Reg {
    /// All registers in encoding order.
    pub const ALL: [Self; 8] = [
        Self::Rax,
        Self::Rcx,
        Self::Rdx,
        Self::Rbx,
        Self::Rsp,
        Self::Rbp,
        Self::Rsi,
        Self::Rdi,
    ];

    /// Decodes the low three bits of `bits` into a register.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self::ALL[(bits & 0b111) as usize]
    }

    /// Name of the 64-bit register.
    pub const fn name64(self) -> &'static str {
        match self {
            Self::Rax => "rax",
            Self::Rcx => "rcx",
            Self::Rdx => "rdx",
            Self::Rbx => "rbx",
            Self::Rsp => "rsp",
            Self::Rbp => "rbp",
            Self::Rsi => "rsi",
            Self::Rdi => "rdi",
        }
    }

    /// Name of the 32-bit sub-register.
    pub const fn name32(self) -> &'static str {
        match self {
            Self::Rax => "eax",
            Self::Rcx => "ecx",
            Self::Rdx => "edx",
            Self::Rbx => "ebx",
            Self::Rsp => "esp",
            Self::Rbp => "ebp",
            Self::Rsi => "esi",
            Self::Rdi => "edi",
        }
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name32())
    }
}

/// General-purpose register file. All registers start at zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Gpr {
    regs: [u64; 8],
}

impl Gpr {
    /// Creates a register file with every register set to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a full 64-bit register.
    #[inline]
    pub const fn read64(&self, reg: Reg) -> u64 {
        self.regs[reg as usize]
    }

    /// Writes a full 64-bit register.
    #[inline]
    pub const fn write64(&mut self, reg: Reg, val: u64) {
        self.regs[reg as usize] = val;
    }

    /// Reads the low 32 bits of a register.
    #[inline]
    pub const fn read32(&self, reg: Reg) -> u32 {
        self.regs[reg as usize] as u32
    }

    /// Writes the low 32 bits of a register, zeroing the upper half.
    #[inline]
    pub const fn write32(&mut self, reg: Reg, val: u32) {
        self.regs[reg as usize] = val as u64;
    }

    /// Dumps the contents of all registers to stdout, two per line.
    pub fn dump(&self) {
        for pair in Reg::ALL.chunks(2) {
            println!(
                "{}={:#018x} {}={:#018x}",
                pair[0].name64(),
                self.read64(pair[0]),
                pair[1].name64(),
                self.read64(pair[1])
            );
        }
    }
}

/// The six segment selectors.
///
/// Nothing in the implemented subset reads or writes them; they are carried so
/// the architectural state is complete and start zeroed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SegmentSelectors {
    /// Stack segment.
    pub ss: u16,
    /// Code segment.
    pub cs: u16,
    /// Data segment.
    pub ds: u16,
    /// Extra segment.
    pub es: u16,
    /// General segment F.
    pub fs: u16,
    /// General segment G.
    pub gs: u16,
}
