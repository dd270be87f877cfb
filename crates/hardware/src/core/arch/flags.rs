//! RFLAGS register.
//!
//! Bit layout of the x86 flags word, plus the flag computations for the
//! arithmetic the executor implements. Only Carry, Zero and Overflow are ever
//! produced; the remaining bits are defined so that traces and tests can name
//! them.

use bitflags::bitflags;

bitflags! {
    /// The x86-64 RFLAGS word.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RFlags: u64 {
        /// CF: unsigned overflow out of the most significant bit.
        const CARRY = 1 << 0;
        /// PF: even parity of the low result byte.
        const PARITY = 1 << 2;
        /// AF: carry out of bit 3.
        const AUX_CARRY = 1 << 4;
        /// ZF: result was zero.
        const ZERO = 1 << 6;
        /// SF: most significant bit of the result.
        const SIGN = 1 << 7;
        /// TF: single-step trap.
        const TRAP = 1 << 8;
        /// IF: maskable interrupts enabled.
        const INTERRUPT = 1 << 9;
        /// DF: string operations decrement.
        const DIRECTION = 1 << 10;
        /// OF: signed overflow.
        const OVERFLOW = 1 << 11;
        /// IOPL: two-bit I/O privilege level.
        const IOPL = 0b11 << 12;
        /// NT: nested task.
        const NESTED_TASK = 1 << 14;
    }
}

impl RFlags {
    /// Flags after `CMP a, b`: Zero iff the operands are equal, nothing else.
    #[inline]
    pub fn compare(a: u32, b: u32) -> Self {
        if a == b { Self::ZERO } else { Self::empty() }
    }

    /// Result and flags of a 32-bit `a + b`.
    ///
    /// Carry is the unsigned overflow, Overflow is set when both operands
    /// share a sign the result does not, and Zero reflects the truncated result.
    pub fn add32(a: u32, b: u32) -> (u32, Self) {
        let (result, carry) = a.overflowing_add(b);
        let mut flags = Self::empty();
        flags.set(Self::CARRY, carry);
        flags.set(Self::ZERO, result == 0);
        flags.set(Self::OVERFLOW, ((a ^ result) & (b ^ result)) & 0x8000_0000 != 0);
        (result, flags)
    }
}
