//! Jumps, calls and returns.
//!
//! Relative displacements are sign-extended and added to the address of the
//! next instruction with wraparound. None of these touch the flags.

use crate::common::sign::{unsigned_to_signed_8, unsigned_to_signed_32};
use crate::common::{Result, VirtAddr};
use crate::core::Cpu;
use crate::core::arch::RFlags;

/// `74 cb`: jump if Zero is set.
pub fn je_rel8(cpu: &mut Cpu, _opcode: u8) -> Result<RFlags> {
    let disp = unsigned_to_signed_8(cpu.next_u8()?);
    if cpu.rflags.contains(RFlags::ZERO) {
        cpu.rip = cpu.rip.wrapping_offset(i64::from(disp));
    }
    Ok(cpu.rflags)
}

/// `EB cb`: unconditional short jump.
pub fn jmp_rel8(cpu: &mut Cpu, _opcode: u8) -> Result<RFlags> {
    let disp = unsigned_to_signed_8(cpu.next_u8()?);
    cpu.rip = cpu.rip.wrapping_offset(i64::from(disp));
    Ok(cpu.rflags)
}

/// `E8 cd`: push the return address as a 32-bit value, then jump.
///
/// # Errors
///
/// Whatever the stack push raises.
pub fn call_rel32(cpu: &mut Cpu, _opcode: u8) -> Result<RFlags> {
    let disp = unsigned_to_signed_32(cpu.next_u32()?);
    let ret = cpu.rip;
    cpu.push32(ret.val() as u32)?;
    cpu.rip = ret.wrapping_offset(i64::from(disp));
    Ok(cpu.rflags)
}

/// `C3`: pop a 32-bit return address into rip.
///
/// # Errors
///
/// Whatever the stack pop raises.
pub fn ret(cpu: &mut Cpu, _opcode: u8) -> Result<RFlags> {
    cpu.rip = VirtAddr::new(u64::from(cpu.pop32()?));
    Ok(cpu.rflags)
}
