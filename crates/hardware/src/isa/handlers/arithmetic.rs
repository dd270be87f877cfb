//! Arithmetic instructions.

use crate::common::sign::unsigned_to_signed_8;
use crate::common::{EmuError, Result};
use crate::core::Cpu;
use crate::core::arch::RFlags;
use crate::isa::modrm::ModRm;
use crate::isa::opcodes::GRP1_ADD;

/// `39 /r`: `CMP r/m32, r32`.
///
/// The R/M field must name a register; the `mod` bits are not consulted.
/// Sets Zero when the two 32-bit values are equal and clears every other flag.
///
/// # Errors
///
/// [`EmuError::UnsupportedFeature`] when either the R/M or the `reg` field
/// is `100` or `101`.
pub fn cmp_rm_r(cpu: &mut Cpu, _opcode: u8) -> Result<RFlags> {
    let modrm = ModRm(cpu.next_u8()?);
    let lhs = cpu.regs.read32(modrm.rm_register()?);
    let rhs = cpu.regs.read32(modrm.reg_register()?);
    Ok(RFlags::compare(lhs, rhs))
}

/// `83 /ext ib`: group 1 with a sign-extended 8-bit immediate.
///
/// Only `/0` (ADD) on a register operand is implemented. The result is
/// written as a 32-bit value, zeroing the upper half of the register.
///
/// # Errors
///
/// - [`EmuError::InvalidInstruction`] if the ModR/M byte is not a register form.
/// - [`EmuError::UnsupportedFeature`] for any extension other than `/0`.
pub fn grp1_rm_imm8(cpu: &mut Cpu, _opcode: u8) -> Result<RFlags> {
    let at = cpu.rip;
    let modrm = ModRm(cpu.next_u8()?);
    if !modrm.is_register() {
        return Err(EmuError::InvalidInstruction {
            address: at.val(),
            byte: modrm.0,
            reason: "opcode 0x83 requires a register operand (mod 11)",
        });
    }
    if modrm.reg() != GRP1_ADD {
        return Err(EmuError::unsupported(format!(
            "opcode 0x83 extension /{} at {at}",
            modrm.reg()
        )));
    }
    let reg = modrm.rm_register()?;
    let imm = unsigned_to_signed_8(cpu.next_u8()?) as i32 as u32;
    let (result, flags) = RFlags::add32(cpu.regs.read32(reg), imm);
    cpu.regs.write32(reg, result);
    Ok(flags)
}
