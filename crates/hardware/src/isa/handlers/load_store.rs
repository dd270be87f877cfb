//! MOV forms.

use crate::common::{Result, VirtAddr};
use crate::core::Cpu;
use crate::core::arch::{RFlags, Reg};
use crate::isa::modrm::{ModRm, Operand, absolute_register};
use crate::isa::opcodes::MOV_R_IMM32;

/// Decodes the ModR/M, SIB and disp32 of an absolute MOV.
///
/// The displacement is a 32-bit absolute address, zero-extended.
fn absolute_operands(cpu: &mut Cpu) -> Result<(Reg, Operand)> {
    let modrm = ModRm(cpu.next_u8()?);
    let sib = if !modrm.is_register() && modrm.rm() == 0b100 {
        Some(cpu.next_u8()?)
    } else {
        None
    };
    let reg = absolute_register(modrm, sib)?;
    let addr = VirtAddr::new(u64::from(cpu.next_u32()?));
    Ok((reg, Operand::Memory(addr)))
}

/// `89 /r`: store the low 32 bits of a register.
///
/// # Errors
///
/// [`EmuError::UnsupportedFeature`](crate::common::EmuError::UnsupportedFeature)
/// for unmodeled addressing forms, or the memory error of the store.
pub fn mov_rm_r(cpu: &mut Cpu, _opcode: u8) -> Result<RFlags> {
    let (reg, dst) = absolute_operands(cpu)?;
    let val = cpu.read_operand(Operand::Register(reg))?;
    cpu.write_operand(dst, val)?;
    Ok(cpu.rflags)
}

/// `8B /r`: load 32 bits into a register.
///
/// # Errors
///
/// As for [`mov_rm_r`], with the memory error of the load.
pub fn mov_r_rm(cpu: &mut Cpu, _opcode: u8) -> Result<RFlags> {
    let (reg, src) = absolute_operands(cpu)?;
    let val = cpu.read_operand(src)?;
    cpu.write_operand(Operand::Register(reg), val)?;
    Ok(cpu.rflags)
}

/// `B8+rd id`: load an immediate into one of the eight registers.
pub fn mov_r_imm32(cpu: &mut Cpu, opcode: u8) -> Result<RFlags> {
    let reg = Reg::from_bits(opcode - MOV_R_IMM32);
    let imm = cpu.next_u32()?;
    cpu.regs.write32(reg, imm);
    Ok(cpu.rflags)
}
