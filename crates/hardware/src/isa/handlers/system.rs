//! NOP and software interrupts.

use crate::common::Result;
use crate::core::Cpu;
use crate::core::arch::RFlags;

/// `90`.
#[allow(clippy::unnecessary_wraps)]
pub fn nop(cpu: &mut Cpu, _opcode: u8) -> Result<RFlags> {
    Ok(cpu.rflags)
}

/// `CD ib`: raise software interrupt `ib`.
///
/// # Errors
///
/// [`EmuError::InvalidInstruction`](crate::common::EmuError::InvalidInstruction)
/// for a vector with no handler, or whatever the handler raises.
pub fn int_imm8(cpu: &mut Cpu, _opcode: u8) -> Result<RFlags> {
    let at = cpu.rip;
    let vector = cpu.next_u8()?;
    cpu.interrupt(vector, at)?;
    Ok(cpu.rflags)
}
