//! Stack and Operand Access.
//!
//! This module connects the executor to the register file and the virtual memory:
//! 1. **Stack:** 32-bit push and pop through rsp.
//! 2. **Operands:** 32-bit reads and writes of a decoded register or memory operand.

use super::Cpu;
use crate::common::constants::STACK_SLOT;
use crate::common::{Result, VirtAddr};
use crate::core::arch::Reg;
use crate::isa::Operand;

impl Cpu {
    /// Writes `val` at `rsp - 4`, then lowers rsp by 4.
    ///
    /// # Errors
    ///
    /// The memory error of the store; rsp is unchanged on failure.
    pub fn push32(&mut self, val: u32) -> Result<()> {
        let sp = self.regs.read64(Reg::Rsp).wrapping_sub(STACK_SLOT);
        self.memory.write_u32(VirtAddr::new(sp), val)?;
        self.regs.write64(Reg::Rsp, sp);
        Ok(())
    }

    /// Reads the value at rsp, then raises rsp by 4.
    ///
    /// # Errors
    ///
    /// The memory error of the load; rsp is unchanged on failure.
    pub fn pop32(&mut self) -> Result<u32> {
        let sp = self.regs.read64(Reg::Rsp);
        let val = self.memory.read_u32(VirtAddr::new(sp))?;
        self.regs.write64(Reg::Rsp, sp.wrapping_add(STACK_SLOT));
        Ok(val)
    }

    /// Reads a 32-bit operand.
    ///
    /// # Errors
    ///
    /// The memory error of the load for a memory operand.
    pub fn read_operand(&self, op: Operand) -> Result<u32> {
        match op {
            Operand::Register(reg) => Ok(self.regs.read32(reg)),
            Operand::Memory(addr) => self.memory.read_u32(addr),
        }
    }

    /// Writes a 32-bit operand. Register writes zero the upper half.
    ///
    /// # Errors
    ///
    /// The memory error of the store for a memory operand.
    pub fn write_operand(&mut self, op: Operand, val: u32) -> Result<()> {
        match op {
            Operand::Register(reg) => {
                self.regs.write32(reg, val);
                Ok(())
            }
            Operand::Memory(addr) => self.memory.write_u32(addr, val),
        }
    }
}
