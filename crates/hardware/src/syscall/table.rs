//! Interrupt and syscall dispatch.
//!
//! Both tables are built once per CPU and are immutable afterwards. Handlers
//! are plain function pointers so they can be copied out of the table before
//! being called with the CPU that owns it.

use std::collections::BTreeMap;

use tracing::trace;

use crate::common::{EmuError, Result, VirtAddr};
use crate::core::Cpu;
use crate::core::arch::Reg;
use crate::isa::opcodes::INT_SYSCALL;

/// Interrupt handler, called with the CPU and the address of the vector byte.
pub type InterruptFn = fn(&mut Cpu, VirtAddr) -> Result<()>;

/// Syscall implementation.
pub type SyscallFn = fn(&mut Cpu) -> Result<()>;

/// `exit(status)`.
pub const SYS_EXIT: u32 = 0x01;
/// `read(fd, buf, count)`.
pub const SYS_READ: u32 = 0x03;
/// `write(fd, buf, count)`.
pub const SYS_WRITE: u32 = 0x04;

/// Software interrupt vectors.
#[derive(Clone, Debug)]
pub struct InterruptTable {
    handlers: BTreeMap<u8, InterruptFn>,
}

impl Default for InterruptTable {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptTable {
    /// Table with the syscall gate at `0x80`.
    pub fn new() -> Self {
        let mut handlers = BTreeMap::new();
        let _ = handlers.insert(INT_SYSCALL, syscall_gate as InterruptFn);
        Self { handlers }
    }

    /// Handler for `vector`.
    ///
    /// # Errors
    ///
    /// [`EmuError::InvalidInstruction`] if the vector has no handler;
    /// `at` is the address of the vector byte.
    pub fn lookup(&self, vector: u8, at: VirtAddr) -> Result<InterruptFn> {
        self.handlers
            .get(&vector)
            .copied()
            .ok_or(EmuError::InvalidInstruction {
                address: at.val(),
                byte: vector,
                reason: "no handler for interrupt vector",
            })
    }
}

/// Syscall numbers and their implementations.
#[derive(Clone, Debug)]
pub struct SyscallTable {
    entries: BTreeMap<u32, (&'static str, SyscallFn)>,
}

impl Default for SyscallTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SyscallTable {
    /// Table with exit, read and write.
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        let _ = entries.insert(SYS_EXIT, ("exit", sys_exit as SyscallFn));
        let _ = entries.insert(SYS_READ, ("read", sys_read as SyscallFn));
        let _ = entries.insert(SYS_WRITE, ("write", sys_write as SyscallFn));
        Self { entries }
    }

    /// Name and implementation of syscall `number`.
    ///
    /// # Errors
    ///
    /// [`EmuError::UnsupportedFeature`] for an unmapped number.
    pub fn lookup(&self, number: u32) -> Result<(&'static str, SyscallFn)> {
        self.entries
            .get(&number)
            .copied()
            .ok_or_else(|| EmuError::unsupported(format!("syscall {number:#x}")))
    }
}

/// `INT 0x80`: dispatch on eax.
fn syscall_gate(cpu: &mut Cpu, _at: VirtAddr) -> Result<()> {
    let number = cpu.regs.read32(Reg::Rax);
    let (name, handler) = cpu.syscalls().lookup(number)?;
    trace!(
        name,
        ebx = cpu.regs.read32(Reg::Rbx),
        ecx = cpu.regs.read32(Reg::Rcx),
        edx = cpu.regs.read32(Reg::Rdx),
        "syscall"
    );
    cpu.stats.record_syscall(name);
    handler(cpu)
}

/// Halts the CPU after the current instruction. ebx is kept as the exit status.
#[allow(clippy::unnecessary_wraps)]
fn sys_exit(cpu: &mut Cpu) -> Result<()> {
    let status = cpu.regs.read32(Reg::Rbx);
    cpu.halt(status);
    Ok(())
}

/// Reads up to edx bytes into memory at ecx, one byte at a time.
///
/// Stops early at end of input. eax receives the number of bytes stored.
/// The file descriptor in ebx is ignored; input always comes from the host
/// I/O capability.
fn sys_read(cpu: &mut Cpu) -> Result<()> {
    let buf = VirtAddr::new(u64::from(cpu.regs.read32(Reg::Rcx)));
    let count = cpu.regs.read32(Reg::Rdx);
    let mut stored = 0u32;
    while stored < count {
        let Some(byte) = cpu.io_mut().read_byte()? else {
            break;
        };
        cpu.memory
            .write(buf.wrapping_offset(i64::from(stored)), &[byte])?;
        stored += 1;
    }
    cpu.regs.write32(Reg::Rax, stored);
    Ok(())
}

/// Writes edx bytes from memory at ecx. eax receives the count.
///
/// The file descriptor in ebx is ignored; output always goes to the host
/// I/O capability.
fn sys_write(cpu: &mut Cpu) -> Result<()> {
    let buf = VirtAddr::new(u64::from(cpu.regs.read32(Reg::Rcx)));
    let count = cpu.regs.read32(Reg::Rdx);
    let bytes = cpu.memory.read(buf, count as usize)?;
    cpu.io_mut().write(&bytes)?;
    cpu.regs.write32(Reg::Rax, count);
    Ok(())
}
