//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, which serves as the container for the
//! entire processor state. It coordinates the following:
//! 1. **State Management:** Maintains registers, segment selectors, flags and rip.
//! 2. **Memory:** Owns the program's virtual memory exclusively.
//! 3. **Dispatch:** Owns the opcode, interrupt and syscall tables, built once at construction.
//! 4. **Host Integration:** Holds the host I/O capability the syscalls use.

/// Fetch, decode and execute.
pub mod execution;

/// Stack and operand access.
pub mod memory;

use std::fmt;

use crate::common::{Result, VirtAddr};
use crate::core::arch::{Gpr, RFlags, Reg, SegmentSelectors};
use crate::isa::OpcodeTable;
use crate::memory::{PageKey, VirtualMemory};
use crate::stats::ExecStats;
use crate::syscall::{HostIo, InterruptTable, StdIo, SyscallTable};

pub use execution::{CycleOutcome, Decoded};

/// Position of the instruction being executed: a page and an offset into it.
///
/// Valid for one cycle only; cleared when the cycle ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    /// Page holding the instruction.
    pub page: PageKey,
    /// Offset of the next unread byte from the page base.
    pub offset: usize,
}

/// Main CPU structure containing all processor state.
///
/// One CPU runs one program over one [`VirtualMemory`], which it owns.
pub struct Cpu {
    /// General-purpose registers.
    pub regs: Gpr,
    /// Segment selectors. Carried but never consulted.
    pub segments: SegmentSelectors,
    /// Flags register.
    pub rflags: RFlags,
    /// Instruction pointer.
    pub rip: VirtAddr,
    /// The program's address space.
    pub memory: VirtualMemory,
    /// Print one line per executed instruction to stderr.
    pub trace: bool,
    /// Execution statistics.
    pub stats: ExecStats,
    /// Status passed to `exit`, once the program has exited.
    pub exit_code: Option<u32>,

    cursor: Option<Cursor>,
    opcodes: OpcodeTable,
    interrupts: InterruptTable,
    syscalls: SyscallTable,
    io: Box<dyn HostIo + Send>,
}

impl fmt::Debug for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cpu")
            .field("regs", &self.regs)
            .field("rflags", &self.rflags)
            .field("rip", &self.rip)
            .field("exit_code", &self.exit_code)
            .field("pages", &self.memory.len())
            .finish_non_exhaustive()
    }
}

impl Cpu {
    /// Creates a CPU over `memory` that starts at `entry`, using the host's
    /// stdin and stdout.
    pub fn new(memory: VirtualMemory, entry: VirtAddr) -> Self {
        Self::with_io(memory, entry, Box::new(StdIo))
    }

    /// Creates a CPU over `memory` that starts at `entry`.
    ///
    /// # Arguments
    ///
    /// * `memory` - The program's pages, stack included.
    /// * `entry` - Initial rip.
    /// * `io` - Where `read` and `write` go.
    ///
    /// # Returns
    ///
    /// A CPU with zeroed registers and flags and rsp at the top of the
    /// highest-addressed page.
    pub fn with_io(memory: VirtualMemory, entry: VirtAddr, io: Box<dyn HostIo + Send>) -> Self {
        let mut regs = Gpr::new();
        regs.write64(Reg::Rsp, memory.top().map_or(0, VirtAddr::val));
        Self {
            regs,
            segments: SegmentSelectors::default(),
            rflags: RFlags::empty(),
            rip: entry,
            memory,
            trace: false,
            stats: ExecStats::default(),
            exit_code: None,
            cursor: None,
            opcodes: OpcodeTable::new(),
            interrupts: InterruptTable::new(),
            syscalls: SyscallTable::new(),
            io,
        }
    }

    /// Stops execution after the current instruction.
    pub const fn halt(&mut self, status: u32) {
        self.exit_code = Some(status);
    }

    /// Whether `exit` has been serviced.
    pub const fn is_halted(&self) -> bool {
        self.exit_code.is_some()
    }

    /// Raises software interrupt `vector`; `at` is the address of the vector byte.
    ///
    /// # Errors
    ///
    /// [`EmuError::InvalidInstruction`](crate::common::EmuError::InvalidInstruction)
    /// for a vector with no handler, or whatever the handler raises.
    pub fn interrupt(&mut self, vector: u8, at: VirtAddr) -> Result<()> {
        let handler = self.interrupts.lookup(vector, at)?;
        handler(self, at)
    }

    /// The syscall table.
    pub const fn syscalls(&self) -> &SyscallTable {
        &self.syscalls
    }

    /// The host I/O capability.
    pub fn io_mut(&mut self) -> &mut (dyn HostIo + Send) {
        self.io.as_mut()
    }

    /// Current instruction cursor, present only while a cycle is running.
    pub const fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }

    /// Gives the address space back, consuming the CPU.
    pub fn into_memory(self) -> VirtualMemory {
        self.memory
    }

    /// Prints the register file, rip and flags to stdout.
    pub fn dump_state(&self) {
        println!("rip = {:#018x}  rflags = {:?}", self.rip.val(), self.rflags);
        self.regs.dump();
    }
}
