//! Simulator: a loaded program and the CPU running it.
//!
//! Ties the pieces together: parse the ELF, read its segments, add the stack
//! page, build the CPU at the entry point, then cycle until `exit`.

use std::io::{Read, Seek};
use std::path::Path;

use tracing::{debug, info};

use super::elf::Elf;
use super::loader::{build_memory, load_binary, read_segments};
use super::reader;
use crate::common::{Result, VirtAddr};
use crate::config::Config;
use crate::core::Cpu;
use crate::core::cpu::CycleOutcome;
use crate::stats::ExecStats;
use crate::syscall::{HostIo, StdIo};

/// Top-level simulator: parsed headers plus CPU state.
#[derive(Debug)]
pub struct Simulator {
    /// CPU architectural state, memory and statistics.
    pub cpu: Cpu,
    /// Headers of the loaded program.
    pub elf: Elf,
}

impl Simulator {
    /// Loads a program from `r` and prepares a CPU at its entry point.
    ///
    /// # Arguments
    ///
    /// * `r` - ELF64 source.
    /// * `config` - Stack placement and tracing.
    /// * `io` - Host I/O for the `read` and `write` syscalls.
    ///
    /// # Errors
    ///
    /// Any parse, segment or mapping error.
    pub fn load<R: Read + Seek>(
        r: &mut R,
        config: &Config,
        io: Box<dyn HostIo + Send>,
    ) -> Result<Self> {
        let elf = reader::load(r)?;
        Self::from_elf(elf, r, config, io)
    }

    /// Like [`Simulator::load`], for headers that were already parsed from `r`.
    ///
    /// # Errors
    ///
    /// Any segment or mapping error.
    pub fn from_elf<R: Read + Seek>(
        elf: Elf,
        r: &mut R,
        config: &Config,
        io: Box<dyn HostIo + Send>,
    ) -> Result<Self> {
        let pages = read_segments(&elf, r)?;
        let memory = build_memory(pages, config)?;
        let entry = VirtAddr::new(elf.header.entry);
        let mut cpu = Cpu::with_io(memory, entry, io);
        cpu.trace = config.general.trace_instructions;
        debug!(entry = %entry, pages = cpu.memory.len(), "program loaded");
        Ok(Self { cpu, elf })
    }

    /// Loads the ELF file at `path` with the host's stdin and stdout.
    ///
    /// # Errors
    ///
    /// As for [`Simulator::load`], plus failure to open the file.
    pub fn from_path(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let (elf, mut file) = load_binary(path)?;
        Self::from_elf(elf, &mut file, config, Box::new(StdIo))
    }

    /// Advances by one instruction.
    ///
    /// # Errors
    ///
    /// Whatever the cycle raises.
    pub fn step(&mut self) -> Result<CycleOutcome> {
        self.cpu.cycle()
    }

    /// Runs until the program exits.
    ///
    /// # Errors
    ///
    /// The first error any cycle raises; execution stops there.
    pub fn run(&mut self) -> Result<&ExecStats> {
        while self.step()? == CycleOutcome::Continue {}
        info!(
            cycles = self.cpu.stats.cycles,
            status = ?self.cpu.exit_code,
            "program exited"
        );
        Ok(&self.cpu.stats)
    }

    /// Retrieves the exit status if the program has finished.
    pub const fn exit_code(&self) -> Option<u32> {
        self.cpu.exit_code
    }
}
