//! Execution statistics collection and reporting.
//!
//! Tracks what a run did. It provides:
//! 1. **Cycles:** Fetch-decode-execute cycles completed.
//! 2. **Instruction mix:** Counts per mnemonic.
//! 3. **Syscalls:** Counts per serviced syscall.

use std::collections::BTreeMap;
use std::time::Instant;

/// Statistics for one emulated program.
#[derive(Clone, Debug)]
pub struct ExecStats {
    start_time: Instant,
    /// Cycles completed, including the one that serviced `exit`.
    pub cycles: u64,
    /// Executed instructions per mnemonic.
    pub by_mnemonic: BTreeMap<&'static str, u64>,
    /// Serviced syscalls per name.
    pub syscalls: BTreeMap<&'static str, u64>,
}

impl Default for ExecStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            by_mnemonic: BTreeMap::new(),
            syscalls: BTreeMap::new(),
        }
    }
}

impl ExecStats {
    /// Records one executed instruction.
    pub fn record_instruction(&mut self, mnemonic: &'static str) {
        self.cycles += 1;
        *self.by_mnemonic.entry(mnemonic).or_insert(0) += 1;
    }

    /// Records one serviced syscall.
    pub fn record_syscall(&mut self, name: &'static str) {
        *self.syscalls.entry(name).or_insert(0) += 1;
    }

    /// Executed count for `mnemonic`, zero if it never ran.
    pub fn count(&self, mnemonic: &str) -> u64 {
        self.by_mnemonic.get(mnemonic).copied().unwrap_or(0)
    }

    /// Prints the summary to stdout.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        println!("\n==========================================================");
        println!("EXECUTION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {seconds:.4} s");
        println!("sim_cycles               {}", self.cycles);
        println!("----------------------------------------------------------");
        println!("INSTRUCTION MIX");
        for (mnemonic, count) in &self.by_mnemonic {
            println!("  {mnemonic:<22} {count}");
        }
        if !self.syscalls.is_empty() {
            println!("SYSCALLS");
            for (name, count) in &self.syscalls {
                println!("  {name:<22} {count}");
            }
        }
        println!("==========================================================");
    }
}
