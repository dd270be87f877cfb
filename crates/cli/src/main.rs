//! elfx86 command-line driver.
//!
//! This binary loads ELF64 programs and runs them on the emulator. It performs:
//! 1. **Enumeration:** Expands each path argument; directories contribute their regular files in sorted order.
//! 2. **Introspection:** With `--sections`, lists section names and symbols before running.
//! 3. **Execution:** Runs every program to completion and prints its statistics.
//!
//! A failing program is reported and the driver moves on to the next; the
//! exit status is non-zero if any program failed.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::{fs, process};
use tracing_subscriber::EnvFilter;

use elfx86_core::Simulator;
use elfx86_core::config::Config;
use elfx86_core::sim::loader;
use elfx86_core::sim::symbols;
use elfx86_core::syscall::StdIo;

#[derive(Parser, Debug)]
#[command(
    name = "elfx86",
    author,
    version,
    about = "ELF64 loader and x86-64 subset emulator",
    long_about = "Load 64-bit ELF executables and run them on a small x86-64 interpreter.\n\nExamples:\n  elfx86 run ./hello\n  elfx86 run --sections --trace ./programs/"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one or more programs. Directories are scanned for files.
    Run {
        /// ELF files or directories containing them.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// List section names and symbols before running.
        #[arg(long)]
        sections: bool,

        /// Print every executed instruction to stderr.
        #[arg(long)]
        trace: bool,

        /// JSON configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            paths,
            sections,
            trace,
            config,
        } => {
            init_tracing(trace);
            let mut config = match config.as_deref().map(load_config).transpose() {
                Ok(config) => config.unwrap_or_default(),
                Err(e) => {
                    eprintln!("\n[!] FATAL: {e}");
                    process::exit(1);
                }
            };
            config.general.trace_instructions |= trace;
            cmd_run(&paths, sections, &config);
        }
    }
}

/// Installs the `tracing` subscriber. `RUST_LOG` wins over the defaults.
fn init_tracing(trace: bool) {
    let default = if trace { "trace" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: &Path) -> Result<Config, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Could not read config '{}': {e}", path.display()))?;
    Config::from_json(&text).map_err(|e| format!("Config '{}': {e}", path.display()))
}

/// Expands directories into their regular files, sorted by name.
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .map_err(|e| format!("Could not list '{}': {e}", path.display()))?;
            let mut found: Vec<PathBuf> = entries
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file())
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

/// Runs every program, reporting failures and continuing past them.
fn cmd_run(paths: &[PathBuf], sections: bool, config: &Config) {
    let files = collect_files(paths).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: {e}");
        process::exit(1);
    });

    let mut failed = 0usize;
    for file in &files {
        println!("Processing {}", file.display());
        if let Err(e) = run_one(file, sections, config) {
            eprintln!("[!] {}: {e}", file.display());
            failed += 1;
        }
    }

    if failed > 0 {
        eprintln!("\n[!] {failed} of {} programs failed", files.len());
        process::exit(1);
    }
}

fn run_one(path: &Path, sections: bool, config: &Config) -> elfx86_core::Result<()> {
    let (elf, mut file) = loader::load_binary(path)?;

    if sections {
        println!("Sections:");
        for (i, name) in symbols::section_names(&elf, &mut file)?.iter().enumerate() {
            println!("  [{i:2}] {name}");
        }
        let syms = symbols::read_symbols(&elf, &mut file)?;
        if !syms.is_empty() {
            println!("Symbols:");
            for (sym, name) in &syms {
                println!("  {:#018x} {:>6} {name}", sym.value, sym.size);
            }
        }
    }

    let mut sim = Simulator::from_elf(elf, &mut file, config, Box::new(StdIo))?;
    if let Err(e) = sim.run().map(|_| ()) {
        sim.cpu.dump_state();
        sim.cpu.stats.print();
        return Err(e);
    }
    sim.cpu.stats.print();
    println!("[*] Exit code {}", sim.exit_code().unwrap_or(0));
    Ok(())
}
