//! ELF loading and program setup.
//!
//! Parses ELF64 files, extracts their loadable segments into pages, and
//! wraps a loaded program and its CPU into a runnable [`Simulator`].

pub mod elf;
pub mod loader;
pub mod reader;
pub mod simulator;
pub mod symbols;

pub use elf::Elf;
pub use simulator::Simulator;
