//! Global Constants.
//!
//! This module defines the constants shared across the emulator. It includes:
//! 1. **ELF Layout:** Magic bytes, identification values and fixed record sizes.
//! 2. **ELF Flags:** Sentinels and flags the loader must reject.
//! 3. **Stack Placement:** Default location and size of the synthesized stack page.

/// ELF magic number (`\x7FELF`).
pub const ELF_MAGIC: [u8; 4] = [0x7F, b'E', b'L', b'F'];

/// `EI_CLASS` value for 32-bit objects.
pub const ELFCLASS32: u8 = 1;

/// `EI_CLASS` value for 64-bit objects.
pub const ELFCLASS64: u8 = 2;

/// `EI_DATA` value for little-endian (two's complement) encoding.
pub const ELFDATA2LSB: u8 = 1;

/// `EI_DATA` value for big-endian encoding.
pub const ELFDATA2MSB: u8 = 2;

/// `e_machine` value for AMD x86-64.
pub const EM_X86_64: u16 = 62;

/// `e_version` / `EI_VERSION` value for the current ELF version.
pub const EV_CURRENT: u32 = 1;

/// Size of the ELF64 file header in bytes.
pub const ELF64_EHDR_SIZE: u16 = 64;

/// Size of one ELF64 program header record in bytes.
pub const ELF64_PHDR_SIZE: u16 = 56;

/// Size of one ELF64 section header record in bytes.
pub const ELF64_SHDR_SIZE: u16 = 64;

/// Size of one ELF64 symbol table entry in bytes.
pub const ELF64_SYM_SIZE: u64 = 24;

/// `e_phnum` sentinel: the real count lives in section header 0.
pub const PN_XNUM: u16 = 0xFFFF;

/// `e_shstrndx` sentinel: the real index lives in section header 0.
pub const SHN_XINDEX: u16 = 0xFFFF;

/// Base address of the synthesized stack page.
pub const STACK_BASE: u64 = 0xFFFF_FFFF;

/// Size of the synthesized stack page in bytes (4 KiB).
pub const STACK_SIZE: u64 = 4096;

/// Largest page the loader or the stack configuration may request (256 MiB).
pub const MAX_PAGE_SIZE: u64 = 1 << 28;

/// Width in bytes of a stack slot pushed by `CALL` and popped by `RET`.
pub const STACK_SLOT: u64 = 4;
