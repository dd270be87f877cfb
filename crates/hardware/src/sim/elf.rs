//! ELF64 data model.
//!
//! Value records for the file header, program headers, section headers and
//! symbols, as produced by the [`reader`](super::reader). Numeric fields keep
//! their on-disk width; enumerated fields decode into Rust enums that retain
//! unknown values instead of rejecting them, since only a handful of them
//! matter to execution.

use bitflags::bitflags;

use crate::memory::Permissions;

/// `e_ident`: the first 16 bytes of the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ident {
    /// `EI_MAG0..EI_MAG3`.
    pub magic: [u8; 4],
    /// `EI_CLASS`: 1 for 32-bit, 2 for 64-bit.
    pub class: u8,
    /// `EI_DATA`: 1 for little-endian, 2 for big-endian.
    pub data: u8,
    /// `EI_VERSION`.
    pub version: u8,
    /// `EI_OSABI`.
    pub os_abi: u8,
    /// `EI_ABIVERSION`.
    pub abi_version: u8,
    /// `EI_PAD`: seven reserved bytes.
    pub pad: [u8; 7],
}

/// `e_type`: object file type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileType {
    /// `ET_NONE`.
    None,
    /// `ET_REL`: relocatable object.
    Relocatable,
    /// `ET_EXEC`: executable.
    Executable,
    /// `ET_DYN`: shared object or PIE.
    SharedObject,
    /// `ET_CORE`: core dump.
    Core,
    /// OS- or processor-specific value.
    Other(u16),
}

impl From<u16> for FileType {
    fn from(raw: u16) -> Self {
        match raw {
            0 => Self::None,
            1 => Self::Relocatable,
            2 => Self::Executable,
            3 => Self::SharedObject,
            4 => Self::Core,
            other => Self::Other(other),
        }
    }
}

/// The ELF64 file header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElfHeader {
    /// Identification bytes.
    pub ident: Ident,
    /// `e_type`.
    pub file_type: FileType,
    /// `e_machine`; 62 is x86-64.
    pub machine: u16,
    /// `e_version`.
    pub version: u32,
    /// `e_entry`: virtual address of the first instruction.
    pub entry: u64,
    /// `e_phoff`: file offset of the program header table.
    pub phoff: u64,
    /// `e_shoff`: file offset of the section header table.
    pub shoff: u64,
    /// `e_flags`.
    pub flags: u32,
    /// `e_ehsize`.
    pub ehsize: u16,
    /// `e_phentsize`.
    pub phentsize: u16,
    /// `e_phnum`.
    pub phnum: u16,
    /// `e_shentsize`.
    pub shentsize: u16,
    /// `e_shnum`.
    pub shnum: u16,
    /// `e_shstrndx`: index of the section name string table.
    pub shstrndx: u16,
}

/// `p_type`: segment kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentType {
    /// `PT_NULL`.
    Null,
    /// `PT_LOAD`: mapped into memory.
    Load,
    /// `PT_DYNAMIC`.
    Dynamic,
    /// `PT_INTERP`.
    Interp,
    /// `PT_NOTE`.
    Note,
    /// `PT_SHLIB`.
    Shlib,
    /// `PT_PHDR`.
    Phdr,
    /// `PT_TLS`.
    Tls,
    /// OS- or processor-specific value (e.g. `PT_GNU_STACK`).
    Other(u32),
}

impl From<u32> for SegmentType {
    fn from(raw: u32) -> Self {
        match raw {
            0 => Self::Null,
            1 => Self::Load,
            2 => Self::Dynamic,
            3 => Self::Interp,
            4 => Self::Note,
            5 => Self::Shlib,
            6 => Self::Phdr,
            7 => Self::Tls,
            other => Self::Other(other),
        }
    }
}

/// One ELF64 program header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgramHeader {
    /// `p_type`.
    pub segment_type: SegmentType,
    /// `p_flags`; the bit layout matches [`Permissions`].
    pub flags: u32,
    /// `p_offset`: file offset of the segment's bytes.
    pub offset: u64,
    /// `p_vaddr`: virtual address to map at.
    pub vaddr: u64,
    /// `p_paddr`.
    pub paddr: u64,
    /// `p_filesz`: bytes present in the file.
    pub filesz: u64,
    /// `p_memsz`: bytes occupied in memory.
    pub memsz: u64,
    /// `p_align`.
    pub align: u64,
}

impl ProgramHeader {
    /// Access permissions encoded in `p_flags`. OS/processor bits are dropped.
    pub const fn permissions(&self) -> Permissions {
        Permissions::from_bits_truncate(self.flags)
    }
}

/// `sh_type`: section kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionType {
    /// `SHT_NULL`.
    Null,
    /// `SHT_PROGBITS`: program-defined contents.
    Progbits,
    /// `SHT_SYMTAB`: symbol table.
    Symtab,
    /// `SHT_STRTAB`: string table.
    Strtab,
    /// `SHT_RELA`.
    Rela,
    /// `SHT_HASH`.
    Hash,
    /// `SHT_DYNAMIC`.
    Dynamic,
    /// `SHT_NOTE`.
    Note,
    /// `SHT_NOBITS`: occupies no file space (`.bss`).
    Nobits,
    /// `SHT_REL`.
    Rel,
    /// `SHT_DYNSYM`.
    Dynsym,
    /// Any other value.
    Other(u32),
}

impl From<u32> for SectionType {
    fn from(raw: u32) -> Self {
        match raw {
            0 => Self::Null,
            1 => Self::Progbits,
            2 => Self::Symtab,
            3 => Self::Strtab,
            4 => Self::Rela,
            5 => Self::Hash,
            6 => Self::Dynamic,
            7 => Self::Note,
            8 => Self::Nobits,
            9 => Self::Rel,
            11 => Self::Dynsym,
            other => Self::Other(other),
        }
    }
}

bitflags! {
    /// `sh_flags`. Unknown bits are retained.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SectionFlags: u64 {
        /// `SHF_WRITE`.
        const WRITE = 1 << 0;
        /// `SHF_ALLOC`.
        const ALLOC = 1 << 1;
        /// `SHF_EXECINSTR`.
        const EXECINSTR = 1 << 2;
        /// `SHF_MERGE`.
        const MERGE = 1 << 4;
        /// `SHF_STRINGS`.
        const STRINGS = 1 << 5;
        /// `SHF_INFO_LINK`.
        const INFO_LINK = 1 << 6;
        /// `SHF_LINK_ORDER`.
        const LINK_ORDER = 1 << 7;
        /// `SHF_OS_NONCONFORMING`.
        const OS_NONCONFORMING = 1 << 8;
        /// `SHF_GROUP`.
        const GROUP = 1 << 9;
        /// `SHF_TLS`.
        const TLS = 1 << 10;
        /// `SHF_COMPRESSED`: contents are compressed; not supported.
        const COMPRESSED = 1 << 11;
        /// `SHF_GNU_RETAIN`.
        const GNU_RETAIN = 1 << 21;
        /// `SHF_EXCLUDE`.
        const EXCLUDE = 1 << 31;
    }
}

/// One ELF64 section header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionHeader {
    /// `sh_name`: offset of the name in the section name string table.
    pub name: u32,
    /// `sh_type`.
    pub section_type: SectionType,
    /// `sh_flags`.
    pub flags: SectionFlags,
    /// `sh_addr`.
    pub addr: u64,
    /// `sh_offset`.
    pub offset: u64,
    /// `sh_size`.
    pub size: u64,
    /// `sh_link`; for a symbol table, the index of its string table.
    pub link: u32,
    /// `sh_info`.
    pub info: u32,
    /// `sh_addralign`.
    pub addralign: u64,
    /// `sh_entsize`.
    pub entsize: u64,
}

/// One ELF64 symbol table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Symbol {
    /// `st_name`: offset of the name in the linked string table.
    pub name: u32,
    /// `st_info`: binding in the high nibble, type in the low nibble.
    pub info: u8,
    /// `st_other`: visibility.
    pub other: u8,
    /// `st_shndx`: index of the section the symbol is defined in.
    pub shndx: u16,
    /// `st_value`.
    pub value: u64,
    /// `st_size`.
    pub size: u64,
}

impl Symbol {
    /// `ELF64_ST_BIND`: 0 local, 1 global, 2 weak.
    pub const fn binding(&self) -> u8 {
        self.info >> 4
    }

    /// `ELF64_ST_TYPE`: 0 none, 1 object, 2 function, 3 section, 4 file.
    pub const fn kind(&self) -> u8 {
        self.info & 0xF
    }
}

/// A parsed ELF64 file: header plus both header tables in on-disk order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Elf {
    /// File header.
    pub header: ElfHeader,
    /// Program headers in table order.
    pub program_headers: Vec<ProgramHeader>,
    /// Section headers in table order.
    pub section_headers: Vec<SectionHeader>,
}
