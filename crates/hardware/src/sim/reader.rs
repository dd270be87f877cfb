//! ELF64 parser.
//!
//! Reads the file header and both header tables from any seekable byte
//! source. Fields are read in their on-disk order, little-endian. Structural
//! violations are [`EmuError::MalformedBinary`]; recognised forms this
//! emulator does not handle (32-bit class, big-endian data, extended header
//! counts, compressed sections) are [`EmuError::UnsupportedFeature`].

use std::io::{self, Read, Seek, SeekFrom};

use tracing::debug;

use super::elf::{
    Elf, ElfHeader, FileType, Ident, ProgramHeader, SectionFlags, SectionHeader, SegmentType,
};
use crate::common::constants::{
    ELF_MAGIC, ELF64_EHDR_SIZE, ELF64_PHDR_SIZE, ELF64_SHDR_SIZE, ELFCLASS32, ELFCLASS64,
    ELFDATA2LSB, ELFDATA2MSB, PN_XNUM, SHN_XINDEX,
};
use crate::common::{EmuError, Result};

/// Maps a short read to a malformed-binary error and keeps other I/O errors.
pub(crate) fn io_err(what: &str) -> impl FnOnce(io::Error) -> EmuError + '_ {
    move |e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            EmuError::malformed(format!("file truncated while reading {what}"))
        } else {
            EmuError::Io(e)
        }
    }
}

fn read_array<R: Read, const N: usize>(r: &mut R, what: &str) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf).map_err(io_err(what))?;
    Ok(buf)
}

pub(crate) fn read_u8<R: Read>(r: &mut R, what: &str) -> Result<u8> {
    read_array::<R, 1>(r, what).map(|b| b[0])
}

pub(crate) fn read_u16<R: Read>(r: &mut R, what: &str) -> Result<u16> {
    read_array(r, what).map(u16::from_le_bytes)
}

pub(crate) fn read_u32<R: Read>(r: &mut R, what: &str) -> Result<u32> {
    read_array(r, what).map(u32::from_le_bytes)
}

pub(crate) fn read_u64<R: Read>(r: &mut R, what: &str) -> Result<u64> {
    read_array(r, what).map(u64::from_le_bytes)
}

/// Seeks to an absolute file offset.
pub(crate) fn seek_to<R: Seek>(r: &mut R, offset: u64, what: &str) -> Result<()> {
    let _ = r.seek(SeekFrom::Start(offset)).map_err(io_err(what))?;
    Ok(())
}

/// Parses the whole file: header, program headers and section headers.
///
/// # Arguments
///
/// * `r` - Seekable source positioned anywhere; it is rewound first.
///
/// # Errors
///
/// See [`read_header`], [`read_program_headers`] and [`read_section_headers`].
pub fn load<R: Read + Seek>(r: &mut R) -> Result<Elf> {
    seek_to(r, 0, "ELF header")?;
    let header = read_header(r)?;
    let program_headers = read_program_headers(&header, r)?;
    let section_headers = read_section_headers(&header, r)?;
    debug!(
        entry = format_args!("{:#x}", header.entry),
        phnum = program_headers.len(),
        shnum = section_headers.len(),
        "parsed ELF64"
    );
    Ok(Elf {
        header,
        program_headers,
        section_headers,
    })
}

/// Reads the 16 identification bytes.
///
/// # Errors
///
/// [`EmuError::MalformedBinary`] if the file is shorter than 16 bytes.
pub fn read_ident<R: Read>(r: &mut R) -> Result<Ident> {
    Ok(Ident {
        magic: read_array(r, "e_ident")?,
        class: read_u8(r, "e_ident")?,
        data: read_u8(r, "e_ident")?,
        version: read_u8(r, "e_ident")?,
        os_abi: read_u8(r, "e_ident")?,
        abi_version: read_u8(r, "e_ident")?,
        pad: read_array(r, "e_ident")?,
    })
}

/// Reads and validates the ELF64 file header from the current position.
///
/// # Errors
///
/// - [`EmuError::MalformedBinary`] for a bad magic, an unknown class or data
///   encoding, a header size other than 64, table entry sizes that do not
///   match the ELF64 records, or a truncated header.
/// - [`EmuError::UnsupportedFeature`] for 32-bit or big-endian files and for
///   the extended-count forms of `e_phnum`, `e_shnum` and `e_shstrndx`.
pub fn read_header<R: Read>(r: &mut R) -> Result<ElfHeader> {
    let ident = read_ident(r)?;
    if ident.magic != ELF_MAGIC {
        return Err(EmuError::malformed(format!(
            "bad magic {:02x?}",
            ident.magic
        )));
    }
    match ident.class {
        ELFCLASS64 => {}
        ELFCLASS32 => return Err(EmuError::unsupported("32-bit ELF (EI_CLASS=1)")),
        other => return Err(EmuError::malformed(format!("invalid EI_CLASS {other}"))),
    }
    match ident.data {
        ELFDATA2LSB => {}
        ELFDATA2MSB => return Err(EmuError::unsupported("big-endian ELF (EI_DATA=2)")),
        other => return Err(EmuError::malformed(format!("invalid EI_DATA {other}"))),
    }

    let header = ElfHeader {
        ident,
        file_type: FileType::from(read_u16(r, "e_type")?),
        machine: read_u16(r, "e_machine")?,
        version: read_u32(r, "e_version")?,
        entry: read_u64(r, "e_entry")?,
        phoff: read_u64(r, "e_phoff")?,
        shoff: read_u64(r, "e_shoff")?,
        flags: read_u32(r, "e_flags")?,
        ehsize: read_u16(r, "e_ehsize")?,
        phentsize: read_u16(r, "e_phentsize")?,
        phnum: read_u16(r, "e_phnum")?,
        shentsize: read_u16(r, "e_shentsize")?,
        shnum: read_u16(r, "e_shnum")?,
        shstrndx: read_u16(r, "e_shstrndx")?,
    };

    if header.phnum == PN_XNUM {
        return Err(EmuError::unsupported("extended program header count (PN_XNUM)"));
    }
    if header.shnum == 0 && header.shoff != 0 {
        return Err(EmuError::unsupported("extended section header count (e_shnum=0)"));
    }
    if header.shstrndx == SHN_XINDEX {
        return Err(EmuError::unsupported("extended section name index (SHN_XINDEX)"));
    }
    if header.ehsize != ELF64_EHDR_SIZE {
        return Err(EmuError::malformed(format!(
            "expected e_ehsize {ELF64_EHDR_SIZE}, got {}",
            header.ehsize
        )));
    }
    if header.phnum > 0 && header.phentsize != ELF64_PHDR_SIZE {
        return Err(EmuError::malformed(format!(
            "expected e_phentsize {ELF64_PHDR_SIZE}, got {}",
            header.phentsize
        )));
    }
    if header.shnum > 0 && header.shentsize != ELF64_SHDR_SIZE {
        return Err(EmuError::malformed(format!(
            "expected e_shentsize {ELF64_SHDR_SIZE}, got {}",
            header.shentsize
        )));
    }
    Ok(header)
}

/// Reads one program header record from the current position.
///
/// # Errors
///
/// [`EmuError::MalformedBinary`] if the record is truncated.
pub fn read_program_header<R: Read>(r: &mut R) -> Result<ProgramHeader> {
    Ok(ProgramHeader {
        segment_type: SegmentType::from(read_u32(r, "p_type")?),
        flags: read_u32(r, "p_flags")?,
        offset: read_u64(r, "p_offset")?,
        vaddr: read_u64(r, "p_vaddr")?,
        paddr: read_u64(r, "p_paddr")?,
        filesz: read_u64(r, "p_filesz")?,
        memsz: read_u64(r, "p_memsz")?,
        align: read_u64(r, "p_align")?,
    })
}

/// Seeks to `e_phoff` and reads `e_phnum` program headers.
///
/// # Errors
///
/// [`EmuError::MalformedBinary`] if the table is truncated.
pub fn read_program_headers<R: Read + Seek>(
    header: &ElfHeader,
    r: &mut R,
) -> Result<Vec<ProgramHeader>> {
    if header.phnum == 0 {
        return Ok(Vec::new());
    }
    seek_to(r, header.phoff, "program header table")?;
    (0..header.phnum).map(|_| read_program_header(r)).collect()
}

/// Reads one section header record from the current position.
///
/// # Errors
///
/// - [`EmuError::MalformedBinary`] if the record is truncated.
/// - [`EmuError::UnsupportedFeature`] if the section is `SHF_COMPRESSED`.
pub fn read_section_header<R: Read>(r: &mut R) -> Result<SectionHeader> {
    let section = SectionHeader {
        name: read_u32(r, "sh_name")?,
        section_type: read_u32(r, "sh_type")?.into(),
        flags: SectionFlags::from_bits_retain(read_u64(r, "sh_flags")?),
        addr: read_u64(r, "sh_addr")?,
        offset: read_u64(r, "sh_offset")?,
        size: read_u64(r, "sh_size")?,
        link: read_u32(r, "sh_link")?,
        info: read_u32(r, "sh_info")?,
        addralign: read_u64(r, "sh_addralign")?,
        entsize: read_u64(r, "sh_entsize")?,
    };
    if section.flags.contains(SectionFlags::COMPRESSED) {
        return Err(EmuError::unsupported(format!(
            "compressed section (SHF_COMPRESSED) at offset {:#x}",
            section.offset
        )));
    }
    Ok(section)
}

/// Seeks to `e_shoff` and reads `e_shnum` section headers.
///
/// # Errors
///
/// See [`read_section_header`].
pub fn read_section_headers<R: Read + Seek>(
    header: &ElfHeader,
    r: &mut R,
) -> Result<Vec<SectionHeader>> {
    if header.shnum == 0 {
        return Ok(Vec::new());
    }
    seek_to(r, header.shoff, "section header table")?;
    (0..header.shnum).map(|_| read_section_header(r)).collect()
}
