//! Section names, string tables and the symbol table.
//!
//! Nothing here is needed to execute a program. The driver uses it to print
//! a human-readable listing of what it is about to run.

use std::io::{Read, Seek};

use super::elf::{Elf, SectionHeader, SectionType, Symbol};
use super::reader::{read_u8, read_u16, read_u32, read_u64, seek_to};
use crate::common::constants::ELF64_SYM_SIZE;
use crate::common::{EmuError, Result};

/// Reads a NUL-terminated string starting at absolute file `offset`.
///
/// Invalid UTF-8 is replaced rather than rejected; names are only displayed.
///
/// # Errors
///
/// [`EmuError::MalformedBinary`] if the file ends before the terminator.
pub fn read_string<R: Read + Seek>(r: &mut R, offset: u64) -> Result<String> {
    seek_to(r, offset, "string table")?;
    let mut bytes = Vec::new();
    loop {
        match read_u8(r, "string table entry")? {
            0 => break,
            b => bytes.push(b),
        }
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn section<'a>(elf: &'a Elf, index: usize, what: &str) -> Result<&'a SectionHeader> {
    elf.section_headers.get(index).ok_or_else(|| {
        EmuError::malformed(format!(
            "{what} refers to section {index}, but there are only {}",
            elf.section_headers.len()
        ))
    })
}

/// Name of section `index`, looked up in the `e_shstrndx` string table.
///
/// # Errors
///
/// [`EmuError::MalformedBinary`] if either index is out of range or the name
/// runs off the end of the file.
pub fn section_name<R: Read + Seek>(elf: &Elf, r: &mut R, index: usize) -> Result<String> {
    let strtab = section(elf, usize::from(elf.header.shstrndx), "e_shstrndx")?;
    let name = section(elf, index, "section lookup")?.name;
    read_string(r, strtab.offset + u64::from(name))
}

/// Names of every section, in table order.
///
/// # Errors
///
/// See [`section_name`].
pub fn section_names<R: Read + Seek>(elf: &Elf, r: &mut R) -> Result<Vec<String>> {
    (0..elf.section_headers.len())
        .map(|i| section_name(elf, r, i))
        .collect()
}

fn read_symbol<R: Read>(r: &mut R) -> Result<Symbol> {
    Ok(Symbol {
        name: read_u32(r, "st_name")?,
        info: read_u8(r, "st_info")?,
        other: read_u8(r, "st_other")?,
        shndx: read_u16(r, "st_shndx")?,
        value: read_u64(r, "st_value")?,
        size: read_u64(r, "st_size")?,
    })
}

/// Reads every `SHT_SYMTAB` entry together with its resolved name.
///
/// The names come from the string table named by the symbol table's
/// `sh_link`. A file without a symbol table yields an empty list.
///
/// # Errors
///
/// [`EmuError::MalformedBinary`] if the table or its string table is
/// truncated or `sh_link` is out of range.
pub fn read_symbols<R: Read + Seek>(elf: &Elf, r: &mut R) -> Result<Vec<(Symbol, String)>> {
    let mut out = Vec::new();
    for symtab in elf
        .section_headers
        .iter()
        .filter(|s| s.section_type == SectionType::Symtab)
    {
        let strtab = section(elf, symtab.link as usize, "sh_link")?;
        let entsize = if symtab.entsize == 0 {
            ELF64_SYM_SIZE
        } else {
            symtab.entsize
        };
        for i in 0..symtab.size / entsize {
            seek_to(r, symtab.offset + i * entsize, "symbol table")?;
            let sym = read_symbol(r)?;
            let name = read_string(r, strtab.offset + u64::from(sym.name))?;
            out.push((sym, name));
        }
    }
    Ok(out)
}
