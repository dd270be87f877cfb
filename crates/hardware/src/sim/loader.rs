//! Segment loading and program image setup.
//!
//! This module turns a parsed [`Elf`] into a memory image. It performs:
//! 1. **Binary loading:** Opens an ELF file from disk and parses its headers.
//! 2. **Segment extraction:** Copies every `PT_LOAD` segment into a page of
//!    `p_memsz` bytes at `p_vaddr`, zero-filling past `p_filesz`.
//! 3. **Stack synthesis:** Appends a read/write stack page, placed by
//!    [`MemoryConfig`](crate::config::MemoryConfig), and maps everything.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use super::elf::{Elf, SegmentType};
use super::reader::{self, io_err, seek_to};
use crate::common::constants::MAX_PAGE_SIZE;
use crate::common::{EmuError, Result, VirtAddr};
use crate::config::Config;
use crate::memory::{Page, Permissions, VirtualMemory};

/// Opens `path` and parses its ELF headers.
///
/// The returned reader is left open so segments and symbols can be read
/// from it afterwards.
///
/// # Errors
///
/// [`EmuError::Io`] if the file cannot be opened, otherwise whatever
/// [`reader::load`] reports.
pub fn load_binary(path: impl AsRef<Path>) -> Result<(Elf, BufReader<File>)> {
    let path = path.as_ref();
    let mut file = BufReader::new(File::open(path)?);
    let elf = reader::load(&mut file)?;
    debug!(path = %path.display(), "loaded ELF headers");
    Ok((elf, file))
}

/// Reads every program header's segment into a page.
///
/// # Arguments
///
/// * `elf` - Parsed headers.
/// * `r` - The same source the headers came from.
///
/// # Returns
///
/// One page per program header, in table order.
///
/// # Errors
///
/// - [`EmuError::UnsupportedFeature`] for any header that is not `PT_LOAD`.
/// - [`EmuError::MalformedBinary`] if `p_filesz > p_memsz`, the segment
///   bytes run past the end of the source, or `p_memsz` is larger than a
///   page may be.
pub fn read_segments<R: Read + Seek>(elf: &Elf, r: &mut R) -> Result<Vec<Page>> {
    let source_len = r.seek(SeekFrom::End(0)).map_err(io_err("segment"))?;
    let mut pages = Vec::with_capacity(elf.program_headers.len());
    for (i, ph) in elf.program_headers.iter().enumerate() {
        if ph.segment_type != SegmentType::Load {
            return Err(EmuError::unsupported(format!(
                "program header {i} has type {:?}; only PT_LOAD is supported",
                ph.segment_type
            )));
        }
        if ph.filesz > ph.memsz {
            return Err(EmuError::malformed(format!(
                "program header {i}: p_filesz {:#x} exceeds p_memsz {:#x}",
                ph.filesz, ph.memsz
            )));
        }

        if ph.offset.checked_add(ph.filesz).is_none_or(|end| end > source_len) {
            return Err(EmuError::malformed(format!(
                "program header {i}: {:#x} bytes at offset {:#x} run past the end of the file ({source_len:#x})",
                ph.filesz, ph.offset
            )));
        }
        if ph.memsz > MAX_PAGE_SIZE {
            return Err(EmuError::malformed(format!(
                "program header {i}: p_memsz {:#x} exceeds the page limit {MAX_PAGE_SIZE:#x}",
                ph.memsz
            )));
        }

        seek_to(r, ph.offset, "segment")?;
        let mut bytes = vec![0u8; ph.filesz as usize];
        r.read_exact(&mut bytes).map_err(io_err("segment"))?;

        let page = Page::from_bytes(
            VirtAddr::new(ph.vaddr),
            &bytes,
            ph.memsz,
            ph.align,
            ph.permissions(),
        )?;
        debug!(
            vaddr = %page.base(),
            memsz = ph.memsz,
            filesz = ph.filesz,
            perms = ?page.permissions(),
            "segment"
        );
        pages.push(page);
    }
    Ok(pages)
}

/// Builds the program's virtual memory from its segments plus a stack page.
///
/// # Errors
///
/// [`EmuError::MalformedBinary`] if any two pages overlap or the stack page
/// cannot be created.
pub fn build_memory(mut pages: Vec<Page>, config: &Config) -> Result<VirtualMemory> {
    let stack = Page::new(
        VirtAddr::new(config.memory.stack_base),
        config.memory.stack_size,
        config.memory.stack_size,
        Permissions::READ | Permissions::WRITE,
    )?;
    debug!(base = %stack.base(), size = stack.size(), "stack page");
    pages.push(stack);
    VirtualMemory::new(pages)
}
