//! Virtual Memory.
//!
//! The address space of one emulated program. It performs:
//! 1. **Mapping:** Replaces the whole page set at once, rejecting overlaps.
//! 2. **Resolution:** Finds the page that contains an address.
//! 3. **Access:** Permission-checked reads, writes and borrowed views.
//!
//! Pages occupy half-open ranges `[base, base + size)`. An access must fit
//! inside a single page; running off the end is reported as out of bounds at
//! the first uncovered address.

use std::collections::BTreeMap;

use tracing::debug;

use super::page::{Page, PageKey};
use crate::common::{EmuError, Result, VirtAddr};

/// A set of disjoint pages keyed by `(base, size)`.
#[derive(Clone, Debug, Default)]
pub struct VirtualMemory {
    pages: BTreeMap<PageKey, Page>,
}

impl VirtualMemory {
    /// Creates a virtual memory over `pages`.
    ///
    /// # Errors
    ///
    /// [`EmuError::MalformedBinary`] if two pages overlap.
    pub fn new(pages: Vec<Page>) -> Result<Self> {
        let mut vm = Self::default();
        vm.map(pages)?;
        Ok(vm)
    }

    /// Replaces every mapped page with `pages`.
    ///
    /// The new set is validated before it is installed; on error the previous
    /// mapping is left untouched.
    ///
    /// # Errors
    ///
    /// [`EmuError::MalformedBinary`] if two pages overlap.
    pub fn map(&mut self, pages: Vec<Page>) -> Result<()> {
        let mut next = BTreeMap::new();
        for page in pages {
            let key = page.key();
            if next.insert(key, page).is_some() {
                return Err(EmuError::malformed(format!(
                    "page at {} mapped twice",
                    key.base
                )));
            }
        }

        for (lo, hi) in next.values().zip(next.values().skip(1)) {
            if lo.end() > hi.base() {
                return Err(EmuError::malformed(format!(
                    "page {}..{} overlaps page at {}",
                    lo.base(),
                    lo.end(),
                    hi.base()
                )));
            }
        }

        debug!(pages = next.len(), "mapped virtual memory");
        self.pages = next;
        Ok(())
    }

    /// Number of mapped pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns true if nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Iterates pages from the lowest base address to the highest.
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    /// Looks up a page by key.
    pub fn page(&self, key: PageKey) -> Option<&Page> {
        self.pages.get(&key)
    }

    /// End address of the highest mapped page.
    ///
    /// The CPU starts its stack pointer here, which puts it at the top of the
    /// synthesized stack page.
    pub fn top(&self) -> Option<VirtAddr> {
        self.pages.values().next_back().map(Page::end)
    }

    /// Finds the page containing `addr`.
    ///
    /// # Errors
    ///
    /// [`EmuError::AddressOutOfBounds`] if no page contains the address.
    pub fn resolve(&self, addr: VirtAddr) -> Result<&Page> {
        self.pages
            .values()
            .find(|p| p.contains(addr))
            .ok_or(EmuError::AddressOutOfBounds(addr.val()))
    }

    fn resolve_mut(&mut self, addr: VirtAddr) -> Result<&mut Page> {
        self.pages
            .values_mut()
            .find(|p| p.contains(addr))
            .ok_or(EmuError::AddressOutOfBounds(addr.val()))
    }

    /// Key of the page containing `addr`.
    ///
    /// # Errors
    ///
    /// [`EmuError::AddressOutOfBounds`] if no page contains the address.
    pub fn resolve_key(&self, addr: VirtAddr) -> Result<PageKey> {
        self.resolve(addr).map(Page::key)
    }

    /// Copies `len` bytes starting at `addr`.
    ///
    /// # Errors
    ///
    /// [`EmuError::AddressOutOfBounds`] if the range is not inside one page,
    /// [`EmuError::AccessViolation`] if that page is not readable.
    pub fn read(&self, addr: VirtAddr, len: usize) -> Result<Vec<u8>> {
        self.resolve(addr)?.read(addr, len)
    }

    /// Copies `bytes` into memory starting at `addr`.
    ///
    /// # Errors
    ///
    /// [`EmuError::AddressOutOfBounds`] if the range is not inside one page,
    /// [`EmuError::AccessViolation`] if that page is not writable.
    pub fn write(&mut self, addr: VirtAddr, bytes: &[u8]) -> Result<()> {
        self.resolve_mut(addr)?.write(addr, bytes)
    }

    /// Borrows the readable bytes from `addr` to the end of its page.
    ///
    /// # Errors
    ///
    /// [`EmuError::AddressOutOfBounds`] if unmapped,
    /// [`EmuError::AccessViolation`] if the page is not readable.
    pub fn view(&self, addr: VirtAddr) -> Result<&[u8]> {
        self.resolve(addr)?.view(addr)
    }

    /// Reads a little-endian dword.
    ///
    /// # Errors
    ///
    /// Same as [`VirtualMemory::read`].
    pub fn read_u32(&self, addr: VirtAddr) -> Result<u32> {
        let bytes = self.resolve(addr)?.slice(addr, 4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Writes a little-endian dword.
    ///
    /// # Errors
    ///
    /// Same as [`VirtualMemory::write`].
    pub fn write_u32(&mut self, addr: VirtAddr, val: u32) -> Result<()> {
        self.write(addr, &val.to_le_bytes())
    }
}
