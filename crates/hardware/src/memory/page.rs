//! Memory Pages.
//!
//! A page is the unit the loader produces and the virtual memory maps: one
//! contiguous byte buffer tagged with its virtual base address, an alignment
//! hint and a set of access permissions. Its shape (base and size) is fixed at
//! construction; only its contents change afterwards.

use bitflags::bitflags;

use crate::common::constants::MAX_PAGE_SIZE;
use crate::common::{AccessType, EmuError, Result, VirtAddr};

bitflags! {
    /// Page access permissions.
    ///
    /// The bit layout matches ELF `p_flags` (`PF_X`, `PF_W`, `PF_R`) so a
    /// program header's flags convert without remapping.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permissions: u32 {
        /// Instructions may be fetched from the page.
        const EXECUTE = 1 << 0;
        /// The page may be written.
        const WRITE = 1 << 1;
        /// The page may be read.
        const READ = 1 << 2;
    }
}

/// Identity of a page inside a [`VirtualMemory`](super::VirtualMemory).
///
/// Ordered by base address first, so iterating a map of keys walks the
/// address space from low to high.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageKey {
    /// Virtual base address of the page.
    pub base: VirtAddr,
    /// Size of the page in bytes.
    pub size: u64,
}

/// A contiguous, permission-tagged region of emulated memory.
#[derive(Clone, Debug)]
pub struct Page {
    data: Vec<u8>,
    base: VirtAddr,
    align: u64,
    perms: Permissions,
}

impl Page {
    /// Creates a zero-filled page.
    ///
    /// # Arguments
    ///
    /// * `base` - Virtual base address.
    /// * `size` - Size of the page in bytes.
    /// * `align` - Alignment hint carried over from the program header.
    /// * `perms` - Access permissions.
    ///
    /// # Errors
    ///
    /// [`EmuError::MalformedBinary`] if `size` exceeds [`MAX_PAGE_SIZE`], the
    /// page would wrap the address space, or the host cannot allocate it.
    pub fn new(base: VirtAddr, size: u64, align: u64, perms: Permissions) -> Result<Self> {
        if size > MAX_PAGE_SIZE {
            return Err(EmuError::malformed(format!(
                "page at {base} is {size:#x} bytes; the limit is {MAX_PAGE_SIZE:#x}"
            )));
        }
        if base.checked_add(size).is_none() {
            return Err(EmuError::malformed(format!(
                "page at {base} of {size:#x} bytes wraps the address space"
            )));
        }
        let len = usize::try_from(size)
            .map_err(|_| EmuError::malformed(format!("page size {size:#x} exceeds host memory")))?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|e| {
            EmuError::malformed(format!("cannot allocate {size:#x} bytes for page at {base}: {e}"))
        })?;
        data.resize(len, 0);
        Ok(Self {
            data,
            base,
            align,
            perms,
        })
    }

    /// Creates a page of `size` bytes whose prefix is initialised from `bytes`.
    ///
    /// Bytes past `bytes.len()` are zero, which is how a segment's `memsz`
    /// tail beyond `filesz` gets its BSS.
    ///
    /// # Errors
    ///
    /// [`EmuError::MalformedBinary`] if `bytes` is longer than `size`, or for
    /// any reason [`Page::new`] rejects.
    pub fn from_bytes(
        base: VirtAddr,
        bytes: &[u8],
        size: u64,
        align: u64,
        perms: Permissions,
    ) -> Result<Self> {
        if bytes.len() as u64 > size {
            return Err(EmuError::malformed(format!(
                "page at {base} holds {} initialised bytes but is only {size} bytes long",
                bytes.len()
            )));
        }
        let mut page = Self::new(base, size, align, perms)?;
        page.data[..bytes.len()].copy_from_slice(bytes);
        Ok(page)
    }

    /// Virtual base address.
    #[inline]
    pub const fn base(&self) -> VirtAddr {
        self.base
    }

    /// Size in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// First address past the page (saturating at the top of the address space).
    #[inline]
    pub fn end(&self) -> VirtAddr {
        VirtAddr(self.base.0.saturating_add(self.size()))
    }

    /// Alignment hint.
    #[inline]
    pub const fn align(&self) -> u64 {
        self.align
    }

    /// Access permissions.
    #[inline]
    pub const fn permissions(&self) -> Permissions {
        self.perms
    }

    /// Map key of this page.
    #[inline]
    pub fn key(&self) -> PageKey {
        PageKey {
            base: self.base,
            size: self.size(),
        }
    }

    /// Raw contents, bypassing permission checks. Intended for diagnostics.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns true if `addr` lies in `[base, base + size)`.
    #[inline]
    pub fn contains(&self, addr: VirtAddr) -> bool {
        addr.0 >= self.base.0 && addr.0 - self.base.0 < self.size()
    }

    /// Fails with [`EmuError::AccessViolation`] unless the page grants `access`.
    ///
    /// # Arguments
    ///
    /// * `access` - Kind of access being attempted.
    /// * `addr` - Address reported in the error.
    pub fn check(&self, access: AccessType, addr: VirtAddr) -> Result<()> {
        if self.perms.contains(access.required()) {
            Ok(())
        } else {
            Err(EmuError::AccessViolation {
                address: addr.val(),
                access,
            })
        }
    }

    /// Byte range inside `data` for `len` bytes at `addr`.
    fn range(&self, addr: VirtAddr, len: usize) -> Result<std::ops::Range<usize>> {
        if !self.contains(addr) {
            return Err(EmuError::AddressOutOfBounds(addr.val()));
        }
        let start = (addr.0 - self.base.0) as usize;
        let end = start
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| EmuError::AddressOutOfBounds(self.end().val()))?;
        Ok(start..end)
    }

    /// Borrows `len` readable bytes at `addr`.
    ///
    /// # Errors
    ///
    /// [`EmuError::AccessViolation`] without Read permission,
    /// [`EmuError::AddressOutOfBounds`] if the range leaves the page.
    pub fn slice(&self, addr: VirtAddr, len: usize) -> Result<&[u8]> {
        self.check(AccessType::Read, addr)?;
        let range = self.range(addr, len)?;
        Ok(&self.data[range])
    }

    /// Copies `len` bytes out of the page starting at `addr`.
    ///
    /// # Errors
    ///
    /// Same as [`Page::slice`].
    pub fn read(&self, addr: VirtAddr, len: usize) -> Result<Vec<u8>> {
        self.slice(addr, len).map(<[u8]>::to_vec)
    }

    /// Copies `bytes` into the page starting at `addr`.
    ///
    /// # Errors
    ///
    /// [`EmuError::AccessViolation`] without Write permission,
    /// [`EmuError::AddressOutOfBounds`] if the range leaves the page.
    pub fn write(&mut self, addr: VirtAddr, bytes: &[u8]) -> Result<()> {
        self.check(AccessType::Write, addr)?;
        let range = self.range(addr, bytes.len())?;
        self.data[range].copy_from_slice(bytes);
        Ok(())
    }

    /// Borrows everything from `addr` to the end of the page.
    ///
    /// Requires Read permission; Execute is the fetch stage's concern.
    ///
    /// # Errors
    ///
    /// Same as [`Page::slice`].
    pub fn view(&self, addr: VirtAddr) -> Result<&[u8]> {
        self.check(AccessType::Read, addr)?;
        let start = self.range(addr, 0)?.start;
        Ok(&self.data[start..])
    }
}
