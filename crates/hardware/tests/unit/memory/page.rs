//! # Page Tests
//!
//! Tests for page construction, containment and permission checks.

use elfx86_core::common::constants::MAX_PAGE_SIZE;
use elfx86_core::common::{AccessType, EmuError, VirtAddr};
use elfx86_core::memory::{Page, Permissions};
use pretty_assertions::assert_eq;

const RW: Permissions = Permissions::READ.union(Permissions::WRITE);

#[test]
fn test_new_page_is_zeroed() {
    let page = Page::new(VirtAddr(0x1000), 16, 16, RW).unwrap();
    assert_eq!(page.data(), &[0u8; 16]);
    assert_eq!(page.size(), 16);
    assert_eq!(page.end(), VirtAddr(0x1010));
}

#[test]
fn test_new_rejects_size_above_limit() {
    let err = Page::new(VirtAddr(0x1000), MAX_PAGE_SIZE + 1, 1, RW).unwrap_err();
    assert!(matches!(err, EmuError::MalformedBinary(_)));
}

#[test]
fn test_new_rejects_page_wrapping_address_space() {
    let err = Page::new(VirtAddr(u64::MAX - 4), 16, 1, RW).unwrap_err();
    assert!(matches!(err, EmuError::MalformedBinary(_)));
}

#[test]
fn test_from_bytes_zero_fills_tail() {
    let page = Page::from_bytes(VirtAddr(0x1000), &[1, 2, 3], 6, 1, RW).unwrap();
    assert_eq!(page.data(), &[1, 2, 3, 0, 0, 0]);
}

#[test]
fn test_from_bytes_rejects_oversized_contents() {
    let err = Page::from_bytes(VirtAddr(0x1000), &[0; 8], 4, 1, RW).unwrap_err();
    assert!(matches!(err, EmuError::MalformedBinary(_)));
}

#[test]
fn test_contains_is_half_open() {
    let page = Page::new(VirtAddr(0x1000), 0x100, 1, RW).unwrap();
    assert!(!page.contains(VirtAddr(0x0FFF)));
    assert!(page.contains(VirtAddr(0x1000)));
    assert!(page.contains(VirtAddr(0x10FF)));
    assert!(!page.contains(VirtAddr(0x1100)));
}

#[test]
fn test_check_requires_matching_bit() {
    let page = Page::new(VirtAddr(0x1000), 0x10, 1, Permissions::READ).unwrap();
    assert!(page.check(AccessType::Read, VirtAddr(0x1000)).is_ok());
    assert!(matches!(
        page.check(AccessType::Write, VirtAddr(0x1004)),
        Err(EmuError::AccessViolation {
            address: 0x1004,
            access: AccessType::Write
        })
    ));
    assert!(matches!(
        page.check(AccessType::Fetch, VirtAddr(0x1000)),
        Err(EmuError::AccessViolation {
            access: AccessType::Fetch,
            ..
        })
    ));
}

#[test]
fn test_write_then_read() {
    let mut page = Page::new(VirtAddr(0x1000), 0x10, 1, RW).unwrap();
    page.write(VirtAddr(0x1004), &[0xAA, 0xBB]).unwrap();
    assert_eq!(page.read(VirtAddr(0x1003), 4).unwrap(), vec![0, 0xAA, 0xBB, 0]);
}

#[test]
fn test_access_running_past_end_is_out_of_bounds() {
    let page = Page::new(VirtAddr(0x1000), 0x10, 1, RW).unwrap();
    assert!(matches!(
        page.read(VirtAddr(0x100E), 4),
        Err(EmuError::AddressOutOfBounds(0x1010))
    ));
}

#[test]
fn test_view_runs_to_page_end() {
    let page = Page::from_bytes(VirtAddr(0x1000), &[1, 2, 3, 4], 4, 1, Permissions::READ).unwrap();
    assert_eq!(page.view(VirtAddr(0x1002)).unwrap(), &[3, 4]);
}

#[test]
fn test_view_requires_read() {
    let page = Page::new(VirtAddr(0x1000), 4, 1, Permissions::EXECUTE).unwrap();
    assert!(matches!(
        page.view(VirtAddr(0x1000)),
        Err(EmuError::AccessViolation {
            access: AccessType::Read,
            ..
        })
    ));
}

#[test]
fn test_permissions_match_elf_p_flags() {
    assert_eq!(Permissions::EXECUTE.bits(), 1);
    assert_eq!(Permissions::WRITE.bits(), 2);
    assert_eq!(Permissions::READ.bits(), 4);
}
