//! # Address Arithmetic Tests
//!
//! Tests for the `VirtAddr` newtype.

use elfx86_core::common::VirtAddr;

#[test]
fn test_virt_addr_val_roundtrip() {
    assert_eq!(VirtAddr::new(0x40_1000).val(), 0x40_1000);
    assert_eq!(VirtAddr::from(7u64), VirtAddr(7));
}

#[test]
fn test_wrapping_offset_forward_and_back() {
    let a = VirtAddr::new(0x1000);
    assert_eq!(a.wrapping_offset(0x10).val(), 0x1010);
    assert_eq!(a.wrapping_offset(-0x10).val(), 0x0FF0);
}

#[test]
fn test_wrapping_offset_wraps_at_zero() {
    assert_eq!(VirtAddr::new(0).wrapping_offset(-1).val(), u64::MAX);
    assert_eq!(VirtAddr::new(u64::MAX).wrapping_offset(1).val(), 0);
}

#[test]
fn test_checked_add_overflow() {
    assert_eq!(VirtAddr::new(u64::MAX).checked_add(1), None);
    assert_eq!(VirtAddr::new(1).checked_add(1), Some(VirtAddr(2)));
}

#[test]
fn test_display_is_hex() {
    assert_eq!(VirtAddr::new(0x40_1000).to_string(), "0x401000");
    assert_eq!(format!("{:x}", VirtAddr::new(255)), "ff");
}
