//! # Virtual Memory Tests
//!
//! Tests for mapping, resolution and permission-checked access across pages.

use elfx86_core::common::{AccessType, EmuError, VirtAddr};
use elfx86_core::memory::{Page, Permissions, VirtualMemory};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const RW: Permissions = Permissions::READ.union(Permissions::WRITE);
const RX: Permissions = Permissions::READ.union(Permissions::EXECUTE);

fn two_page_memory() -> VirtualMemory {
    VirtualMemory::new(vec![
        Page::new(VirtAddr(0x1000), 0x1000, 0x1000, RX).unwrap(),
        Page::new(VirtAddr(0x3000), 0x1000, 0x1000, RW).unwrap(),
    ])
    .unwrap()
}

#[test]
fn test_resolve_finds_owning_page() {
    let vm = two_page_memory();
    assert_eq!(vm.resolve(VirtAddr(0x1234)).unwrap().base(), VirtAddr(0x1000));
    assert_eq!(vm.resolve(VirtAddr(0x3FFF)).unwrap().base(), VirtAddr(0x3000));
}

#[test]
fn test_resolve_gap_is_out_of_bounds() {
    let vm = two_page_memory();
    assert!(matches!(
        vm.resolve(VirtAddr(0x2000)),
        Err(EmuError::AddressOutOfBounds(0x2000))
    ));
}

#[test]
fn test_resolve_at_base_plus_size_is_out_of_bounds() {
    let vm = two_page_memory();
    assert!(matches!(
        vm.resolve(VirtAddr(0x4000)),
        Err(EmuError::AddressOutOfBounds(0x4000))
    ));
}

#[test]
fn test_write_then_read_on_rw_page() {
    let mut vm = two_page_memory();
    vm.write(VirtAddr(0x3010), b"hello").unwrap();
    assert_eq!(vm.read(VirtAddr(0x3010), 5).unwrap(), b"hello".to_vec());
}

#[test]
fn test_write_to_read_only_page_is_access_violation() {
    let mut vm = two_page_memory();
    let err = vm.write(VirtAddr(0x1000), &[0x90]).unwrap_err();
    assert!(matches!(
        err,
        EmuError::AccessViolation {
            address: 0x1000,
            access: AccessType::Write
        }
    ));
    assert_eq!(vm.read(VirtAddr(0x1000), 1).unwrap(), vec![0]);
}

#[test]
fn test_read_from_write_only_page_is_access_violation() {
    let vm = VirtualMemory::new(vec![Page::new(
        VirtAddr(0x1000),
        0x10,
        1,
        Permissions::WRITE,
    ).unwrap()])
    .unwrap();
    assert!(matches!(
        vm.read(VirtAddr(0x1000), 1),
        Err(EmuError::AccessViolation {
            access: AccessType::Read,
            ..
        })
    ));
}

#[test]
fn test_u32_accessors_are_little_endian() {
    let mut vm = two_page_memory();
    vm.write_u32(VirtAddr(0x3000), 0x1122_3344).unwrap();
    assert_eq!(vm.read(VirtAddr(0x3000), 4).unwrap(), vec![0x44, 0x33, 0x22, 0x11]);
    assert_eq!(vm.read_u32(VirtAddr(0x3000)).unwrap(), 0x1122_3344);
}

#[test]
fn test_view_borrows_to_page_end() {
    let vm = two_page_memory();
    assert_eq!(vm.view(VirtAddr(0x1FFC)).unwrap().len(), 4);
}

#[test]
fn test_overlapping_pages_rejected_and_mapping_kept() {
    let mut vm = two_page_memory();
    let err = vm
        .map(vec![
            Page::new(VirtAddr(0x1000), 0x100, 1, RW).unwrap(),
            Page::new(VirtAddr(0x10F0), 0x100, 1, RW).unwrap(),
        ])
        .unwrap_err();
    assert!(matches!(err, EmuError::MalformedBinary(_)));
    assert_eq!(vm.len(), 2);
    assert!(vm.resolve(VirtAddr(0x3000)).is_ok());
}

#[test]
fn test_adjacent_pages_are_allowed() {
    let vm = VirtualMemory::new(vec![
        Page::new(VirtAddr(0x1000), 0x100, 1, RW).unwrap(),
        Page::new(VirtAddr(0x1100), 0x100, 1, RW).unwrap(),
    ])
    .unwrap();
    assert_eq!(vm.len(), 2);
}

#[test]
fn test_map_replaces_whole_set() {
    let mut vm = two_page_memory();
    vm.map(vec![Page::new(VirtAddr(0x8000), 0x10, 1, RW).unwrap()]).unwrap();
    assert_eq!(vm.len(), 1);
    assert!(vm.resolve(VirtAddr(0x1000)).is_err());
    assert!(vm.resolve(VirtAddr(0x8000)).is_ok());
}

#[test]
fn test_top_is_end_of_highest_page() {
    assert_eq!(two_page_memory().top(), Some(VirtAddr(0x4000)));
    assert_eq!(VirtualMemory::default().top(), None);
}

proptest! {
    #[test]
    fn prop_write_then_read_returns_bytes(
        offset in 0u64..0x0F00,
        bytes in proptest::collection::vec(any::<u8>(), 1..0x100),
    ) {
        let mut vm = two_page_memory();
        let addr = VirtAddr(0x3000 + offset);
        vm.write(addr, &bytes).unwrap();
        prop_assert_eq!(vm.read(addr, bytes.len()).unwrap(), bytes);
    }

    #[test]
    fn prop_unmapped_addresses_are_out_of_bounds(addr in 0x4000u64..0x1_0000) {
        let vm = two_page_memory();
        prop_assert!(matches!(
            vm.read(VirtAddr(addr), 1),
            Err(EmuError::AddressOutOfBounds(a)) if a == addr
        ));
    }
}
