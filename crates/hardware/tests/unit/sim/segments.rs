//! # Segment Loading Tests
//!
//! Tests for `read_segments` and `build_memory`.

use std::io::Cursor;

use crate::common::builder::elf::{ElfBuilder, PF_R, PF_W, PF_X, PT_LOAD, PT_NOTE, SegmentSpec};
use elfx86_core::common::constants::{MAX_PAGE_SIZE, STACK_BASE, STACK_SIZE};
use elfx86_core::common::{EmuError, VirtAddr};
use elfx86_core::config::Config;
use elfx86_core::memory::{Page, Permissions};
use elfx86_core::sim::loader::{build_memory, read_segments};
use elfx86_core::sim::reader;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn segments_of(builder: &ElfBuilder) -> elfx86_core::common::Result<Vec<Page>> {
    let mut cursor = Cursor::new(builder.build());
    let elf = reader::load(&mut cursor)?;
    read_segments(&elf, &mut cursor)
}

#[test]
fn test_one_page_per_segment_with_flags() {
    let pages = segments_of(
        &ElfBuilder::new()
            .segment(PF_R | PF_X, 0x40_1000, &[0xC3])
            .segment(PF_R | PF_W, 0x40_2000, b"ab")
            .segment(PF_R, 0x40_3000, b"ro"),
    )
    .unwrap();

    assert_eq!(pages.len(), 3);
    assert_eq!(pages[0].base(), VirtAddr::new(0x40_1000));
    assert_eq!(pages[0].permissions(), Permissions::READ | Permissions::EXECUTE);
    assert_eq!(pages[1].permissions(), Permissions::READ | Permissions::WRITE);
    assert_eq!(pages[2].permissions(), Permissions::READ);
    assert_eq!(pages[1].data(), b"ab");
    assert_eq!(pages[0].align(), 0x1000);
}

#[test]
fn test_memsz_tail_is_zero_filled() {
    let pages = segments_of(&ElfBuilder::new().segment_with_memsz(
        PF_R | PF_W,
        0x60_0000,
        &[1, 2, 3],
        16,
    ))
    .unwrap();
    assert_eq!(pages[0].size(), 16);
    assert_eq!(&pages[0].data()[..3], &[1, 2, 3]);
    assert!(pages[0].data()[3..].iter().all(|&b| b == 0));
}

#[test]
fn test_empty_bss_segment() {
    let pages =
        segments_of(&ElfBuilder::new().segment_with_memsz(PF_R | PF_W, 0x60_0000, &[], 64))
            .unwrap();
    assert_eq!(pages[0].data(), &[0u8; 64][..]);
}

#[test]
fn test_non_load_segment_is_unsupported() {
    let err = segments_of(&ElfBuilder::new().raw_segment(SegmentSpec {
        p_type: PT_NOTE,
        flags: PF_R,
        vaddr: 0x40_1000,
        data: vec![0; 8],
        memsz: 8,
    }))
    .unwrap_err();
    assert!(matches!(err, EmuError::UnsupportedFeature(ref m) if m.contains("PT_LOAD")));
}

#[test]
fn test_filesz_larger_than_memsz_is_malformed() {
    let err = segments_of(&ElfBuilder::new().raw_segment(SegmentSpec {
        p_type: PT_LOAD,
        flags: PF_R,
        vaddr: 0x40_1000,
        data: vec![0; 8],
        memsz: 4,
    }))
    .unwrap_err();
    assert!(matches!(err, EmuError::MalformedBinary(_)));
}

#[test]
fn test_truncated_segment_bytes_are_malformed() {
    let builder = ElfBuilder::new()
        .without_sections()
        .segment(PF_R | PF_X, 0x40_1000, &[0x90; 32])
        .truncate(64 + 56 + 10);
    assert!(matches!(
        segments_of(&builder),
        Err(EmuError::MalformedBinary(ref m)) if m.contains("past the end")
    ));
}

#[rstest]
#[case(u64::MAX)]
#[case(1 << 40)]
#[case(MAX_PAGE_SIZE + 1)]
fn test_huge_memsz_is_malformed(#[case] memsz: u64) {
    let err = segments_of(&ElfBuilder::new().segment_with_memsz(PF_R | PF_W, 0x60_0000, &[1], memsz))
        .unwrap_err();
    assert!(matches!(err, EmuError::MalformedBinary(ref m) if m.contains("p_memsz")));
}

#[test]
fn test_build_memory_appends_default_stack() {
    let pages = segments_of(&ElfBuilder::new().segment(PF_R | PF_X, 0x40_1000, &[0x90])).unwrap();
    let memory = build_memory(pages, &Config::default()).unwrap();

    assert_eq!(memory.len(), 2);
    let stack = memory.resolve(VirtAddr::new(STACK_BASE)).unwrap();
    assert_eq!(stack.size(), STACK_SIZE);
    assert_eq!(stack.align(), STACK_SIZE);
    assert_eq!(stack.permissions(), Permissions::READ | Permissions::WRITE);
    assert_eq!(memory.top(), Some(VirtAddr::new(STACK_BASE + STACK_SIZE)));
}

#[test]
fn test_build_memory_uses_configured_stack() {
    let mut config = Config::default();
    config.memory.stack_base = 0x7000_0000;
    config.memory.stack_size = 0x2000;

    let memory = build_memory(Vec::new(), &config).unwrap();
    let stack = memory.resolve(VirtAddr::new(0x7000_1FFF)).unwrap();
    assert_eq!(stack.base(), VirtAddr::new(0x7000_0000));
    assert_eq!(stack.size(), 0x2000);
}

#[test]
fn test_build_memory_rejects_overlapping_segments() {
    let pages = segments_of(
        &ElfBuilder::new()
            .segment_with_memsz(PF_R | PF_X, 0x40_1000, &[0x90], 0x2000)
            .segment(PF_R | PF_W, 0x40_2000, b"x"),
    )
    .unwrap();
    assert!(matches!(
        build_memory(pages, &Config::default()),
        Err(EmuError::MalformedBinary(_))
    ));
}

#[test]
fn test_build_memory_rejects_stack_over_segment() {
    let mut config = Config::default();
    config.memory.stack_base = 0x40_1800;
    let pages = segments_of(&ElfBuilder::new().segment(PF_R | PF_X, 0x40_1000, &[0x90; 0x1000])).unwrap();
    assert!(build_memory(pages, &config).is_err());
}
