//! # General-Purpose Register Tests
//!
//! Tests for the x86-64 register file and register encoding.

use elfx86_core::core::arch::{Gpr, Reg, SegmentSelectors};
use rstest::rstest;

#[test]
fn test_gpr_new_initializes_to_zero() {
    let gpr = Gpr::new();
    for reg in Reg::ALL {
        assert_eq!(gpr.read64(reg), 0);
    }
}

#[test]
fn test_write64_read64() {
    let mut gpr = Gpr::new();
    gpr.write64(Reg::Rsi, 0xDEAD_BEEF_CAFE_F00D);
    assert_eq!(gpr.read64(Reg::Rsi), 0xDEAD_BEEF_CAFE_F00D);
    assert_eq!(gpr.read32(Reg::Rsi), 0xCAFE_F00D);
}

#[test]
fn test_write32_zero_extends() {
    let mut gpr = Gpr::new();
    gpr.write64(Reg::Rax, u64::MAX);
    gpr.write32(Reg::Rax, 0x1234_5678);
    assert_eq!(gpr.read64(Reg::Rax), 0x1234_5678);
}

#[test]
fn test_registers_are_independent() {
    let mut gpr = Gpr::new();
    for (i, reg) in Reg::ALL.into_iter().enumerate() {
        gpr.write64(reg, i as u64 + 1);
    }
    for (i, reg) in Reg::ALL.into_iter().enumerate() {
        assert_eq!(gpr.read64(reg), i as u64 + 1);
    }
}

#[rstest]
#[case(0, Reg::Rax, "eax")]
#[case(1, Reg::Rcx, "ecx")]
#[case(2, Reg::Rdx, "edx")]
#[case(3, Reg::Rbx, "ebx")]
#[case(4, Reg::Rsp, "esp")]
#[case(5, Reg::Rbp, "ebp")]
#[case(6, Reg::Rsi, "esi")]
#[case(7, Reg::Rdi, "edi")]
fn test_register_encoding(#[case] bits: u8, #[case] reg: Reg, #[case] name: &str) {
    assert_eq!(Reg::from_bits(bits), reg);
    assert_eq!(Reg::from_bits(bits | 0b1111_1000), reg);
    assert_eq!(reg.to_string(), name);
}

#[test]
fn test_segment_selectors_start_zeroed() {
    let seg = SegmentSelectors::default();
    assert_eq!((seg.ss, seg.cs, seg.ds, seg.es, seg.fs, seg.gs), (0, 0, 0, 0, 0, 0));
}
