//! # Statistics Tests
//!
//! Tests for instruction and syscall counters.

use crate::common::builder::program::Program;
use crate::common::harness::TestContext;
use elfx86_core::core::arch::Reg;
use elfx86_core::stats::ExecStats;

#[test]
fn test_starts_empty() {
    let stats = ExecStats::default();
    assert_eq!(stats.cycles, 0);
    assert!(stats.by_mnemonic.is_empty());
    assert!(stats.syscalls.is_empty());
    assert_eq!(stats.count("mov"), 0);
}

#[test]
fn test_record_instruction_counts_cycles_and_mix() {
    let mut stats = ExecStats::default();
    stats.record_instruction("mov");
    stats.record_instruction("mov");
    stats.record_instruction("ret");
    assert_eq!(stats.cycles, 3);
    assert_eq!(stats.count("mov"), 2);
    assert_eq!(stats.count("ret"), 1);
}

#[test]
fn test_record_syscall_does_not_count_cycles() {
    let mut stats = ExecStats::default();
    stats.record_syscall("write");
    assert_eq!(stats.cycles, 0);
    assert_eq!(stats.syscalls.get("write"), Some(&1));
}

#[test]
fn test_failed_instruction_not_counted() {
    let code = Program::new().nop().raw(&[0x66]).build();
    let mut ctx = TestContext::new(&code);
    ctx.steps(1);
    assert!(ctx.step().is_err());
    assert_eq!(ctx.cpu.stats.cycles, 1);
    assert_eq!(ctx.cpu.stats.count("nop"), 1);
}

#[test]
fn test_mix_from_running_program() {
    let code = Program::new()
        .mov_imm(Reg::Rax, 0)
        .cmp(Reg::Rax, Reg::Rax)
        .nop()
        .sys_exit(0)
        .build();
    let mut ctx = TestContext::new(&code);
    assert_eq!(ctx.run().unwrap(), 6);
    let stats = &ctx.cpu.stats;
    assert_eq!(stats.count("mov"), 3);
    assert_eq!(stats.count("cmp"), 1);
    assert_eq!(stats.count("nop"), 1);
    assert_eq!(stats.count("int"), 1);
    stats.print();
}
