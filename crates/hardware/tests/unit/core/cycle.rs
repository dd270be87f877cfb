//! # Execution Cycle Tests
//!
//! Tests for fetch, decode and the cycle state machine.

use crate::common::builder::program::Program;
use crate::common::harness::{CODE_BASE, DATA_BASE, TestContext};
use elfx86_core::common::{AccessType, EmuError, VirtAddr};
use elfx86_core::config::Config;
use elfx86_core::core::Cpu;
use elfx86_core::core::arch::Reg;
use elfx86_core::core::cpu::CycleOutcome;
use elfx86_core::memory::{Page, Permissions};
use elfx86_core::sim::loader::build_memory;
use elfx86_core::syscall::BufferIo;
use rstest::rstest;

#[test]
fn test_nop_advances_rip_by_one() {
    let mut ctx = TestContext::new(&Program::new().nop().build());
    assert_eq!(ctx.step().unwrap(), CycleOutcome::Continue);
    assert_eq!(ctx.rip(), CODE_BASE + 1);
}

#[test]
fn test_cursor_only_lives_for_one_cycle() {
    let mut ctx = TestContext::new(&Program::new().nop().build());
    assert!(ctx.cpu.cursor().is_none());
    let _ = ctx.step().unwrap();
    assert!(ctx.cpu.cursor().is_none());
}

#[test]
fn test_fetch_opens_cursor_at_rip() {
    let mut ctx = TestContext::new(&Program::new().nop().nop().build());
    let _ = ctx.step().unwrap();
    ctx.cpu.fetch().unwrap();
    let cursor = ctx.cpu.cursor().unwrap();
    assert_eq!(cursor.page.base, VirtAddr(CODE_BASE));
    assert_eq!(cursor.offset, 1);
}

#[test]
fn test_fetch_from_non_executable_page_is_access_violation() {
    let mut ctx = TestContext::new(&[]);
    ctx.cpu.rip = VirtAddr(DATA_BASE);
    assert!(matches!(
        ctx.step(),
        Err(EmuError::AccessViolation {
            address,
            access: AccessType::Fetch
        }) if address == DATA_BASE
    ));
}

#[test]
fn test_fetch_from_unmapped_address_is_out_of_bounds() {
    let mut ctx = TestContext::new(&[]);
    ctx.cpu.rip = VirtAddr(0x10);
    assert!(matches!(ctx.step(), Err(EmuError::AddressOutOfBounds(0x10))));
}

#[test]
fn test_fetch_from_execute_only_page_is_read_violation() {
    let code = Program::new().nop().build();
    let pages =
        vec![Page::from_bytes(VirtAddr(0x1000), &code, 0x10, 1, Permissions::EXECUTE).unwrap()];
    let memory = build_memory(pages, &Config::default()).unwrap();
    let (io, _) = BufferIo::new(Vec::new());
    let mut cpu = Cpu::with_io(memory, VirtAddr(0x1000), Box::new(io));
    assert!(matches!(
        cpu.cycle(),
        Err(EmuError::AccessViolation {
            address: 0x1000,
            access: AccessType::Read
        })
    ));
    assert_eq!(cpu.rip, VirtAddr(0x1000));
}

#[test]
fn test_unknown_opcode_is_invalid_instruction() {
    let mut ctx = TestContext::new(&[0x06]);
    assert!(matches!(
        ctx.step(),
        Err(EmuError::InvalidInstruction { address, byte: 0x06, .. }) if address == CODE_BASE
    ));
}

#[test]
fn test_operand_size_prefix_is_unsupported() {
    let mut ctx = TestContext::new(&[0x66, 0x90]);
    assert!(matches!(ctx.step(), Err(EmuError::UnsupportedFeature(_))));
}

#[rstest]
#[case(&[0x0F, 0x05])]
#[case(&[0x0F, 0x38, 0x00, 0xC0])]
#[case(&[0x0F, 0x3A, 0x0F, 0xC1, 0x08])]
fn test_multi_byte_opcodes_are_unsupported(#[case] code: &[u8]) {
    let mut ctx = TestContext::new(code);
    assert!(matches!(ctx.step(), Err(EmuError::UnsupportedFeature(_))));
}

#[test]
fn test_escape_byte_at_page_end_is_unsupported() {
    let mut code = vec![0x90; 0xFFF];
    code.push(0x0F);
    let mut ctx = TestContext::new(&code);
    ctx.cpu.rip = VirtAddr(CODE_BASE + 0xFFF);
    assert!(matches!(
        ctx.step(),
        Err(EmuError::UnsupportedFeature(ref m)) if m.contains("0F")
    ));
}

#[test]
fn test_instruction_running_off_page_is_out_of_bounds() {
    let code = [0xB8, 0x01, 0x02];
    let perms = Permissions::READ | Permissions::EXECUTE;
    let pages = vec![Page::from_bytes(VirtAddr(0x1000), &code, 3, 1, perms).unwrap()];
    let memory = build_memory(pages, &Config::default()).unwrap();
    let (io, _) = BufferIo::new(Vec::new());
    let mut cpu = Cpu::with_io(memory, VirtAddr(0x1000), Box::new(io));
    assert!(matches!(cpu.cycle(), Err(EmuError::AddressOutOfBounds(0x1003))));
}

#[test]
fn test_failed_cycle_leaves_flags_untouched() {
    let code = Program::new()
        .mov_imm(Reg::Rax, 1)
        .mov_imm(Reg::Rbx, 1)
        .cmp(Reg::Rbx, Reg::Rax)
        .raw(&[0x06])
        .build();
    let mut ctx = TestContext::new(&code);
    ctx.steps(3);
    let before = ctx.cpu.rflags;
    assert!(ctx.step().is_err());
    assert_eq!(ctx.cpu.rflags, before);
    assert!(ctx.cpu.cursor().is_none());
}

#[test]
fn test_no_cycle_runs_after_exit() {
    let code = Program::new().sys_exit(0).nop().build();
    let mut ctx = TestContext::new(&code);
    assert_eq!(ctx.run().unwrap(), 3);
    let rip = ctx.rip();
    assert_eq!(ctx.step().unwrap(), CycleOutcome::Halt);
    assert_eq!(ctx.rip(), rip);
    assert_eq!(ctx.cpu.stats.cycles, 3);
}

#[test]
fn test_stats_count_mnemonics() {
    let code = Program::new().nop().nop().sys_exit(0).build();
    let mut ctx = TestContext::new(&code);
    let _ = ctx.run().unwrap();
    assert_eq!(ctx.cpu.stats.count("nop"), 2);
    assert_eq!(ctx.cpu.stats.count("mov"), 2);
    assert_eq!(ctx.cpu.stats.count("int"), 1);
    assert_eq!(ctx.cpu.stats.syscalls.get("exit"), Some(&1));
}
