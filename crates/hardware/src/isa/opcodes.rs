//! x86-64 Opcode Bytes.
//!
//! Defines the first-byte opcodes of the implemented subset and the prefix and
//! escape bytes the decoder rejects.

/// Operand-size override prefix. Not supported.
pub const PREFIX_OPSIZE: u8 = 0x66;

/// Two-byte opcode escape. Not supported.
pub const ESCAPE_0F: u8 = 0x0F;
/// Second byte of a `0F 38` three-byte opcode.
pub const ESCAPE_0F38: u8 = 0x38;
/// Second byte of a `0F 3A` three-byte opcode.
pub const ESCAPE_0F3A: u8 = 0x3A;

/// `CMP r/m32, r32`.
pub const CMP_RM_R: u8 = 0x39;
/// `JE rel8`.
pub const JE_REL8: u8 = 0x74;
/// Group 1 `r/m32, imm8` (`/0` is ADD).
pub const GRP1_RM_IMM8: u8 = 0x83;
/// `MOV r/m32, r32`.
pub const MOV_RM_R: u8 = 0x89;
/// `MOV r32, r/m32`.
pub const MOV_R_RM: u8 = 0x8B;
/// `NOP`.
pub const NOP: u8 = 0x90;
/// `MOV r32, imm32`, first of eight; the low three bits pick the register.
pub const MOV_R_IMM32: u8 = 0xB8;
/// `RET`.
pub const RET: u8 = 0xC3;
/// `INT imm8`.
pub const INT_IMM8: u8 = 0xCD;
/// `CALL rel32`.
pub const CALL_REL32: u8 = 0xE8;
/// `JMP rel8`.
pub const JMP_REL8: u8 = 0xEB;

/// Group 1 extension selecting ADD.
pub const GRP1_ADD: u8 = 0;

/// SIB byte meaning "no base, no index, disp32 follows".
pub const SIB_DISP32: u8 = 0x25;
/// ModR/M for `[SIB]` with reg field eax.
pub const MODRM_SIB_EAX: u8 = 0x04;
/// ModR/M for `[SIB]` with reg field ebx.
pub const MODRM_SIB_EBX: u8 = 0x1C;

/// Linux 32-bit syscall gate vector.
pub const INT_SYSCALL: u8 = 0x80;
