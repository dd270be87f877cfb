//! Main Execution Loop.
//!
//! This module implements the fetch, decode and execute cycle. It performs the following:
//! 1. **Fetch:** Resolves the page holding rip, checks Execute and opens a cursor there.
//! 2. **Decode:** Reads the opcode byte, rejects prefixes and escapes, looks up the handler.
//! 3. **Execute:** Runs the handler, stores the flags it returns and records statistics.
//! 4. **Observability:** Emits a `trace` event per instruction and optional stderr trace lines.

use tracing::trace;

use super::{Cpu, Cursor};
use crate::common::{AccessType, EmuError, Result, VirtAddr};
use crate::isa::Instruction;
use crate::isa::opcodes::{ESCAPE_0F, ESCAPE_0F38, ESCAPE_0F3A, PREFIX_OPSIZE};

/// Result of one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Run the next cycle.
    Continue,
    /// `exit` was serviced; no further cycle runs.
    Halt,
}

/// A decoded opcode, ready to execute.
#[derive(Clone, Copy, Debug)]
pub struct Decoded {
    /// Address of the opcode byte.
    pub address: VirtAddr,
    /// The opcode byte.
    pub opcode: u8,
    /// Its table entry.
    pub instruction: Instruction,
}

impl Cpu {
    /// Runs one fetch, decode and execute cycle.
    ///
    /// A halted CPU does nothing and reports [`CycleOutcome::Halt`] again.
    ///
    /// # Errors
    ///
    /// Any error raised while fetching, decoding or executing. The cursor is
    /// cleared either way.
    pub fn cycle(&mut self) -> Result<CycleOutcome> {
        if self.is_halted() {
            return Ok(CycleOutcome::Halt);
        }
        let outcome = self
            .fetch()
            .and_then(|()| self.decode())
            .and_then(|decoded| self.execute(decoded));
        self.cursor = None;
        outcome
    }

    /// Opens the instruction cursor at rip.
    ///
    /// # Errors
    ///
    /// - [`EmuError::AddressOutOfBounds`] if rip is unmapped.
    /// - [`EmuError::AccessViolation`] if its page is not executable, or not
    ///   readable (instruction bytes are read through [`crate::memory::Page::view`]).
    pub fn fetch(&mut self) -> Result<()> {
        let page = self.memory.resolve(self.rip)?;
        page.check(AccessType::Fetch, self.rip)?;
        let _ = page.view(self.rip)?;
        self.cursor = Some(Cursor {
            page: page.key(),
            offset: (self.rip.val() - page.base().val()) as usize,
        });
        Ok(())
    }

    /// Reads the opcode byte and finds its handler.
    ///
    /// # Errors
    ///
    /// - [`EmuError::UnsupportedFeature`] for the `0x66` prefix and for `0x0F`
    ///   two- and three-byte opcodes.
    /// - [`EmuError::InvalidInstruction`] for an unmapped opcode.
    pub fn decode(&mut self) -> Result<Decoded> {
        let address = self.rip;
        let opcode = self.next_u8()?;
        match opcode {
            PREFIX_OPSIZE => {
                return Err(EmuError::unsupported(format!(
                    "operand-size prefix 0x66 at {address}"
                )));
            }
            ESCAPE_0F => {
                let detail = match self.peek_u8() {
                    Ok(ESCAPE_0F38) => "three-byte opcode 0F 38".to_string(),
                    Ok(ESCAPE_0F3A) => "three-byte opcode 0F 3A".to_string(),
                    Ok(second) => format!("two-byte opcode 0F (second byte {second:#04x})"),
                    Err(_) => "opcode escape 0F at the end of its page".to_string(),
                };
                return Err(EmuError::unsupported(format!("{detail} at {address}")));
            }
            _ => {}
        }
        let instruction = self
            .opcodes
            .lookup(opcode)
            .ok_or(EmuError::InvalidInstruction {
                address: address.val(),
                byte: opcode,
                reason: "unknown opcode",
            })?;
        Ok(Decoded {
            address,
            opcode,
            instruction,
        })
    }

    /// Runs a decoded instruction and stores the flags it produces.
    ///
    /// # Errors
    ///
    /// Whatever the handler raises; flags are left unchanged in that case.
    pub fn execute(&mut self, decoded: Decoded) -> Result<CycleOutcome> {
        let Decoded {
            address,
            opcode,
            instruction,
        } = decoded;
        self.rflags = (instruction.exec)(self, opcode)?;
        self.stats.record_instruction(instruction.mnemonic);

        trace!(
            address = %address,
            opcode = format_args!("{opcode:#04x}"),
            mnemonic = instruction.mnemonic,
            rflags = ?self.rflags,
            "executed"
        );
        if self.trace {
            eprintln!(
                "{:#010x}: {:02x} {:<5} rip={:#x} rflags={:?}",
                address.val(),
                opcode,
                instruction.mnemonic,
                self.rip.val(),
                self.rflags
            );
        }

        Ok(if self.is_halted() {
            CycleOutcome::Halt
        } else {
            CycleOutcome::Continue
        })
    }

    /// The instruction bytes from the cursor to the end of its page.
    fn remaining(&self) -> Result<&[u8]> {
        let cursor = self
            .cursor
            .ok_or(EmuError::AddressOutOfBounds(self.rip.val()))?;
        let page = self
            .memory
            .page(cursor.page)
            .ok_or(EmuError::AddressOutOfBounds(self.rip.val()))?;
        let at = page.base().wrapping_offset(cursor.offset as i64);
        if at == page.end() {
            return Ok(&[]);
        }
        page.view(at)
    }

    /// Next instruction byte without consuming it.
    ///
    /// # Errors
    ///
    /// [`EmuError::AddressOutOfBounds`] past the end of the page, or outside a cycle.
    pub fn peek_u8(&self) -> Result<u8> {
        self.remaining()?
            .first()
            .copied()
            .ok_or(EmuError::AddressOutOfBounds(self.rip.val()))
    }

    /// Consumes `N` instruction bytes, advancing the cursor and rip.
    ///
    /// Instructions may not straddle pages: running out of bytes reports the
    /// first address past the page.
    fn next_bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let remaining = self.remaining()?;
        let bytes: [u8; N] = remaining
            .get(..N)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| {
                EmuError::AddressOutOfBounds(
                    self.rip.wrapping_offset(remaining.len() as i64).val(),
                )
            })?;
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.offset += N;
        }
        self.rip = self.rip.wrapping_offset(N as i64);
        Ok(bytes)
    }

    /// Consumes one instruction byte.
    ///
    /// # Errors
    ///
    /// [`EmuError::AddressOutOfBounds`] past the end of the page, or outside a cycle.
    pub fn next_u8(&mut self) -> Result<u8> {
        self.next_bytes::<1>().map(|[b]| b)
    }

    /// Consumes a little-endian 32-bit immediate or displacement.
    ///
    /// # Errors
    ///
    /// [`EmuError::AddressOutOfBounds`] if the value runs past the end of the page.
    pub fn next_u32(&mut self) -> Result<u32> {
        self.next_bytes().map(u32::from_le_bytes)
    }
}
