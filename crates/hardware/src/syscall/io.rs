//! Host I/O capability.
//!
//! The `read` and `write` syscalls never touch process streams directly;
//! they go through a [`HostIo`] owned by the CPU, so a program can be run
//! against real stdin/stdout or against in-memory buffers.

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Byte source and sink for the emulated program.
pub trait HostIo {
    /// Reads one byte, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Host I/O failure.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Writes all of `bytes`.
    ///
    /// # Errors
    ///
    /// Host I/O failure.
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;
}

/// The host process's stdin and stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdIo;

impl HostIo for StdIo {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match io::stdin().lock().read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(bytes)?;
        out.flush()
    }
}

/// A byte buffer shared between a [`BufferIo`] and whoever inspects it.
#[derive(Debug, Default, Clone)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current contents.
    pub fn contents(&self) -> Vec<u8> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn extend(&self, bytes: &[u8]) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(bytes);
    }
}

/// In-memory I/O: input from a fixed byte string, output into a [`SharedBuffer`].
pub struct BufferIo {
    input: VecDeque<u8>,
    output: SharedBuffer,
}

impl fmt::Debug for BufferIo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferIo")
            .field("pending_input", &self.input.len())
            .finish_non_exhaustive()
    }
}

impl BufferIo {
    /// Creates an I/O over `input`, returning it with a handle to its output.
    pub fn new(input: impl Into<Vec<u8>>) -> (Self, SharedBuffer) {
        let output = SharedBuffer::new();
        let io = Self {
            input: input.into().into(),
            output: output.clone(),
        };
        (io, output)
    }
}

impl HostIo for BufferIo {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.input.pop_front())
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.output.extend(bytes);
        Ok(())
    }
}
