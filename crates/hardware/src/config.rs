//! Configuration for the emulator.
//!
//! This module defines the settings that parameterize a run. It provides:
//! 1. **Defaults:** The stack page location and size used when nothing is overridden.
//! 2. **Structures:** `general` (tracing) and `memory` (stack page) sections.
//! 3. **Parsing:** `Config::from_json` for the CLI's `--config` file.
//!
//! Every field is optional in JSON; missing fields take their defaults.

use serde::Deserialize;

use crate::common::constants::{MAX_PAGE_SIZE, STACK_BASE, STACK_SIZE};
use crate::common::{EmuError, Result};

/// Top-level emulator configuration.
///
/// # Examples
///
/// ```
/// use elfx86_core::config::Config;
///
/// let json = r#"{
///     "general": { "trace_instructions": true },
///     "memory": { "stack_size": 8192 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert!(config.general.trace_instructions);
/// assert_eq!(config.memory.stack_base, 0xFFFF_FFFF);
/// assert_eq!(config.memory.stack_size, 8192);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General run settings.
    pub general: GeneralConfig,
    /// Stack page placement.
    pub memory: MemoryConfig,
}

impl Config {
    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// [`EmuError::InvalidConfig`] when the text is not valid JSON for this
    /// schema, or when the stack size is zero or larger than a page may be.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| EmuError::InvalidConfig(e.to_string()))?;
        if config.memory.stack_size == 0 {
            return Err(EmuError::InvalidConfig(
                "memory.stack_size must be non-zero".into(),
            ));
        }
        if config.memory.stack_size > MAX_PAGE_SIZE {
            return Err(EmuError::InvalidConfig(format!(
                "memory.stack_size {:#x} exceeds {MAX_PAGE_SIZE:#x}",
                config.memory.stack_size
            )));
        }
        Ok(config)
    }
}

/// General run settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Print one line per executed instruction to stderr.
    pub trace_instructions: bool,
}

/// Placement of the synthesized stack page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Base virtual address of the stack page.
    pub stack_base: u64,
    /// Stack page size in bytes.
    pub stack_size: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            stack_base: STACK_BASE,
            stack_size: STACK_SIZE,
        }
    }
}
