//! Configuration system for the VR4300 core.
//!
//! This module defines all configuration structures used to parameterize
//! the machine. It provides:
//! 1. **Defaults:** Baseline hardware constants (entry point, RAM size, reset COP0 values, dynarec tuning).
//! 2. **Structures:** Hierarchical config for general, memory, CPU, and dynarec settings.
//! 3. **Loading:** JSON parsing from a string or a file.
//!
//! Every field has a default, so a partial (or empty) JSON object is a valid configuration.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::error::ConfigError;

/// Default configuration constants for the machine.
mod defaults {
    /// Post-boot entry point: the first instruction of the cartridge boot code in SP DMEM.
    pub const START_PC: u64 = 0xFFFF_FFFF_A400_0040;

    /// Total size of RDRAM (8 MiB, expansion pak installed).
    pub const RAM_SIZE: usize = 8 * 1024 * 1024;

    /// Status as left by the boot ROM: CU0, CU1, and FR set.
    pub const INITIAL_STATUS: u64 = 0x3400_0000;

    /// Config register reset value.
    pub const INITIAL_CONFIG: u64 = 0x7006_E463;

    /// Block-entry visits before a program counter starts recording.
    pub const HOT_THRESHOLD: u32 = 500;

    /// Longest trace the recorder accumulates before compiling.
    pub const MAX_FRAGMENT_OPS: usize = 250;
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use vrsim_core::config::Config;
///
/// let json = r#"{
///     "general": { "trace_instructions": true },
///     "memory": { "ram_size": 4194304 },
///     "dynarec": { "hot_threshold": 10 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert!(config.general.trace_instructions);
/// assert_eq!(config.memory.ram_size, 4 * 1024 * 1024);
/// assert_eq!(config.dynarec.hot_threshold, 10);
/// assert_eq!(config.dynarec.max_fragment_ops, 250);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General simulation settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Main memory configuration
    #[serde(default)]
    pub memory: MemoryConfig,
    /// CPU reset state
    #[serde(default)]
    pub cpu: CpuConfig,
    /// Dynamic recompiler tuning
    #[serde(default)]
    pub dynarec: DynarecConfig,
}

impl Config {
    /// Parses a configuration from a JSON document.
    ///
    /// # Arguments
    ///
    /// * `json` - The JSON text. Missing fields take their defaults.
    ///
    /// # Returns
    ///
    /// The parsed configuration, or `ConfigError::Json` on malformed input.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// General simulation settings and options.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Emit a `trace!` event for every executed instruction
    #[serde(default)]
    pub trace_instructions: bool,

    /// Initial PC value (defaults to the boot code entry in SP DMEM)
    #[serde(default = "GeneralConfig::default_start_pc")]
    pub start_pc: u64,

    /// Fast-forward self-branch idle loops to the next scheduled event
    #[serde(default = "GeneralConfig::default_idle_loop_skip")]
    pub idle_loop_skip: bool,
}

impl GeneralConfig {
    /// Returns the default starting program counter.
    const fn default_start_pc() -> u64 {
        defaults::START_PC
    }

    const fn default_idle_loop_skip() -> bool {
        true
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_instructions: false,
            start_pc: defaults::START_PC,
            idle_loop_skip: true,
        }
    }
}

/// Main memory configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// RDRAM size in bytes, mapped at physical address 0
    #[serde(default = "MemoryConfig::default_ram_size")]
    pub ram_size: usize,
}

impl MemoryConfig {
    const fn default_ram_size() -> usize {
        defaults::RAM_SIZE
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            ram_size: defaults::RAM_SIZE,
        }
    }
}

/// Reset values of the COP0 registers the boot ROM leaves configured.
#[derive(Debug, Clone, Deserialize)]
pub struct CpuConfig {
    /// Status register after reset
    #[serde(default = "CpuConfig::default_status")]
    pub initial_status: u64,

    /// Config register after reset
    #[serde(default = "CpuConfig::default_config")]
    pub initial_config: u64,
}

impl CpuConfig {
    const fn default_status() -> u64 {
        defaults::INITIAL_STATUS
    }

    const fn default_config() -> u64 {
        defaults::INITIAL_CONFIG
    }
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            initial_status: defaults::INITIAL_STATUS,
            initial_config: defaults::INITIAL_CONFIG,
        }
    }
}

/// Dynamic recompiler configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DynarecConfig {
    /// Enable fragment recording and execution
    #[serde(default = "DynarecConfig::default_enabled")]
    pub enabled: bool,

    /// Block-entry visits before recording starts
    #[serde(default = "DynarecConfig::default_hot_threshold")]
    pub hot_threshold: u32,

    /// Maximum instructions per fragment
    #[serde(default = "DynarecConfig::default_max_ops")]
    pub max_fragment_ops: usize,
}

impl DynarecConfig {
    const fn default_enabled() -> bool {
        true
    }

    const fn default_hot_threshold() -> u32 {
        defaults::HOT_THRESHOLD
    }

    const fn default_max_ops() -> usize {
        defaults::MAX_FRAGMENT_OPS
    }
}

impl Default for DynarecConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hot_threshold: defaults::HOT_THRESHOLD,
            max_fragment_ops: defaults::MAX_FRAGMENT_OPS,
        }
    }
}
