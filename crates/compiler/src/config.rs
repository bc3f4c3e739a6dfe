//! Compiler configuration
//!
//! The core consumes one piece of configuration: where to drive the
//! external C toolchain from. The defaults reproduce
//! `gcc -fomit-frame-pointer -m32`; a TOML file can override the command
//! and its flags for hosts where the 32-bit-capable compiler goes by
//! another name:
//!
//! ```toml
//! [toolchain]
//! cc = "i686-linux-gnu-gcc"
//! flags = ["-fomit-frame-pointer"]
//! ```

use serde::Deserialize;
use std::path::Path;

/// Configuration for driving the external assembler/linker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// C compiler command used to assemble and link
    pub cc: String,

    /// Flags passed before the input files
    pub cc_flags: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            cc: "gcc".to_string(),
            cc_flags: vec!["-fomit-frame-pointer".to_string(), "-m32".to_string()],
        }
    }
}

impl CompilerConfig {
    pub fn new() -> Self {
        CompilerConfig::default()
    }

    /// Override the toolchain command (builder pattern)
    pub fn with_cc(mut self, cc: impl Into<String>) -> Self {
        self.cc = cc.into();
        self
    }

    /// Replace the toolchain flags
    pub fn with_cc_flags(mut self, flags: impl IntoIterator<Item = String>) -> Self {
        self.cc_flags = flags.into_iter().collect();
        self
    }

    /// Parse configuration from a TOML string, filling unset fields from
    /// the defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        let file: ConfigFile =
            toml::from_str(toml_str).map_err(|e| format!("Failed to parse config: {}", e))?;

        let mut config = CompilerConfig::default();
        if let Some(toolchain) = file.toolchain {
            if let Some(cc) = toolchain.cc {
                config.cc = cc;
            }
            if let Some(flags) = toolchain.flags {
                config.cc_flags = flags;
            }
        }
        Ok(config)
    }

    /// Load configuration from a TOML file on disk.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
        Self::from_toml(&content)
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    toolchain: Option<ToolchainSection>,
}

#[derive(Debug, Deserialize)]
struct ToolchainSection {
    cc: Option<String>,
    flags: Option<Vec<String>>,
}
