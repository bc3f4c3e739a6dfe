//! CodeGen state and stack-slot accounting.

use super::CodeGenError;
use crate::immediate::{BOOL_SHIFT, BOOL_TAG};
use std::fmt::Write as _;

/// Bytes per stack slot. The stack index moves down by this much whenever
/// an intermediate value is spilled.
pub const WORDSIZE: i32 = 4;

/// Accumulates the assembly program as it is generated.
///
/// The buffer is append-only: lines land in the exact order they must
/// appear in the output file, and an error discards the whole buffer.
pub struct CodeGen {
    pub(super) output: String,
}

impl Default for CodeGen {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGen {
    pub fn new() -> Self {
        CodeGen {
            output: String::new(),
        }
    }

    /// Materialize the current comparison flags as a tagged boolean in
    /// `%eax` using the given `set` instruction (`sete`, `setl`, ...).
    ///
    /// `movl` does not touch the flags, so the zero load is safe between
    /// the comparison and the `set`.
    pub(super) fn emit_flags_to_bool(&mut self, setcc: &str) -> Result<(), CodeGenError> {
        writeln!(self.output, "movl $0, %eax")?;
        writeln!(self.output, "{} %al", setcc)?;
        writeln!(self.output, "sall ${}, %eax", BOOL_SHIFT)?;
        writeln!(self.output, "orl ${}, %eax", BOOL_TAG)?;
        Ok(())
    }

    /// Compare `%eax` against an immediate and leave `#t`/`#f` in `%eax`.
    pub(super) fn emit_eq_imm_bool(&mut self, value: i32) -> Result<(), CodeGenError> {
        writeln!(self.output, "cmpl ${}, %eax", value)?;
        self.emit_flags_to_bool("sete")
    }
}
