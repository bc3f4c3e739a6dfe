//! Whole-program code generation.
//!
//! Wraps the compiled expression in the `scheme_entry` prologue/epilogue
//! expected by the C runtime: a cdecl function that saves `%esi`, `%edi`,
//! `%edx`, evaluates the program into `%eax`, restores, and returns.

use super::state::WORDSIZE;
use super::{CodeGen, CodeGenError};
use crate::ast::Expr;
use crate::immediate::encode;
use std::fmt::Write as _;

impl CodeGen {
    /// Compile one expression, leaving its tagged result in `%eax`.
    ///
    /// `si` is the byte offset of the next free stack slot (negative,
    /// a multiple of the word size). The expression may scribble on `si`
    /// and below; slots above `si` are preserved.
    pub fn compile_expr(&mut self, expr: &Expr, si: i32) -> Result<(), CodeGenError> {
        if let Some(imm) = expr.as_immediate() {
            writeln!(self.output, "movl ${}, %eax", encode(imm) as i32)?;
            return Ok(());
        }
        match expr.as_primcall() {
            Some((op, args)) => self.compile_primcall(op, args, si),
            None => Err(CodeGenError::UnrecognizedExpr(expr.to_string())),
        }
    }

    /// Compile a whole program into assembly text.
    ///
    /// Consumes the buffer; a `CodeGen` produces at most one program.
    pub fn codegen_program(&mut self, program: &Expr) -> Result<String, CodeGenError> {
        writeln!(self.output, ".text")?;
        writeln!(self.output, ".p2align 4,,15")?;
        writeln!(self.output, ".globl scheme_entry")?;
        writeln!(self.output, "scheme_entry:")?;

        // save state for the incoming call from C
        writeln!(self.output, "push %esi")?;
        writeln!(self.output, "push %edi")?;
        writeln!(self.output, "push %edx")?;

        self.compile_expr(program, -WORDSIZE)?;

        // restore and return to C, result tagged in %eax
        writeln!(self.output, "pop %edx")?;
        writeln!(self.output, "pop %edi")?;
        writeln!(self.output, "pop %esi")?;
        writeln!(self.output, "ret")?;

        Ok(std::mem::take(&mut self.output))
    }
}
