//! Primitive operator emitters.
//!
//! Unary operators compile their argument at the current stack index and
//! apply a short tail to `%eax`. Binary operators compile the first
//! operand, spill it to the slot at `si`, compile the second operand one
//! slot further down, then combine. Arity is checked before anything is
//! emitted for the operator.

use super::state::WORDSIZE;
use super::{CodeGen, CodeGenError};
use crate::ast::Expr;
use crate::immediate::{
    BOOL_MASK, BOOL_TAG, CHAR_MASK, CHAR_SHIFT, CHAR_TAG, FIXNUM_MASK, FIXNUM_SHIFT, FIXNUM_TAG,
    Immediate, encode,
};
use std::fmt::Write as _;

impl CodeGen {
    pub(super) fn compile_primcall(
        &mut self,
        op: &str,
        args: &[Expr],
        si: i32,
    ) -> Result<(), CodeGenError> {
        match op {
            "add1" => {
                self.unary_operand(op, args, si)?;
                writeln!(self.output, "addl ${}, %eax", encode(Immediate::Int(1)))?;
            }
            "sub1" => {
                self.unary_operand(op, args, si)?;
                writeln!(self.output, "subl ${}, %eax", encode(Immediate::Int(1)))?;
            }
            "integer?" => {
                self.unary_operand(op, args, si)?;
                writeln!(self.output, "andl ${}, %eax", FIXNUM_MASK)?;
                self.emit_eq_imm_bool(FIXNUM_TAG as i32)?;
            }
            "zero?" => {
                self.unary_operand(op, args, si)?;
                self.emit_eq_imm_bool(encode(Immediate::Int(0)) as i32)?;
            }
            "boolean?" => {
                self.unary_operand(op, args, si)?;
                writeln!(self.output, "andl ${}, %eax", BOOL_MASK)?;
                self.emit_eq_imm_bool(BOOL_TAG as i32)?;
            }
            "char?" => {
                self.unary_operand(op, args, si)?;
                writeln!(self.output, "andl ${}, %eax", CHAR_MASK)?;
                self.emit_eq_imm_bool(CHAR_TAG as i32)?;
            }
            "+" => {
                let (a, b) = binary_operands(op, args)?;
                self.spill_pair(a, b, si)?;
                writeln!(self.output, "addl {}(%esp), %eax", si)?;
            }
            "-" => {
                // operands swapped so the spilled slot holds the
                // subtrahend and %eax ends up with a - b
                let (a, b) = binary_operands(op, args)?;
                self.spill_pair(b, a, si)?;
                writeln!(self.output, "subl {}(%esp), %eax", si)?;
            }
            "*" => {
                // both operands carry the <<2 tag; shifting one back down
                // leaves the product tagged once
                let (a, b) = binary_operands(op, args)?;
                self.spill_pair(a, b, si)?;
                writeln!(self.output, "shrl ${}, %eax", FIXNUM_SHIFT)?;
                writeln!(self.output, "imull {}(%esp), %eax", si)?;
            }
            "=" => {
                let (a, b) = binary_operands(op, args)?;
                self.spill_pair(a, b, si)?;
                writeln!(self.output, "cmpl %eax, {}(%esp)", si)?;
                self.emit_flags_to_bool("sete")?;
            }
            "<" => {
                let (a, b) = binary_operands(op, args)?;
                self.spill_pair(a, b, si)?;
                writeln!(self.output, "cmpl %eax, {}(%esp)", si)?;
                self.emit_flags_to_bool("setl")?;
            }
            "char=?" => {
                let (a, b) = binary_operands(op, args)?;
                self.spill_pair(a, b, si)?;
                writeln!(self.output, "shrl ${}, %eax", CHAR_SHIFT)?;
                writeln!(self.output, "shrl ${}, {}(%esp)", CHAR_SHIFT, si)?;
                writeln!(self.output, "cmpl %eax, {}(%esp)", si)?;
                self.emit_flags_to_bool("sete")?;
            }
            _ => return Err(CodeGenError::UnknownOperator(op.to_string())),
        }
        Ok(())
    }

    /// Check unary arity and compile the single argument into `%eax`.
    fn unary_operand(&mut self, op: &str, args: &[Expr], si: i32) -> Result<(), CodeGenError> {
        let [arg] = args else {
            return Err(CodeGenError::Arity {
                op: op.to_string(),
                expected: 1,
                found: args.len(),
            });
        };
        self.compile_expr(arg, si)
    }

    /// Compile `first` at `si`, spill it there, then compile `second` one
    /// slot further down, leaving it in `%eax`.
    fn spill_pair(&mut self, first: &Expr, second: &Expr, si: i32) -> Result<(), CodeGenError> {
        self.compile_expr(first, si)?;
        writeln!(self.output, "movl %eax, {}(%esp)", si)?;
        self.compile_expr(second, si - WORDSIZE)
    }
}

/// Check binary arity, returning the operand pair in source order.
fn binary_operands<'a>(op: &str, args: &'a [Expr]) -> Result<(&'a Expr, &'a Expr), CodeGenError> {
    let [a, b] = args else {
        return Err(CodeGenError::Arity {
            op: op.to_string(),
            expected: 2,
            found: args.len(),
        });
    };
    Ok((a, b))
}
