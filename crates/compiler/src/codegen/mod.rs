//! x86 code generation
//!
//! This module generates 32-bit x86 assembly as text (`.s` files) for
//! parsed programs.
//!
//! # Key Concepts
//!
//! ## Value Representation
//!
//! Every runtime value is a single 32-bit tagged word (see
//! [`crate::immediate`]). The generator's contract, for every expression it
//! compiles: the fully-tagged result ends up in `%eax`.
//!
//! ## Stack Discipline
//!
//! Intermediates are spilled to stack slots addressed relative to `%esp`.
//! The stack index `si` names the next free slot as a negative byte offset
//! and is threaded down the recursion by value; a callee may use `si` and
//! anything below it as scratch but must preserve the slots above. No
//! frame pointer is involved (the runtime link step passes
//! `-fomit-frame-pointer`).
//!
//! ## Evaluation Order
//!
//! Arguments compile left to right. Binary operators spill the first
//! operand and evaluate the second into `%eax`; subtraction swaps the
//! order so the difference comes out with the source operand order.
//!
//! # Module Structure
//!
//! - `state.rs`: the CodeGen buffer and shared emit helpers
//! - `program.rs`: expression dispatch and the `scheme_entry` wrapper
//! - `primitives.rs`: the primitive-operator table
//! - `error.rs`: error types

mod error;
mod primitives;
mod program;
mod state;

pub use error::CodeGenError;
pub use state::{CodeGen, WORDSIZE};
