//! Abstract syntax tree for the compiled Scheme subset
//!
//! An expression is either an atom (integer, boolean, character, symbol) or
//! a list of expressions. The tree is immutable once parsed; the code
//! generator destructures it, it never rewrites it.

use crate::immediate::Immediate;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64),
    Bool(bool),
    Char(char),
    Sym(String),
    List(Vec<Expr>),
}

impl Expr {
    /// View this expression as a primitive call: a list whose head is the
    /// symbol `primcall` followed by an operator name and its arguments.
    pub fn as_primcall(&self) -> Option<(&str, &[Expr])> {
        let Expr::List(items) = self else { return None };
        let [Expr::Sym(head), Expr::Sym(op), args @ ..] = items.as_slice() else {
            return None;
        };
        (head == "primcall").then_some((op.as_str(), args))
    }

    /// View this expression as an immediate value, if it is one.
    ///
    /// A one-character symbol counts as a character: source programs write
    /// characters as bare letters (`a`, `Z`), which the parser classifies
    /// as symbols.
    pub fn as_immediate(&self) -> Option<Immediate> {
        match self {
            Expr::Int(n) => Some(Immediate::Int(*n)),
            Expr::Bool(b) => Some(Immediate::Bool(*b)),
            Expr::Char(c) => Some(Immediate::Char(*c)),
            Expr::Sym(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Immediate::Char(c)),
                    _ => None,
                }
            }
            Expr::List(_) => None,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Int(n) => write!(f, "{}", n),
            Expr::Bool(true) => write!(f, "#t"),
            Expr::Bool(false) => write!(f, "#f"),
            Expr::Char(c) => write!(f, "#\\{}", c),
            Expr::Sym(s) => write!(f, "{}", s),
            Expr::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}
