//! Operator codes.
//!
//! The front end stores the operator character on the node as-is. Decoding
//! happens here so an unknown code stays visible to the code generator,
//! which reports it instead of guessing.

/// Binary arithmetic operators of an `Expression` node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl ArithOp {
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            '+' => Some(Self::Add),
            '-' => Some(Self::Sub),
            '*' => Some(Self::Mul),
            '/' => Some(Self::Div),
            '%' => Some(Self::Rem),
            _ => None,
        }
    }

    pub const fn code(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
            Self::Rem => '%',
        }
    }
}

/// Relational operators of a `RelExpr` node.
///
/// `=` is equality and `!` is inequality in the source language.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum RelOp {
    Eq,
    Ne,
    Lt,
    Gt,
}

impl RelOp {
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            '=' => Some(Self::Eq),
            '!' => Some(Self::Ne),
            '<' => Some(Self::Lt),
            '>' => Some(Self::Gt),
            _ => None,
        }
    }

    pub const fn code(self) -> char {
        match self {
            Self::Eq => '=',
            Self::Ne => '!',
            Self::Lt => '<',
            Self::Gt => '>',
        }
    }
}
