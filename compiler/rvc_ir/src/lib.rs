//! rvc IR - syntax tree for the rvc compiler
//!
//! This crate holds the data the front end hands to the code generator:
//! - [`Node`], one variant per construct, with named child fields
//! - [`DataType`] and [`VarKind`] tags attached to declarations and references
//! - [`Text`], names and literals tagged as owned or static
//! - operator decoding ([`ArithOp`], [`RelOp`])
//! - the debug tree printer ([`dump`])
//! - tree teardown with accounting ([`release`])
//!
//! # Shape
//!
//! The root is always [`Node::Program`] with three (possibly empty) lists:
//! global declarations, function definitions and top-level statements.
//! Repetition (declarations, parameters, statements, arguments) is a `Vec`,
//! so every subtree has exactly one owner and cycles cannot be built.
//!
//! Single-child slots are `Option<Box<Node>>`. A missing child is therefore
//! representable, and consumers treat it as a malformed tree rather than
//! assuming the front end got it right.

mod node;
mod ops;
mod printer;
mod release;
pub mod stack;
mod text;
mod types;

pub use node::{Node, NodeKind};
pub use ops::{ArithOp, RelOp};
pub use printer::{dump, dump_to_string};
pub use release::{release, Released};
pub use text::Text;
pub use types::{DataType, VarKind, WORD_SIZE};
