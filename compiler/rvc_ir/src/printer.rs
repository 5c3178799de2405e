//! Debug dump of a syntax tree.
//!
//! One line per node, indented three spaces per level, with `--section--`
//! headings separating the child lists of programs, functions, loops,
//! conditionals and assignments. The output is informational only.

use std::fmt::{self, Write};

use crate::stack::ensure_sufficient_stack;
use crate::{DataType, Node, VarKind};

const INDENT: usize = 3;

/// Write the tree rooted at `node` to `out`.
pub fn dump(node: &Node, out: &mut impl Write) -> fmt::Result {
    print_node(node, 0, out)
}

/// Dump the tree rooted at `node` into a new string.
pub fn dump_to_string(node: &Node) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = dump(node, &mut out);
    out
}

fn prefix(level: usize, out: &mut impl Write) -> fmt::Result {
    write!(out, "{:width$}", "", width = level * INDENT)
}

fn heading(label: &str, level: usize, out: &mut impl Write) -> fmt::Result {
    prefix(level, out)?;
    writeln!(out, "--{label}--")
}

fn print_list(nodes: &[Node], level: usize, out: &mut impl Write) -> fmt::Result {
    nodes.iter().try_for_each(|node| print_node(node, level, out))
}

fn print_child(child: Option<&Node>, level: usize, out: &mut impl Write) -> fmt::Result {
    match child {
        Some(node) => print_node(node, level, out),
        None => Ok(()),
    }
}

fn print_node(node: &Node, level: usize, out: &mut impl Write) -> fmt::Result {
    ensure_sufficient_stack(|| {
        prefix(level, out)?;
        match node {
            Node::Program {
                globals,
                functions,
                body,
            } => {
                writeln!(out, "Whole Program AST:")?;
                heading("globalvars", level + 1, out)?;
                print_list(globals, level + 1, out)?;
                heading("functions", level + 1, out)?;
                print_list(functions, level + 1, out)?;
                heading("program", level + 1, out)?;
                print_list(body, level + 1, out)
            }
            Node::VarDecl {
                name,
                ty,
                kind,
                size,
                ..
            } => {
                if *kind == VarKind::GlobalArray {
                    writeln!(out, "Variable declaration ({name}) type {ty} array size {size}")
                } else {
                    writeln!(out, "Variable declaration ({name}) type {ty}")
                }
            }
            Node::Function {
                name,
                params,
                body,
                locals,
            } => {
                writeln!(out, "Function def ({name})")?;
                heading("params", level + 1, out)?;
                print_list(params, level + 1, out)?;
                heading("locals", level + 1, out)?;
                print_list(locals, level + 1, out)?;
                heading("body", level + 1, out)?;
                print_list(body, level + 1, out)
            }
            Node::StatementBlock { stmts } => {
                writeln!(out, "Statement block")?;
                print_list(stmts, level + 1, out)
            }
            Node::FunCall { name, args } => {
                writeln!(out, "Function call ({name})")?;
                print_list(args, level + 1, out)
            }
            Node::Argument { expr, .. } => {
                writeln!(out, "Funcall argument")?;
                print_child(expr.as_deref(), level + 1, out)
            }
            Node::Assignment {
                name,
                kind,
                value,
                index,
                ..
            } => {
                if *kind == VarKind::GlobalArray {
                    writeln!(out, "Assignment to ({name}) array var")?;
                    heading("index", level + 1, out)?;
                    print_child(index.as_deref(), level + 1, out)?;
                } else {
                    writeln!(out, "Assignment to ({name}) simple var")?;
                }
                heading("right hand side", level + 1, out)?;
                print_child(value.as_deref(), level + 1, out)
            }
            Node::While { cond, body } => {
                writeln!(out, "While loop")?;
                print_child(cond.as_deref(), level + 1, out)?;
                heading("body", level + 1, out)?;
                print_list(body, level + 1, out)
            }
            Node::IfThen {
                cond,
                then_body,
                else_body,
            } => {
                writeln!(out, "If then")?;
                print_child(cond.as_deref(), level + 1, out)?;
                heading("ifpart", level + 1, out)?;
                print_list(then_body, level + 1, out)?;
                heading("elsepart", level + 1, out)?;
                print_list(else_body, level + 1, out)
            }
            Node::Expression { op, left, right } => {
                writeln!(out, "Expression (op {},{op})", u32::from(*op))?;
                print_child(left.as_deref(), level + 1, out)?;
                print_child(right.as_deref(), level + 1, out)
            }
            Node::RelExpr { op, left, right } => {
                writeln!(out, "Relational Expression (op {},{op})", u32::from(*op))?;
                print_child(left.as_deref(), level + 1, out)?;
                print_child(right.as_deref(), level + 1, out)
            }
            Node::VarRef {
                name, kind, index, ..
            } => {
                if *kind == VarKind::GlobalArray {
                    writeln!(out, "Variable ref ({name}) array ref")?;
                    print_child(index.as_deref(), level + 1, out)
                } else {
                    writeln!(out, "Variable ref ({name})")
                }
            }
            Node::Constant { ty, value, text } => match ty {
                DataType::Int => writeln!(out, "Int Constant = {value}"),
                DataType::Long => writeln!(out, "Long Constant = {value}"),
                DataType::String => {
                    let text = text.as_ref().map_or("", |t| t.as_str());
                    writeln!(out, "String Constant = ({text})")
                }
                DataType::ReturnValue => writeln!(out, "Return Value"),
            },
        }
    })
}
