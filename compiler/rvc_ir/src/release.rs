//! Tree teardown.
//!
//! Dropping a [`Node`] frees it recursively, which is fine for trees built
//! from ordinary programs. [`release`] tears a tree down with an explicit
//! worklist instead, so depth is bounded by heap rather than stack, and
//! reports what it freed so callers can check for leaks.

use crate::{Node, Text};

/// What a call to [`release`] freed.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct Released {
    pub nodes: usize,
    /// Owned text payloads. Static text is not counted.
    pub owned_text: usize,
}

/// Free an entire tree. Releasing `None` is a no-op.
pub fn release(root: Option<Node>) -> Released {
    let mut released = Released::default();
    let mut pending: Vec<Node> = root.into_iter().collect();

    while let Some(node) = pending.pop() {
        released.nodes += 1;
        match node {
            Node::Program {
                globals,
                functions,
                body,
            } => {
                pending.extend(globals);
                pending.extend(functions);
                pending.extend(body);
            }
            Node::VarDecl { name, .. } => released.text(name),
            Node::Function {
                name,
                params,
                body,
                locals,
            } => {
                pending.extend(params);
                pending.extend(body);
                pending.extend(locals);
                released.text(name);
            }
            Node::StatementBlock { stmts } => pending.extend(stmts),
            Node::FunCall { name, args } => {
                pending.extend(args);
                released.text(name);
            }
            Node::Assignment {
                name, value, index, ..
            } => {
                pending.extend(value.map(|n| *n));
                pending.extend(index.map(|n| *n));
                released.text(name);
            }
            Node::While { cond, body } => {
                pending.extend(cond.map(|n| *n));
                pending.extend(body);
            }
            Node::IfThen {
                cond,
                then_body,
                else_body,
            } => {
                pending.extend(cond.map(|n| *n));
                pending.extend(then_body);
                pending.extend(else_body);
            }
            Node::Expression { left, right, .. } | Node::RelExpr { left, right, .. } => {
                pending.extend(left.map(|n| *n));
                pending.extend(right.map(|n| *n));
            }
            Node::VarRef { name, index, .. } => {
                pending.extend(index.map(|n| *n));
                released.text(name);
            }
            Node::Constant { text, .. } => {
                if let Some(text) = text {
                    released.text(text);
                }
            }
            Node::Argument { expr, .. } => pending.extend(expr.map(|n| *n)),
        }
    }

    released
}

impl Released {
    fn text(&mut self, text: Text) {
        if text.is_owned() {
            self.owned_text += 1;
        }
    }
}
