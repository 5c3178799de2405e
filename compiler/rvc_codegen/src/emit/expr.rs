//! Expressions and branch conditions.

use rvc_ir::{ArithOp, DataType, Node, NodeKind, RelOp, Text, VarKind};

use crate::label::Label;
use crate::{CodegenContext, CodegenError};

use super::data::string_label;
use super::function::slot_offset;

/// Evaluate `node` into the accumulator `t0`.
pub(super) fn emit_expr(ctx: &mut CodegenContext<'_>, node: &Node) -> Result<(), CodegenError> {
    ctx.nested(|ctx| match node {
        Node::Constant { ty, value, .. } => emit_constant(ctx, *ty, *value),
        Node::VarRef {
            name,
            kind,
            slot,
            index,
            ..
        } => emit_var_ref(ctx, name, *kind, *slot, index.as_deref()),
        Node::Expression { op, left, right } => {
            let arith = ArithOp::from_code(*op).ok_or(CodegenError::UnknownOperator {
                node: NodeKind::Expression,
                op: *op,
            })?;
            let (left, right) = operands(NodeKind::Expression, left, right)?;
            emit_operands(ctx, left, right)?;
            ctx.instr(&format!("{}\tt0, t1, t0", arith_mnemonic(arith)));
            Ok(())
        }
        Node::RelExpr { .. } => Err(CodegenError::RelationalOutsideCondition),
        other => Err(CodegenError::UnexpectedNode {
            context: "expression",
            found: other.kind(),
        }),
    })
}

/// Evaluate a relational node and branch to `target` when it holds.
pub(super) fn emit_condition(
    ctx: &mut CodegenContext<'_>,
    node: &Node,
    target: Label,
) -> Result<(), CodegenError> {
    ctx.nested(|ctx| {
        let Node::RelExpr { op, left, right } = node else {
            return Err(CodegenError::UnexpectedNode {
                context: "relational condition",
                found: node.kind(),
            });
        };
        let rel = RelOp::from_code(*op).ok_or(CodegenError::UnknownOperator {
            node: NodeKind::RelExpr,
            op: *op,
        })?;
        let (left, right) = operands(NodeKind::RelExpr, left, right)?;
        emit_operands(ctx, left, right)?;
        ctx.instr(&format!("{}\tt1, t0, {target}", branch_mnemonic(rel)));
        Ok(())
    })
}

/// Leave the address of `name[index]` in `t1`. Clobbers `t0`.
pub(super) fn emit_element_address(
    ctx: &mut CodegenContext<'_>,
    name: &Text,
    index: &Node,
) -> Result<(), CodegenError> {
    emit_expr(ctx, index)?;
    ctx.instr("slli\tt0, t0, 2");
    ctx.instr(&format!("la\tt1, {name}"));
    ctx.instr("add\tt1, t1, t0");
    Ok(())
}

/// `fp`-relative offset of a frame variable, valid only inside a function.
pub(super) fn frame_offset(
    ctx: &CodegenContext<'_>,
    name: &Text,
    slot: u32,
) -> Result<u32, CodegenError> {
    if !ctx.in_function() {
        return Err(CodegenError::FrameAccessOutsideFunction {
            name: name.to_string(),
        });
    }
    slot_offset(slot, ctx.options.frame_size)
}

/// Left operand into `t1`, right operand into `t0`.
fn emit_operands(
    ctx: &mut CodegenContext<'_>,
    left: &Node,
    right: &Node,
) -> Result<(), CodegenError> {
    emit_expr(ctx, left)?;
    ctx.push_acc();
    emit_expr(ctx, right)?;
    ctx.pop_into("t1");
    Ok(())
}

fn operands<'a>(
    node: NodeKind,
    left: &'a Option<Box<Node>>,
    right: &'a Option<Box<Node>>,
) -> Result<(&'a Node, &'a Node), CodegenError> {
    let left = left.as_deref().ok_or(CodegenError::MissingChild {
        node,
        child: "left operand",
    })?;
    let right = right.as_deref().ok_or(CodegenError::MissingChild {
        node,
        child: "right operand",
    })?;
    Ok((left, right))
}

fn emit_constant(ctx: &mut CodegenContext<'_>, ty: DataType, value: i64) -> Result<(), CodegenError> {
    match ty {
        DataType::Int => {
            let value =
                i32::try_from(value).map_err(|_| CodegenError::ConstantOutOfRange { value })?;
            ctx.instr(&format!("li\tt0, {value}"));
        }
        DataType::String => {
            let label = string_label(value)?;
            ctx.instr(&format!("la\tt0, {label}"));
        }
        DataType::ReturnValue => ctx.instr("mv\tt0, a0"),
        DataType::Long => {
            return Err(CodegenError::UnsupportedType {
                ty,
                context: "constants",
            })
        }
    }
    Ok(())
}

fn emit_var_ref(
    ctx: &mut CodegenContext<'_>,
    name: &Text,
    kind: VarKind,
    slot: u32,
    index: Option<&Node>,
) -> Result<(), CodegenError> {
    if index.is_some() && kind != VarKind::GlobalArray {
        return Err(CodegenError::UnsupportedVarKind {
            name: name.to_string(),
            kind,
            context: "an indexed reference",
        });
    }

    match kind {
        VarKind::Global => ctx.instr(&format!("lw\tt0, {name}")),
        VarKind::Local | VarKind::Param => {
            let offset = frame_offset(ctx, name, slot)?;
            ctx.instr(&format!("lw\tt0, {offset}(fp)"));
        }
        VarKind::GlobalArray => {
            let index = index.ok_or(CodegenError::MissingChild {
                node: NodeKind::VarRef,
                child: "array index",
            })?;
            emit_element_address(ctx, name, index)?;
            ctx.instr("lw\tt0, 0(t1)");
        }
    }
    Ok(())
}

const fn arith_mnemonic(op: ArithOp) -> &'static str {
    match op {
        ArithOp::Add => "add",
        ArithOp::Sub => "sub",
        ArithOp::Mul => "mul",
        ArithOp::Div => "div",
        ArithOp::Rem => "rem",
    }
}

const fn branch_mnemonic(op: RelOp) -> &'static str {
    match op {
        RelOp::Eq => "beq",
        RelOp::Ne => "bne",
        RelOp::Lt => "blt",
        RelOp::Gt => "bgt",
    }
}
