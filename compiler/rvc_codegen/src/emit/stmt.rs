//! Statements: assignment, call, while, if/then/else and blocks.

use rvc_ir::{Node, NodeKind, Text, VarKind};

use crate::context::ARG_REGISTERS;
use crate::{CodegenContext, CodegenError};

use super::expr::{emit_condition, emit_element_address, emit_expr, frame_offset};

pub(super) fn emit_stmts(ctx: &mut CodegenContext<'_>, stmts: &[Node]) -> Result<(), CodegenError> {
    stmts.iter().try_for_each(|stmt| emit_stmt(ctx, stmt))
}

fn emit_stmt(ctx: &mut CodegenContext<'_>, stmt: &Node) -> Result<(), CodegenError> {
    ctx.nested(|ctx| match stmt {
        Node::Assignment {
            name,
            kind,
            slot,
            value,
            index,
            ..
        } => emit_assignment(ctx, name, *kind, *slot, value.as_deref(), index.as_deref()),
        Node::FunCall { name, args } => emit_call(ctx, name, args),
        Node::While { cond, body } => emit_while(ctx, cond.as_deref(), body),
        Node::IfThen {
            cond,
            then_body,
            else_body,
        } => emit_if(ctx, cond.as_deref(), then_body, else_body),
        Node::StatementBlock { stmts } => emit_stmts(ctx, stmts),
        other => Err(CodegenError::UnexpectedNode {
            context: "statement",
            found: other.kind(),
        }),
    })
}

fn emit_assignment(
    ctx: &mut CodegenContext<'_>,
    name: &Text,
    kind: VarKind,
    slot: u32,
    value: Option<&Node>,
    index: Option<&Node>,
) -> Result<(), CodegenError> {
    let value = value.ok_or(CodegenError::MissingChild {
        node: NodeKind::Assignment,
        child: "right-hand side",
    })?;
    if index.is_some() && kind != VarKind::GlobalArray {
        return Err(CodegenError::UnsupportedVarKind {
            name: name.to_string(),
            kind,
            context: "an indexed assignment",
        });
    }

    emit_expr(ctx, value)?;
    match kind {
        VarKind::Global => ctx.instr(&format!("sw\tt0, {name}, t1")),
        VarKind::Local | VarKind::Param => {
            let offset = frame_offset(ctx, name, slot)?;
            ctx.instr(&format!("sw\tt0, {offset}(fp)"));
        }
        VarKind::GlobalArray => {
            let index = index.ok_or(CodegenError::MissingChild {
                node: NodeKind::Assignment,
                child: "array index",
            })?;
            ctx.push_acc();
            emit_element_address(ctx, name, index)?;
            ctx.pop_into("t0");
            ctx.instr("sw\tt0, 0(t1)");
        }
    }
    Ok(())
}

/// Evaluate every argument before any argument register is written, so
/// an argument reading `a0` (a return value) still sees the previous
/// call's result. All but the last value are pushed; the last moves
/// straight from `t0`, then the rest are popped into `a{n-2}..a0`.
fn emit_call(ctx: &mut CodegenContext<'_>, name: &Text, args: &[Node]) -> Result<(), CodegenError> {
    if !ctx.is_callable(name.as_str()) {
        return Err(CodegenError::UndefinedFunction {
            name: name.to_string(),
        });
    }
    if args.len() > ARG_REGISTERS as usize {
        return Err(CodegenError::TooManyArguments {
            name: name.to_string(),
            count: args.len(),
            max: ARG_REGISTERS,
        });
    }

    let mut registers = Vec::with_capacity(args.len());
    for (position, arg) in args.iter().enumerate() {
        let Node::Argument { expr, register } = arg else {
            return Err(CodegenError::UnexpectedNode {
                context: "call argument",
                found: arg.kind(),
            });
        };
        if u32::try_from(position).ok() != Some(*register) {
            return Err(CodegenError::ArgumentOrder {
                name: name.to_string(),
                position,
                register: *register,
            });
        }
        let expr = expr.as_deref().ok_or(CodegenError::MissingChild {
            node: NodeKind::Argument,
            child: "expression",
        })?;
        if position > 0 {
            ctx.push_acc();
        }
        emit_expr(ctx, expr)?;
        registers.push(*register);
    }

    if let Some((last, pushed)) = registers.split_last() {
        ctx.instr(&format!("mv	a{last}, t0"));
        for register in pushed.iter().rev() {
            ctx.pop_into(&format!("a{register}"));
        }
    }
    ctx.instr(&format!("jal\t{name}"));
    Ok(())
}

/// Test-at-bottom loop:
///
/// ```text
///     b     check
/// body:
///     <body>
/// check:
///     <branch to body while cond holds>
/// ```
fn emit_while(
    ctx: &mut CodegenContext<'_>,
    cond: Option<&Node>,
    body: &[Node],
) -> Result<(), CodegenError> {
    let cond = cond.ok_or(CodegenError::MissingChild {
        node: NodeKind::While,
        child: "condition",
    })?;
    let body_label = ctx.next_label();
    let check_label = ctx.next_label();

    ctx.comment("while loop");
    ctx.instr(&format!("b\t{check_label}"));
    ctx.label(body_label);
    emit_stmts(ctx, body)?;
    ctx.label(check_label);
    emit_condition(ctx, cond, body_label)
}

/// The else part is emitted at the fallthrough of the condition branch:
///
/// ```text
///     <branch to then if cond holds>
///     <else body>
///     b     end
/// then:
///     <then body>
/// end:
/// ```
fn emit_if(
    ctx: &mut CodegenContext<'_>,
    cond: Option<&Node>,
    then_body: &[Node],
    else_body: &[Node],
) -> Result<(), CodegenError> {
    let cond = cond.ok_or(CodegenError::MissingChild {
        node: NodeKind::IfThen,
        child: "condition",
    })?;
    let then_label = ctx.next_label();
    let end_label = ctx.next_label();

    ctx.comment("if then");
    emit_condition(ctx, cond, then_label)?;
    ctx.comment("else part");
    emit_stmts(ctx, else_body)?;
    ctx.instr(&format!("b\t{end_label}"));
    ctx.comment("then part");
    ctx.label(then_label);
    emit_stmts(ctx, then_body)?;
    ctx.label(end_label);
    Ok(())
}
