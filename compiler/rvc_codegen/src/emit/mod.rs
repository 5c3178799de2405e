//! Tree walk emitting RV32 assembly.
//!
//! Every expression leaves its value in the accumulator `t0`. Binary
//! nodes evaluate the left operand, push it, evaluate the right operand,
//! then pop the left value into `t1` before combining, so each binary node
//! pushes and pops exactly once.
//!
//! Control flow uses labels from the context's allocator. A condition is
//! lowered as a single conditional branch to a target chosen by the
//! enclosing loop or `if`, falling through when the condition is false.

mod data;
mod expr;
mod function;
mod stmt;

use rvc_ir::Node;

use crate::context::{PROGRAM_LABEL, RUNTIME_ROUTINES};
use crate::{CodegenContext, CodegenError};

use self::data::emit_data_section;
use self::function::emit_function;
use self::stmt::emit_stmts;

/// Emit a whole program: data section, top-level statements, exit
/// sequence, functions and library routines.
pub(crate) fn emit_program(ctx: &mut CodegenContext<'_>, root: &Node) -> Result<(), CodegenError> {
    let Node::Program {
        globals,
        functions,
        body,
    } = root
    else {
        return Err(CodegenError::UnexpectedNode {
            context: "program root",
            found: root.kind(),
        });
    };

    // Calls may precede the definition they target.
    for func in functions {
        match func {
            Node::Function { name, .. } => ctx.declare_function(name.as_str())?,
            other => {
                return Err(CodegenError::UnexpectedNode {
                    context: "function definition",
                    found: other.kind(),
                })
            }
        }
    }

    emit_data_section(ctx, root, globals)?;

    tracing::debug!(statements = body.len(), "emitting program body");
    ctx.instr(".text");
    ctx.newline();
    ctx.label(PROGRAM_LABEL);
    emit_stmts(ctx, body)?;
    ctx.comment("exit");
    ctx.instr("li\ta0, 0");
    ctx.instr("li\ta7, 93");
    ctx.instr("ecall");

    for func in functions {
        ctx.newline();
        emit_function(ctx, func)?;
    }

    if ctx.options.runtime {
        emit_runtime(ctx);
    }

    debug_assert_eq!(ctx.pushed(), 0, "unbalanced accumulator stack");
    Ok(())
}

/// Library routines wrapping the simulator's I/O system calls.
fn emit_runtime(ctx: &mut CodegenContext<'_>) {
    // (description, system call number), in RUNTIME_ROUTINES order
    let routines = [
        ("print a null-terminated string; a0 = address", 4),
        ("print a decimal integer; a0 = value", 1),
        ("read a decimal integer; returns a0", 5),
    ];
    for (name, (description, ecall)) in RUNTIME_ROUTINES.iter().zip(routines) {
        ctx.newline();
        ctx.comment(description);
        ctx.label(name);
        ctx.instr(&format!("li\ta7, {ecall}"));
        ctx.instr("ecall");
        ctx.instr("ret");
    }
}
