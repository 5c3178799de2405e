//! Function definitions: frame setup, parameter spills and teardown.
//!
//! Frame layout, relative to `fp` (which equals `sp` after the prologue):
//!
//! ```text
//! 0(fp)            saved ra
//! 4(fp)            saved caller fp
//! 8 + 4*slot(fp)   parameter or local in `slot`
//! ```

use rvc_ir::{DataType, Node, VarKind, WORD_SIZE};

use crate::context::{ARG_REGISTERS, FRAME_HEADER};
use crate::{CodegenContext, CodegenError};

use super::stmt::emit_stmts;

/// `fp`-relative byte offset of frame slot `slot`.
pub(super) fn slot_offset(slot: u32, frame_size: u32) -> Result<u32, CodegenError> {
    slot.checked_mul(WORD_SIZE)
        .and_then(|bytes| bytes.checked_add(FRAME_HEADER))
        .filter(|&offset| offset < frame_size && frame_size - offset >= WORD_SIZE)
        .ok_or(CodegenError::FrameOverflow { slot, frame_size })
}

pub(super) fn emit_function(ctx: &mut CodegenContext<'_>, func: &Node) -> Result<(), CodegenError> {
    let Node::Function {
        name,
        params,
        body,
        locals,
    } = func
    else {
        return Err(CodegenError::UnexpectedNode {
            context: "function definition",
            found: func.kind(),
        });
    };

    tracing::debug!(
        function = %name,
        params = params.len(),
        locals = locals.len(),
        "emitting function"
    );

    let frame_size = ctx.options.frame_size;
    ctx.comment(&format!("function {name}"));
    ctx.label(name);
    ctx.instr(&format!("addi\tsp, sp, -{frame_size}"));
    ctx.instr("sw\tra, 0(sp)");
    ctx.instr("sw\tfp, 4(sp)");
    ctx.instr("mv\tfp, sp");

    ctx.enter_function(name.as_str());
    let result = emit_frame_body(ctx, params, locals, body);
    ctx.leave_function();
    result?;

    ctx.instr("mv\tsp, fp");
    ctx.instr("lw\tra, 0(sp)");
    ctx.instr("lw\tfp, 4(sp)");
    ctx.instr(&format!("addi\tsp, sp, {frame_size}"));
    ctx.instr("ret");
    Ok(())
}

fn emit_frame_body(
    ctx: &mut CodegenContext<'_>,
    params: &[Node],
    locals: &[Node],
    body: &[Node],
) -> Result<(), CodegenError> {
    for param in params {
        let (name, slot) = frame_decl(param, VarKind::Param, ctx.options.frame_size)?;
        if slot >= ARG_REGISTERS {
            return Err(CodegenError::TooManyParameters {
                name: name.to_string(),
                slot,
                max: ARG_REGISTERS,
            });
        }
        let offset = slot_offset(slot, ctx.options.frame_size)?;
        ctx.instr(&format!("sw\ta{slot}, {offset}(fp)"));
    }

    // Locals only need their slot to fit; the frame is already reserved.
    for local in locals {
        frame_decl(local, VarKind::Local, ctx.options.frame_size)?;
    }

    emit_stmts(ctx, body)
}

/// Validate a parameter or local declaration, returning its name and slot.
fn frame_decl(decl: &Node, expected: VarKind, frame_size: u32) -> Result<(&str, u32), CodegenError> {
    let Node::VarDecl {
        name,
        ty,
        kind,
        slot,
        ..
    } = decl
    else {
        return Err(CodegenError::UnexpectedNode {
            context: "variable declaration",
            found: decl.kind(),
        });
    };

    if *kind != expected {
        return Err(CodegenError::UnsupportedVarKind {
            name: name.to_string(),
            kind: *kind,
            context: if expected == VarKind::Param {
                "a parameter list"
            } else {
                "a local declaration list"
            },
        });
    }
    if matches!(ty, DataType::Long | DataType::ReturnValue) {
        return Err(CodegenError::UnsupportedType {
            ty: *ty,
            context: "frame variables",
        });
    }
    slot_offset(*slot, frame_size)?;
    Ok((name.as_str(), *slot))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_offsets() {
        assert_eq!(slot_offset(0, 128).ok(), Some(8));
        assert_eq!(slot_offset(1, 128).ok(), Some(12));
        // Last slot that fits in 128 bytes: 8 + 4*29 = 124.
        assert_eq!(slot_offset(29, 128).ok(), Some(124));
        assert!(matches!(
            slot_offset(30, 128),
            Err(CodegenError::FrameOverflow { slot: 30, frame_size: 128 })
        ));
        assert!(slot_offset(u32::MAX, 128).is_err());
    }
}
