//! Data section: global storage and string constants.

use rustc_hash::FxHashSet;
use rvc_ir::{DataType, Node, VarKind, WORD_SIZE};

use crate::{CodegenContext, CodegenError};

/// Emit `.data` with one reservation per global, then every string
/// constant in the tree. Nothing is emitted when there are neither.
pub(super) fn emit_data_section(
    ctx: &mut CodegenContext<'_>,
    root: &Node,
    globals: &[Node],
) -> Result<(), CodegenError> {
    let strings = collect_strings(root)?;
    if globals.is_empty() && strings.is_empty() {
        return Ok(());
    }

    ctx.instr(".data");
    for decl in globals {
        emit_global(ctx, decl)?;
    }
    for (id, text) in strings {
        ctx.line(&format!("{}:\t.string\t\"{}\"", string_label(id)?, escape(text)));
    }
    ctx.newline();
    Ok(())
}

fn emit_global(ctx: &mut CodegenContext<'_>, decl: &Node) -> Result<(), CodegenError> {
    let Node::VarDecl {
        name,
        ty,
        kind,
        size,
        ..
    } = decl
    else {
        return Err(CodegenError::UnexpectedNode {
            context: "global declaration",
            found: decl.kind(),
        });
    };

    if *ty == DataType::Long || *ty == DataType::ReturnValue {
        return Err(CodegenError::UnsupportedType {
            ty: *ty,
            context: "global declarations",
        });
    }

    ctx.declare_global(name.as_str())?;
    match kind {
        VarKind::Global => ctx.line(&format!("{name}:\t.word\t0")),
        VarKind::GlobalArray => {
            let bytes = u64::from(*size) * u64::from(WORD_SIZE);
            ctx.line(&format!("{name}:\t.space\t{bytes}"));
        }
        VarKind::Local | VarKind::Param => {
            return Err(CodegenError::UnsupportedVarKind {
                name: name.to_string(),
                kind: *kind,
                context: "the global declaration list",
            })
        }
    }
    Ok(())
}

/// String constants in first-appearance order, one per string-table id.
fn collect_strings(root: &Node) -> Result<Vec<(i64, &str)>, CodegenError> {
    let mut constants = Vec::new();
    root.walk(0, &mut |node, _| {
        if let Node::Constant {
            ty: DataType::String,
            value,
            text,
        } = node
        {
            constants.push((*value, text.as_ref().map(|t| t.as_str())));
        }
    });

    let mut seen = FxHashSet::default();
    let mut strings = Vec::new();
    for (id, text) in constants {
        let text = text.ok_or(CodegenError::MissingStringText { id })?;
        if seen.insert(id) {
            strings.push((id, text));
        }
    }
    Ok(strings)
}

/// Label of the string constant with table id `id`.
pub(super) fn string_label(id: i64) -> Result<String, CodegenError> {
    if id < 0 {
        return Err(CodegenError::InvalidStringId { id });
    }
    Ok(format!(".SC{id}"))
}

/// Escape a literal for the assembler's `.string` directive.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}
