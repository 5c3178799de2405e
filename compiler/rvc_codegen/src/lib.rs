//! RISC-V (RV32) assembly generation.
//!
//! Lowers a `rvc_ir` program tree to assembly text for the RARS/MARS
//! simulators. The generator is a single recursive walk with an
//! accumulator discipline: every expression leaves its value in `t0`, and
//! binary operators spill their left operand to the machine stack while
//! the right operand is evaluated.
//!
//! # Output layout
//!
//! ```text
//!     .data            globals, then string constants (omitted if none)
//!     .text
//! program:             top-level statements, then the exit system call
//! <function>:          one block per function definition
//! printStr: ...        library routines (unless disabled)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let asm = rvc_codegen::generate_to_string(&program, &CodegenOptions::default())?;
//! ```
//!
//! Generation is all-or-nothing: the output sink is only written once the
//! whole program has been lowered, so an error never leaves partial
//! assembly behind.

mod context;
mod emit;
mod error;
mod label;
mod options;

use std::io;
use std::sync::Once;

use rvc_ir::Node;

pub use context::{CodegenContext, ARG_REGISTERS};
pub use error::{CodegenError, ErrorCategory};
pub use label::{Label, LabelAllocator, FIRST_LABEL};
pub use options::CodegenOptions;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing from `RUST_LOG`.
///
/// Safe to call more than once; only the first call has an effect, and
/// nothing is installed when `RUST_LOG` is unset.
///
/// ```bash
/// RUST_LOG=rvc_codegen=debug rvc ...
/// RUST_LOG=rvc_codegen=trace,rvc_symtab=trace rvc ...
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Generate assembly for `program` with default options into `out`.
pub fn generate(program: &Node, out: &mut impl io::Write) -> Result<(), CodegenError> {
    generate_with(program, &CodegenOptions::default(), out)
}

/// Generate assembly for `program` into `out`.
///
/// `out` receives nothing unless generation succeeds.
pub fn generate_with(
    program: &Node,
    options: &CodegenOptions,
    out: &mut impl io::Write,
) -> Result<(), CodegenError> {
    let asm = generate_to_string(program, options)?;
    out.write_all(asm.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Generate assembly for `program` and return it as a string.
#[tracing::instrument(level = "debug", skip_all, fields(frame_size = options.frame_size))]
pub fn generate_to_string(program: &Node, options: &CodegenOptions) -> Result<String, CodegenError> {
    validate_frame_size(options.frame_size)?;

    let mut ctx = CodegenContext::new(options);
    emit::emit_program(&mut ctx, program)?;
    tracing::debug!(labels = ctx.labels_allocated(), "generation complete");
    Ok(ctx.take_output())
}

/// The frame size must keep `sp` 16-byte aligned and fit the signed
/// 12-bit immediate of `addi`.
fn validate_frame_size(frame_size: u32) -> Result<(), CodegenError> {
    if frame_size % 16 == 0 && (16..=2032).contains(&frame_size) {
        Ok(())
    } else {
        Err(CodegenError::InvalidFrameSize { frame_size })
    }
}
