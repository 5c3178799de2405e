//! Code generation context and state.
//!
//! The `CodegenContext` holds everything one generation run needs: the
//! output buffer, the label allocator, the set of callable functions and
//! the current nesting depth. Nothing is shared between runs.

use std::fmt::Display;

use rustc_hash::FxHashSet;
use rvc_ir::stack::ensure_sufficient_stack;
use rvc_ir::WORD_SIZE;

use crate::label::{Label, LabelAllocator};
use crate::{CodegenError, CodegenOptions};

/// Bytes at the bottom of every frame holding the saved `ra` and `fp`.
pub(crate) const FRAME_HEADER: u32 = 2 * WORD_SIZE;

/// Number of argument registers (`a0`..`a7`).
pub const ARG_REGISTERS: u32 = 8;

/// Label of the top-level statements.
pub(crate) const PROGRAM_LABEL: &str = "program";

/// Library routines appended after user functions.
pub(crate) const RUNTIME_ROUTINES: [&str; 3] = ["printStr", "printInt", "readInt"];

/// State for one generation run.
pub struct CodegenContext<'a> {
    pub options: &'a CodegenOptions,
    labels: LabelAllocator,
    output: String,
    functions: FxHashSet<String>,
    /// Every global and function label defined so far.
    symbols: FxHashSet<String>,
    /// Name of the function being emitted, `None` at top level.
    current_function: Option<String>,
    depth: usize,
    /// Words currently pushed by the accumulator discipline.
    pushed: usize,
}

impl<'a> CodegenContext<'a> {
    pub fn new(options: &'a CodegenOptions) -> Self {
        Self {
            options,
            labels: LabelAllocator::new(),
            output: String::with_capacity(4096),
            functions: FxHashSet::default(),
            symbols: FxHashSet::default(),
            current_function: None,
            depth: 0,
            pushed: 0,
        }
    }

    // Labels and functions

    pub fn next_label(&mut self) -> Label {
        self.labels.next_label()
    }

    pub fn labels_allocated(&self) -> u32 {
        self.labels.allocated()
    }

    /// Record a user-defined function so calls to it resolve.
    pub fn declare_function(&mut self, name: &str) -> Result<(), CodegenError> {
        self.check_reserved(name)?;
        if !self.symbols.insert(name.to_string()) {
            return Err(CodegenError::DuplicateFunction {
                name: name.to_string(),
            });
        }
        self.functions.insert(name.to_string());
        Ok(())
    }

    /// Record a global's label. Globals share one namespace with functions.
    pub fn declare_global(&mut self, name: &str) -> Result<(), CodegenError> {
        self.check_reserved(name)?;
        if self.symbols.insert(name.to_string()) {
            Ok(())
        } else {
            Err(CodegenError::DuplicateGlobal {
                name: name.to_string(),
            })
        }
    }

    fn check_reserved(&self, name: &str) -> Result<(), CodegenError> {
        if name == PROGRAM_LABEL || (self.options.runtime && RUNTIME_ROUTINES.contains(&name)) {
            Err(CodegenError::ReservedLabel {
                name: name.to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Returns `true` if a call to `name` has a target in the output.
    pub fn is_callable(&self, name: &str) -> bool {
        self.functions.contains(name)
            || (self.options.runtime && RUNTIME_ROUTINES.contains(&name))
    }

    pub fn enter_function(&mut self, name: &str) {
        self.current_function = Some(name.to_string());
    }

    pub fn leave_function(&mut self) {
        self.current_function = None;
    }

    pub fn in_function(&self) -> bool {
        self.current_function.is_some()
    }

    // Nesting

    /// Run `f` one nesting level deeper, failing once `max_depth` is reached.
    pub fn nested<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<R, CodegenError>,
    ) -> Result<R, CodegenError> {
        if self.depth >= self.options.max_depth {
            return Err(CodegenError::NestingTooDeep {
                limit: self.options.max_depth,
            });
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| f(self));
        self.depth -= 1;
        result
    }

    // Accumulator stack

    /// Push the accumulator `t0` onto the machine stack.
    pub fn push_acc(&mut self) {
        self.instr("addi\tsp, sp, -4");
        self.instr("sw\tt0, 0(sp)");
        self.pushed += 1;
    }

    /// Pop the top of the machine stack into `reg`.
    pub fn pop_into(&mut self, reg: &str) {
        debug_assert!(self.pushed > 0, "pop without matching push");
        self.instr(&format!("lw\t{reg}, 0(sp)"));
        self.instr("addi\tsp, sp, 4");
        self.pushed = self.pushed.saturating_sub(1);
    }

    /// Words pushed and not yet popped.
    pub fn pushed(&self) -> usize {
        self.pushed
    }

    // Output

    /// Write one instruction (or directive), tab-indented.
    pub fn instr(&mut self, text: &str) {
        self.output.push('\t');
        self.output.push_str(text);
        self.output.push('\n');
    }

    /// Write a label definition.
    pub fn label(&mut self, label: impl Display) {
        self.output.push_str(&format!("{label}:\n"));
    }

    /// Write a `#` comment if annotations are enabled.
    pub fn comment(&mut self, text: &str) {
        if self.options.annotate {
            self.output.push_str("# ");
            self.output.push_str(text);
            self.output.push('\n');
        }
    }

    /// Write a line verbatim.
    pub fn line(&mut self, text: &str) {
        self.output.push_str(text);
        self.output.push('\n');
    }

    pub fn newline(&mut self) {
        self.output.push('\n');
    }

    /// Take the generated output.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}
