//! Code generation errors.

use rvc_ir::{DataType, NodeKind, VarKind};

/// Broad class of a [`CodegenError`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCategory {
    /// The generator ran out of a resource (nesting depth).
    ResourceExhausted,
    /// The tree handed in cannot be lowered as-is.
    MalformedTree,
    /// The assembly was generated but could not be written to the sink.
    Output,
}

/// Reason code generation stopped. No assembly reaches the sink when one
/// of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("expected {context}, found {found}")]
    UnexpectedNode {
        context: &'static str,
        found: NodeKind,
    },

    #[error("{node} is missing its {child}")]
    MissingChild {
        node: NodeKind,
        child: &'static str,
    },

    #[error("unknown operator {op:?} in {node}")]
    UnknownOperator { node: NodeKind, op: char },

    #[error("relational expression used as a value; it may only appear as a loop or if condition")]
    RelationalOutsideCondition,

    #[error("{ty} values are not supported in {context}")]
    UnsupportedType {
        ty: DataType,
        context: &'static str,
    },

    #[error("{kind} variable `{name}` is not valid in {context}")]
    UnsupportedVarKind {
        name: String,
        kind: VarKind,
        context: &'static str,
    },

    #[error("`{name}` lives in a call frame but is used outside any function")]
    FrameAccessOutsideFunction { name: String },

    #[error("frame slot {slot} does not fit in a {frame_size}-byte frame")]
    FrameOverflow { slot: u32, frame_size: u32 },

    #[error("frame size {frame_size} must be a multiple of 16 between 16 and 2032")]
    InvalidFrameSize { frame_size: u32 },

    #[error("constant {value} does not fit in a 32-bit register")]
    ConstantOutOfRange { value: i64 },

    #[error("string constant .SC{id} has no text")]
    MissingStringText { id: i64 },

    #[error("string constant id {id} is negative")]
    InvalidStringId { id: i64 },

    #[error("call to `{name}` passes {count} arguments; at most {max} fit in registers")]
    TooManyArguments { name: String, count: usize, max: u32 },

    #[error("parameter `{name}` uses slot {slot}; only slots below {max} arrive in registers")]
    TooManyParameters { name: String, slot: u32, max: u32 },

    #[error("argument {position} of call to `{name}` is bound to register a{register}")]
    ArgumentOrder {
        name: String,
        position: usize,
        register: u32,
    },

    #[error("call to undefined function `{name}`")]
    UndefinedFunction { name: String },

    #[error("function `{name}` is defined more than once")]
    DuplicateFunction { name: String },

    #[error("global `{name}` is declared more than once or clashes with a function")]
    DuplicateGlobal { name: String },

    #[error("`{name}` is reserved for a generated label")]
    ReservedLabel { name: String },

    #[error("tree nesting exceeds the limit of {limit} levels")]
    NestingTooDeep { limit: usize },

    #[error("failed to write assembly: {0}")]
    Io(#[from] std::io::Error),
}

impl CodegenError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NestingTooDeep { .. } => ErrorCategory::ResourceExhausted,
            Self::Io(_) => ErrorCategory::Output,
            _ => ErrorCategory::MalformedTree,
        }
    }
}
