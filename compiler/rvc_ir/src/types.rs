//! Value-type and variable-kind tags.

use std::fmt;

/// Size in bytes of one machine word (`int`, array element, frame slot).
pub const WORD_SIZE: u32 = 4;

/// Type of the data a node declares, references or produces.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum DataType {
    #[default]
    Int,
    Long,
    String,
    /// The value left in the return register by the last call.
    ReturnValue,
}

impl DataType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Long => "long",
            Self::String => "string",
            Self::ReturnValue => "return value",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Storage class of a variable.
///
/// Globals live in the data section and are addressed by name; locals and
/// parameters live in the current call frame and are addressed by slot.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum VarKind {
    #[default]
    Global,
    GlobalArray,
    Local,
    Param,
}

impl VarKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::GlobalArray => "global array",
            Self::Local => "local",
            Self::Param => "param",
        }
    }
}

impl fmt::Display for VarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
