//! Control-flow labels.

use std::fmt;

/// First label id handed out in a generation run.
pub const FIRST_LABEL: u32 = 100;

/// A jump or branch target, rendered as `.LL<id>`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Label(u32);

impl Label {
    #[inline]
    pub const fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".LL{}", self.0)
    }
}

/// Hands out unique, strictly increasing labels.
///
/// Owned by one [`CodegenContext`](crate::CodegenContext), so independent
/// generation runs never share a counter.
#[derive(Debug)]
pub struct LabelAllocator {
    next: u32,
}

impl Default for LabelAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelAllocator {
    pub const fn new() -> Self {
        Self { next: FIRST_LABEL }
    }

    pub fn next_label(&mut self) -> Label {
        let label = Label(self.next);
        self.next += 1;
        tracing::trace!(%label, "label allocated");
        label
    }

    /// Number of labels handed out so far.
    pub const fn allocated(&self) -> u32 {
        self.next - FIRST_LABEL
    }
}
