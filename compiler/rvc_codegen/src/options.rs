//! Code generation options.

/// Knobs for one generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Bytes reserved per call frame, including saved `ra` and `fp`.
    pub frame_size: u32,
    /// Deepest tree nesting the generator will follow.
    pub max_depth: usize,
    /// Emit `#` comments marking loop, branch and function structure.
    pub annotate: bool,
    /// Append the `printStr`/`printInt`/`readInt` library routines.
    pub runtime: bool,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            frame_size: 128,
            max_depth: 4096,
            annotate: true,
            runtime: true,
        }
    }
}

impl CodegenOptions {
    #[must_use]
    pub fn with_frame_size(mut self, frame_size: u32) -> Self {
        self.frame_size = frame_size;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_annotations(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }

    #[must_use]
    pub fn with_runtime(mut self, runtime: bool) -> Self {
        self.runtime = runtime;
        self
    }

    /// Options producing only the instructions the program itself needs:
    /// no comments and no library routines.
    pub fn bare() -> Self {
        Self::default().with_annotations(false).with_runtime(false)
    }
}
