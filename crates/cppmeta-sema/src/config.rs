//! Session configuration.

/// Limits and policies for one [`SemaContext`](crate::SemaContext).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemaConfig {
    /// Maximum nesting of instantiations triggered while populating an instance.
    pub max_instantiation_depth: usize,
    /// Reject base classes that are declared but not yet defined.
    pub require_complete_bases: bool,
}

impl Default for SemaConfig {
    fn default() -> Self {
        Self {
            max_instantiation_depth: 256,
            require_complete_bases: true,
        }
    }
}

impl SemaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_instantiation_depth(mut self, depth: usize) -> Self {
        self.max_instantiation_depth = depth;
        self
    }

    pub fn with_require_complete_bases(mut self, require: bool) -> Self {
        self.require_complete_bases = require;
        self
    }
}
