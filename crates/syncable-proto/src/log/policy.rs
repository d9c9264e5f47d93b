//! Which operations carry a patch block.

use std::collections::HashSet;

/// Classifies operation names as diff-style.
///
/// When `expects_patch` returns true for an operation, a patch block (even an
/// empty one) must follow its main line.
pub trait PatchPolicy {
    /// Whether `op` must be followed by a patch block.
    fn expects_patch(&self, op: &str) -> bool;
}

/// Requires no patch blocks; blocks are recognized by framing only.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDiffOps;

impl PatchPolicy for NoDiffOps {
    #[inline]
    fn expects_patch(&self, _op: &str) -> bool {
        false
    }
}

/// A fixed set of diff-style operation names.
///
/// # Example
///
/// ```
/// use syncable_proto::log::{DiffOps, PatchPolicy};
///
/// let policy = DiffOps::new(["on", "diff"]);
/// assert!(policy.expects_patch("on"));
/// assert!(!policy.expects_patch("set"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct DiffOps {
    names: HashSet<String>,
}

impl DiffOps {
    /// Build from operation names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DiffOps {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Add a name.
    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// Number of names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if no operation is diff-style.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl PatchPolicy for DiffOps {
    fn expects_patch(&self, op: &str) -> bool {
        self.names.contains(op)
    }
}

impl<F> PatchPolicy for F
where
    F: Fn(&str) -> bool,
{
    fn expects_patch(&self, op: &str) -> bool {
        self(op)
    }
}
