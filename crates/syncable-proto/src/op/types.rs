//! The `Op` type.

use crate::quant::Quant;
use crate::spec::Spec;

/// One operation from an operation log.
///
/// A plain operation carries its payload in `value` and has no patch. A diff
/// operation carries an ordered `patch` of sub-operations, each addressed by
/// `!version.op` only; `Some(vec![])` (an empty patch block) and `None` (no
/// block at all) are distinct and both round-trip.
///
/// Payloads are opaque strings; nothing here interprets them.
///
/// # Example
///
/// ```
/// use syncable_proto::{Op, Spec};
///
/// let spec = Spec::parse("/Model#id!stamp.set").unwrap();
/// let op = Op::new(spec, r#"{"x":"y"}"#);
/// assert_eq!(op.name(), "set");
/// assert!(op.patch.is_none());
/// assert_eq!(op.to_string(), "/Model#id!stamp.set\t{\"x\":\"y\"}\n");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Op {
    /// Full specifier; `!version.op` only for patch entries.
    pub spec: Spec,
    /// Literal payload.
    pub value: String,
    /// Sub-operations of a diff operation.
    pub patch: Option<Vec<Op>>,
}

impl Op {
    /// A plain operation.
    pub fn new(spec: Spec, value: impl Into<String>) -> Self {
        Op {
            spec,
            value: value.into(),
            patch: None,
        }
    }

    /// A diff operation with an empty value.
    pub fn diff(spec: Spec, patch: Vec<Op>) -> Self {
        Op {
            spec,
            value: String::new(),
            patch: Some(patch),
        }
    }

    /// A patch entry addressed by `!version.op`.
    pub fn patch_entry(
        version: impl Into<String>,
        op: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let spec = Spec::new()
            .with_token(Quant::Version, version)
            .with_token(Quant::Op, op);
        Op::new(spec, value)
    }

    /// Whether this operation carries a patch block.
    #[inline]
    pub fn is_diff(&self) -> bool {
        self.patch.is_some()
    }

    /// Operation name.
    pub fn name(&self) -> &str {
        self.spec.op()
    }

    /// Alias for [`name`](Self::name).
    pub fn op(&self) -> &str {
        self.spec.op()
    }

    /// Object type.
    pub fn ty(&self) -> &str {
        self.spec.ty()
    }

    /// Object id.
    pub fn id(&self) -> &str {
        self.spec.id()
    }

    /// The full version body, `stamp+author~session`, used as the
    /// operation's Lamport timestamp.
    pub fn stamp(&self) -> &str {
        self.spec.version()
    }

    /// Originating `author~session`.
    pub fn origin(&self) -> &str {
        self.spec.ext()
    }

    /// Author (user id) of the version.
    pub fn author(&self) -> &str {
        self.spec.author()
    }

    /// Session of the version.
    pub fn session(&self) -> &str {
        self.spec.session()
    }

    /// A spec holding only the version token.
    pub fn version(&self) -> Spec {
        self.spec.pick(&[Quant::Version])
    }

    /// Patch entries addressed in full: the parent spec with each entry's
    /// version and operation swapped in.
    ///
    /// ```
    /// use syncable_proto::log;
    ///
    /// let ops = log::parse("/Model#test!x.on\t\n\t!t0.set\t1\n\n").unwrap();
    /// let full: Vec<_> = ops[0].resolved_patch().collect();
    /// assert_eq!(full[0].spec.to_string(), "/Model#test!t0.set");
    /// ```
    pub fn resolved_patch(&self) -> impl Iterator<Item = Op> + '_ {
        self.patch.iter().flatten().map(move |sub| Op {
            spec: self.spec.set_spec(&sub.spec.pick(&[Quant::Version, Quant::Op])),
            value: sub.value.clone(),
            patch: None,
        })
    }
}
