//! Version stamps.
//!
//! A version body reads `stamp[+author[~session]]`. The stamp is generated
//! elsewhere so that, for one origin, lexicographic order is causal order.
//! This module only splits and compares; it never mints stamps.
//!
//! # Reference
//! - Lamport, "Time, Clocks, and the Ordering of Events in a Distributed System"

use std::cmp::Ordering;
use std::fmt;

use crate::error::{ProtocolError, Result, SpecParseError};
use crate::quant::SESSION_SEP;
use crate::token::split_ext;

/// Borrowed, decomposed version body.
///
/// # Example
///
/// ```
/// use syncable_proto::Version;
///
/// let v = Version::parse("7Umum+gritzko~ssn");
/// assert_eq!(v.stamp, "7Umum");
/// assert_eq!(v.ext, "gritzko~ssn");
/// assert_eq!(v.author, "gritzko");
/// assert_eq!(v.session, "ssn");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Version<'a> {
    /// The whole body.
    pub body: &'a str,
    /// Monotonic stamp, before the first `+`.
    pub stamp: &'a str,
    /// Origin, `author[~session]`, after the first `+`.
    pub ext: &'a str,
    /// Extension before the first `~`.
    pub author: &'a str,
    /// Extension after the first `~`.
    pub session: &'a str,
}

impl<'a> Version<'a> {
    /// Split a version body. Missing parts come back empty.
    pub fn parse(body: &'a str) -> Self {
        let (stamp, ext) = split_ext(body);
        let (author, session) = match ext.find(SESSION_SEP) {
            Some(i) => (&ext[..i], &ext[i + SESSION_SEP.len_utf8()..]),
            None => (ext, ""),
        };
        Version {
            body,
            stamp,
            ext,
            author,
            session,
        }
    }

    /// Split a version body, rejecting ill-formed origins.
    ///
    /// Rejected: an empty stamp, a `~` in the stamp, an empty author after
    /// `+`, an empty session after `~`, or more than one `~`.
    pub fn try_parse(body: &'a str) -> Result<Self> {
        let v = Version::parse(body);
        let reason = if v.stamp.is_empty() {
            Some("empty stamp")
        } else if v.stamp.contains(SESSION_SEP) {
            Some("session marker without author")
        } else if body.len() > v.stamp.len() && v.author.is_empty() {
            Some("empty author")
        } else if v.ext.contains(SESSION_SEP) && v.session.is_empty() {
            Some("empty session")
        } else if v.session.contains(SESSION_SEP) {
            Some("more than one session marker")
        } else {
            None
        };

        match reason {
            None => Ok(v),
            Some(reason) => Err(ProtocolError::spec(
                body,
                SpecParseError::MalformedVersion {
                    body: body.to_owned(),
                    reason,
                },
            )),
        }
    }

    /// True when both versions come from the same author and session.
    #[inline]
    pub fn same_origin(&self, other: &Version<'_>) -> bool {
        self.ext == other.ext
    }

    /// Whether `self` is causally after `other`.
    ///
    /// Only versions from the same origin are comparable; for different
    /// origins the answer is `None`.
    pub fn is_later_than(&self, other: &Version<'_>) -> Option<bool> {
        self.same_origin(other)
            .then(|| compare_stamps(self.stamp, other.stamp) == Ordering::Greater)
    }
}

/// Order two stamps.
///
/// Stamps are lexicographically monotonic per origin. Across origins the
/// result is a stable tiebreak, not a causal statement.
#[inline]
pub fn compare_stamps(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}

impl PartialOrd for Version<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_stamps(self.stamp, other.stamp)
            .then_with(|| self.ext.cmp(other.ext))
            .then_with(|| self.body.cmp(other.body))
    }
}

impl fmt::Display for Version<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.body)
    }
}
