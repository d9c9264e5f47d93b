//! Quant markers.
//!
//! A quant is the single character that opens a specifier token and names
//! its role. The four primary quants have a canonical order, which is the
//! order [`Spec::set`](crate::Spec::set) emits them in.

use std::fmt;

/// Separates the stamp from the author inside a token body.
pub const AUTHOR_SEP: char = '+';

/// Separates the author from the session inside a version extension.
pub const SESSION_SEP: char = '~';

/// Role of a specifier token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Quant {
    /// `/` object type.
    Type,
    /// `#` object id.
    Id,
    /// `!` version stamp.
    Version,
    /// `.` operation name.
    Op,
}

impl Quant {
    /// All primary quants in canonical order.
    pub const ALL: [Quant; 4] = [Quant::Type, Quant::Id, Quant::Version, Quant::Op];

    /// The marker character.
    #[inline]
    pub const fn as_char(self) -> char {
        match self {
            Quant::Type => '/',
            Quant::Id => '#',
            Quant::Version => '!',
            Quant::Op => '.',
        }
    }

    /// Look up the quant for a marker character.
    #[inline]
    pub const fn from_char(c: char) -> Option<Quant> {
        match c {
            '/' => Some(Quant::Type),
            '#' => Some(Quant::Id),
            '!' => Some(Quant::Version),
            '.' => Some(Quant::Op),
            _ => None,
        }
    }

    /// Position in canonical order.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Quant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for Quant {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Quant::from_char(c).ok_or(c)
    }
}

/// Whether `c` starts a new token.
#[inline]
pub fn is_quant(c: char) -> bool {
    Quant::from_char(c).is_some()
}

/// Whether `c` may appear inside a token body.
///
/// Control characters are excluded: tabs and newlines frame the log format.
#[inline]
pub fn is_body_char(c: char) -> bool {
    !is_quant(c) && !c.is_control()
}
