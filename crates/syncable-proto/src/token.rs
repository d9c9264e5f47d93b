//! Specifier tokens.

use std::fmt;

use crate::error::{ProtocolError, Result, SpecParseError};
use crate::quant::{is_body_char, Quant, AUTHOR_SEP};

/// One quant-marked fragment of a specifier.
///
/// Serializes as the quant character followed by the body, with no escaping.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// The token's role.
    pub quant: Quant,
    /// Everything after the quant up to the next quant.
    pub body: String,
}

impl Token {
    /// Create a token from a quant and body.
    pub fn new(quant: Quant, body: impl Into<String>) -> Self {
        Token {
            quant,
            body: body.into(),
        }
    }

    /// Create a token, rejecting bodies that would not parse back.
    ///
    /// ```
    /// use syncable_proto::{Quant, Token};
    ///
    /// assert!(Token::try_new(Quant::Id, "7AM0f+gritzko").is_ok());
    /// assert!(Token::try_new(Quant::Id, "a.b").is_err());
    /// ```
    pub fn try_new(quant: Quant, body: impl Into<String>) -> Result<Self> {
        let token = Token::new(quant, body);
        match first_reserved(&token.body) {
            None => Ok(token),
            Some((position, ch)) => Err(ProtocolError::spec(
                &token.to_string(),
                SpecParseError::InvalidCharacterAt {
                    ch,
                    position: position + quant.as_char().len_utf8(),
                },
            )),
        }
    }

    /// Borrow this token as a structured view.
    pub fn view(&self) -> TokenRef<'_> {
        TokenRef::new(self.quant, &self.body)
    }

    /// Whether this token matches a filter token.
    ///
    /// An empty filter body matches any body; otherwise bodies must be equal.
    #[inline]
    pub fn matches(&self, filter: &Token) -> bool {
        self.quant == filter.quant && (filter.body.is_empty() || self.body == filter.body)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.quant, self.body)
    }
}

/// Borrowed, decomposed view of a token.
///
/// `bare` is the body up to the first `+`; `ext` is whatever follows it.
/// For a version token these are the stamp and the origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenRef<'a> {
    /// The token's role.
    pub quant: Quant,
    /// The full body.
    pub body: &'a str,
    /// Body before the first `+`.
    pub bare: &'a str,
    /// Body after the first `+`, empty if there is none.
    pub ext: &'a str,
}

impl<'a> TokenRef<'a> {
    /// Decompose a body.
    pub fn new(quant: Quant, body: &'a str) -> Self {
        let (bare, ext) = split_ext(body);
        TokenRef {
            quant,
            body,
            bare,
            ext,
        }
    }

    /// Convert to an owned token.
    pub fn to_token(self) -> Token {
        Token::new(self.quant, self.body)
    }
}

/// Byte offset and value of the first character a body may not hold.
pub(crate) fn first_reserved(body: &str) -> Option<(usize, char)> {
    body.char_indices().find(|&(_, c)| !is_body_char(c))
}

/// Split a body at its first `+`.
#[inline]
pub(crate) fn split_ext(body: &str) -> (&str, &str) {
    match body.find(AUTHOR_SEP) {
        Some(i) => (&body[..i], &body[i + AUTHOR_SEP.len_utf8()..]),
        None => (body, ""),
    }
}
