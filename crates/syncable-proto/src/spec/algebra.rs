//! Membership tests and overrides: `has`, `fits` and `set`.

use crate::error::{FilterError, ProtocolError, Result};
use crate::quant::Quant;
use crate::token::Token;

use super::parse::tokenize;
use super::types::Spec;

impl Spec {
    /// Whether a single-token fragment is present.
    ///
    /// A bare quant (`"!"`) matches any token of that quant. A quant with a
    /// body matches only a token with exactly that body; prefixes never match.
    ///
    /// ```
    /// use syncable_proto::Spec;
    ///
    /// let abc = Spec::parse("!abc").unwrap();
    /// assert!(!abc.has("!ab").unwrap());
    /// assert!(abc.has("!").unwrap());
    /// ```
    pub fn has(&self, fragment: &str) -> Result<bool> {
        let tokens =
            tokenize(fragment).map_err(|e| ProtocolError::filter(fragment, FilterError::Parse(e)))?;
        match tokens.as_slice() {
            [token] => Ok(self.has_token(token)),
            other => Err(ProtocolError::filter(
                fragment,
                FilterError::TokenCount(other.len()),
            )),
        }
    }

    /// [`has`](Self::has) for an already-built token.
    pub fn has_token(&self, filter: &Token) -> bool {
        self.tokens.iter().any(|t| t.matches(filter))
    }

    /// Whether every token of a filter spec is present, in any order.
    ///
    /// An empty filter fits everything.
    ///
    /// ```
    /// use syncable_proto::Spec;
    ///
    /// let spec = Spec::parse("/Type!abc.off.on").unwrap();
    /// assert!(spec.fits(".on").unwrap());
    /// assert!(!spec.fits(".on#id").unwrap());
    /// ```
    pub fn fits(&self, filter: &str) -> Result<bool> {
        let tokens =
            tokenize(filter).map_err(|e| ProtocolError::filter(filter, FilterError::Parse(e)))?;
        Ok(tokens.iter().all(|t| self.has_token(t)))
    }

    /// [`fits`](Self::fits) for an already-parsed filter.
    pub fn fits_spec(&self, filter: &Spec) -> bool {
        filter.iter().all(|t| self.has_token(t))
    }

    /// Override tokens from a fragment, producing a well-formed address.
    ///
    /// For each primary quant the fragment's token wins, otherwise the
    /// receiver's last token of that quant is kept. The result is emitted in
    /// canonical order and never contains repeats.
    ///
    /// ```
    /// use syncable_proto::Spec;
    ///
    /// let def = Spec::parse("/Type#id!ver.method").unwrap();
    /// let over = def.set("#newid.newmethod").unwrap();
    /// assert_eq!(over.to_string(), "/Type#newid!ver.newmethod");
    /// ```
    pub fn set(&self, fragment: &str) -> Result<Spec> {
        let over = Spec::parse(fragment)?;
        Ok(self.set_spec(&over))
    }

    /// [`set`](Self::set) for an already-parsed override.
    #[must_use]
    pub fn set_spec(&self, over: &Spec) -> Spec {
        Quant::ALL
            .iter()
            .filter_map(|q| over.last(*q).or_else(|| self.last(*q)))
            .cloned()
            .collect()
    }
}
