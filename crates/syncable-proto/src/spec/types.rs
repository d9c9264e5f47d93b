//! The `Spec` type and its accessors.

use smallvec::SmallVec;

use crate::error::{ProtocolError, Result, SpecParseError};
use crate::quant::Quant;
use crate::token::{first_reserved, Token, TokenRef};
use crate::version::Version;

/// Inline storage for the common four-token address.
pub(crate) type TokenVec = SmallVec<[Token; 4]>;

/// A structured specifier: an ordered, possibly repeating list of tokens.
///
/// Token order is preserved exactly as parsed or pushed, so
/// `Spec::parse(s)?.to_string() == s` for every valid `s`. Equality is
/// token-list equality.
///
/// Accessors read the *last* token of the requested quant and return an
/// empty string when there is none.
///
/// # Example
///
/// ```
/// use syncable_proto::Spec;
///
/// let spec: Spec = "/Class#ID!7Umum+gritzko~ssn.event".parse().unwrap();
/// assert_eq!(spec.version(), "7Umum+gritzko~ssn");
/// assert_eq!(spec.source(), "gritzko~ssn");
/// assert_eq!(spec.to_string(), "/Class#ID!7Umum+gritzko~ssn.event");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Spec {
    pub(crate) tokens: TokenVec,
}

impl Spec {
    /// An empty specifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_tokens(tokens: TokenVec) -> Self {
        Spec { tokens }
    }

    /// Build a full `/type#id!version.op` address.
    ///
    /// Bodies are taken as given; callers passing quant characters inside a
    /// body will get a spec that does not round-trip. Use
    /// [`Spec::try_address`] for untrusted bodies.
    pub fn address(
        ty: impl Into<String>,
        id: impl Into<String>,
        version: impl Into<String>,
        op: impl Into<String>,
    ) -> Self {
        Spec::new()
            .with_token(Quant::Type, ty)
            .with_token(Quant::Id, id)
            .with_token(Quant::Version, version)
            .with_token(Quant::Op, op)
    }

    /// Build a full address, rejecting bodies that would not parse back.
    ///
    /// ```
    /// use syncable_proto::Spec;
    ///
    /// let spec = Spec::try_address("M", "obj", "v+a", "set").unwrap();
    /// assert_eq!(spec.to_string(), "/M#obj!v+a.set");
    /// assert!(Spec::try_address("M", "a.b", "v", "set").is_err());
    /// ```
    pub fn try_address(
        ty: impl Into<String>,
        id: impl Into<String>,
        version: impl Into<String>,
        op: impl Into<String>,
    ) -> Result<Self> {
        let spec = Spec::address(ty, id, version, op);
        spec.check_bodies()?;
        Ok(spec)
    }

    /// Fail on the first body holding a quant or control character.
    pub(crate) fn check_bodies(&self) -> Result<()> {
        let mut offset = 0;
        for token in &self.tokens {
            offset += token.quant.as_char().len_utf8();
            if let Some((position, ch)) = first_reserved(&token.body) {
                return Err(ProtocolError::spec(
                    &self.to_string(),
                    SpecParseError::InvalidCharacterAt {
                        ch,
                        position: offset + position,
                    },
                ));
            }
            offset += token.body.len();
        }
        Ok(())
    }

    /// Append a token, builder style.
    #[must_use]
    pub fn with_token(mut self, quant: Quant, body: impl Into<String>) -> Self {
        self.push(Token::new(quant, body));
        self
    }

    /// Append a token.
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Tokens in stored order.
    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of tokens.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True for the empty specifier.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate over tokens in stored order.
    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// The last token with the given quant.
    pub fn last(&self, quant: Quant) -> Option<&Token> {
        self.tokens.iter().rev().find(|t| t.quant == quant)
    }

    fn body(&self, quant: Quant) -> &str {
        self.last(quant).map(|t| t.body.as_str()).unwrap_or("")
    }

    /// Object type body.
    pub fn ty(&self) -> &str {
        self.body(Quant::Type)
    }

    /// Object id body.
    pub fn id(&self) -> &str {
        self.body(Quant::Id)
    }

    /// Version body, `stamp[+author[~session]]`.
    pub fn version(&self) -> &str {
        self.body(Quant::Version)
    }

    /// Operation name body.
    pub fn op(&self) -> &str {
        self.body(Quant::Op)
    }

    /// Structured view of the last token with this quant.
    pub fn token(&self, quant: Quant) -> Option<TokenRef<'_>> {
        self.last(quant).map(Token::view)
    }

    /// Decomposed version token; all parts empty if there is none.
    pub fn version_parts(&self) -> Version<'_> {
        Version::parse(self.version())
    }

    /// Strictly decomposed version token.
    ///
    /// Fails if there is no version or its origin is ill-formed.
    pub fn try_version_parts(&self) -> Result<Version<'_>> {
        Version::try_parse(self.version())
    }

    /// Bare stamp of the version token.
    pub fn stamp(&self) -> &str {
        self.version_parts().stamp
    }

    /// Version extension, `author[~session]`.
    pub fn ext(&self) -> &str {
        self.version_parts().ext
    }

    /// Alias for [`ext`](Self::ext): where the version originated.
    pub fn source(&self) -> &str {
        self.ext()
    }

    /// Author part of the version extension.
    pub fn author(&self) -> &str {
        self.version_parts().author
    }

    /// Session part of the version extension.
    pub fn session(&self) -> &str {
        self.version_parts().session
    }

    /// Keep only tokens with the listed quants, in stored order.
    #[must_use]
    pub fn filter(&self, quants: &[Quant]) -> Spec {
        self.tokens
            .iter()
            .filter(|t| quants.contains(&t.quant))
            .cloned()
            .collect()
    }

    /// The object key: the last type and id tokens.
    #[must_use]
    pub fn typeid(&self) -> Spec {
        self.pick(&[Quant::Type, Quant::Id])
    }

    /// The last token of each listed quant, in the order listed.
    #[must_use]
    pub fn pick(&self, quants: &[Quant]) -> Spec {
        quants
            .iter()
            .filter_map(|q| self.last(*q))
            .cloned()
            .collect()
    }

    /// Whether this is exactly `/type#id!version.op`: one token per
    /// primary quant, in canonical order.
    pub fn is_address(&self) -> bool {
        self.has_shape(&Quant::ALL)
    }

    /// Whether this is exactly `!version.op`, the shape of a patch line.
    pub fn is_sub_spec(&self) -> bool {
        self.has_shape(&[Quant::Version, Quant::Op])
    }

    fn has_shape(&self, shape: &[Quant]) -> bool {
        self.tokens.len() == shape.len()
            && self.tokens.iter().zip(shape).all(|(t, q)| t.quant == *q)
    }
}

impl FromIterator<Token> for Spec {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Spec {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Spec {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl From<Token> for Spec {
    fn from(token: Token) -> Self {
        std::iter::once(token).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(s: &str) -> Spec {
        Spec::parse(s).unwrap()
    }

    #[test]
    fn test_try_address_rejects_reserved_bodies() {
        assert_eq!(
            Spec::try_address("M", "obj", "v+a~s", "set").unwrap(),
            spec("/M#obj!v+a~s.set")
        );

        match Spec::try_address("M", "a.b", "v", "set") {
            Err(ProtocolError::MalformedSpecifier { string, cause }) => {
                assert_eq!(string, "/M#a.b!v.set");
                assert_eq!(cause, SpecParseError::InvalidCharacterAt { ch: '.', position: 4 });
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(Spec::try_address("M", "i", "v\n", "set").is_err());
        assert!(Spec::try_address("M", "i", "v", "").is_ok());
    }

    #[test]
    fn test_accessors() {
        let s = spec("/TodoItem#7AM0f+gritzko!7AMTc+gritzko.set");
        assert_eq!(s.ty(), "TodoItem");
        assert_eq!(s.id(), "7AM0f+gritzko");
        assert_eq!(s.version(), "7AMTc+gritzko");
        assert_eq!(s.op(), "set");
        assert_eq!(s.stamp(), "7AMTc");
        assert_eq!(s.author(), "gritzko");
        assert_eq!(s.session(), "");
    }

    #[test]
    fn test_empty_spec_accessors() {
        let s = Spec::new();
        assert_eq!(s.ty(), "");
        assert_eq!(s.id(), "");
        assert_eq!(s.version(), "");
        assert_eq!(s.op(), "");
        assert_eq!(s.author(), "");
        assert_eq!(s.source(), "");
        assert!(s.token(Quant::Version).is_none());
        assert!(s.is_empty());
    }

    #[test]
    fn test_last_token_wins() {
        let s = spec("/Type!abc.off.on");
        assert_eq!(s.op(), "on");
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn test_token_view() {
        let s = spec("/Class#ID!7Umum+gritzko~ssn.event");
        let v = s.token(Quant::Version).unwrap();
        assert_eq!(v.ext, "gritzko~ssn");
        assert_eq!(v.bare, "7Umum");
        assert_eq!(s.session(), "ssn");
    }

    #[test]
    fn test_strict_version_parts() {
        assert!(spec("!7Umum+gritzko~ssn").try_version_parts().is_ok());
        assert!(spec("!7Umum+~ssn").try_version_parts().is_err());
        assert!(spec("/NoVersion").try_version_parts().is_err());
        assert_eq!(spec("!7Umum+~ssn").author(), "");
    }

    #[test]
    fn test_address_builder() {
        let s = Spec::address("Model", "id", "stamp+me", "set");
        assert_eq!(s, spec("/Model#id!stamp+me.set"));
        assert!(s.is_address());
    }

    #[test]
    fn test_shapes() {
        assert!(spec("/M#i!v.o").is_address());
        assert!(!spec("#i/M!v.o").is_address());
        assert!(!spec("/M#i!v.o.p").is_address());
        assert!(spec("!v.o").is_sub_spec());
        assert!(!spec(".o!v").is_sub_spec());
        assert!(!spec("!v").is_sub_spec());
    }

    #[test]
    fn test_projections() {
        let s = spec("/Type!abc.off.on");
        assert_eq!(s.filter(&[Quant::Op]), spec(".off.on"));
        assert_eq!(s.pick(&[Quant::Op, Quant::Type]), spec(".on/Type"));
        assert_eq!(spec("/M#i!v.o").typeid(), spec("/M#i"));
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(spec("!a.b"), spec("!a.b"));
        assert_ne!(spec("!a.b"), spec(".b!a"));
    }
}
