//! Nom-based specifier tokenizer.
//!
//! Grammar:
//! ```text
//! spec  = *token
//! token = quant *body-char
//! quant = "/" / "#" / "!" / "."
//! ```
//! A body runs until the next quant. Control characters end the scan and are
//! rejected, as is body text that is not preceded by a quant.

use std::str::FromStr;

use nom::{
    bytes::complete::take_while,
    character::complete::anychar,
    combinator::map_opt,
    multi::fold_many0,
    sequence::pair,
    IResult,
};
use smallvec::SmallVec;

use crate::error::{ProtocolError, SpecParseError};
use crate::quant::{is_body_char, Quant};
use crate::token::Token;

use super::types::{Spec, TokenVec};

/// Parse a single `quant body` token, borrowing the body.
fn parse_token(input: &str) -> IResult<&str, (Quant, &str)> {
    pair(map_opt(anychar, Quant::from_char), take_while(is_body_char))(input)
}

/// Tokenize a whole specifier.
///
/// Returns the tokens or the first position that cannot start a token.
pub(crate) fn tokenize(input: &str) -> Result<TokenVec, SpecParseError> {
    let parsed = fold_many0(parse_token, SmallVec::new, |mut acc: TokenVec, (q, body)| {
        acc.push(Token::new(q, body));
        acc
    })(input);

    let (rest, tokens) = match parsed {
        Ok(ok) => ok,
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => (e.input, SmallVec::new()),
        Err(nom::Err::Incomplete(_)) => ("", SmallVec::new()),
    };

    match rest.chars().next() {
        None => Ok(tokens),
        Some(ch) => {
            let position = input.len() - rest.len();
            if ch.is_control() {
                Err(SpecParseError::InvalidCharacterAt { ch, position })
            } else {
                Err(SpecParseError::MissingQuant { position })
            }
        }
    }
}

impl Spec {
    /// Parse a specifier string.
    ///
    /// # Example
    ///
    /// ```
    /// use syncable_proto::Spec;
    ///
    /// let spec = Spec::parse("/Class#ID!7Umum+gritzko~ssn.event").unwrap();
    /// assert_eq!(spec.ty(), "Class");
    /// assert_eq!(spec.author(), "gritzko");
    /// assert!(Spec::parse("Class#ID").is_err());
    /// ```
    pub fn parse(s: &str) -> crate::Result<Spec> {
        tokenize(s)
            .map(Spec::from_tokens)
            .map_err(|cause| ProtocolError::spec(s, cause))
    }
}

impl FromStr for Spec {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Spec, Self::Err> {
        Spec::parse(s)
    }
}

impl TryFrom<&str> for Spec {
    type Error = ProtocolError;

    fn try_from(s: &str) -> Result<Spec, Self::Error> {
        Spec::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quants(tokens: &TokenVec) -> Vec<Quant> {
        tokens.iter().map(|t| t.quant).collect()
    }

    #[test]
    fn test_tokenize_full_address() {
        let tokens = tokenize("/Class#ID!7Umum+gritzko~ssn.event").unwrap();
        assert_eq!(
            quants(&tokens),
            vec![Quant::Type, Quant::Id, Quant::Version, Quant::Op]
        );
        assert_eq!(tokens[2].body, "7Umum+gritzko~ssn");
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_bare_quants() {
        let tokens = tokenize("!.").unwrap();
        assert_eq!(quants(&tokens), vec![Quant::Version, Quant::Op]);
        assert!(tokens.iter().all(|t| t.body.is_empty()));
    }

    #[test]
    fn test_tokenize_plus_in_op_body() {
        let tokens = tokenize(".on+re").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].body, "on+re");
    }

    #[test]
    fn test_tokenize_repeated_quants_keep_order() {
        let tokens = tokenize("/Type!abc.off.on").unwrap();
        assert_eq!(
            quants(&tokens),
            vec![Quant::Type, Quant::Version, Quant::Op, Quant::Op]
        );
        assert_eq!(tokens[3].body, "on");
    }

    #[test]
    fn test_body_before_quant_is_rejected() {
        assert_eq!(
            tokenize("Type#id"),
            Err(SpecParseError::MissingQuant { position: 0 })
        );
    }

    #[test]
    fn test_control_character_is_rejected() {
        assert_eq!(
            tokenize("/Type\t#id"),
            Err(SpecParseError::InvalidCharacterAt {
                ch: '\t',
                position: 5
            })
        );
        assert!(matches!(
            tokenize("\n"),
            Err(SpecParseError::InvalidCharacterAt { position: 0, .. })
        ));
    }

    #[test]
    fn test_from_str_wraps_error() {
        let err = "oops".parse::<Spec>().unwrap_err();
        match err {
            ProtocolError::MalformedSpecifier { string, cause } => {
                assert_eq!(string, "oops");
                assert_eq!(cause, SpecParseError::MissingQuant { position: 0 });
            }
            other => panic!("expected MalformedSpecifier, got {other:?}"),
        }
    }
}
