//! Specifiers: ordered token sequences such as `/Type#id!stamp+author~ssn.op`.

mod algebra;
mod parse;
mod serialize;
mod types;

pub(crate) use self::parse::tokenize;
pub use self::types::Spec;
