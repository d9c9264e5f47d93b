//! Parsed operations.

mod serialize;
mod types;

pub use self::types::Op;
