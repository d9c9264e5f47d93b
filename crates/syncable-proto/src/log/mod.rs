//! The operation log wire format.
//!
//! ```text
//! entry       = main-line [patch-block]
//! main-line   = full-spec TAB value LF
//! patch-block = *(TAB sub-spec TAB value LF) LF
//! ```
//!
//! Which operations must carry a patch block is decided by a
//! [`PatchPolicy`]. Blocks are also recognized by framing alone (a tab-led
//! or blank line right after a main line), so any [`Op`](crate::Op) built in
//! code that passes [`Op::check_framing`](crate::Op::check_framing)
//! serializes and parses back unchanged.

#[cfg(feature = "codec")]
mod codec;
mod parse;
mod policy;

#[cfg(feature = "codec")]
pub use self::codec::{OpCodec, DEFAULT_MAX_ENTRY_LEN};
pub use self::parse::{parse, parse_partial, parse_with, LogParser, Partial};
pub use self::policy::{DiffOps, NoDiffOps, PatchPolicy};

use crate::error::Result;
use crate::op::Op;

/// Serialize operations back to log text.
///
/// The exact inverse of [`parse`]: `serialize(&parse(t)?)? == t`. Operations
/// whose text would not parse back, such as a value holding a line feed, fail
/// with [`Unframeable`](crate::ProtocolError::Unframeable) and nothing is
/// returned.
pub fn serialize(ops: &[Op]) -> Result<String> {
    use std::fmt::Write;

    let mut out = String::new();
    for op in ops {
        op.check_framing()?;
        // Writing into a String cannot fail.
        let _ = write!(out, "{}", op);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ProtocolError, Spec};

    #[test]
    fn test_serialize_concatenates_entries() {
        let text = "/M#a!1.set\t1\n/M#b!2.on\t\n\t!3.set\t2\n\n/M#c!4.set\t3\n";
        let ops = parse(text).unwrap();
        assert_eq!(ops.len(), 3);
        assert_eq!(serialize(&ops).unwrap(), text);
    }

    #[test]
    fn test_serialize_empty() {
        assert_eq!(serialize(&[]).unwrap(), "");
    }

    #[test]
    fn test_serialize_refuses_line_feed_in_value() {
        let ops = [
            Op::new(Spec::address("Acct", "alice", "1+alice", "set"), r#"{"x":1}"#),
            Op::new(
                Spec::address("Acct", "alice", "2+alice", "set"),
                "{\"x\":1}\n/Acct#bob!2+mallory.set\t{\"admin\":true}",
            ),
        ];
        match serialize(&ops) {
            Err(ProtocolError::Unframeable { spec, reason }) => {
                assert_eq!(spec, "/Acct#alice!2+alice.set");
                assert_eq!(reason, "value contains a line feed");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_serialize_refuses_reserved_body() {
        let ops = [Op::new(Spec::address("M", "a.b", "v", "set"), "1")];
        assert!(matches!(
            serialize(&ops),
            Err(ProtocolError::Unframeable { .. })
        ));
    }
}
