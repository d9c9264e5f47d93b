use std::fmt::{self, Display, Formatter};

use crate::error::{ProtocolError, Result};
use crate::quant::Quant;

use super::types::Op;

impl Op {
    /// Fail unless the log entry for this operation parses back unchanged.
    ///
    /// The main specifier must be a full address, patch entries need a
    /// version or operation, no body may hold a quant or control character,
    /// and no value may hold a line feed.
    pub fn check_framing(&self) -> Result<()> {
        let unframeable = |reason| ProtocolError::Unframeable {
            spec: self.spec.to_string(),
            reason,
        };

        if !self.spec.is_address() {
            return Err(unframeable("main specifier is not a full address"));
        }
        if self.spec.check_bodies().is_err() {
            return Err(unframeable("specifier body contains a reserved character"));
        }
        if self.value.contains('\n') {
            return Err(unframeable("value contains a line feed"));
        }

        for sub in self.patch.iter().flatten() {
            let sub_spec = sub.spec.pick(&[Quant::Version, Quant::Op]);
            if !sub_spec.is_sub_spec() {
                return Err(unframeable("patch entry lacks a version or operation"));
            }
            if sub_spec.check_bodies().is_err() {
                return Err(unframeable("patch specifier contains a reserved character"));
            }
            if sub.value.contains('\n') {
                return Err(unframeable("patch value contains a line feed"));
            }
        }
        Ok(())
    }

    /// Serialize as an operation log entry.
    ///
    /// Unlike `Display`, refuses operations that would not parse back.
    ///
    /// ```
    /// use syncable_proto::{Op, Spec};
    ///
    /// let op = Op::new(Spec::address("M", "i", "v", "set"), "1");
    /// assert_eq!(op.to_log_string().unwrap(), "/M#i!v.set\t1\n");
    ///
    /// let forged = Op::new(Spec::address("M", "i", "v", "set"), "1\n/M#j!w.set\t2");
    /// assert!(forged.to_log_string().is_err());
    /// ```
    pub fn to_log_string(&self) -> Result<String> {
        self.check_framing()?;
        Ok(self.to_string())
    }
}

/// Writes one log entry: the main line, then for diff operations one
/// tab-indented line per patch entry and a closing blank line.
impl Display for Op {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}\t{}", self.spec, self.value)?;

        if let Some(ref patch) = self.patch {
            for sub in patch {
                let sub_spec = sub.spec.pick(&[Quant::Version, Quant::Op]);
                writeln!(f, "\t{}\t{}", sub_spec, sub.value)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Op, ProtocolError, Spec};

    fn spec(s: &str) -> Spec {
        Spec::parse(s).unwrap()
    }

    #[test]
    fn test_plain_entry() {
        let op = Op::new(spec("/Model#id!stamp.set"), r#"{"x":"y"}"#);
        assert_eq!(op.to_string(), "/Model#id!stamp.set\t{\"x\":\"y\"}\n");
    }

    #[test]
    fn test_diff_entry() {
        let op = Op::diff(
            spec("/Model#test!timeX+author~ssn.on"),
            vec![
                Op::patch_entry("time0", "set", r#"{"x":1}"#),
                Op::patch_entry("time1", "set", r#"{"y":2}"#),
            ],
        );
        assert_eq!(
            op.to_string(),
            "/Model#test!timeX+author~ssn.on\t\n\
             \t!time0.set\t{\"x\":1}\n\
             \t!time1.set\t{\"y\":2}\n\
             \n"
        );
    }

    #[test]
    fn test_empty_patch_still_terminates() {
        let op = Op::diff(spec("/Model#other!stamp.on"), vec![]);
        assert_eq!(op.to_string(), "/Model#other!stamp.on\t\n\n");
    }

    #[test]
    fn test_fully_addressed_patch_entries_are_shortened() {
        let op = Op::diff(
            spec("/M#i!v.on"),
            vec![Op::new(spec("/M#i!t0.set"), "1")],
        );
        assert_eq!(op.to_string(), "/M#i!v.on\t\n\t!t0.set\t1\n\n");
    }

    #[test]
    fn test_to_log_string_rejects_unframeable() {
        let cases = [
            Op::new(spec("/M#i!v.set"), "a\nb"),
            Op::new(spec("/M!v.set"), "1"),
            Op::new(Spec::address("M", "a.b", "v", "set"), "1"),
            Op::new(Spec::address("M", "i", "v", "se\tt"), "1"),
            Op::diff(spec("/M#i!v.on"), vec![Op::patch_entry("t0", "set", "1\n")]),
            Op::diff(spec("/M#i!v.on"), vec![Op::patch_entry("t/0", "set", "1")]),
            Op::diff(spec("/M#i!v.on"), vec![Op::new(spec("/M#i"), "1")]),
        ];
        for op in cases {
            assert!(
                matches!(op.to_log_string(), Err(ProtocolError::Unframeable { .. })),
                "{op:?}"
            );
        }
    }

    #[test]
    fn test_to_log_string_matches_display() {
        let op = Op::diff(spec("/M#i!v.on"), vec![Op::patch_entry("t0", "set", "1")]);
        assert_eq!(op.to_log_string().unwrap(), op.to_string());
    }
}
