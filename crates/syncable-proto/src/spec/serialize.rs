use std::fmt::{self, Display, Formatter};

use super::types::Spec;

impl Display for Spec {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Spec {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.check_bodies().map_err(serde::ser::Error::custom)?;
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Spec {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        Spec::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_preserves_stored_order() {
        for s in [
            "",
            "/Class#ID!7Umum+gritzko~ssn.event",
            "!abc.on/Class",
            "/Type!abc.off.on",
            ".on+re",
            "!.",
        ] {
            assert_eq!(Spec::parse(s).unwrap().to_string(), s);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_uses_string_form() {
        let spec = Spec::parse("/Model#id!v+me.set").unwrap();
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#""/Model#id!v+me.set""#);

        let back: Spec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);

        assert!(serde_json::from_str::<Spec>(r#""Model""#).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_refuses_text_it_could_not_read_back() {
        let dirty = Spec::address("M", "a.b", "v", "set");
        assert!(serde_json::to_string(&dirty).is_err());
    }
}
