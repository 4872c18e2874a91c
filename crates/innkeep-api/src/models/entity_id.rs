// ── Core identity type ──
//
// Backend rows are keyed by integer primary keys, but some tables (and
// every realtime payload that went through JSON.stringify on a string id)
// hand us strings. EntityId accepts both and compares them consistently.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical identifier for any backend entity.
///
/// Numeric-looking strings normalize to [`EntityId::Numeric`], so `"42"`
/// and `42` name the same row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum EntityId {
    Numeric(i64),
    Text(String),
}

impl EntityId {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Numeric(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Self::Numeric(n),
            Raw::Str(s) => Self::from(s),
        })
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        Self::Numeric(n)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        match s.trim().parse::<i64>() {
            Ok(n) => Self::Numeric(n),
            Err(_) => Self::Text(s),
        }
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn numeric_strings_normalize() {
        assert_eq!(EntityId::from("42"), EntityId::Numeric(42));
        assert_eq!(EntityId::from(" 7 "), EntityId::Numeric(7));
        assert_eq!(
            EntityId::from("dev-abc"),
            EntityId::Text("dev-abc".into())
        );
    }

    #[test]
    fn deserializes_number_and_string() {
        let a: EntityId = serde_json::from_str("12").unwrap();
        let b: EntityId = serde_json::from_str("\"12\"").unwrap();
        let c: EntityId = serde_json::from_str("\"a1b2\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(c.to_string(), "a1b2");
    }

    #[test]
    fn serializes_untagged() {
        assert_eq!(serde_json::to_string(&EntityId::Numeric(3)).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&EntityId::Text("x".into())).unwrap(),
            "\"x\""
        );
    }
}
