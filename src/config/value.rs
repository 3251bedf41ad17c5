//! Untyped configuration values.
//!
//! # Design Decisions
//! - The value universe is closed (bool, integer, float, string, group)
//! - Equality is derived, so comparing two groups is a recursive value-level
//!   comparison with no reflection involved
//! - Untagged serde representation keeps the on-disk document plain
//! - Values outside the universe are rejected with a clear error: integers
//!   beyond the `i64` range are not widened to floats, and arrays are refused

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Unexpected, Visitor};
use serde::{Deserialize, Serialize};

/// A flat key/value settings block for one component.
pub type ConfigGroup = BTreeMap<String, ConfigValue>;

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Group(ConfigGroup),
}

impl ConfigValue {
    /// Returns the string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

struct ConfigValueVisitor;

impl<'de> Visitor<'de> for ConfigValueVisitor {
    type Value = ConfigValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean, integer, float, string or table")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ConfigValue, E> {
        i64::try_from(v)
            .map(ConfigValue::Integer)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &"an integer no larger than i64::MAX"))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<ConfigValue, E> {
        Ok(ConfigValue::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ConfigValue, E> {
        Ok(ConfigValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<ConfigValue, E> {
        Ok(ConfigValue::String(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, _seq: A) -> Result<ConfigValue, A::Error> {
        Err(de::Error::custom("arrays are not supported in configuration values"))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ConfigValue, A::Error> {
        let mut group = ConfigGroup::new();
        while let Some((key, value)) = map.next_entry::<String, ConfigValue>()? {
            group.insert(key, value);
        }
        Ok(ConfigValue::Group(group))
    }
}

impl<'de> Deserialize<'de> for ConfigValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ConfigValueVisitor)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Integer(i) => write!(f, "{}", i),
            ConfigValue::Float(x) => write!(f, "{}", x),
            ConfigValue::String(s) => write!(f, "{}", s),
            ConfigValue::Group(g) => {
                write!(f, "{{")?;
                for (i, (k, v)) in g.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i32> for ConfigValue {
    fn from(i: i32) -> Self {
        ConfigValue::Integer(i64::from(i))
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Integer(i)
    }
}

impl From<f64> for ConfigValue {
    fn from(x: f64) -> Self {
        ConfigValue::Float(x)
    }
}

impl From<ConfigGroup> for ConfigValue {
    fn from(g: ConfigGroup) -> Self {
        ConfigValue::Group(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deep_equality() {
        let mut a = ConfigGroup::new();
        a.insert("host".into(), "mx.example.com".into());
        a.insert("limits".into(), ConfigValue::Group(ConfigGroup::from([
            ("size".to_string(), ConfigValue::from(10)),
        ])));
        let mut b = a.clone();
        assert_eq!(a, b);

        b.insert("limits".into(), ConfigValue::Group(ConfigGroup::from([
            ("size".to_string(), ConfigValue::from(11)),
        ])));
        assert_ne!(a, b);
    }

    #[test]
    fn test_integer_and_float_differ() {
        assert_ne!(ConfigValue::from(1), ConfigValue::from(1.0));
    }

    #[test]
    fn test_untagged_json() {
        let group: ConfigGroup = serde_json::from_str(
            r#"{"workers": 2, "ratio": 0.5, "debug": true, "name": "x"}"#,
        ).unwrap();
        assert_eq!(group["workers"], ConfigValue::Integer(2));
        assert_eq!(group["ratio"], ConfigValue::Float(0.5));
        assert_eq!(group["debug"], ConfigValue::Bool(true));
        assert_eq!(group["name"].as_str(), Some("x"));
    }

    #[test]
    fn test_out_of_range_integer_rejected() {
        let err = serde_json::from_str::<ConfigGroup>(r#"{"size": 18446744073709551615}"#)
            .unwrap_err();
        assert!(err.to_string().contains("i64::MAX"), "{}", err);

        let group: ConfigGroup = serde_json::from_str(r#"{"size": 9223372036854775807}"#).unwrap();
        assert_eq!(group["size"], ConfigValue::Integer(i64::MAX));
    }

    #[test]
    fn test_arrays_rejected() {
        let err = toml::from_str::<ConfigGroup>("hosts = [\"a\", \"b\"]").unwrap_err();
        assert!(err.to_string().contains("arrays are not supported"), "{}", err);
    }
}
