//! Values crossing the host/script boundary.
//!
//! Every engine adapter converts its native value type to and from
//! [`ScriptVal`], so callers pattern-match on a tag instead of downcasting
//! engine-specific types.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{Result, bail};

#[cfg(test)]
mod val_test;

/// Tagged union of the literal values the suite passes into and reads out of
/// embedded scripts. `Unit` carries every engine's nil/undefined/void.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptVal {
    Unit,
    Int(i64),
    Str(String),
    Bool(bool),
    Map(BTreeMap<String, ScriptVal>),
}

impl ScriptVal {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ScriptVal::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScriptVal::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScriptVal::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Convert a parsed JSON document. Floats are rejected: every literal in
    /// the suite is an integer, string, boolean or object.
    pub fn from_json(value: serde_json::Value) -> Result<ScriptVal> {
        Ok(match value {
            serde_json::Value::Null => ScriptVal::Unit,
            serde_json::Value::Bool(b) => ScriptVal::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ScriptVal::Int(i),
                None => bail!("non-integral json number: {n}"),
            },
            serde_json::Value::String(s) => ScriptVal::Str(s),
            serde_json::Value::Object(entries) => {
                let mut map = BTreeMap::new();
                for (key, entry) in entries {
                    map.insert(key, ScriptVal::from_json(entry)?);
                }
                ScriptVal::Map(map)
            }
            serde_json::Value::Array(_) => bail!("json arrays do not cross the boundary"),
        })
    }
}

impl fmt::Display for ScriptVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptVal::Unit => write!(f, "()"),
            ScriptVal::Int(v) => write!(f, "{v}"),
            ScriptVal::Str(v) => write!(f, "{v}"),
            ScriptVal::Bool(v) => write!(f, "{v}"),
            ScriptVal::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<i64> for ScriptVal {
    fn from(v: i64) -> Self {
        ScriptVal::Int(v)
    }
}

impl From<&str> for ScriptVal {
    fn from(v: &str) -> Self {
        ScriptVal::Str(v.to_string())
    }
}

impl From<String> for ScriptVal {
    fn from(v: String) -> Self {
        ScriptVal::Str(v)
    }
}

impl From<bool> for ScriptVal {
    fn from(v: bool) -> Self {
        ScriptVal::Bool(v)
    }
}
