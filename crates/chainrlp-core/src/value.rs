//! Dynamic values produced by decode strategies and consumed by write strategies.

use std::fmt;

/// A decoded value. The shape mirrors the descriptor it was decoded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Absent optional / empty nilable input
    Nil,
    Bool(bool),
    Uint(u128),
    Bytes(Vec<u8>),
    Str(String),
    /// Elements of a sequence
    List(Vec<Value>),
    /// Visible, non-ignored fields of a composite in declaration order
    Struct(Vec<Value>),
}

impl Value {
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Short name of the variant, used in mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Uint(_) => "uint",
            Value::Bytes(_) => "bytes",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Struct(_) => "struct",
        }
    }

    pub fn as_u128(&self) -> Option<u128> {
        match self {
            Value::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_fields(&self) -> Option<&[Value]> {
        match self {
            Value::Struct(fields) => Some(fields),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint(v as u128)
    }
}

impl From<u128> for Value {
    fn from(v: u128) -> Self {
        Value::Uint(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Uint(v) => write!(f, "{v}"),
            Value::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                let parts: Vec<_> = items.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Value::Struct(fields) => {
                let parts: Vec<_> = fields.iter().map(|x| x.to_string()).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}
