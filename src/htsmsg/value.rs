//! HTSMSG value types
//!
//! HTSMSG fields carry one of a small set of value types. Integers are always
//! signed 64-bit on the wire, regardless of what the field means.

use std::fmt;

use bytes::Bytes;

use super::message::HtsMessage;

/// A single HTSMSG field value
#[derive(Debug, Clone, PartialEq)]
pub enum HtsValue {
    /// Signed integer (wire type 2, S64)
    S64(i64),

    /// UTF-8 string (wire type 3, STR)
    Str(String),

    /// Opaque bytes (wire type 4, BIN)
    Bin(Bytes),

    /// Ordered list of unnamed values (wire type 5, LIST)
    List(Vec<HtsValue>),

    /// Nested message (wire type 1, MAP)
    Map(HtsMessage),
}

impl HtsValue {
    /// Short type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            HtsValue::S64(_) => "s64",
            HtsValue::Str(_) => "string",
            HtsValue::Bin(_) => "bin",
            HtsValue::List(_) => "list",
            HtsValue::Map(_) => "map",
        }
    }

    /// Try to get this value as an integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            HtsValue::S64(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get this value as a string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            HtsValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as raw bytes
    pub fn as_bin(&self) -> Option<&Bytes> {
        match self {
            HtsValue::Bin(b) => Some(b),
            _ => None,
        }
    }

    /// Try to get this value as a list
    pub fn as_list(&self) -> Option<&[HtsValue]> {
        match self {
            HtsValue::List(l) => Some(l),
            _ => None,
        }
    }

    /// Try to get this value as a nested message
    pub fn as_map(&self) -> Option<&HtsMessage> {
        match self {
            HtsValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for HtsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HtsValue::S64(n) => write!(f, "{}", n),
            HtsValue::Str(s) => write!(f, "{:?}", s),
            HtsValue::Bin(b) => write!(f, "<{} bytes>", b.len()),
            HtsValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            HtsValue::Map(m) => write!(f, "{}", m),
        }
    }
}

impl From<i64> for HtsValue {
    fn from(v: i64) -> Self {
        HtsValue::S64(v)
    }
}

impl From<i32> for HtsValue {
    fn from(v: i32) -> Self {
        HtsValue::S64(v as i64)
    }
}

impl From<u32> for HtsValue {
    fn from(v: u32) -> Self {
        HtsValue::S64(v as i64)
    }
}

impl From<bool> for HtsValue {
    fn from(v: bool) -> Self {
        HtsValue::S64(v as i64)
    }
}

impl From<String> for HtsValue {
    fn from(v: String) -> Self {
        HtsValue::Str(v)
    }
}

impl From<&str> for HtsValue {
    fn from(v: &str) -> Self {
        HtsValue::Str(v.to_string())
    }
}

impl From<Bytes> for HtsValue {
    fn from(v: Bytes) -> Self {
        HtsValue::Bin(v)
    }
}

impl From<HtsMessage> for HtsValue {
    fn from(v: HtsMessage) -> Self {
        HtsValue::Map(v)
    }
}

impl<V: Into<HtsValue>> From<Vec<V>> for HtsValue {
    fn from(v: Vec<V>) -> Self {
        HtsValue::List(v.into_iter().map(|x| x.into()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessors() {
        let s = HtsValue::Str("test".into());
        assert_eq!(s.as_str(), Some("test"));
        assert_eq!(s.as_i64(), None);

        let n = HtsValue::S64(42);
        assert_eq!(n.as_i64(), Some(42));
        assert_eq!(n.as_str(), None);
        assert!(n.as_list().is_none());
        assert!(n.as_map().is_none());
    }

    #[test]
    fn test_from_conversions() {
        let v: HtsValue = "test".into();
        assert!(matches!(v, HtsValue::Str(_)));

        let v: HtsValue = 7i32.into();
        assert_eq!(v, HtsValue::S64(7));

        let v: HtsValue = true.into();
        assert_eq!(v, HtsValue::S64(1));

        let v: HtsValue = vec![1i64, 2, 3].into();
        assert_eq!(v.as_list().map(|l| l.len()), Some(3));
    }

    #[test]
    fn test_display() {
        let v: HtsValue = vec![HtsValue::S64(1), HtsValue::Str("a".into())].into();
        assert_eq!(v.to_string(), "[1, \"a\"]");

        let b = HtsValue::Bin(Bytes::from_static(&[1, 2, 3]));
        assert_eq!(b.to_string(), "<3 bytes>");
        assert_eq!(b.type_name(), "bin");
    }
}
