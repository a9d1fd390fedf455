//! PDF object types for the writer.
//!
//! Dictionaries keep insertion order so serialized output is deterministic
//! and reads the way it was built (`/Type` first).

use indexmap::IndexMap;

/// Dictionary entries in insertion order.
pub type Dict = IndexMap<String, Object>;

/// PDF object representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Null object
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Real (floating-point) value
    Real(f64),
    /// String (byte array)
    String(Vec<u8>),
    /// Name (starting with /)
    Name(String),
    /// Array of objects
    Array(Vec<Object>),
    /// Dictionary (key-value pairs)
    Dictionary(Dict),
    /// Stream (dictionary + data)
    Stream {
        /// Stream dictionary
        dict: Dict,
        /// Stream data
        data: bytes::Bytes,
    },
    /// Indirect object reference
    Reference(ObjectRef),
}

/// Reference to an indirect object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// Object number
    pub id: u32,
    /// Generation number
    pub gen: u16,
}

impl ObjectRef {
    /// Create a new object reference.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

impl From<ObjectRef> for Object {
    fn from(r: ObjectRef) -> Self {
        Object::Reference(r)
    }
}

impl Object {
    /// Get the type name of this object (without data).
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Null => "Null",
            Object::Boolean(_) => "Boolean",
            Object::Integer(_) => "Integer",
            Object::Real(_) => "Real",
            Object::String(_) => "String",
            Object::Name(_) => "Name",
            Object::Array(_) => "Array",
            Object::Dictionary(_) => "Dictionary",
            Object::Stream { .. } => "Stream",
            Object::Reference(_) => "Reference",
        }
    }

    /// Name object.
    pub fn name(s: &str) -> Object {
        Object::Name(s.to_string())
    }

    /// Real object from an `f32` coordinate.
    pub fn real(value: f32) -> Object {
        Object::Real(value as f64)
    }

    /// Dictionary object from entries in order.
    pub fn dict(entries: Vec<(&str, Object)>) -> Object {
        Object::Dictionary(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    /// Stream object from dictionary entries and data.
    pub fn stream(entries: Vec<(&str, Object)>, data: impl Into<bytes::Bytes>) -> Object {
        Object::Stream {
            dict: entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            data: data.into(),
        }
    }

    /// Try to cast to integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Object::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to cast to name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Object::Name(n) => Some(n),
            _ => None,
        }
    }

    /// Try to cast to dictionary; streams expose their dictionary.
    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Object::Dictionary(d) | Object::Stream { dict: d, .. } => Some(d),
            _ => None,
        }
    }

    /// Try to cast to array.
    pub fn as_array(&self) -> Option<&Vec<Object>> {
        match self {
            Object::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Try to cast to reference.
    pub fn as_reference(&self) -> Option<ObjectRef> {
        match self {
            Object::Reference(r) => Some(*r),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dict_keeps_order() {
        let d = Object::dict(vec![("Type", Object::name("Page")), ("Count", Object::Integer(1))]);
        let keys: Vec<&str> = d.as_dict().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["Type", "Count"]);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Object::Integer(3).as_integer(), Some(3));
        assert_eq!(Object::name("Font").as_name(), Some("Font"));
        assert_eq!(Object::from(ObjectRef::new(4, 0)).as_reference(), Some(ObjectRef::new(4, 0)));
        assert!(Object::Null.as_array().is_none());
        let s = Object::stream(vec![("Filter", Object::name("DCTDecode"))], vec![1u8, 2, 3]);
        assert_eq!(s.type_name(), "Stream");
        assert!(s.as_dict().unwrap().contains_key("Filter"));
    }

    #[test]
    fn test_reference_display() {
        assert_eq!(ObjectRef::new(12, 0).to_string(), "12 0 R");
    }
}
