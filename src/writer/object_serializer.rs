//! PDF object serialization.
//!
//! Serializes PDF objects to their byte representation according to
//! PDF specification ISO 32000-1:2008.

use std::io::Write;

use crate::object::{Dict, Object};

/// Serializer for PDF objects.
///
/// Converts PDF Object types to their byte representation following
/// the PDF specification syntax rules.
#[derive(Debug, Clone, Default)]
pub struct ObjectSerializer {
    /// Whether to use compact formatting (minimal whitespace)
    compact: bool,
}

impl ObjectSerializer {
    /// Create a new object serializer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compact serializer (minimal whitespace).
    pub fn compact() -> Self {
        Self { compact: true }
    }

    /// Serialize an object to bytes.
    pub fn serialize(&self, obj: &Object) -> Vec<u8> {
        let mut buf = Vec::new();
        // Writes into a Vec cannot fail
        let _ = self.write_object(&mut buf, obj);
        buf
    }

    /// Serialize an object to a string (for debugging).
    pub fn serialize_to_string(&self, obj: &Object) -> String {
        String::from_utf8_lossy(&self.serialize(obj)).to_string()
    }

    /// Write an indirect object definition.
    ///
    /// Format: `{id} {gen} obj\n{object}\nendobj\n`
    pub fn write_indirect<W: Write>(&self, w: &mut W, id: u32, gen: u16, obj: &Object) -> std::io::Result<()> {
        writeln!(w, "{} {} obj", id, gen)?;
        self.write_object(w, obj)?;
        write!(w, "\nendobj\n")
    }

    /// Write an object.
    pub fn write_object<W: Write>(&self, w: &mut W, obj: &Object) -> std::io::Result<()> {
        match obj {
            Object::Null => write!(w, "null"),
            Object::Boolean(b) => write!(w, "{}", if *b { "true" } else { "false" }),
            Object::Integer(i) => write!(w, "{}", i),
            Object::Real(r) => write!(w, "{}", format_real(*r)),
            Object::String(s) => self.write_string(w, s),
            Object::Name(n) => self.write_name(w, n),
            Object::Array(arr) => self.write_array(w, arr),
            Object::Dictionary(dict) => self.write_dictionary(w, dict),
            Object::Stream { dict, data } => self.write_stream(w, dict, data),
            Object::Reference(r) => write!(w, "{} {} R", r.id, r.gen),
        }
    }

    /// Write a PDF string.
    ///
    /// Uses literal string syntax `(...)` with proper escaping,
    /// or hex string syntax `<...>` for binary data.
    fn write_string<W: Write>(&self, w: &mut W, data: &[u8]) -> std::io::Result<()> {
        let is_printable = data
            .iter()
            .all(|&b| b == b'\n' || b == b'\r' || b == b'\t' || (0x20..=0x7E).contains(&b));

        if is_printable {
            write!(w, "(")?;
            for &byte in data {
                match byte {
                    b'(' => write!(w, "\\(")?,
                    b')' => write!(w, "\\)")?,
                    b'\\' => write!(w, "\\\\")?,
                    b'\n' => write!(w, "\\n")?,
                    b'\r' => write!(w, "\\r")?,
                    b'\t' => write!(w, "\\t")?,
                    _ => w.write_all(&[byte])?,
                }
            }
            write!(w, ")")
        } else {
            write!(w, "<")?;
            for byte in data {
                write!(w, "{:02X}", byte)?;
            }
            write!(w, ">")
        }
    }

    /// Write a PDF name.
    ///
    /// Names start with `/` and escape special characters with `#xx`.
    fn write_name<W: Write>(&self, w: &mut W, name: &str) -> std::io::Result<()> {
        write!(w, "/")?;
        for byte in name.bytes() {
            match byte {
                b'!'
                | b'"'
                | b'$'..=b'&'
                | b'\''..=b'.'
                | b'0'..=b'9'
                | b';'
                | b'<'
                | b'>'
                | b'?'
                | b'@'
                | b'A'..=b'Z'
                | b'^'..=b'z'
                | b'|'
                | b'~' => {
                    w.write_all(&[byte])?;
                },
                _ => {
                    write!(w, "#{:02X}", byte)?;
                },
            }
        }
        Ok(())
    }

    fn write_array<W: Write>(&self, w: &mut W, arr: &[Object]) -> std::io::Result<()> {
        write!(w, "[")?;
        for (i, obj) in arr.iter().enumerate() {
            if i > 0 {
                write!(w, " ")?;
            }
            self.write_object(w, obj)?;
        }
        write!(w, "]")
    }

    fn write_dictionary<W: Write>(&self, w: &mut W, dict: &Dict) -> std::io::Result<()> {
        write!(w, "<<")?;
        for (key, value) in dict {
            if self.compact {
                write!(w, " ")?;
            } else {
                write!(w, "\n  ")?;
            }
            self.write_name(w, key)?;
            write!(w, " ")?;
            self.write_object(w, value)?;
        }
        if self.compact {
            write!(w, " ")?;
        } else if !dict.is_empty() {
            writeln!(w)?;
        }
        write!(w, ">>")
    }

    /// `Length` is always set from the data.
    fn write_stream<W: Write>(&self, w: &mut W, dict: &Dict, data: &[u8]) -> std::io::Result<()> {
        let mut dict_with_length = dict.clone();
        dict_with_length.insert("Length".to_string(), Object::Integer(data.len() as i64));

        self.write_dictionary(w, &dict_with_length)?;
        write!(w, "\nstream\n")?;
        w.write_all(data)?;
        write!(w, "\nendstream")
    }
}

/// Format a real with at most 5 decimals, trailing zeros removed.
///
/// # Examples
///
/// ```
/// use pdf_overlay::writer::format_real;
///
/// assert_eq!(format_real(672.0), "672");
/// assert_eq!(format_real(0.333333), "0.33333");
/// assert_eq!(format_real(-0.000001), "0");
/// ```
pub fn format_real(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    if value.fract() == 0.0 {
        return format!("{}", value as i64);
    }
    let formatted = format!("{:.5}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        t => t.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectRef;

    #[test]
    fn test_serialize_scalars() {
        let s = ObjectSerializer::new();
        assert_eq!(s.serialize_to_string(&Object::Null), "null");
        assert_eq!(s.serialize_to_string(&Object::Boolean(true)), "true");
        assert_eq!(s.serialize_to_string(&Object::Integer(-123)), "-123");
        assert_eq!(s.serialize_to_string(&Object::Real(3.14258)), "3.14258");
        assert_eq!(s.serialize_to_string(&Object::Real(1.0)), "1");
    }

    #[test]
    fn test_serialize_string() {
        let s = ObjectSerializer::new();
        assert_eq!(s.serialize_to_string(&Object::String(b"Test (parens)".to_vec())), "(Test \\(parens\\))");
        assert_eq!(s.serialize_to_string(&Object::String(vec![0x00, 0xFF, 0x80])), "<00FF80>");
    }

    #[test]
    fn test_serialize_name_with_special_chars() {
        let s = ObjectSerializer::new();
        assert_eq!(s.serialize_to_string(&Object::name("Name With Space")), "/Name#20With#20Space");
    }

    #[test]
    fn test_serialize_dictionary_in_order() {
        let s = ObjectSerializer::compact();
        let dict = Object::dict(vec![
            ("Type", Object::name("Page")),
            ("Parent", ObjectRef::new(2, 0).into()),
            ("MediaBox", Object::Array(vec![Object::Integer(0), Object::real(612.5)])),
        ]);
        assert_eq!(s.serialize_to_string(&dict), "<< /Type /Page /Parent 2 0 R /MediaBox [0 612.5] >>");
    }

    #[test]
    fn test_serialize_stream_sets_length() {
        let s = ObjectSerializer::compact();
        let stream = Object::stream(vec![("Length", Object::Integer(99))], b"stream data".to_vec());
        let result = s.serialize_to_string(&stream);
        assert!(result.contains("/Length 11"));
        assert!(!result.contains("/Length 99"));
        assert!(result.ends_with("stream\nstream data\nendstream"));
    }

    #[test]
    fn test_write_indirect() {
        let s = ObjectSerializer::new();
        let mut buf = Vec::new();
        s.write_indirect(&mut buf, 1, 0, &Object::Integer(42)).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "1 0 obj\n42\nendobj\n");
    }

    #[test]
    fn test_format_real() {
        assert_eq!(format_real(0.5), "0.5");
        assert_eq!(format_real(f64::NAN), "0");
        assert_eq!(format_real(-2.25), "-2.25");
    }
}
