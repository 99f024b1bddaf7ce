//! PDF object model and serialization.
//!
//! Serializes objects to their byte representation according to PDF
//! specification ISO 32000-1:2008. Output is deterministic: dictionary
//! keys are sorted and real numbers are trimmed.

use std::collections::HashMap;
use std::io::Write;

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
    Dictionary(HashMap<String, Object>),
    /// Stream (dictionary + data)
    Stream {
        /// Stream dictionary
        dict: HashMap<String, Object>,
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

/// Serializer for PDF objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectSerializer;

impl ObjectSerializer {
    /// Create a new object serializer.
    pub fn new() -> Self {
        Self
    }

    /// Serialize an object to bytes.
    pub fn serialize(&self, obj: &Object) -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_object(&mut buf, obj)?;
        Ok(buf)
    }

    /// Serialize an indirect object definition.
    ///
    /// Format: `{id} {gen} obj\n{object}\nendobj\n`
    pub fn serialize_indirect(&self, id: u32, gen: u16, obj: &Object) -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        writeln!(buf, "{} {} obj", id, gen)?;
        self.write_object(&mut buf, obj)?;
        write!(buf, "\nendobj\n")?;
        Ok(buf)
    }

    /// Write an object to a buffer.
    fn write_object<W: Write>(&self, w: &mut W, obj: &Object) -> std::io::Result<()> {
        match obj {
            Object::Null => write!(w, "null"),
            Object::Boolean(b) => write!(w, "{}", if *b { "true" } else { "false" }),
            Object::Integer(i) => write!(w, "{}", i),
            Object::Real(r) => self.write_real(w, *r),
            Object::String(s) => self.write_string(w, s),
            Object::Name(n) => self.write_name(w, n),
            Object::Array(arr) => self.write_array(w, arr),
            Object::Dictionary(dict) => self.write_dictionary(w, dict),
            Object::Stream { dict, data } => self.write_stream(w, dict, data),
            Object::Reference(r) => write!(w, "{} {} R", r.id, r.gen),
        }
    }

    /// Write a real number with trimmed precision.
    fn write_real<W: Write>(&self, w: &mut W, value: f64) -> std::io::Result<()> {
        if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            write!(w, "{}", value as i64)
        } else {
            let formatted = format!("{:.5}", value);
            let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
            write!(w, "{}", trimmed)
        }
    }

    /// Write a PDF string: literal syntax for printable data, hex otherwise.
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

    /// Write a PDF name, escaping delimiters and non-regular bytes as `#xx`.
    fn write_name<W: Write>(&self, w: &mut W, name: &str) -> std::io::Result<()> {
        write!(w, "/")?;
        for byte in name.bytes() {
            match byte {
                b'!' | b'"' | b'$'..=b'&' | b'\''..=b'.' | b'0'..=b'9' | b';' | b'<' | b'>'
                | b'?' | b'@' | b'A'..=b'Z' | b'^'..=b'z' | b'|' | b'~' => {
                    w.write_all(&[byte])?;
                },
                _ => {
                    write!(w, "#{:02X}", byte)?;
                },
            }
        }
        Ok(())
    }

    /// Write a PDF array.
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

    /// Write a PDF dictionary with sorted keys.
    fn write_dictionary<W: Write>(
        &self,
        w: &mut W,
        dict: &HashMap<String, Object>,
    ) -> std::io::Result<()> {
        write!(w, "<<")?;

        let mut keys: Vec<_> = dict.keys().collect();
        keys.sort();

        for key in keys {
            if let Some(value) = dict.get(key) {
                self.write_name(w, key)?;
                write!(w, " ")?;
                self.write_object(w, value)?;
            }
        }

        write!(w, ">>")
    }

    /// Write a PDF stream, inserting `/Length` if missing.
    fn write_stream<W: Write>(
        &self,
        w: &mut W,
        dict: &HashMap<String, Object>,
        data: &[u8],
    ) -> std::io::Result<()> {
        let mut dict_with_length = dict.clone();
        dict_with_length
            .entry("Length".to_string())
            .or_insert(Object::Integer(data.len() as i64));

        self.write_dictionary(w, &dict_with_length)?;
        write!(w, "\nstream\n")?;
        w.write_all(data)?;
        write!(w, "\nendstream")
    }
}

/// Helper constructors for building PDF objects.
impl ObjectSerializer {
    /// Create a Name object.
    pub fn name(s: &str) -> Object {
        Object::Name(s.to_string())
    }

    /// Create a String object from a Rust string.
    pub fn string(s: &str) -> Object {
        Object::String(s.as_bytes().to_vec())
    }

    /// Create an Integer object.
    pub fn integer(i: i64) -> Object {
        Object::Integer(i)
    }

    /// Create a Real object.
    pub fn real(r: f64) -> Object {
        Object::Real(r)
    }

    /// Create a Reference object.
    pub fn reference(id: u32, gen: u16) -> Object {
        Object::Reference(ObjectRef::new(id, gen))
    }

    /// Create a Dictionary object from key/value pairs.
    pub fn dict(entries: Vec<(&str, Object)>) -> Object {
        Object::Dictionary(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    /// Create a `[x1 y1 x2 y2]` rectangle array.
    pub fn rect(x1: f64, y1: f64, x2: f64, y2: f64) -> Object {
        Object::Array(vec![
            Object::Real(x1),
            Object::Real(y1),
            Object::Real(x2),
            Object::Real(y2),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_string(obj: &Object) -> String {
        String::from_utf8(ObjectSerializer::new().serialize(obj).unwrap()).unwrap()
    }

    #[test]
    fn test_scalar_serialization() {
        assert_eq!(to_string(&Object::Null), "null");
        assert_eq!(to_string(&Object::Boolean(true)), "true");
        assert_eq!(to_string(&Object::Integer(42)), "42");
        assert_eq!(to_string(&Object::Real(72.0)), "72");
        assert_eq!(to_string(&Object::Real(0.5)), "0.5");
        assert_eq!(to_string(&ObjectSerializer::reference(3, 0)), "3 0 R");
    }

    #[test]
    fn test_string_escaping() {
        let obj = ObjectSerializer::string("a(b)c\\");
        assert_eq!(to_string(&obj), "(a\\(b\\)c\\\\)");
    }

    #[test]
    fn test_binary_string_uses_hex() {
        let obj = Object::String(vec![0x00, 0xFE]);
        assert_eq!(to_string(&obj), "<00FE>");
    }

    #[test]
    fn test_name_escaping() {
        assert_eq!(to_string(&ObjectSerializer::name("F1")), "/F1");
        assert_eq!(to_string(&ObjectSerializer::name("with space")), "/with#20space");
    }

    #[test]
    fn test_dictionary_keys_sorted() {
        let obj = ObjectSerializer::dict(vec![
            ("Type", ObjectSerializer::name("Page")),
            ("Contents", ObjectSerializer::reference(4, 0)),
        ]);
        assert_eq!(to_string(&obj), "<</Contents 4 0 R/Type /Page>>");
    }

    #[test]
    fn test_stream_gets_length() {
        let obj = Object::Stream {
            dict: HashMap::new(),
            data: bytes::Bytes::from_static(b"0 0 m"),
        };
        let s = to_string(&obj);
        assert!(s.contains("/Length 5"));
        assert!(s.contains("stream\n0 0 m\nendstream"));
    }

    #[test]
    fn test_indirect_framing() {
        let bytes = ObjectSerializer::new()
            .serialize_indirect(7, 0, &Object::Integer(1))
            .unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "7 0 obj\n1\nendobj\n");
    }
}
