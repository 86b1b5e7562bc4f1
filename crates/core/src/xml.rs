//! XML payloads rendered as JSON
//!
//! Some providers only answer in XML. To keep one Field Mapper for every
//! provider, XML documents are converted into a JSON tree first:
//!
//! - an element becomes a key holding its content
//! - attributes become `@name` keys
//! - text next to attributes or children is kept under `$`
//! - an element with only text becomes a plain string
//! - an element with nothing in it becomes `null`
//! - repeated sibling elements collapse into an array, in document order
//!
//! The document root is kept as the single top-level key.

use crate::error::TransportError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

struct Frame {
    name: String,
    fields: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, TransportError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut fields = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| TransportError::Malformed(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            if key == "xmlns" || key.starts_with("xmlns:") {
                continue;
            }
            let value = attr
                .unescape_value()
                .map_err(|e| TransportError::Malformed(e.to_string()))?;
            fields.insert(format!("@{}", key), Value::String(value.into_owned()));
        }
        Ok(Frame {
            name,
            fields,
            text: String::new(),
        })
    }

    fn close(self) -> (String, Value) {
        let value = if self.fields.is_empty() {
            if self.text.is_empty() {
                Value::Null
            } else {
                Value::String(self.text)
            }
        } else {
            let mut fields = self.fields;
            if !self.text.is_empty() {
                fields.insert("$".to_string(), Value::String(self.text));
            }
            Value::Object(fields)
        };
        (self.name, value)
    }
}

fn insert_child(parent: &mut Map<String, Value>, name: String, value: Value) {
    match parent.get_mut(&name) {
        None => {
            parent.insert(name, value);
        }
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
    }
}

/// Convert an XML document into its JSON rendering
///
/// ```
/// use patent_client_core::xml::to_json;
/// use serde_json::json;
///
/// let doc = br#"<r n="2"><item>a</item><item>b</item></r>"#;
/// assert_eq!(
///     to_json(doc).unwrap(),
///     json!({"r": {"@n": "2", "item": ["a", "b"]}})
/// );
/// ```
pub fn to_json(bytes: &[u8]) -> Result<Value, TransportError> {
    let text = std::str::from_utf8(bytes).map_err(|e| TransportError::Malformed(e.to_string()))?;
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| TransportError::Malformed(e.to_string()))?;
        match event {
            Event::Start(start) => stack.push(Frame::open(&start)?),
            Event::Empty(start) => {
                let (name, value) = Frame::open(&start)?.close();
                match stack.last_mut() {
                    Some(parent) => insert_child(&mut parent.fields, name, value),
                    None => root = Some((name, value)),
                }
            }
            Event::Text(t) => {
                let s = t
                    .unescape()
                    .map_err(|e| TransportError::Malformed(e.to_string()))?;
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&s);
                }
            }
            Event::CData(c) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| TransportError::Malformed("unbalanced end tag".into()))?;
                let (name, value) = frame.close();
                match stack.last_mut() {
                    Some(parent) => insert_child(&mut parent.fields, name, value),
                    None => root = Some((name, value)),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(TransportError::Malformed("unexpected end of document".into()));
    }
    let (name, value) =
        root.ok_or_else(|| TransportError::Malformed("document has no root element".into()))?;
    let mut out = Map::new();
    out.insert(name, value);
    Ok(Value::Object(out))
}
