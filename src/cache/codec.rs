//! Document Codec Module
//!
//! Text <-> document conversion backed by serde_json.

use serde::ser::Error as _;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

/// Indentation used for every stored document.
const INDENT: &[u8] = b"    ";

/// Parses stored text into a document.
pub fn parse(text: &str) -> serde_json::Result<Value> {
    serde_json::from_str(text)
}

/// Serializes a document as multi-line text with 4-space indentation.
pub fn serialize(value: &Value) -> serde_json::Result<String> {
    let mut buf = Vec::with_capacity(128);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(serde_json::Error::custom)
}

/// Looks up a top-level field; None if `value` is not an object or lacks it.
pub fn index(value: &Value, field: &str) -> Option<Value> {
    value.as_object()?.get(field).cloned()
}

/// Returns true for the codec's "absent" value.
pub fn is_absent(value: &Value) -> bool {
    value.is_null()
}
