//! The in-memory record graph: the form's current entity state.
//!
//! A record is a plain `serde_json::Map` — arbitrary keys mapping to
//! scalars, nested records, or ordered sequences of records. Nested records
//! may carry an `id` (stable identity), a `version` (optimistic-concurrency
//! token) and transient `$`-prefixed markers owned by the UI layer.

pub mod merge;

use serde_json::{Map, Value};

/// The form's mutable record state.
pub type Record = Map<String, Value>;

/// Stable identity key of a persisted entity.
pub const ID: &str = "id";

/// Optimistic-concurrency token; its presence signals the entity is
/// persisted and safely mergeable.
pub const VERSION: &str = "version";

/// Transient marker: set on a collection item that arrived with both `id`
/// and `version`, i.e. a full server-confirmed entity rather than a stub.
pub const FETCHED: &str = "$fetched";

/// Transient marker: holds a partial update awaiting resolution by the
/// owning widget when no safe in-place merge is possible.
pub const UPDATED_VALUES: &str = "$updatedValues";

/// Loose truthiness, matching the wire protocol's weakly-typed flags:
/// `null`, `false`, `0` and `""` are false, everything else is true.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Identity of a nested record, if it carries one.
pub fn record_id(value: &Value) -> Option<&Value> {
    value.as_object().and_then(|o| o.get(ID))
}

/// Deep equality that ignores `$`-prefixed keys.
///
/// Transient markers are UI-side state and must not defeat the merge
/// identity short-circuit, so two records are compared on their persistent
/// fields only.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(a), Value::Object(b)) => maps_equal(a, b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(va, vb)| values_equal(va, vb))
        }
        _ => a == b,
    }
}

/// [`values_equal`] over two record maps.
pub fn maps_equal(a: &Map<String, Value>, b: &Map<String, Value>) -> bool {
    let persistent = |m: &Map<String, Value>| m.keys().filter(|k| !k.starts_with('$')).count();
    if persistent(a) != persistent(b) {
        return false;
    }
    a.iter()
        .filter(|(k, _)| !k.starts_with('$'))
        .all(|(k, va)| b.get(k).is_some_and(|vb| values_equal(va, vb)))
}

/// Whether a value is a temporal scalar (ISO-8601 date or datetime string).
///
/// The wire protocol carries dates as strings; they merge by plain
/// overwrite, never by structural recursion.
pub fn is_temporal(value: &Value) -> bool {
    let Value::String(s) = value else {
        return false;
    };
    let b = s.as_bytes();
    if b.len() < 10 {
        return false;
    }
    let date_ok = b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[7] == b'-'
        && b[8..10].iter().all(u8::is_ascii_digit);
    date_ok && (b.len() == 10 || b[10] == b'T' || b[10] == b' ')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
