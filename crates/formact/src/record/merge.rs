//! Merge a server-supplied partial record into the live record.
//!
//! The merge is version-aware: a nested record that matches the target's
//! identity and carries an optimistic-concurrency token is deep-merged
//! field-by-field, preserving unsaved sibling edits the response does not
//! mention. Without the token the target may be mid-edit, so the update is
//! parked under `$updatedValues` and reported in [`MergeOutcome::deferred`]
//! for the owning widget to reconcile.

use serde_json::{Map, Value};

use super::{is_temporal, maps_equal, record_id, truthy, Record, FETCHED, ID, UPDATED_VALUES, VERSION};

/// A nested update that could not be applied in place.
///
/// `field` is the dotted path of the nested record inside the merged source;
/// `values` is the partial update verbatim, as parked under `$updatedValues`.
#[derive(Debug, Clone, PartialEq)]
pub struct NestedUpdate {
    pub field: String,
    pub values: Value,
}

/// Result of [`merge`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    /// False when source deep-equals target and nothing was touched, so
    /// callers can skip widget notifications.
    pub changed: bool,
    /// Nested updates awaiting resolution by their owning sub-scope.
    pub deferred: Vec<NestedUpdate>,
}

/// Merge `source` into `target` in place.
///
/// No-op when the two are deep-equal (transient `$` markers excluded).
pub fn merge(source: &Record, target: &mut Record) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();
    if maps_equal(source, target) {
        return outcome;
    }
    outcome.changed = true;
    merge_into(source, target, "", &mut outcome);
    outcome
}

fn merge_into(source: &Record, target: &mut Record, path: &str, outcome: &mut MergeOutcome) {
    for (key, value) in source {
        if is_temporal(value) {
            target.insert(key.clone(), value.clone());
            continue;
        }
        match value {
            Value::Array(items) => {
                let merged = merge_collection(items, target.get(key));
                target.insert(key.clone(), merged);
            }
            Value::Object(nested) => {
                merge_nested(key, nested, target, path, outcome);
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Merge an ordered collection of entities, matching by identity.
///
/// The result preserves the source's order and length: target items absent
/// from the source are dropped, matched items are shallow-merged with source
/// fields winning, and items that arrived with both `id` and `version` are
/// marked `$fetched`.
fn merge_collection(items: &[Value], existing: Option<&Value>) -> Value {
    let empty = Vec::new();
    let dest = existing.and_then(Value::as_array).unwrap_or(&empty);
    let merged = items
        .iter()
        .map(|item| {
            let Some(src) = item.as_object() else {
                return item.clone();
            };
            let mut out = dest
                .iter()
                .filter_map(Value::as_object)
                .find(|d| d.get(ID) == src.get(ID))
                .cloned()
                .unwrap_or_default();
            for (k, v) in src {
                out.insert(k.clone(), v.clone());
            }
            if src.contains_key(VERSION) && src.get(ID).is_some_and(truthy) {
                out.insert(FETCHED.to_string(), Value::Bool(true));
            }
            Value::Object(out)
        })
        .collect();
    Value::Array(merged)
}

fn merge_nested(
    key: &str,
    source: &Map<String, Value>,
    target: &mut Record,
    path: &str,
    outcome: &mut MergeOutcome,
) {
    let field = join_path(path, key);
    let dest = match target.get(key) {
        Some(Value::Object(d)) => d.clone(),
        _ => Map::new(),
    };

    if dest.get(ID) == source.get(ID) {
        if dest.get(VERSION).is_some_and(truthy) {
            // Persisted and comparable: deep-merge into a shallow copy so
            // unsaved sibling edits survive the partial response.
            let mut copy = dest;
            if !maps_equal(source, &copy) {
                merge_into(source, &mut copy, &field, outcome);
            }
            target.insert(key.to_string(), Value::Object(copy));
        } else {
            // No concurrency token: the owning widget may be mid-edit, so
            // park the update and let it reconcile.
            let mut parked = dest;
            parked.insert(UPDATED_VALUES.to_string(), Value::Object(source.clone()));
            target.insert(key.to_string(), Value::Object(parked));
            outcome.deferred.push(NestedUpdate {
                field,
                values: Value::Object(source.clone()),
            });
        }
    } else {
        target.insert(key.to_string(), Value::Object(compact(source)));
    }
}

/// Strip `version` from a replacement record that carries a persisted `id`,
/// to avoid spurious stale-version conflicts on the next save.
fn compact(source: &Map<String, Value>) -> Map<String, Value> {
    let mut res = source.clone();
    if res.contains_key(VERSION) && res.get(ID).is_some_and(truthy) {
        res.remove(VERSION);
    }
    res
}

fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

/// Identity of a nested record value, exposed for callers that resolve
/// deferred updates against their own state.
pub fn update_id(update: &NestedUpdate) -> Option<&Value> {
    record_id(&update.values)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
