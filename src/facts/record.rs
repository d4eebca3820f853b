//! Fact record structure and dotted-path resolution

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Read-only fact record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactRecord(Value);

impl FactRecord {
    #[inline]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// A record with no attributes
    pub fn empty() -> Self {
        Self(Value::Object(Map::new()))
    }

    #[inline]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Resolve a dotted path such as `pickup.city`
    ///
    /// Objects are walked by key and arrays by numeric index. Any missing
    /// segment, or a segment applied to a scalar, yields `Resolved::Absent`.
    pub fn resolve(&self, path: &str) -> Resolved<'_> {
        let mut current = &self.0;
        for segment in path.split('.') {
            let next = match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            };
            match next {
                Some(value) => current = value,
                None => return Resolved::Absent,
            }
        }
        Resolved::Present(current)
    }
}

impl Default for FactRecord {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for FactRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<Map<String, Value>> for FactRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(Value::Object(map))
    }
}

/// Result of resolving a field path against a fact record
///
/// `Absent` is distinct from JSON `null`, `0` and `""`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Present(&'a Value),
    Absent,
}

impl<'a> Resolved<'a> {
    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, Resolved::Absent)
    }

    #[inline]
    pub fn value(&self) -> Option<&'a Value> {
        match *self {
            Resolved::Present(v) => Some(v),
            Resolved::Absent => None,
        }
    }
}
