//! Caller-defined option sets that differentiate otherwise identical items.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use stow_core::{DomainError, DomainResult, ValueObject};

/// Free-form key/value options of a line item (engraving text, size, colour).
///
/// Equality is deep and insertion-order independent: keys are kept sorted and
/// nested objects compare as maps. Two option sets are equal only when every
/// key and every (nested) value is equal; there is no subset matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(BTreeMap<String, Value>);

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Parse options from a JSON value. `null` is the empty set; anything
    /// other than an object is rejected.
    pub fn from_json(value: Value) -> DomainResult<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => Ok(Self(map.into_iter().collect())),
            other => Err(DomainError::validation(format!(
                "options must be a JSON object, got {other}"
            ))),
        }
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.0.clone().into_iter().collect())
    }
}

impl ValueObject for Options {}

impl Hash for Options {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.len().hash(state);
        for (key, value) in &self.0 {
            key.hash(state);
            hash_value(value, state);
        }
    }
}

// Must agree with `Value`'s `PartialEq`: numbers hash by their textual form,
// which separates `1` from `1.0` exactly like equality does.
fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    match value {
        Value::Null => 0u8.hash(state),
        Value::Bool(b) => {
            1u8.hash(state);
            b.hash(state);
        }
        Value::Number(n) => {
            2u8.hash(state);
            n.to_string().hash(state);
        }
        Value::String(s) => {
            3u8.hash(state);
            s.hash(state);
        }
        Value::Array(items) => {
            4u8.hash(state);
            items.len().hash(state);
            for item in items {
                hash_value(item, state);
            }
        }
        Value::Object(map) => {
            5u8.hash(state);
            map.len().hash(state);
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            for (key, item) in entries {
                key.hash(state);
                hash_value(item, state);
            }
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Options {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<BTreeMap<String, Value>> for Options {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Self(value)
    }
}

impl TryFrom<Value> for Options {
    type Error = DomainError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(value)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use serde_json::json;

    use super::*;

    fn hash_of(options: &Options) -> u64 {
        let mut hasher = DefaultHasher::new();
        options.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let a = Options::new().with("size", "L").with("color", "red");
        let b = Options::new().with("color", "red").with("size", "L");
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn nested_objects_compare_deeply() {
        let a = Options::from_json(json!({"engraving": {"text": "hi", "font": "serif"}})).unwrap();
        let b = Options::from_json(json!({"engraving": {"font": "serif", "text": "hi"}})).unwrap();
        let c = Options::from_json(json!({"engraving": {"font": "serif", "text": "ho"}})).unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, c);
    }

    #[test]
    fn subsets_are_not_equal() {
        let full = Options::new().with("a", 1).with("b", 2);
        let subset = Options::new().with("a", 1);
        assert_ne!(full, subset);
        assert_ne!(subset, Options::new());
    }

    #[test]
    fn null_is_empty_and_scalars_are_rejected() {
        assert!(Options::from_json(Value::Null).unwrap().is_empty());
        assert!(matches!(
            Options::from_json(json!(["a"])),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn serializes_as_a_plain_object() {
        let options = Options::new().with("loves", "cats");
        assert_eq!(serde_json::to_value(&options).unwrap(), json!({"loves": "cats"}));
        assert_eq!(options.to_json(), json!({"loves": "cats"}));
    }

    proptest::proptest! {
        #[test]
        fn entry_order_never_changes_identity(
            entries in proptest::collection::btree_map("[a-z]{1,8}", proptest::num::i64::ANY, 0..8)
        ) {
            let forward: Options = entries.iter().map(|(k, v)| (k.clone(), *v)).collect();
            let backward: Options = entries.iter().rev().map(|(k, v)| (k.clone(), *v)).collect();
            proptest::prop_assert_eq!(&forward, &backward);
            proptest::prop_assert_eq!(hash_of(&forward), hash_of(&backward));
        }
    }
}
