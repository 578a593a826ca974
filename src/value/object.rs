use std::iter::FromIterator;

use indexmap::IndexMap;

use super::Value;

/// An ordered, string-keyed map of [`Value`]s.
///
/// Backs [`Value::Object`]; preserves the order fields were inserted in, so
/// `data`'s key order always matches field-collection order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Object {
    key_value_list: IndexMap<String, Value>,
}

impl Object {
    /// Creates an empty object with capacity for `size` fields.
    pub fn with_capacity(size: usize) -> Self {
        Object {
            key_value_list: IndexMap::with_capacity(size),
        }
    }

    /// Inserts a field with a value.
    ///
    /// If the field already exists and both the existing and the new value
    /// are objects, they are merged (the new field's keys are folded into
    /// the existing object) rather than replaced — this is what lets
    /// multiple fragments selecting into the same object field accumulate
    /// their fields under one response key.
    pub fn add_field(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        match (value, self.key_value_list.get_mut(&key)) {
            (Value::Object(incoming), Some(Value::Object(existing))) => {
                for (k, v) in incoming {
                    existing.add_field(k, v);
                }
                None
            }
            (value, _) => self.key_value_list.insert(key, value),
        }
    }

    /// Whether a field with this key has been inserted.
    pub fn contains_field(&self, key: &str) -> bool {
        self.key_value_list.contains_key(key)
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.key_value_list.iter()
    }

    /// Iterates mutably over `(key, value)` pairs in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Value)> {
        self.key_value_list.iter_mut()
    }

    /// The number of fields currently stored.
    pub fn field_count(&self) -> usize {
        self.key_value_list.len()
    }

    /// Looks up a field's value by key.
    pub fn get_field_value(&self, key: &str) -> Option<&Value> {
        self.key_value_list.get(key)
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.key_value_list.into_iter()
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl FromIterator<(String, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut out = Object::with_capacity(iter.size_hint().0);
        for (k, v) in iter {
            out.add_field(k, v);
        }
        out
    }
}
