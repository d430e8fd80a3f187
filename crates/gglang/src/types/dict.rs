//! GGLang dict type preserving insertion order.

use indexmap::IndexMap;

use crate::{
    exception::{ExcType, RunResult},
    value::Value,
};

/// An insertion-ordered map from hashable values to values.
///
/// Entries are stored in an `IndexMap` keyed by a hashable projection of the
/// key value, with the originally-inserted key kept alongside the value so
/// iteration reproduces the keys exactly as written. Updating an existing
/// key replaces the value but keeps both the original key and its position,
/// and numeric keys unify the way numeric equality does (`1`, `1.0`, and
/// `true` are the same key).
#[derive(Debug, Default)]
pub(crate) struct Dict {
    entries: IndexMap<DictKey, DictEntry, ahash::RandomState>,
}

#[derive(Debug)]
struct DictEntry {
    key: Value,
    value: Value,
}

/// Hashable projection of a key value.
///
/// Lists, dicts, and objects are not hashable; integral floats and bools
/// collapse onto the integer key space so numeric-equal keys collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DictKey {
    None,
    Int(i64),
    FloatBits(u64),
    Str(String),
}

impl DictKey {
    fn from_value(value: &Value) -> RunResult<Self> {
        match value {
            Value::None => Ok(Self::None),
            Value::Bool(b) => Ok(Self::Int(i64::from(*b))),
            Value::Int(i) => Ok(Self::Int(*i)),
            Value::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    Ok(Self::Int(*f as i64))
                } else {
                    Ok(Self::FloatBits(f.to_bits()))
                }
            }
            Value::Str(s) => Ok(Self::Str(s.to_string())),
            other => Err(ExcType::TypeError
                .msg(format!("unhashable type: '{}'", other.type_name()))),
        }
    }
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts or updates an entry. Updates keep the original key and its
    /// insertion position.
    pub fn insert(&mut self, key: Value, value: Value) -> RunResult<()> {
        let hash_key = DictKey::from_value(&key)?;
        match self.entries.entry(hash_key) {
            indexmap::map::Entry::Occupied(mut occupied) => {
                occupied.get_mut().value = value;
            }
            indexmap::map::Entry::Vacant(vacant) => {
                vacant.insert(DictEntry { key, value });
            }
        }
        Ok(())
    }

    /// Looks a key up by equality. `Ok(None)` means the key is hashable but
    /// absent.
    pub fn get(&self, key: &Value) -> RunResult<Option<Value>> {
        let hash_key = DictKey::from_value(key)?;
        Ok(self.entries.get(&hash_key).map(|entry| entry.value.clone()))
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.values().map(|entry| (&entry.key, &entry.value))
    }

    /// A snapshot of the keys in insertion order, used by `for` iteration.
    pub fn keys(&self) -> Vec<Value> {
        self.entries.values().map(|entry| entry.key.clone()).collect()
    }

    /// Order-insensitive structural equality.
    pub fn eq_dict(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.entries.iter().all(|(hash_key, entry)| {
                other
                    .entries
                    .get(hash_key)
                    .is_some_and(|theirs| entry.value.eq_value(&theirs.value))
            })
    }
}
