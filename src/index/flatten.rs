use std::collections::{BTreeSet, HashMap};

use crate::core::types::{Document, Value};

/// Index keys produced by one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexKeys {
    /// `a.b.c` for every scalar leaf
    pub paths: BTreeSet<String>,
    /// `a.b.c=<value>` for every scalar leaf
    pub path_values: BTreeSet<String>,
}

impl IndexKeys {
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.paths.iter().chain(self.path_values.iter())
    }

    pub fn len(&self) -> usize {
        self.paths.len() + self.path_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.path_values.is_empty()
    }
}

/// Existence key for a path.
pub fn path_key<S: AsRef<str>>(path: &[S]) -> String {
    let mut key = String::new();
    for (i, segment) in path.iter().enumerate() {
        if i > 0 {
            key.push('.');
        }
        key.push_str(segment.as_ref());
    }
    key
}

/// Equality key for a path and the text form of its value.
pub fn path_value_key<S: AsRef<str>>(path: &[S], value: &str) -> String {
    format!("{}={}", path_key(path), value)
}

/// Walk the object tree and collect the keys of every scalar leaf.
/// Arrays are opaque: nothing below them, nor the array itself, is indexed.
pub fn flatten(doc: &Document) -> IndexKeys {
    let mut keys = IndexKeys::default();
    walk(&doc.fields, None, &mut keys);
    keys
}

fn walk(obj: &HashMap<String, Value>, prefix: Option<&str>, keys: &mut IndexKeys) {
    for (name, value) in obj {
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, name),
            None => name.clone(),
        };

        match value {
            Value::Object(child) => walk(child, Some(&path), keys),
            Value::Array(_) => continue,
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                // leaf_text is always Some for scalars
                if let Some(text) = value.leaf_text() {
                    keys.path_values.insert(format!("{}={}", path, text));
                }
                keys.paths.insert(path);
            }
        }
    }
}
