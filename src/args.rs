use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Bool,
    String,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Bool => f.write_str("bool"),
            ValueKind::String => f.write_str("string"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    String(String),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::String(_) => ValueKind::String,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::String(_) => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::String(s) => write!(f, "{s:?}"),
        }
    }
}

/// Entrypoint arguments, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Args {
    values: HashMap<String, Value>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for Args {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArgError {
    #[error("argument '{token}' does not name a key")]
    EmptyKey { token: String },
}

/// `--k=v` and `--k v` bind strings, `--no-k` binds false, a bare `--k` binds true.
pub fn bind_args<S: AsRef<str>>(tokens: &[S]) -> Result<Args, ArgError> {
    let mut args = Args::new();
    let mut rest = tokens.iter().map(|token| AsRef::<str>::as_ref(token)).peekable();

    while let Some(token) = rest.next() {
        let key = strip_dashes(token);
        if key.is_empty() {
            return Err(empty_key(token));
        }

        if let Some((name, value)) = key.split_once('=') {
            args.insert(non_empty(name, token)?, value);
        } else if let Some(value) = rest.next_if(|next| !next.starts_with('-')) {
            args.insert(key, value);
        } else if let Some(negated) = key.strip_prefix("no-") {
            args.insert(non_empty(negated, token)?, false);
        } else {
            args.insert(key, true);
        }
    }

    Ok(args)
}

fn strip_dashes(token: &str) -> &str {
    let token = token.strip_prefix('-').unwrap_or(token);
    token.strip_prefix('-').unwrap_or(token)
}

fn non_empty<'a>(key: &'a str, token: &str) -> Result<&'a str, ArgError> {
    if key.is_empty() {
        Err(empty_key(token))
    } else {
        Ok(key)
    }
}

fn empty_key(token: &str) -> ArgError {
    ArgError::EmptyKey {
        token: token.to_string(),
    }
}
