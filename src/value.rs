//! Option values, the data context, and dotted-path binding resolution.
//!
//! Markup attributes written as `{a.b.c}` are binding expressions: they are
//! resolved against a [`DataContext`] at build time and replaced by the
//! value found there. Everything else stays a literal string.

use std::fmt;
use std::rc::Rc;

use crate::error::BuildError;
use crate::fields::{Field, FieldHandle, FieldVar};

/// A nullary callback shared with the toolkit (commands, menu entries).
pub type Callback = Rc<dyn Fn()>;

/// A resolved option value.
///
/// `Field` and `Var` are shared handles into the host's typed fields, so a
/// toolkit can observe the backing variable a binding named.
#[derive(Clone)]
pub enum Value {
    Str(String),
    Int(i64),
    Bool(bool),
    Callback(Callback),
    Map(ValueMap),
    Field(FieldHandle),
    Var(FieldVar),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// String form used when a value is handed to the toolkit as option
    /// text. Handles render as a placeholder.
    pub fn as_text(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Int(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Callback(_) => "<callback>".to_string(),
            Value::Map(_) => "<map>".to_string(),
            Value::Field(_) => "<field>".to_string(),
            Value::Var(_) => "<var>".to_string(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Callback(_) => write!(f, "Callback(..)"),
            Value::Map(m) => write!(f, "Map({m:?})"),
            Value::Field(_) => write!(f, "Field(..)"),
            Value::Var(v) => write!(f, "Var({:?})", v.get()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Callback(a), Value::Callback(b)) => Rc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Field(a), Value::Field(b)) => Rc::ptr_eq(a, b),
            (Value::Var(a), Value::Var(b)) => a.same_var(b),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Ordered string-keyed map of values. Insertion replaces an existing key
/// in place, keeping the original position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueMap {
    entries: Vec<(String, Value)>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for ValueMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        let mut map = ValueMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Root namespace for binding expressions.
///
/// Always carries a `self` entry for the host object's fields and
/// callbacks; further entries are supplied through the app configuration.
#[derive(Clone, Debug, Default)]
pub struct DataContext {
    entries: ValueMap,
}

impl DataContext {
    pub fn new() -> Self {
        let mut ctx = Self::default();
        ctx.entries.insert("self", Value::Map(ValueMap::new()));
        ctx
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Register an entry under the `self` namespace.
    pub fn insert_self(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let mut map = match self.entries.get("self") {
            Some(Value::Map(m)) => m.clone(),
            _ => ValueMap::new(),
        };
        map.insert(key, value);
        self.entries.insert("self", Value::Map(map));
    }
}

/// Resolve a dotted binding path (the text inside `{…}`) against the
/// context.
///
/// The first segment must be a context key; later segments traverse maps
/// by key and fields by the pseudo-keys `var` (the backing variable) and
/// `value` (the current value). Any missing key or non-traversable step
/// fails with [`BuildError::DataNotFound`] naming the full expression.
pub fn resolve_path(ctx: &DataContext, path: &str) -> Result<Value, BuildError> {
    let not_found = || BuildError::DataNotFound(path.to_string());

    let mut segments = path.split('.');
    let first = segments.next().filter(|s| !s.is_empty()).ok_or_else(not_found)?;
    let mut current = ctx.get(first).ok_or_else(not_found)?.clone();

    for segment in segments {
        current = match &current {
            Value::Map(map) => map.get(segment).ok_or_else(not_found)?.clone(),
            Value::Field(field) => match segment {
                "var" => Value::Var(field.borrow().var()),
                "value" => field.borrow().get(),
                _ => return Err(not_found()),
            },
            _ => return Err(not_found()),
        };
    }

    Ok(current)
}
