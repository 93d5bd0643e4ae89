//! Typed reactive fields.
//!
//! A field pairs a typed get/set surface with a shared string-typed backing
//! variable ([`FieldVar`]) that widgets can observe. Binding expressions
//! reach fields through [`crate::value::Value::Field`] and their variables
//! through the `var` pseudo-key.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::value::Value;

/// Shared backing variable behind a field.
///
/// String-typed regardless of the field's own type, so a toolkit can wire
/// it to a widget's text variable.
#[derive(Clone, Default)]
pub struct FieldVar {
    inner: Rc<RefCell<String>>,
}

impl FieldVar {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(initial.into())),
        }
    }

    pub fn get(&self) -> String {
        self.inner.borrow().clone()
    }

    pub fn set(&self, value: impl Into<String>) {
        *self.inner.borrow_mut() = value.into();
    }

    /// True when both handles point at the same underlying variable.
    pub fn same_var(&self, other: &FieldVar) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for FieldVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldVar({:?})", self.get())
    }
}

/// Typed access to a backing variable.
pub trait Field {
    fn get(&self) -> Value;
    fn set(&mut self, value: Value);
    fn var(&self) -> FieldVar;
}

/// Shared field handle, the form stored in data contexts.
pub type FieldHandle = Rc<RefCell<dyn Field>>;

/// Name-keyed collection of a host's fields, insertion-ordered.
#[derive(Clone, Default)]
pub struct Fields {
    entries: Vec<(String, FieldHandle)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field, replacing any previous field of the same name.
    pub fn insert(&mut self, name: impl Into<String>, field: FieldHandle) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = field,
            None => self.entries.push((name, field)),
        }
    }

    pub fn get(&self, name: &str) -> Option<FieldHandle> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f.clone())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldHandle)> {
        self.entries.iter().map(|(n, f)| (n.as_str(), f))
    }
}

// ── String ───────────────────────────────────────────────────────────

/// Text field with an optional maximum length, enforced by truncation on
/// every set.
pub struct StringField {
    var: FieldVar,
    max_length: Option<usize>,
}

impl StringField {
    pub fn new(initial: impl Into<String>, max_length: Option<usize>) -> Self {
        let mut field = Self {
            var: FieldVar::default(),
            max_length,
        };
        field.set(Value::Str(initial.into()));
        field
    }

    pub fn into_handle(self) -> FieldHandle {
        Rc::new(RefCell::new(self))
    }
}

impl Field for StringField {
    fn get(&self) -> Value {
        Value::Str(self.var.get())
    }

    fn set(&mut self, value: Value) {
        let mut text = value.as_text();
        if let Some(max) = self.max_length {
            if let Some((cut, _)) = text.char_indices().nth(max) {
                text.truncate(cut);
            }
        }
        self.var.set(text);
    }

    fn var(&self) -> FieldVar {
        self.var.clone()
    }
}

// ── Bool ─────────────────────────────────────────────────────────────

/// Boolean field; the backing variable holds `"true"` or `"false"`.
pub struct BoolField {
    var: FieldVar,
}

impl BoolField {
    pub fn new(initial: bool) -> Self {
        Self {
            var: FieldVar::new(initial.to_string()),
        }
    }

    pub fn into_handle(self) -> FieldHandle {
        Rc::new(RefCell::new(self))
    }
}

impl Field for BoolField {
    fn get(&self) -> Value {
        Value::Bool(self.var.get() == "true")
    }

    fn set(&mut self, value: Value) {
        let truth = match value {
            Value::Bool(b) => b,
            Value::Int(n) => n != 0,
            Value::Str(s) => matches!(s.as_str(), "true" | "1"),
            _ => false,
        };
        self.var.set(truth.to_string());
    }

    fn var(&self) -> FieldVar {
        self.var.clone()
    }
}

// ── Int ──────────────────────────────────────────────────────────────

/// Integer field; unparsable sets leave the value unchanged.
pub struct IntField {
    var: FieldVar,
}

impl IntField {
    pub fn new(initial: i64) -> Self {
        Self {
            var: FieldVar::new(initial.to_string()),
        }
    }

    pub fn into_handle(self) -> FieldHandle {
        Rc::new(RefCell::new(self))
    }
}

impl Field for IntField {
    fn get(&self) -> Value {
        Value::Int(self.var.get().parse().unwrap_or(0))
    }

    fn set(&mut self, value: Value) {
        match value {
            Value::Int(n) => self.var.set(n.to_string()),
            Value::Bool(b) => self.var.set(if b { "1" } else { "0" }),
            Value::Str(s) => {
                if let Ok(n) = s.trim().parse::<i64>() {
                    self.var.set(n.to_string());
                }
            }
            _ => {}
        }
    }

    fn var(&self) -> FieldVar {
        self.var.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── StringField ──────────────────────────────────────────────────

    #[test]
    fn string_field_roundtrip() {
        let mut field = StringField::new("hello", None);
        assert_eq!(field.get(), Value::str("hello"));
        field.set(Value::str("world"));
        assert_eq!(field.get(), Value::str("world"));
    }

    #[test]
    fn string_field_truncates_to_max_length() {
        let mut field = StringField::new("", Some(5));
        field.set(Value::str("overflowing"));
        assert_eq!(field.get(), Value::str("overf"));
    }

    #[test]
    fn string_field_truncates_initial_value() {
        let field = StringField::new("toolong", Some(3));
        assert_eq!(field.get(), Value::str("too"));
    }

    #[test]
    fn string_field_var_tracks_value() {
        let mut field = StringField::new("a", None);
        let var = field.var();
        field.set(Value::str("b"));
        assert_eq!(var.get(), "b");
        var.set("c");
        assert_eq!(field.get(), Value::str("c"));
    }

    // ── BoolField ────────────────────────────────────────────────────

    #[test]
    fn bool_field_coerces() {
        let mut field = BoolField::new(false);
        field.set(Value::str("true"));
        assert_eq!(field.get(), Value::Bool(true));
        field.set(Value::Int(0));
        assert_eq!(field.get(), Value::Bool(false));
    }

    // ── IntField ─────────────────────────────────────────────────────

    #[test]
    fn int_field_parses_strings() {
        let mut field = IntField::new(0);
        field.set(Value::str("42"));
        assert_eq!(field.get(), Value::Int(42));
    }

    #[test]
    fn int_field_ignores_unparsable() {
        let mut field = IntField::new(7);
        field.set(Value::str("seven"));
        assert_eq!(field.get(), Value::Int(7));
    }

    // ── Fields collection ────────────────────────────────────────────

    #[test]
    fn fields_insert_and_get() {
        let mut fields = Fields::new();
        fields.insert("name", StringField::new("amy", None).into_handle());
        let handle = fields.get("name").unwrap();
        assert_eq!(handle.borrow().get(), Value::str("amy"));
        assert!(fields.get("other").is_none());
    }

    #[test]
    fn fields_insert_replaces_by_name() {
        let mut fields = Fields::new();
        fields.insert("n", IntField::new(1).into_handle());
        fields.insert("n", IntField::new(2).into_handle());
        assert_eq!(fields.get("n").unwrap().borrow().get(), Value::Int(2));
    }
}
