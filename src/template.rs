//! Template collaborator seams.
//!
//! Layout markup and stylesheets may live behind named templates. The core
//! only ever consumes rendered text: a [`Loader`] resolves names to source,
//! a [`Renderer`] expands that source with a template context. Real
//! template engines plug in behind `Renderer`; the default passes source
//! through untouched.

use crate::value::ValueMap;

/// Resolves template names to source text.
pub trait Loader {
    fn load(&self, name: &str) -> Option<String>;
}

/// In-memory loader backed by a name → source table.
#[derive(Clone, Debug, Default)]
pub struct DictLoader {
    entries: Vec<(String, String)>,
}

impl DictLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(name, source);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
        let name = name.into();
        let source = source.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = source,
            None => self.entries.push((name, source)),
        }
    }
}

impl Loader for DictLoader {
    fn load(&self, name: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s.clone())
    }
}

/// Expands template source with a context before parsing.
pub trait Renderer {
    fn render(&self, source: &str, context: &ValueMap) -> String;
}

/// Identity renderer: source is already final markup.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn render(&self, source: &str, _context: &ValueMap) -> String {
        source.to_string()
    }
}
