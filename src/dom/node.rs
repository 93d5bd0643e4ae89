//! Element types: ElementId, ElementData.

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for a markup element. Copy, lightweight (u64).
    pub struct ElementId;
}

/// Data for a single parsed markup element.
///
/// Attributes are kept in document order so that later resolution passes see
/// them the way the markup author wrote them. The cascade may append default
/// attributes after parse, but the tree shape itself never changes.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name, e.g. `"button"`, `"head"`, `"gd"`.
    pub tag: String,
    /// Ordered raw attributes as `(name, value)` pairs.
    pub attrs: Vec<(String, String)>,
    /// Trimmed text content, if the element carried any.
    pub text: Option<String>,
    /// Whether the element was written as a self-closing tag (`<button/>`).
    pub self_closing: bool,
}

impl ElementData {
    /// Create a new element with the given tag and no attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            text: None,
            self_closing: false,
        }
    }

    /// Append an attribute (builder).
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Set the text content (builder).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Mark the element as self-closing (builder).
    pub fn self_closing(mut self, yes: bool) -> Self {
        self.self_closing = yes;
        self
    }

    /// Look up an attribute value by name. First occurrence wins.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether an explicit attribute of the given name exists.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(n, _)| n == name)
    }

    /// Append an attribute if no attribute of that name exists yet.
    ///
    /// Used by the stylesheet cascade: explicit markup attributes always win
    /// over cascade defaults, and the first applied default wins thereafter.
    pub fn set_default_attr(&mut self, name: &str, value: &str) {
        if !self.has_attr(name) {
            self.attrs.push((name.to_owned(), value.to_owned()));
        }
    }

    /// The `id` attribute, if present.
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// The whitespace-separated values of the `class` attribute.
    pub fn classes(&self) -> Vec<&str> {
        self.attr("class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Whether the `class` attribute contains the given class name.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| *c == class)
    }

    /// Trimmed, non-empty text content.
    pub fn trimmed_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}
