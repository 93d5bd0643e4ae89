//! Toolkit seam: the trait a concrete GUI backend implements, and the
//! registry of widget types the markup may name.
//!
//! The build driver talks to the backend exclusively through [`Toolkit`],
//! using opaque [`WidgetId`] handles. Nothing in the crate constructs real
//! widgets; tests use the recording mock in [`crate::testing`].

use slotmap::new_key_type;

use crate::value::{Value, ValueMap};

new_key_type! {
    /// Opaque handle to a backend widget.
    pub struct WidgetId;
}

/// Backend operations the build driver needs.
///
/// `WidgetId`s are minted by the implementation; the driver never assumes
/// anything about them beyond equality.
pub trait Toolkit {
    /// Handle of the host window. Root-level widgets and window-level
    /// configuration target this.
    fn window(&mut self) -> WidgetId;

    /// Create a widget of a registered type under a parent.
    fn construct(&mut self, type_name: &str, parent: WidgetId, options: &ValueMap) -> WidgetId;

    /// Place a widget with box-packing options (side, fill, ...).
    fn box_place(&mut self, id: WidgetId, options: &ValueMap);

    /// Place a widget at grid coordinates (row, column, spans).
    fn grid_place(&mut self, id: WidgetId, options: &ValueMap);

    /// Install a menu as the window's menu bar.
    fn set_window_menu(&mut self, menu: WidgetId);

    /// Attach a submenu to a parent menu as a cascade.
    fn cascade_attach(&mut self, menu: WidgetId, child: WidgetId, options: &ValueMap);

    /// Append a non-cascade entry (command, separator, ...) to a menu.
    fn append_entry(&mut self, menu: WidgetId, entry_type: &str, options: &ValueMap);

    /// Register a widget as a notebook tab.
    fn add_tab(&mut self, notebook: WidgetId, child: WidgetId, label: &str);

    /// Set a single property on an existing widget or the window.
    fn configure(&mut self, target: WidgetId, property: &str, value: &Value);
}

/// Capabilities of a registered widget type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WidgetSpec {
    /// The type is a menu; its children are menu entries or cascades.
    pub menu: bool,
    /// The type hosts tabs; direct children become tabs.
    pub notebook: bool,
    /// The type may hold child widgets.
    pub container: bool,
}

impl WidgetSpec {
    pub fn widget() -> Self {
        Self::default()
    }

    pub fn container() -> Self {
        Self {
            container: true,
            ..Self::default()
        }
    }

    pub fn menu() -> Self {
        Self {
            menu: true,
            ..Self::default()
        }
    }

    pub fn notebook() -> Self {
        Self {
            notebook: true,
            container: true,
            ..Self::default()
        }
    }
}

/// Widget type vocabulary: the names markup may use as tags or `type`
/// attribute values, with their capabilities.
#[derive(Clone, Debug, Default)]
pub struct WidgetRegistry {
    entries: Vec<(String, WidgetSpec)>,
}

impl WidgetRegistry {
    /// Empty registry; every tag will be unrecognized.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The default vocabulary.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for name in [
            "label",
            "entry",
            "button",
            "spinbox",
            "combobox",
            "listbox",
            "treeview",
            "radiobutton",
            "checkbutton",
        ] {
            registry.register(name, WidgetSpec::widget());
        }
        registry.register("frame", WidgetSpec::container());
        registry.register("labelframe", WidgetSpec::container());
        registry.register("notebook", WidgetSpec::notebook());
        registry.register("menu", WidgetSpec::menu());
        registry
    }

    /// Register a widget type, replacing any previous spec for the name.
    pub fn register(&mut self, name: impl Into<String>, spec: WidgetSpec) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = spec,
            None => self.entries.push((name, spec)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&WidgetSpec> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_vocabulary_capabilities() {
        let registry = WidgetRegistry::standard();
        assert!(registry.contains("button"));
        assert!(registry.get("frame").unwrap().container);
        assert!(registry.get("menu").unwrap().menu);
        let notebook = registry.get("notebook").unwrap();
        assert!(notebook.notebook);
        assert!(notebook.container);
        assert!(!registry.get("label").unwrap().container);
        assert!(!registry.contains("canvas"));
    }

    #[test]
    fn register_extends_the_vocabulary() {
        let mut registry = WidgetRegistry::standard();
        registry.register("canvas", WidgetSpec::container());
        assert!(registry.get("canvas").unwrap().container);
    }

    #[test]
    fn register_replaces_existing_spec() {
        let mut registry = WidgetRegistry::standard();
        registry.register("label", WidgetSpec::container());
        assert!(registry.get("label").unwrap().container);
    }
}
