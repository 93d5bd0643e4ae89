//! Recording toolkit backend for tests.

use slotmap::{SecondaryMap, SlotMap};

use crate::toolkit::{Toolkit, WidgetId};
use crate::value::{Value, ValueMap};

/// One recorded backend operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Construct {
        id: WidgetId,
        type_name: String,
        parent: WidgetId,
        options: ValueMap,
    },
    BoxPlace {
        id: WidgetId,
        options: ValueMap,
    },
    GridPlace {
        id: WidgetId,
        options: ValueMap,
    },
    SetWindowMenu {
        menu: WidgetId,
    },
    CascadeAttach {
        menu: WidgetId,
        child: WidgetId,
        options: ValueMap,
    },
    AppendEntry {
        menu: WidgetId,
        entry_type: String,
        options: ValueMap,
    },
    AddTab {
        notebook: WidgetId,
        child: WidgetId,
        label: String,
    },
    Configure {
        target: WidgetId,
        property: String,
        value: Value,
    },
}

/// Mock [`Toolkit`] that mints widget ids and records every call in order.
#[derive(Default)]
pub struct RecordingToolkit {
    ids: SlotMap<WidgetId, ()>,
    types: SecondaryMap<WidgetId, String>,
    window: Option<WidgetId>,
    ops: Vec<Op>,
}

impl RecordingToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Ids of constructed widgets of a type, in construction order.
    pub fn constructed(&self, type_name: &str) -> Vec<WidgetId> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Construct { id, type_name: t, .. } if t == type_name => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn type_of(&self, id: WidgetId) -> Option<&str> {
        self.types.get(id).map(String::as_str)
    }

    /// The recorded construction of a widget, if any.
    pub fn construction(&self, id: WidgetId) -> Option<&Op> {
        self.ops
            .iter()
            .find(|op| matches!(op, Op::Construct { id: i, .. } if *i == id))
    }

    /// Recorded placements and registrations targeting a widget.
    pub fn placements(&self, id: WidgetId) -> Vec<&Op> {
        self.ops
            .iter()
            .filter(|op| match op {
                Op::BoxPlace { id: i, .. } | Op::GridPlace { id: i, .. } => *i == id,
                Op::AddTab { child, .. } => *child == id,
                Op::CascadeAttach { child, .. } => *child == id,
                _ => false,
            })
            .collect()
    }

    fn mint(&mut self, type_name: &str) -> WidgetId {
        let id = self.ids.insert(());
        self.types.insert(id, type_name.to_string());
        id
    }
}

impl Toolkit for RecordingToolkit {
    fn window(&mut self) -> WidgetId {
        match self.window {
            Some(id) => id,
            None => {
                let id = self.mint("window");
                self.window = Some(id);
                id
            }
        }
    }

    fn construct(&mut self, type_name: &str, parent: WidgetId, options: &ValueMap) -> WidgetId {
        let id = self.mint(type_name);
        self.ops.push(Op::Construct {
            id,
            type_name: type_name.to_string(),
            parent,
            options: options.clone(),
        });
        id
    }

    fn box_place(&mut self, id: WidgetId, options: &ValueMap) {
        self.ops.push(Op::BoxPlace {
            id,
            options: options.clone(),
        });
    }

    fn grid_place(&mut self, id: WidgetId, options: &ValueMap) {
        self.ops.push(Op::GridPlace {
            id,
            options: options.clone(),
        });
    }

    fn set_window_menu(&mut self, menu: WidgetId) {
        self.ops.push(Op::SetWindowMenu { menu });
    }

    fn cascade_attach(&mut self, menu: WidgetId, child: WidgetId, options: &ValueMap) {
        self.ops.push(Op::CascadeAttach {
            menu,
            child,
            options: options.clone(),
        });
    }

    fn append_entry(&mut self, menu: WidgetId, entry_type: &str, options: &ValueMap) {
        self.ops.push(Op::AppendEntry {
            menu,
            entry_type: entry_type.to_string(),
            options: options.clone(),
        });
    }

    fn add_tab(&mut self, notebook: WidgetId, child: WidgetId, label: &str) {
        self.ops.push(Op::AddTab {
            notebook,
            child,
            label: label.to_string(),
        });
    }

    fn configure(&mut self, target: WidgetId, property: &str, value: &Value) {
        self.ops.push(Op::Configure {
            target,
            property: property.to_string(),
            value: value.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_stable() {
        let mut tk = RecordingToolkit::new();
        assert_eq!(tk.window(), tk.window());
    }

    #[test]
    fn records_constructions_in_order() {
        let mut tk = RecordingToolkit::new();
        let window = tk.window();
        let a = tk.construct("frame", window, &ValueMap::new());
        let b = tk.construct("button", a, &ValueMap::new());
        assert_ne!(a, b);
        assert_eq!(tk.constructed("frame"), vec![a]);
        assert_eq!(tk.type_of(b), Some("button"));
        assert_eq!(tk.ops().len(), 2);
    }
}
