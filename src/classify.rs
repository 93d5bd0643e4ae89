//! Element classifier: tag categories, scope membership, legality.
//!
//! Pure queries over the tree shape and the widget registry. The grammar
//! lives here: which tags exist, where each may appear, and which may be
//! self-closing. `validate` runs the checks in a fixed order so the first
//! failure reported is the most specific one.

use crate::dom::{Dom, ElementData, ElementId};
use crate::error::BuildError;
use crate::toolkit::WidgetRegistry;

const SIDE_TAGS: [&str; 4] = ["top", "bottom", "left", "right"];
const MENU_ENTRY_TAGS: [&str; 4] = ["separator", "command", "radiobutton", "checkbutton"];

pub struct Classifier<'a> {
    dom: &'a Dom,
    registry: &'a WidgetRegistry,
}

impl<'a> Classifier<'a> {
    pub fn new(dom: &'a Dom, registry: &'a WidgetRegistry) -> Self {
        Self { dom, registry }
    }

    fn data(&self, id: ElementId) -> Option<&ElementData> {
        self.dom.get(id)
    }

    fn tag(&self, id: ElementId) -> &str {
        self.data(id).map(|d| d.tag.as_str()).unwrap_or("")
    }

    fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.dom.parent(id)
    }

    // ── Tag categories ───────────────────────────────────────────────

    pub fn is_html(&self, id: ElementId) -> bool {
        self.tag(id) == "html"
    }

    pub fn is_head(&self, id: ElementId) -> bool {
        self.tag(id) == "head"
    }

    pub fn is_body(&self, id: ElementId) -> bool {
        self.tag(id) == "body"
    }

    pub fn is_scope(&self, id: ElementId) -> bool {
        self.is_head(id) || self.is_body(id)
    }

    pub fn is_side(&self, id: ElementId) -> bool {
        SIDE_TAGS.contains(&self.tag(id))
    }

    pub fn is_grid(&self, id: ElementId) -> bool {
        self.tag(id) == "grid"
    }

    pub fn is_gr(&self, id: ElementId) -> bool {
        self.tag(id) == "gr"
    }

    pub fn is_gd(&self, id: ElementId) -> bool {
        self.tag(id) == "gd"
    }

    pub fn is_grid_element(&self, id: ElementId) -> bool {
        self.is_gr(id) || self.is_gd(id)
    }

    pub fn is_link(&self, id: ElementId) -> bool {
        self.tag(id) == "link"
    }

    /// A stylesheet link: `<link rel="stylesheet" type="text/css" href=…/>`.
    pub fn is_css(&self, id: ElementId) -> bool {
        self.is_link(id)
            && self
                .data(id)
                .and_then(|d| d.attr("type"))
                .is_some_and(|t| t == "text/css")
    }

    /// Head tags that configure the host window rather than a widget.
    pub fn is_root_attr(&self, id: ElementId) -> bool {
        self.tag(id) == "title"
    }

    pub fn is_menu_entry(&self, id: ElementId) -> bool {
        MENU_ENTRY_TAGS.contains(&self.tag(id))
    }

    pub fn is_menu(&self, id: ElementId) -> bool {
        self.widget_type(id)
            .and_then(|t| self.registry.get(&t).copied())
            .is_some_and(|spec| spec.menu)
    }

    pub fn is_top_menu(&self, id: ElementId) -> bool {
        self.is_menu(id) && !self.parent(id).is_some_and(|p| self.is_menu(p))
    }

    pub fn is_sub_menu(&self, id: ElementId) -> bool {
        self.is_menu(id) && self.parent(id).is_some_and(|p| self.is_menu(p))
    }

    pub fn is_notebook(&self, id: ElementId) -> bool {
        self.widget_type(id)
            .and_then(|t| self.registry.get(&t).copied())
            .is_some_and(|spec| spec.notebook)
    }

    // ── Scope membership ─────────────────────────────────────────────

    /// Transitive: anywhere inside `<head>`, stopping at the root.
    pub fn is_under_head(&self, id: ElementId) -> bool {
        match self.parent(id) {
            None => false,
            Some(p) if self.is_html(p) => false,
            Some(p) => self.is_head(p) || self.is_under_head(p),
        }
    }

    /// Direct: the parent is a menu.
    pub fn is_under_menu(&self, id: ElementId) -> bool {
        self.parent(id).is_some_and(|p| self.is_menu(p))
    }

    /// Transitive: anywhere inside `<body>`, stopping at the root.
    pub fn is_under_body(&self, id: ElementId) -> bool {
        match self.parent(id) {
            None => false,
            Some(p) if self.is_html(p) => false,
            Some(p) => self.is_body(p) || self.is_under_body(p),
        }
    }

    pub fn is_in_grid(&self, id: ElementId) -> bool {
        self.parent(id).is_some_and(|p| self.is_grid(p))
    }

    pub fn is_in_gr(&self, id: ElementId) -> bool {
        self.parent(id).is_some_and(|p| self.is_gr(p))
    }

    pub fn is_in_gd(&self, id: ElementId) -> bool {
        self.parent(id).is_some_and(|p| self.is_gd(p))
    }

    // ── Legality ─────────────────────────────────────────────────────

    pub fn can_under_head(&self, id: ElementId) -> bool {
        self.is_root_attr(id) || self.is_link(id) || self.is_menu(id) || self.can_under_menu(id)
    }

    pub fn can_under_menu(&self, id: ElementId) -> bool {
        self.is_menu_entry(id) || self.is_sub_menu(id)
    }

    pub fn can_under_body(&self, id: ElementId) -> bool {
        // A `type` attribute substitutes the constructed type; the resolved
        // name must still be registered.
        let registered = self.data(id).is_some_and(|d| match d.attr("type") {
            Some(t) => self.registry.contains(t),
            None => self.registry.contains(&d.tag),
        });
        (registered && !self.is_menu(id)) || self.is_side(id) || self.is_grid(id)
    }

    pub fn can_in_grid(&self, id: ElementId) -> bool {
        self.is_gr(id)
    }

    pub fn can_in_gr(&self, id: ElementId) -> bool {
        self.is_gd(id)
    }

    pub fn can_in_gd(&self, id: ElementId) -> bool {
        self.can_under_body(id)
    }

    /// Self-closing legality. Menus and notebooks always need children;
    /// stylesheet links and menu entries never do.
    pub fn can_be_empty(&self, id: ElementId) -> bool {
        if self.is_menu(id) || self.is_notebook(id) {
            return false;
        }
        self.is_link(id)
            || self.is_menu_entry(id)
            || self
                .widget_type(id)
                .is_some_and(|t| self.registry.contains(&t))
    }

    // ── Widget-type derivation ───────────────────────────────────────

    /// The registered widget type this element constructs, if any.
    ///
    /// Structural tags and row groups have none; side containers, grids
    /// and grid cells default to `frame`; everything else defaults to its
    /// own tag name. A `type` attribute overrides the default.
    pub fn widget_type(&self, id: ElementId) -> Option<String> {
        let data = self.data(id)?;
        if self.is_html(id)
            || self.is_scope(id)
            || self.is_root_attr(id)
            || self.is_link(id)
            || self.is_gr(id)
        {
            return None;
        }
        let default = if self.is_side(id) || self.is_grid(id) || self.is_gd(id) {
            "frame"
        } else {
            &data.tag
        };
        Some(data.attr("type").unwrap_or(default).to_string())
    }

    /// Whether this element constructs a widget of its own. Menu entries
    /// and head tags do not; menus do even though they live under head.
    pub fn has_widget(&self, id: ElementId) -> bool {
        (self.is_under_body(id) || self.is_menu(id)) && !self.is_gr(id)
    }

    // ── Validation ───────────────────────────────────────────────────

    /// Check one element against the grammar.
    ///
    /// Order: recognized at all, then self-closing legality, then scope.
    pub fn validate(&self, id: ElementId) -> Result<(), BuildError> {
        let tag = self.tag(id).to_string();

        let recognized = self.is_html(id)
            || self.is_scope(id)
            || self.is_grid_element(id)
            || self.can_under_head(id)
            || self.can_under_body(id);
        if !recognized {
            return Err(BuildError::UnrecognizedTag(tag));
        }

        let self_closing = self.data(id).is_some_and(|d| d.self_closing);
        if self_closing && !self.can_be_empty(id) {
            return Err(BuildError::InvalidEmptyTag(tag));
        }

        if self.is_html(id) || self.is_scope(id) {
            return Ok(());
        }

        let wrong = |scope: &str| BuildError::TagInWrongScope {
            tag: tag.clone(),
            scope: scope.to_string(),
        };

        if self.is_under_head(id) && !self.can_under_head(id) {
            return Err(wrong("head"));
        }
        if self.is_under_menu(id) && !self.can_under_menu(id) {
            return Err(wrong("menu"));
        }
        if self.is_in_grid(id) && !self.can_in_grid(id) {
            return Err(wrong("grid"));
        }
        if self.is_in_gr(id) && !self.can_in_gr(id) {
            return Err(wrong("gr"));
        }
        if self.is_in_gd(id) && !self.can_in_gd(id) {
            return Err(wrong("gd"));
        }
        // Grid elements are only legal inside their host container.
        if self.is_gd(id) && !self.is_in_gr(id) {
            return Err(wrong("gr"));
        }
        if self.is_gr(id) && !self.is_in_grid(id) {
            return Err(wrong("grid"));
        }
        if self.is_under_body(id) && !self.is_grid_element(id) && !self.can_under_body(id) {
            return Err(wrong("body"));
        }

        // Not inside any scope at all: name the tag's first legal scope.
        if !self.is_under_head(id) && !self.is_under_menu(id) && !self.is_under_body(id) {
            let required = if self.can_under_menu(id) {
                "menu"
            } else if self.can_under_head(id) {
                "head"
            } else {
                "body"
            };
            return Err(wrong(required));
        }

        Ok(())
    }
}
