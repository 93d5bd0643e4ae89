//! Tree operations: insert, navigate, walk, serialize.

use slotmap::{SecondaryMap, SlotMap};

use super::node::{ElementData, ElementId};

/// Empty slice constant for returning when an element has no children.
const EMPTY_CHILDREN: &[ElementId] = &[];

/// The parsed element tree, backed by a slotmap arena.
///
/// All elements live in a single `SlotMap`. Parent/child relationships are
/// stored in secondary maps so lookup is O(1). The tree shape is immutable
/// once parsing finishes: there is no remove or reparent, only derived data
/// attached via further secondary maps owned by later passes.
#[derive(Debug)]
pub struct Dom {
    pub(crate) nodes: SlotMap<ElementId, ElementData>,
    children: SecondaryMap<ElementId, Vec<ElementId>>,
    parent: SecondaryMap<ElementId, ElementId>,
    root: Option<ElementId>,
}

impl Dom {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
        }
    }

    /// Insert a root-level element.
    ///
    /// If no root has been set yet, this element becomes the root.
    pub fn insert(&mut self, data: ElementData) -> ElementId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Insert an element as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics (debug) if `parent` does not exist in the tree.
    pub fn insert_child(&mut self, parent: ElementId, data: ElementData) -> ElementId {
        debug_assert!(
            self.nodes.contains_key(parent),
            "parent element does not exist"
        );
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        self.parent.insert(id, parent);
        self.children
            .get_mut(parent)
            .expect("parent must have children vec")
            .push(id);
        id
    }

    /// Get the parent of an element, if it has one.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.parent.get(id).copied()
    }

    /// Get the children of an element. Empty slice if none exist.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Ordinal position of an element among its siblings.
    ///
    /// The root is position 0.
    pub fn position(&self, id: ElementId) -> usize {
        match self.parent(id) {
            Some(p) => self
                .children(p)
                .iter()
                .position(|&c| c == id)
                .unwrap_or(0),
            None => 0,
        }
    }

    /// Walk from `id` up to the root, collecting ancestor ids.
    ///
    /// The returned vec does **not** include `id` itself; it starts with the
    /// immediate parent and ends at the root.
    pub fn ancestors(&self, id: ElementId) -> Vec<ElementId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Immutable access to an element's data.
    pub fn get(&self, id: ElementId) -> Option<&ElementData> {
        self.nodes.get(id)
    }

    /// Mutable access to an element's data.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut ElementData> {
        self.nodes.get_mut(id)
    }

    /// The root element, if the tree is non-empty.
    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    /// Number of elements in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the tree contains an element with the given id.
    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    ///
    /// This is document order for a parsed tree.
    pub fn walk_depth_first(&self, start: ElementId) -> Vec<ElementId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// All elements in document order, starting at the root.
    pub fn document_order(&self) -> Vec<ElementId> {
        match self.root {
            Some(root) => self.walk_depth_first(root),
            None => Vec::new(),
        }
    }

    /// Serialize the subtree rooted at `id` back to markup text.
    ///
    /// Used for failure diagnostics; attribute quoting is minimal.
    pub fn dump(&self, id: ElementId) -> String {
        let mut out = String::new();
        self.dump_into(id, 0, &mut out);
        out
    }

    fn dump_into(&self, id: ElementId, depth: usize, out: &mut String) {
        let Some(data) = self.get(id) else {
            return;
        };
        let indent = "  ".repeat(depth);
        out.push_str(&indent);
        out.push('<');
        out.push_str(&data.tag);
        for (name, value) in &data.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }
        let kids = self.children(id);
        if data.self_closing && kids.is_empty() && data.trimmed_text().is_none() {
            out.push_str(" />\n");
            return;
        }
        out.push_str(">\n");
        if let Some(text) = data.trimmed_text() {
            out.push_str(&"  ".repeat(depth + 1));
            out.push_str(text);
            out.push('\n');
        }
        for &child in kids {
            self.dump_into(child, depth + 1, out);
        }
        out.push_str(&indent);
        out.push_str("</");
        out.push_str(&data.tag);
        out.push_str(">\n");
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a small test tree:
    /// ```text
    ///       html
    ///      /    \
    ///   head     body
    ///            /  \
    ///        button  entry
    /// ```
    fn build_tree() -> (Dom, ElementId, ElementId, ElementId, ElementId, ElementId) {
        let mut dom = Dom::new();
        let html = dom.insert(ElementData::new("html"));
        let head = dom.insert_child(html, ElementData::new("head"));
        let body = dom.insert_child(html, ElementData::new("body"));
        let button = dom.insert_child(body, ElementData::new("button"));
        let entry = dom.insert_child(body, ElementData::new("entry"));
        (dom, html, head, body, button, entry)
    }

    #[test]
    fn insert_sets_root() {
        let mut dom = Dom::new();
        let id = dom.insert(ElementData::new("html"));
        assert_eq!(dom.root(), Some(id));
    }

    #[test]
    fn insert_child_parent_relationship() {
        let (dom, html, head, body, button, _) = build_tree();
        assert_eq!(dom.parent(head), Some(html));
        assert_eq!(dom.parent(button), Some(body));
        assert_eq!(dom.parent(html), None);
    }

    #[test]
    fn children_list() {
        let (dom, html, head, body, button, entry) = build_tree();
        assert_eq!(dom.children(html), &[head, body]);
        assert_eq!(dom.children(body), &[button, entry]);
        assert!(dom.children(button).is_empty());
    }

    #[test]
    fn position_among_siblings() {
        let (dom, html, head, body, button, entry) = build_tree();
        assert_eq!(dom.position(html), 0);
        assert_eq!(dom.position(head), 0);
        assert_eq!(dom.position(body), 1);
        assert_eq!(dom.position(button), 0);
        assert_eq!(dom.position(entry), 1);
    }

    #[test]
    fn ancestors() {
        let (dom, html, _head, body, button, _) = build_tree();
        assert_eq!(dom.ancestors(button), vec![body, html]);
        assert_eq!(dom.ancestors(body), vec![html]);
        assert!(dom.ancestors(html).is_empty());
    }

    #[test]
    fn get_and_get_mut() {
        let (mut dom, _html, head, ..) = build_tree();
        assert_eq!(dom.get(head).unwrap().tag, "head");
        dom.get_mut(head).unwrap().attrs.push(("x".into(), "1".into()));
        assert_eq!(dom.get(head).unwrap().attr("x"), Some("1"));
    }

    #[test]
    fn len_and_is_empty() {
        let (dom, ..) = build_tree();
        assert_eq!(dom.len(), 5);
        assert!(!dom.is_empty());

        let empty = Dom::new();
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);
    }

    #[test]
    fn walk_depth_first_is_document_order() {
        let (dom, html, head, body, button, entry) = build_tree();
        assert_eq!(dom.walk_depth_first(html), vec![html, head, body, button, entry]);
        assert_eq!(dom.document_order(), vec![html, head, body, button, entry]);
    }

    #[test]
    fn walk_depth_first_subtree() {
        let (dom, _html, _head, body, button, entry) = build_tree();
        assert_eq!(dom.walk_depth_first(body), vec![body, button, entry]);
    }

    #[test]
    fn document_order_empty() {
        let dom = Dom::new();
        assert!(dom.document_order().is_empty());
    }

    #[test]
    fn dump_round_trips_shape() {
        let mut dom = Dom::new();
        let root = dom.insert(ElementData::new("body"));
        dom.insert_child(
            root,
            ElementData::new("button")
                .with_attr("width", "20")
                .self_closing(true),
        );
        let text = dom.dump(root);
        assert!(text.contains("<body>"));
        assert!(text.contains("<button width=\"20\" />"));
        assert!(text.contains("</body>"));
    }

    #[test]
    fn dump_includes_text() {
        let mut dom = Dom::new();
        let root = dom.insert(ElementData::new("button").with_text(" Go "));
        let text = dom.dump(root);
        assert!(text.contains("Go"));
        assert!(text.contains("</button>"));
    }

    #[test]
    fn default_impl() {
        let dom = Dom::default();
        assert!(dom.is_empty());
        assert_eq!(dom.root(), None);
    }
}
