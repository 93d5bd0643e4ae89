//! Selector matching against the element tree.
//!
//! Walks selector parts from right to left, matching compound selectors
//! against elements and navigating the tree via combinators.

use crate::css::model::{Combinator, CompoundSelector, Selector, SelectorComponent, SelectorPart};
use crate::dom::node::{ElementData, ElementId};
use crate::dom::tree::Dom;

/// Check whether a full selector matches a given element.
pub fn matches_selector(selector: &Selector, id: ElementId, dom: &Dom) -> bool {
    let parts = &selector.parts;
    if parts.is_empty() {
        return false;
    }

    // The rightmost part must be a compound selector matching the target.
    let compound = match parts.last() {
        Some(SelectorPart::Compound(compound)) => compound,
        _ => return false,
    };
    let element = match dom.get(id) {
        Some(e) => e,
        None => return false,
    };
    if !matches_compound(compound, element) {
        return false;
    }

    matches_leftward(parts, parts.len() - 1, id, dom)
}

/// Match the selector parts left of `part_idx`, anchored at `current`.
///
/// A descendant combinator may be satisfied by any matching ancestor, not
/// just the nearest one, so each candidate is tried until the rest of the
/// chain matches.
fn matches_leftward(parts: &[SelectorPart], part_idx: usize, current: ElementId, dom: &Dom) -> bool {
    if part_idx == 0 {
        return true;
    }
    let combinator = match &parts[part_idx - 1] {
        SelectorPart::Combinator(c) => c,
        _ => return false,
    };
    if part_idx == 1 {
        // Combinator without a preceding compound is invalid.
        return false;
    }
    let compound = match &parts[part_idx - 2] {
        SelectorPart::Compound(c) => c,
        _ => return false,
    };

    match combinator {
        Combinator::Child => {
            let parent_id = match dom.parent(current) {
                Some(p) => p,
                None => return false,
            };
            dom.get(parent_id)
                .is_some_and(|parent| matches_compound(compound, parent))
                && matches_leftward(parts, part_idx - 2, parent_id, dom)
        }
        Combinator::Descendant => dom.ancestors(current).into_iter().any(|ancestor_id| {
            dom.get(ancestor_id)
                .is_some_and(|ancestor| matches_compound(compound, ancestor))
                && matches_leftward(parts, part_idx - 2, ancestor_id, dom)
        }),
    }
}

/// Check whether a compound selector matches a single element.
pub fn matches_compound(compound: &CompoundSelector, element: &ElementData) -> bool {
    compound.components.iter().all(|component| match component {
        SelectorComponent::Type(name) => element.tag == *name,
        SelectorComponent::Class(name) => element.has_class(name),
        SelectorComponent::Id(name) => element.id() == Some(name.as_str()),
        SelectorComponent::Universal => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::parser::parse_selector_list;
    use crate::dom::node::ElementData;

    /// Build a test tree:
    /// ```text
    ///           html
    ///          /    \
    ///       head     body
    ///                /  \
    ///            left    grid
    ///            /          \
    ///      button#go.big     gr#r0
    /// ```
    fn build_test_dom() -> (Dom, ElementId, ElementId, ElementId, ElementId) {
        let mut dom = Dom::new();
        let html = dom.insert(ElementData::new("html"));
        let _head = dom.insert_child(html, ElementData::new("head"));
        let body = dom.insert_child(html, ElementData::new("body"));
        let left = dom.insert_child(body, ElementData::new("left"));
        let button = dom.insert_child(
            left,
            ElementData::new("button")
                .with_attr("id", "go")
                .with_attr("class", "big"),
        );
        let grid = dom.insert_child(body, ElementData::new("grid"));
        let _gr = dom.insert_child(grid, ElementData::new("gr").with_attr("id", "r0"));
        (dom, body, left, button, grid)
    }

    fn selector(s: &str) -> crate::css::model::Selector {
        parse_selector_list(s).unwrap().remove(0)
    }

    #[test]
    fn match_type() {
        let (dom, _, _, button, _) = build_test_dom();
        assert!(matches_selector(&selector("button"), button, &dom));
        assert!(!matches_selector(&selector("entry"), button, &dom));
    }

    #[test]
    fn match_id_and_class() {
        let (dom, _, _, button, _) = build_test_dom();
        assert!(matches_selector(&selector("#go"), button, &dom));
        assert!(matches_selector(&selector(".big"), button, &dom));
        assert!(matches_selector(&selector("button#go.big"), button, &dom));
        assert!(!matches_selector(&selector("button#stop"), button, &dom));
    }

    #[test]
    fn match_universal() {
        let (dom, body, ..) = build_test_dom();
        assert!(matches_selector(&selector("*"), body, &dom));
    }

    #[test]
    fn match_child_combinator() {
        let (dom, _, _, button, _) = build_test_dom();
        assert!(matches_selector(&selector("left > button"), button, &dom));
        // button is a grandchild of body, not a direct child.
        assert!(!matches_selector(&selector("body > button"), button, &dom));
    }

    #[test]
    fn match_descendant_combinator() {
        let (dom, _, _, button, _) = build_test_dom();
        assert!(matches_selector(&selector("body button"), button, &dom));
        assert!(matches_selector(&selector("html body button"), button, &dom));
        assert!(!matches_selector(&selector("head button"), button, &dom));
    }

    #[test]
    fn match_mixed_combinators() {
        let (dom, _, _, _, grid) = build_test_dom();
        let gr = dom.children(grid)[0];
        assert!(matches_selector(&selector("body gr"), gr, &dom));
        assert!(matches_selector(&selector("body > grid > gr"), gr, &dom));
        assert!(matches_selector(&selector("#r0"), gr, &dom));
    }

    #[test]
    fn descendant_considers_every_matching_ancestor() {
        // body > left > left > button: the inner `left` is not a child of
        // body, but the outer one is, so `body > left button` must match.
        let mut dom = Dom::new();
        let html = dom.insert(ElementData::new("html"));
        let body = dom.insert_child(html, ElementData::new("body"));
        let outer = dom.insert_child(body, ElementData::new("left"));
        let inner = dom.insert_child(outer, ElementData::new("left"));
        let button = dom.insert_child(inner, ElementData::new("button"));

        assert!(matches_selector(&selector("body > left button"), button, &dom));
        assert!(matches_selector(&selector("html left > button"), button, &dom));
        assert!(!matches_selector(&selector("head > left button"), button, &dom));
    }

    #[test]
    fn empty_selector_matches_nothing() {
        let (dom, body, ..) = build_test_dom();
        let empty = crate::css::model::Selector::new();
        assert!(!matches_selector(&empty, body, &dom));
    }
}
