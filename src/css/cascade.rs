//! Stylesheet cascade: apply declared defaults to matching elements.
//!
//! The precedence model is deliberately simple: an explicit markup attribute
//! always wins over any stylesheet declaration, and among stylesheet
//! declarations for the same property the first applied (rule source order,
//! document order within a rule) wins. There is no specificity.

use tracing::trace;

use crate::css::matcher::matches_selector;
use crate::css::model::Stylesheet;
use crate::dom::tree::Dom;

/// Apply a parsed stylesheet to the element tree.
///
/// For each rule in source order, each element matching any of the rule's
/// selectors receives each declared property as a default attribute via
/// [`crate::dom::node::ElementData::set_default_attr`].
pub fn apply(stylesheet: &Stylesheet, dom: &mut Dom) {
    let elements = dom.document_order();

    for rule in &stylesheet.rules {
        for &id in &elements {
            let matched = rule
                .selectors
                .iter()
                .any(|sel| matches_selector(sel, id, dom));
            if !matched {
                continue;
            }
            for decl in &rule.declarations {
                if let Some(element) = dom.get_mut(id) {
                    trace!(
                        tag = %element.tag,
                        property = %decl.property,
                        value = %decl.value,
                        "cascade default"
                    );
                    element.set_default_attr(&decl.property, &decl.value);
                }
            }
        }
    }
}
