//! Selector queries over the finished tree.
//!
//! Queries re-evaluate the selector on every call: they are read-only,
//! finite, and restartable, and never mutate the tree.

use crate::css::matcher::matches_selector;
use crate::css::parser::parse_selector_list;
use crate::error::BuildError;

use super::node::ElementId;
use super::tree::Dom;

impl Dom {
    /// Find all elements matching a selector string, in document order.
    ///
    /// Supports type, `#id`, `.class`, `*`, and descendant/child
    /// combinators, with comma-separated selector groups.
    pub fn select(&self, selector: &str) -> Result<Vec<ElementId>, BuildError> {
        let selectors =
            parse_selector_list(selector).map_err(|e| BuildError::Css(e.to_string()))?;
        Ok(self
            .document_order()
            .into_iter()
            .filter(|&id| selectors.iter().any(|sel| matches_selector(sel, id, self)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::node::ElementData;
    use crate::dom::tree::Dom;

    /// Build a test tree:
    /// ```text
    ///         html
    ///        /    \
    ///     head     body
    ///              /  \
    ///          left    left
    ///          /  \
    ///   button#a   button.warn
    /// ```
    fn build_query_tree() -> Dom {
        let mut dom = Dom::new();
        let html = dom.insert(ElementData::new("html"));
        let _head = dom.insert_child(html, ElementData::new("head"));
        let body = dom.insert_child(html, ElementData::new("body"));
        let left = dom.insert_child(body, ElementData::new("left"));
        dom.insert_child(left, ElementData::new("button").with_attr("id", "a"));
        dom.insert_child(left, ElementData::new("button").with_attr("class", "warn"));
        dom.insert_child(body, ElementData::new("left"));
        dom
    }

    #[test]
    fn select_by_type() {
        let dom = build_query_tree();
        assert_eq!(dom.select("button").unwrap().len(), 2);
        assert_eq!(dom.select("left").unwrap().len(), 2);
        assert_eq!(dom.select("entry").unwrap().len(), 0);
    }

    #[test]
    fn select_by_id() {
        let dom = build_query_tree();
        let hits = dom.select("#a").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(dom.get(hits[0]).unwrap().tag, "button");
    }

    #[test]
    fn select_by_class() {
        let dom = build_query_tree();
        assert_eq!(dom.select(".warn").unwrap().len(), 1);
    }

    #[test]
    fn select_with_combinators() {
        let dom = build_query_tree();
        assert_eq!(dom.select("body > left").unwrap().len(), 2);
        assert_eq!(dom.select("body button").unwrap().len(), 2);
        assert_eq!(dom.select("left > button#a").unwrap().len(), 1);
    }

    #[test]
    fn select_group() {
        let dom = build_query_tree();
        assert_eq!(dom.select("head, body").unwrap().len(), 2);
    }

    #[test]
    fn select_returns_document_order() {
        let dom = build_query_tree();
        let hits = dom.select("button").unwrap();
        assert_eq!(dom.get(hits[0]).unwrap().id(), Some("a"));
    }

    #[test]
    fn select_is_restartable() {
        let dom = build_query_tree();
        let first = dom.select("button").unwrap();
        let second = dom.select("button").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn select_invalid_selector_is_error() {
        let dom = build_query_tree();
        assert!(dom.select("button {").is_err());
    }
}
