//! Stylesheet AST: selectors, declarations, rules.

/// A single selector component.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Type selector: matches the element tag name (e.g. `button`).
    Type(String),
    /// Universal selector: `*`.
    Universal,
    /// Class selector: `.classname` (matches the `class` attribute values).
    Class(String),
    /// ID selector: `#id` (matches the `id` attribute).
    Id(String),
}

/// A combinator between compound selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Descendant combinator (whitespace): `A B`.
    Descendant,
    /// Child combinator: `A > B`.
    Child,
}

/// A compound selector: a sequence of components without combinators.
///
/// For example, `button.big` is one `CompoundSelector` with two components:
/// `Type("button")` and `Class("big")`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundSelector {
    pub components: Vec<SelectorComponent>,
}

impl CompoundSelector {
    /// Create an empty compound selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a component to this compound selector.
    pub fn push(&mut self, component: SelectorComponent) {
        self.components.push(component);
    }
}

/// One element in a selector chain: a compound selector or a combinator.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorPart {
    Compound(CompoundSelector),
    Combinator(Combinator),
}

/// A full selector: compound selectors joined by combinators.
///
/// `body > grid gd` has parts
/// `[Compound(body), Child, Compound(grid), Descendant, Compound(gd)]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selector {
    /// Alternating compound selectors and combinators.
    /// Always starts and ends with a `SelectorPart::Compound`.
    pub parts: Vec<SelectorPart>,
}

impl Selector {
    /// Create an empty selector.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A single property declaration, e.g. `width: 8`.
///
/// The value is kept as raw text; declared properties become element
/// attribute defaults, and any binding expressions inside are resolved later
/// by the option resolver like every other attribute value.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

/// A rule: one or more selectors paired with declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    /// The selectors for this rule (comma-separated in the source).
    pub selectors: Vec<Selector>,
    /// The property declarations inside the `{ ... }` block.
    pub declarations: Vec<Declaration>,
}

/// A parsed stylesheet: a list of rule sets in source order.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    pub rules: Vec<RuleSet>,
}

impl Stylesheet {
    /// Create an empty stylesheet.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_selector_push() {
        let mut cs = CompoundSelector::new();
        cs.push(SelectorComponent::Type("button".into()));
        cs.push(SelectorComponent::Class("big".into()));
        assert_eq!(cs.components.len(), 2);
    }

    #[test]
    fn selector_with_parts() {
        let mut body = CompoundSelector::new();
        body.push(SelectorComponent::Type("body".into()));

        let mut button = CompoundSelector::new();
        button.push(SelectorComponent::Type("button".into()));
        button.push(SelectorComponent::Id("go".into()));

        let selector = Selector {
            parts: vec![
                SelectorPart::Compound(body),
                SelectorPart::Combinator(Combinator::Child),
                SelectorPart::Compound(button),
            ],
        };

        assert_eq!(selector.parts.len(), 3);
        assert!(matches!(&selector.parts[1], SelectorPart::Combinator(Combinator::Child)));
    }

    #[test]
    fn stylesheet_default_is_empty() {
        assert!(Stylesheet::new().rules.is_empty());
        assert!(Stylesheet::default().rules.is_empty());
    }

    #[test]
    fn declaration_holds_raw_value() {
        let decl = Declaration {
            property: "width".into(),
            value: "8".into(),
        };
        assert_eq!(decl.property, "width");
        assert_eq!(decl.value, "8");
    }
}
