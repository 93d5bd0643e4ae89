//! Option resolver: raw attributes to constructor and placement options.
//!
//! Resolution order per element: class-default bundles, then raw attributes
//! in document order, then the implicit text option, then binding
//! evaluation over everything. Attribute names containing `-` route to
//! per-method option maps (`pack-fill="both"` becomes
//! `method_options["pack"]["fill"]`); `name`, `type`, `class` and `id` are
//! reserved and never become options.

use crate::classify::Classifier;
use crate::dom::{Dom, ElementId};
use crate::error::BuildError;
use crate::value::{resolve_path, DataContext, Value, ValueMap};

const RESERVED_ATTRS: [&str; 4] = ["name", "type", "class", "id"];
const GRID_ATTRS: [&str; 4] = ["row", "column", "rowspan", "columnspan"];

/// Registered style classes: class name → default option bundle.
///
/// Bundle keys follow the same `method-key` routing as raw attributes.
#[derive(Clone, Debug, Default)]
pub struct ClassTable {
    entries: Vec<(String, Vec<(String, String)>)>,
}

impl ClassTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, bundle: &[(&str, &str)]) -> Self {
        self.insert(
            name,
            bundle
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, bundle: Vec<(String, String)>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = bundle,
            None => self.entries.push((name, bundle)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[(String, String)]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, b)| b.as_slice())
    }
}

/// An element's resolved options.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resolved {
    /// Constructor/configuration options.
    pub options: ValueMap,
    methods: Vec<(String, ValueMap)>,
}

impl Resolved {
    /// Options routed to one placement method, if any were given.
    pub fn method(&self, name: &str) -> Option<&ValueMap> {
        self.methods.iter().find(|(n, _)| n == name).map(|(_, m)| m)
    }

    /// Box-placement options; empty if none were resolved.
    pub fn pack(&self) -> ValueMap {
        self.method("pack").cloned().unwrap_or_default()
    }

    fn method_entry(&mut self, name: &str) -> &mut ValueMap {
        if !self.methods.iter().any(|(n, _)| n == name) {
            self.methods.push((name.to_string(), ValueMap::new()));
        }
        let (_, map) = self
            .methods
            .iter_mut()
            .find(|(n, _)| n == name)
            .expect("method entry just inserted");
        map
    }
}

/// Resolve one element's attributes into options.
pub fn resolve(
    dom: &Dom,
    classifier: &Classifier<'_>,
    classes: &ClassTable,
    ctx: &DataContext,
    id: ElementId,
) -> Result<Resolved, BuildError> {
    let Some(data) = dom.get(id) else {
        return Ok(Resolved::default());
    };

    let mut options: Vec<(String, String)> = Vec::new();
    let mut methods: Vec<(String, Vec<(String, String)>)> = Vec::new();

    // Class-default bundles first, so raw attributes overlay them.
    for class_name in data.classes() {
        let bundle = classes
            .get(class_name)
            .ok_or_else(|| BuildError::ClassNotFound(class_name.to_string()))?;
        for (key, value) in bundle {
            route(&mut options, &mut methods, key, value);
        }
    }

    let is_cell = classifier.is_gd(id);
    for (attr, value) in &data.attrs {
        if RESERVED_ATTRS.contains(&attr.as_str()) {
            continue;
        }
        // Grid cells take their geometry from attributes; those are
        // placement parameters, not constructor options.
        if is_cell && GRID_ATTRS.contains(&attr.as_str()) {
            route(&mut options, &mut methods, &format!("grid-{attr}"), value);
            continue;
        }
        route(&mut options, &mut methods, attr, value);
    }

    // Non-whitespace text content is an implicit option; it wins over an
    // attribute of the same name.
    if let Some(text) = data.trimmed_text() {
        let key = if classifier.is_under_menu(id) {
            Some("label")
        } else if classifier.is_root_attr(id) {
            Some("value")
        } else if classifier.is_under_body(id) {
            Some("text")
        } else {
            None
        };
        if let Some(key) = key {
            put(&mut options, key, text);
        }
    }

    let mut resolved = Resolved {
        options: eval_bindings(options, ctx)?,
        methods: methods
            .into_iter()
            .map(|(name, map)| Ok((name, eval_bindings(map, ctx)?)))
            .collect::<Result<_, BuildError>>()?,
    };

    default_pack_side(dom, classifier, id, &mut resolved);
    Ok(resolved)
}

/// Put or replace a key in an ordered raw-option list.
fn put(map: &mut Vec<(String, String)>, key: &str, value: &str) {
    match map.iter_mut().find(|(k, _)| k == key) {
        Some(slot) => slot.1 = value.to_string(),
        None => map.push((key.to_string(), value.to_string())),
    }
}

/// Route a `method-key` name to its method map, anything else to options.
fn route(
    options: &mut Vec<(String, String)>,
    methods: &mut Vec<(String, Vec<(String, String)>)>,
    key: &str,
    value: &str,
) {
    match key.split_once('-') {
        Some((method, rest)) => {
            if !methods.iter().any(|(n, _)| n == method) {
                methods.push((method.to_string(), Vec::new()));
            }
            let (_, map) = methods
                .iter_mut()
                .find(|(n, _)| n == method)
                .expect("method map just inserted");
            put(map, rest, value);
        }
        None => put(options, key, value),
    }
}

/// Evaluate `{dotted.path}` values against the context; plain values stay
/// literal strings.
fn eval_bindings(raw: Vec<(String, String)>, ctx: &DataContext) -> Result<ValueMap, BuildError> {
    let mut map = ValueMap::new();
    for (key, value) in raw {
        let resolved = match value.strip_prefix('{').and_then(|v| v.strip_suffix('}')) {
            Some(path) => resolve_path(ctx, path.trim())?,
            None => Value::Str(value),
        };
        map.insert(key, resolved);
    }
    Ok(map)
}

/// Default the pack side for box-placed body widgets: `top` under the body
/// root or a notebook, the container's direction under a side container.
/// Grid cells are grid-placed and get no pack default.
fn default_pack_side(dom: &Dom, classifier: &Classifier<'_>, id: ElementId, resolved: &mut Resolved) {
    if !classifier.is_under_body(id) || !classifier.has_widget(id) || classifier.is_in_gr(id) {
        return;
    }
    let pack = resolved.method_entry("pack");
    if pack.contains_key("side") {
        return;
    }
    let side = dom
        .parent(id)
        .filter(|&p| classifier.is_side(p))
        .and_then(|p| dom.get(p))
        .map(|d| d.tag.clone())
        .unwrap_or_else(|| "top".to_string());
    pack.insert("side", side);
}
