//! Build/display driver.
//!
//! Walks the classified, cascade-applied tree once in document order,
//! validating and resolving each element and then performing its display
//! action against the toolkit. Widget construction is demand-driven and
//! memoized: the first request for an element's widget constructs it
//! (forcing its ancestor chain first), later requests return the cached
//! handle. A failure anywhere aborts the build after logging the offending
//! markup fragment.

use std::collections::HashMap;

use slotmap::SecondaryMap;
use tracing::{debug, error, trace};

use crate::classify::Classifier;
use crate::css::{cascade, parse_css};
use crate::dom::{Dom, ElementId};
use crate::error::BuildError;
use crate::grid::GridAllocator;
use crate::options::{resolve, ClassTable, Resolved};
use crate::template::{Loader, Renderer};
use crate::toolkit::{Toolkit, WidgetId, WidgetRegistry};
use crate::value::{DataContext, Value, ValueMap};

/// Load and apply every stylesheet the head links to.
///
/// Must run before option resolution so cascade defaults are visible as
/// attributes. Links with an empty `href` are ignored; a missing sheet is
/// [`BuildError::TemplateNotFound`].
pub fn apply_stylesheets(
    dom: &mut Dom,
    registry: &WidgetRegistry,
    loader: &dyn Loader,
    renderer: &dyn Renderer,
    template_ctx: &ValueMap,
) -> Result<(), BuildError> {
    let mut sheet_names = Vec::new();
    let classifier = Classifier::new(dom, registry);
    for id in dom.document_order() {
        if classifier.is_css(id) {
            if let Some(href) = dom.get(id).and_then(|d| d.attr("href")) {
                if !href.is_empty() {
                    sheet_names.push(href.to_string());
                }
            }
        }
    }

    for name in sheet_names {
        let source = loader
            .load(&name)
            .ok_or_else(|| BuildError::TemplateNotFound(name.clone()))?;
        let rendered = renderer.render(&source, template_ctx);
        let sheet = parse_css(&rendered).map_err(|e| BuildError::Css(e.to_string()))?;
        debug!(sheet = %name, rules = sheet.rules.len(), "applying stylesheet");
        cascade::apply(&sheet, dom);
    }
    Ok(())
}

/// Ceiling for grid spans read from markup. Occupancy tracking is per
/// covered row, so spans must stay bounded whatever the markup says.
const SPAN_LIMIT: usize = 512;

/// Everything one build produced.
#[derive(Debug)]
pub struct BuildOutput {
    /// The frame holding all body widgets, parented to the window.
    pub host: WidgetId,
    /// Widget handle per element that constructed one.
    pub widgets: SecondaryMap<ElementId, WidgetId>,
    /// Computed or explicit name per widget-bearing element.
    pub names: SecondaryMap<ElementId, String>,
    /// Name → widget registry, in construction order.
    pub by_name: Vec<(String, WidgetId)>,
}

pub struct Driver<'a> {
    dom: &'a Dom,
    registry: &'a WidgetRegistry,
    classes: &'a ClassTable,
    ctx: &'a DataContext,
    toolkit: &'a mut dyn Toolkit,
    host: WidgetId,
    resolved: SecondaryMap<ElementId, Resolved>,
    widgets: SecondaryMap<ElementId, WidgetId>,
    names: SecondaryMap<ElementId, String>,
    by_name: Vec<(String, WidgetId)>,
    counters: HashMap<String, usize>,
    grids: SecondaryMap<ElementId, GridAllocator>,
}

impl<'a> Driver<'a> {
    pub fn new(
        dom: &'a Dom,
        registry: &'a WidgetRegistry,
        classes: &'a ClassTable,
        ctx: &'a DataContext,
        toolkit: &'a mut dyn Toolkit,
    ) -> Self {
        Self {
            dom,
            registry,
            classes,
            ctx,
            toolkit,
            host: WidgetId::default(),
            resolved: SecondaryMap::new(),
            widgets: SecondaryMap::new(),
            names: SecondaryMap::new(),
            by_name: Vec::new(),
            counters: HashMap::new(),
            grids: SecondaryMap::new(),
        }
    }

    /// Run the whole pass. Consumes the driver.
    pub fn run(mut self) -> Result<BuildOutput, BuildError> {
        let window = self.toolkit.window();
        self.host = self.toolkit.construct("frame", window, &ValueMap::new());
        let counter = self.counters.entry("frame".to_string()).or_insert(0);
        let host_name = format!("frame_{counter}");
        *counter += 1;
        self.by_name.push((host_name, self.host));

        for id in self.dom.document_order() {
            if let Err(e) = self.process(id) {
                error!(error = %e, fragment = %self.dom.dump(id), "build aborted");
                return Err(e);
            }
        }

        Ok(BuildOutput {
            host: self.host,
            widgets: self.widgets,
            names: self.names,
            by_name: self.by_name,
        })
    }

    fn classifier(&self) -> Classifier<'a> {
        Classifier::new(self.dom, self.registry)
    }

    fn process(&mut self, id: ElementId) -> Result<(), BuildError> {
        let classifier = self.classifier();
        classifier.validate(id)?;
        let resolved = resolve(self.dom, &classifier, self.classes, self.ctx, id)?;
        if let Some(data) = self.dom.get(id) {
            debug!(tag = %data.tag, options = resolved.options.len(), "element");
        }
        self.resolved.insert(id, resolved);
        self.display(id)
    }

    /// Perform the element's display action.
    fn display(&mut self, id: ElementId) -> Result<(), BuildError> {
        let classifier = self.classifier();
        if classifier.is_html(id)
            || classifier.is_scope(id)
            || classifier.is_link(id)
            || classifier.is_gr(id)
        {
            return Ok(());
        }

        let resolved = self.resolved.get(id).cloned().unwrap_or_default();

        if classifier.is_root_attr(id) {
            if let (Some(data), Some(value)) = (self.dom.get(id), resolved.options.get("value")) {
                let property = data.tag.clone();
                let value = value.clone();
                let window = self.toolkit.window();
                self.toolkit.configure(window, &property, &value);
            }
            return Ok(());
        }

        if classifier.is_top_menu(id) {
            let menu = self.widget(id)?;
            self.toolkit.set_window_menu(menu);
            return Ok(());
        }

        if classifier.is_sub_menu(id) {
            let parent_menu = self.parent_widget(id)?;
            let menu = self.widget(id)?;
            self.toolkit.cascade_attach(parent_menu, menu, &resolved.options);
            return Ok(());
        }

        if classifier.is_under_menu(id) {
            let parent_menu = self.parent_widget(id)?;
            let entry_type = self
                .dom
                .get(id)
                .map(|d| d.tag.clone())
                .unwrap_or_default();
            self.toolkit
                .append_entry(parent_menu, &entry_type, &resolved.options);
            return Ok(());
        }

        if classifier.is_gd(id) {
            let widget = self.widget(id)?;
            self.place_grid(id, widget, &resolved)?;
        } else if classifier.has_widget(id) {
            let widget = self.widget(id)?;
            self.toolkit.box_place(widget, &resolved.pack());

            if let Some(parent) = self.dom.parent(id) {
                if classifier.is_notebook(parent) {
                    let notebook = self.widget(parent)?;
                    let label = self.names.get(id).cloned().unwrap_or_default();
                    self.toolkit.add_tab(notebook, widget, &label);
                }
            }
        }

        Ok(())
    }

    /// Memoized widget handle for an element. Constructs on first request,
    /// forcing the ancestor chain first.
    fn widget(&mut self, id: ElementId) -> Result<WidgetId, BuildError> {
        if let Some(&widget) = self.widgets.get(id) {
            return Ok(widget);
        }

        let classifier = self.classifier();
        let Some(widget_type) = classifier.widget_type(id) else {
            let tag = self.dom.get(id).map(|d| d.tag.clone()).unwrap_or_default();
            return Err(BuildError::UnrecognizedTag(tag));
        };

        let parent = self.parent_widget(id)?;
        // Menus are constructed bare; their options go to the attach call.
        let options = if classifier.is_menu(id) {
            ValueMap::new()
        } else {
            self.resolved
                .get(id)
                .map(|r| r.options.clone())
                .unwrap_or_default()
        };

        let widget = self.toolkit.construct(&widget_type, parent, &options);
        let name = self.widget_name(id, &widget_type);
        trace!(%widget_type, %name, "constructed widget");
        self.widgets.insert(id, widget);
        self.names.insert(id, name.clone());
        self.by_name.push((name, widget));
        Ok(widget)
    }

    /// The toolkit parent a widget is constructed under: the nearest
    /// widget-bearing ancestor, the window for head content, the host
    /// frame for body content.
    fn parent_widget(&mut self, id: ElementId) -> Result<WidgetId, BuildError> {
        let classifier = self.classifier();
        let mut current = self.dom.parent(id);
        while let Some(ancestor) = current {
            if classifier.has_widget(ancestor) {
                return self.widget(ancestor);
            }
            if classifier.is_head(ancestor) {
                return Ok(self.toolkit.window());
            }
            if classifier.is_body(ancestor) {
                return Ok(self.host);
            }
            current = self.dom.parent(ancestor);
        }
        Ok(self.host)
    }

    /// Explicit `name` attribute, or a synthesized `type_N` unique per
    /// build.
    fn widget_name(&mut self, id: ElementId, widget_type: &str) -> String {
        if let Some(name) = self.dom.get(id).and_then(|d| d.attr("name")) {
            return name.to_string();
        }
        let counter = self.counters.entry(widget_type.to_string()).or_insert(0);
        let name = format!("{}_{}", widget_type, *counter);
        *counter += 1;
        name
    }

    /// Grid-place a cell: explicit coordinates win, missing ones come from
    /// the row-group ordinal and the allocator, and occupancy is always
    /// registered so later cells avoid collision.
    fn place_grid(
        &mut self,
        id: ElementId,
        widget: WidgetId,
        resolved: &Resolved,
    ) -> Result<(), BuildError> {
        let (Some(row_group), Some(grid)) = (
            self.dom.parent(id),
            self.dom.parent(id).and_then(|gr| self.dom.parent(gr)),
        ) else {
            return Ok(());
        };

        let given = resolved.method("grid").cloned().unwrap_or_default();
        let rowspan = given
            .get("rowspan")
            .and_then(usize_of)
            .unwrap_or(1)
            .min(SPAN_LIMIT);
        let colspan = given
            .get("columnspan")
            .and_then(usize_of)
            .unwrap_or(1)
            .min(SPAN_LIMIT);
        let row = given
            .get("row")
            .and_then(usize_of)
            .unwrap_or_else(|| self.dom.position(row_group));

        if !self.grids.contains_key(grid) {
            self.grids.insert(grid, GridAllocator::new());
        }
        let Some(allocator) = self.grids.get_mut(grid) else {
            return Ok(());
        };
        let column = match given.get("column").and_then(usize_of) {
            Some(column) => column,
            None => allocator.get_column(row, rowspan, colspan),
        };
        allocator.add_column(row, column, rowspan, colspan);

        let mut place = given;
        place.insert("row", Value::Int(row as i64));
        place.insert("column", Value::Int(column as i64));
        trace!(row, column, rowspan, colspan, "grid cell placed");
        self.toolkit.grid_place(widget, &place);
        Ok(())
    }
}

fn usize_of(value: &Value) -> Option<usize> {
    match value {
        Value::Int(n) => usize::try_from(*n).ok(),
        Value::Str(s) => s.trim().parse().ok(),
        _ => None,
    }
}
