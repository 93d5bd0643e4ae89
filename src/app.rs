//! Host application surface: build configuration and the built app.
//!
//! [`AppConfig`] collects everything one build needs; [`App::build`] runs
//! the whole pipeline once against a toolkit and returns the finished app,
//! which exposes selector queries over the element tree and name lookups
//! over the widgets it produced.

use tracing::debug;

use crate::build::{apply_stylesheets, BuildOutput, Driver};
use crate::dom::{Dom, ElementData, ElementId};
use crate::error::BuildError;
use crate::fields::{FieldHandle, Fields};
use crate::markup;
use crate::options::ClassTable;
use crate::template::{DictLoader, Loader, PlainRenderer, Renderer};
use crate::toolkit::{Toolkit, WidgetId, WidgetRegistry, WidgetSpec};
use crate::value::{DataContext, Value, ValueMap};

enum LayoutSource {
    None,
    Inline(String),
    Template(String),
}

/// Build configuration, assembled builder-style.
///
/// Defaults: no layout (an empty tree builds fine), the standard widget
/// registry, an empty loader, and the passthrough renderer.
pub struct AppConfig {
    layout: LayoutSource,
    template_context: ValueMap,
    data_context: DataContext,
    classes: ClassTable,
    registry: WidgetRegistry,
    loader: Box<dyn Loader>,
    renderer: Box<dyn Renderer>,
    fields: Fields,
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            layout: LayoutSource::None,
            template_context: ValueMap::new(),
            data_context: DataContext::new(),
            classes: ClassTable::new(),
            registry: WidgetRegistry::standard(),
            loader: Box::new(DictLoader::new()),
            renderer: Box::new(PlainRenderer),
            fields: Fields::new(),
        }
    }

    /// Use inline markup as the layout source.
    pub fn layout(mut self, markup: impl Into<String>) -> Self {
        self.layout = LayoutSource::Inline(markup.into());
        self
    }

    /// Use a named template, resolved through the loader, as the layout
    /// source.
    pub fn layout_template(mut self, name: impl Into<String>) -> Self {
        self.layout = LayoutSource::Template(name.into());
        self
    }

    /// Add a template-context entry, visible to the renderer.
    pub fn context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.template_context.insert(key, value);
        self
    }

    /// Add a data-context root entry, visible to `{…}` bindings.
    pub fn data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data_context.insert(key, value);
        self
    }

    /// Add an entry under the `self` binding namespace.
    pub fn data_self(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data_context.insert_self(key, value);
        self
    }

    /// Register a typed field: stored on the app and exposed to bindings
    /// as `{self.<name>}`.
    pub fn field(mut self, name: impl Into<String>, field: FieldHandle) -> Self {
        let name = name.into();
        self.data_context
            .insert_self(name.clone(), Value::Field(field.clone()));
        self.fields.insert(name, field);
        self
    }

    /// Register a style class bundle.
    pub fn class(mut self, name: impl Into<String>, bundle: &[(&str, &str)]) -> Self {
        self.classes = self.classes.with(name, bundle);
        self
    }

    /// Replace the widget registry.
    pub fn registry(mut self, registry: WidgetRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Register one additional widget type on the current registry.
    pub fn widget(mut self, name: impl Into<String>, spec: WidgetSpec) -> Self {
        self.registry.register(name, spec);
        self
    }

    pub fn loader(mut self, loader: impl Loader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A built host object: the element tree plus the widgets it produced.
pub struct App {
    dom: Dom,
    output: BuildOutput,
    fields: Fields,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App").finish_non_exhaustive()
    }
}

impl App {
    /// Run the whole pipeline once: render, parse, cascade, classify,
    /// resolve, display. Synchronous and single-threaded; the first
    /// failure aborts.
    pub fn build(config: AppConfig, toolkit: &mut dyn Toolkit) -> Result<App, BuildError> {
        let source = match &config.layout {
            LayoutSource::None => String::new(),
            LayoutSource::Inline(text) => text.clone(),
            LayoutSource::Template(name) => config
                .loader
                .load(name)
                .ok_or_else(|| BuildError::TemplateNotFound(name.clone()))?,
        };
        let rendered = config.renderer.render(&source, &config.template_context);
        let mut dom = markup::parse(&rendered)?;
        debug!(elements = dom.len(), "layout parsed");

        apply_stylesheets(
            &mut dom,
            &config.registry,
            config.loader.as_ref(),
            config.renderer.as_ref(),
            &config.template_context,
        )?;

        let output = Driver::new(
            &dom,
            &config.registry,
            &config.classes,
            &config.data_context,
            toolkit,
        )
        .run()?;

        Ok(App {
            dom,
            output,
            fields: config.fields,
        })
    }

    /// Elements matching a selector, in document order. Re-evaluates the
    /// selector each call; read-only and restartable.
    pub fn select_elements(&self, selector: &str) -> Result<Vec<ElementId>, BuildError> {
        self.dom.select(selector)
    }

    /// Widget handles of matching elements, in document order, filtered to
    /// elements that produced a widget.
    pub fn select_widgets(&self, selector: &str) -> Result<Vec<WidgetId>, BuildError> {
        Ok(self
            .select_elements(selector)?
            .into_iter()
            .filter_map(|id| self.output.widgets.get(id).copied())
            .collect())
    }

    /// Widget lookup by computed or explicit name.
    pub fn widget(&self, name: &str) -> Option<WidgetId> {
        self.output
            .by_name
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, w)| *w)
    }

    /// Field lookup by registered name.
    pub fn field(&self, name: &str) -> Option<FieldHandle> {
        self.fields.get(name)
    }

    /// An element's parsed data.
    pub fn element(&self, id: ElementId) -> Option<&ElementData> {
        self.dom.get(id)
    }

    /// The computed name of an element's widget, if it produced one.
    pub fn widget_name(&self, id: ElementId) -> Option<&str> {
        self.output.names.get(id).map(String::as_str)
    }

    /// The frame holding all body widgets.
    pub fn host(&self) -> WidgetId {
        self.output.host
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Field, StringField};
    use crate::testing::RecordingToolkit;
    use std::rc::Rc;

    // ── Configuration ────────────────────────────────────────────────

    #[test]
    fn no_layout_builds_an_empty_tree() {
        let mut toolkit = RecordingToolkit::new();
        let app = App::build(AppConfig::new(), &mut toolkit).unwrap();
        assert!(app.select_elements("*").unwrap().is_empty());
        assert_eq!(toolkit.type_of(app.host()), Some("frame"));
    }

    #[test]
    fn template_layout_resolves_through_the_loader() {
        let mut toolkit = RecordingToolkit::new();
        let config = AppConfig::new()
            .layout_template("main.html")
            .loader(DictLoader::new().with("main.html", "<html><body><button/></body></html>"));
        let app = App::build(config, &mut toolkit).unwrap();
        assert!(app.widget("button_0").is_some());
    }

    #[test]
    fn missing_template_fails() {
        let mut toolkit = RecordingToolkit::new();
        let config = AppConfig::new().layout_template("gone.html");
        let err = App::build(config, &mut toolkit).unwrap_err();
        assert!(matches!(err, BuildError::TemplateNotFound(n) if n == "gone.html"));
    }

    // ── Queries ──────────────────────────────────────────────────────

    #[test]
    fn select_widgets_filters_widgetless_elements() {
        let mut toolkit = RecordingToolkit::new();
        let config = AppConfig::new()
            .layout("<html><head><title>t</title></head><body><button/></body></html>");
        let app = App::build(config, &mut toolkit).unwrap();
        assert_eq!(app.select_elements("*").unwrap().len(), 5);
        // Only body content produces widgets.
        assert_eq!(app.select_widgets("*").unwrap().len(), 1);
    }

    #[test]
    fn selects_are_restartable() {
        let mut toolkit = RecordingToolkit::new();
        let config =
            AppConfig::new().layout("<html><body><button/><button/></body></html>");
        let app = App::build(config, &mut toolkit).unwrap();
        let first = app.select_widgets("button").unwrap();
        let second = app.select_widgets("button").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn widget_and_name_lookups_agree() {
        let mut toolkit = RecordingToolkit::new();
        let config = AppConfig::new().layout("<html><body><button/></body></html>");
        let app = App::build(config, &mut toolkit).unwrap();
        let id = app.select_elements("button").unwrap()[0];
        assert_eq!(app.widget_name(id), Some("button_0"));
        assert_eq!(
            app.widget("button_0"),
            app.select_widgets("button").unwrap().first().copied()
        );
    }

    // ── Data and fields ──────────────────────────────────────────────

    #[test]
    fn callbacks_bind_from_the_data_context() {
        let mut toolkit = RecordingToolkit::new();
        let config = AppConfig::new()
            .layout(r#"<html><body><button command="{self.go}"/></body></html>"#)
            .data_self("go", Value::Callback(Rc::new(|| {})));
        App::build(config, &mut toolkit).unwrap();
    }

    #[test]
    fn fields_are_bindable_and_queryable() {
        let mut toolkit = RecordingToolkit::new();
        let config = AppConfig::new()
            .layout(r#"<html><body><entry textvariable="{self.name.var}"/></body></html>"#)
            .field("name", StringField::new("amy", Some(5)).into_handle());
        let app = App::build(config, &mut toolkit).unwrap();
        let field = app.field("name").unwrap();
        assert_eq!(field.borrow().get(), Value::str("amy"));
        field.borrow_mut().set(Value::str("overflowing"));
        assert_eq!(field.borrow().get(), Value::str("overf"));
    }

    #[test]
    fn style_classes_apply_through_config() {
        let mut toolkit = RecordingToolkit::new();
        let config = AppConfig::new()
            .layout(r#"<html><body><button class="big"/></body></html>"#)
            .class("big", &[("width", "30")]);
        let app = App::build(config, &mut toolkit).unwrap();
        assert!(app.widget("button_0").is_some());
    }

    #[test]
    fn custom_widget_types_extend_the_vocabulary() {
        let mut toolkit = RecordingToolkit::new();
        let config = AppConfig::new()
            .layout("<html><body><canvas/></body></html>")
            .widget("canvas", WidgetSpec::container());
        let app = App::build(config, &mut toolkit).unwrap();
        assert!(app.widget("canvas_0").is_some());
    }
}
