//! # markout
//!
//! Build desktop GUI widget trees from HTML-like markup, with CSS-style
//! sheets and `{dotted.path}` data binding.
//!
//! markout is a markup-to-widget compiler: it parses a layout document,
//! validates it against a small tag grammar, resolves attributes (class
//! bundles, stylesheet cascade, binding expressions) into widget options,
//! and walks the tree once to construct and place widgets through an
//! abstract toolkit backend. The concrete GUI toolkit, the template engine,
//! and the event loop stay outside; they plug in behind small traits.
//!
//! ## Core Systems
//!
//! - **[`markup`]** — Parser adapter turning layout text into an element tree
//! - **[`dom`]** — Slotmap-backed element arena with tree operations and selector queries
//! - **[`css`]** — Stylesheet engine: tokenizer, parser, matcher, cascade
//! - **[`classify`]** — Tag grammar: categories, scopes, legality checks
//! - **[`options`]** — Attribute resolution into constructor and placement options
//! - **[`value`]** / **[`fields`]** — Binding values, data context, typed reactive fields
//! - **[`grid`]** — Column allocator for auto-flowed grid cells
//! - **[`build`]** — The build/display driver
//! - **[`toolkit`]** — Backend trait, widget handles, widget-type registry
//! - **[`template`]** — Loader and renderer seams for templated layouts
//! - **[`app`]** — Host configuration and the built application surface

// Foundation
pub mod dom;
pub mod error;
pub mod value;

// Front end
pub mod css;
pub mod markup;
pub mod template;

// Semantic passes
pub mod classify;
pub mod grid;
pub mod options;

// Backend seam
pub mod fields;
pub mod toolkit;

// Driver and host surface
pub mod app;
pub mod build;

// Test support
pub mod testing;

pub use app::{App, AppConfig};
pub use dom::{Dom, ElementData, ElementId};
pub use error::BuildError;
pub use fields::{BoolField, Field, FieldHandle, FieldVar, IntField, StringField};
pub use toolkit::{Toolkit, WidgetId, WidgetRegistry, WidgetSpec};
pub use value::{DataContext, Value, ValueMap};
