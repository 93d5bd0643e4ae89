//! Markup parsing: rendered layout text into an element tree.

pub mod parser;

pub use parser::parse;
