//! Stylesheet engine: tokenizer, parser, selector matching, cascade.

pub mod cascade;
pub mod matcher;
pub mod model;
pub mod parser;
pub mod tokenizer;

pub use model::{Declaration, RuleSet, Selector, Stylesheet};
pub use parser::{parse_css, parse_selector_list};
