//! Build error taxonomy.
//!
//! Every stage of a build reports through [`BuildError`]; nothing is
//! recovered locally. Inputs are static markup and configuration, so a
//! failure recurs deterministically and aborts the whole build.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    /// Tag matches no structural, widget, or scope-leaf grammar rule.
    #[error("unrecognized tag <{0}>")]
    UnrecognizedTag(String),

    /// Tag is valid somewhere, but not in the scope it appeared in.
    #[error("tag <{tag}> should be under scope tag <{scope}>")]
    TagInWrongScope { tag: String, scope: String },

    /// Self-closing use of a tag that requires content or children.
    #[error("tag <{0}/> can not be an empty tag")]
    InvalidEmptyTag(String),

    /// Parser-level tag nesting violation.
    #[error("start tag <{start}> does not match end tag </{end}>")]
    StartEndMismatch { start: String, end: String },

    /// A `class` attribute referenced a style class that was never
    /// registered.
    #[error("class \"{0}\" does not exists")]
    ClassNotFound(String),

    /// A `{…}` binding expression could not be resolved; carries the full
    /// expression text.
    #[error("data \"{0}\" does not exist")]
    DataNotFound(String),

    /// Markup parsing failed for a reason other than tag nesting.
    #[error("markup error: {0}")]
    Markup(String),

    /// Stylesheet parsing failed.
    #[error("stylesheet error: {0}")]
    Css(String),

    /// A named layout or stylesheet template the loader cannot resolve.
    #[error("template \"{0}\" not found")]
    TemplateNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_offending_text() {
        assert_eq!(
            BuildError::UnrecognizedTag("hello".into()).to_string(),
            "unrecognized tag <hello>"
        );
        assert_eq!(
            BuildError::TagInWrongScope {
                tag: "button".into(),
                scope: "head".into()
            }
            .to_string(),
            "tag <button> should be under scope tag <head>"
        );
        assert_eq!(
            BuildError::InvalidEmptyTag("menu".into()).to_string(),
            "tag <menu/> can not be an empty tag"
        );
        assert_eq!(
            BuildError::StartEndMismatch {
                start: "head".into(),
                end: "body".into()
            }
            .to_string(),
            "start tag <head> does not match end tag </body>"
        );
        assert_eq!(
            BuildError::ClassNotFound("big".into()).to_string(),
            "class \"big\" does not exists"
        );
        assert_eq!(
            BuildError::DataNotFound("self.nofunc".into()).to_string(),
            "data \"self.nofunc\" does not exist"
        );
    }
}
