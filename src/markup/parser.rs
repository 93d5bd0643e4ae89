//! Markup parser adapter.
//!
//! Wraps quick-xml to turn rendered layout markup into a [`Dom`]: elements
//! in document order with ordered attributes, trimmed text content,
//! parent/child links, and a self-closing flag per element. All structural
//! and semantic checking happens in later passes; this adapter only enforces
//! well-formedness.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::dom::{Dom, ElementData, ElementId};
use crate::error::BuildError;

/// Parse markup text into an element tree.
///
/// Tag nesting violations surface as [`BuildError::StartEndMismatch`]; any
/// other parser-level failure becomes [`BuildError::Markup`].
pub fn parse(markup: &str) -> Result<Dom, BuildError> {
    let mut reader = Reader::from_str(markup);
    reader.trim_text(true);

    let mut dom = Dom::new();
    let mut stack: Vec<ElementId> = Vec::new();
    let mut root_seen = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let data = element_from_start(e, false)?;
                let id = push_element(&mut dom, &stack, data, &mut root_seen)?;
                stack.push(id);
            }
            Ok(Event::Empty(ref e)) => {
                let data = element_from_start(e, true)?;
                push_element(&mut dom, &stack, data, &mut root_seen)?;
            }
            Ok(Event::End(_)) => {
                // Name matching is already enforced by the reader.
                stack.pop();
            }
            Ok(Event::Text(ref t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| BuildError::Markup(e.to_string()))?
                    .into_owned();
                if let Some(&current) = stack.last() {
                    if let Some(data) = dom.get_mut(current) {
                        match &mut data.text {
                            Some(existing) => {
                                existing.push(' ');
                                existing.push_str(text.trim());
                            }
                            None => data.text = Some(text.trim().to_string()),
                        }
                    }
                } else if !text.trim().is_empty() {
                    return Err(BuildError::Markup(format!(
                        "text outside of any element: \"{}\"",
                        text.trim()
                    )));
                }
            }
            Ok(Event::Eof) => break,
            // Declarations, comments, processing instructions are ignored.
            Ok(_) => {}
            Err(quick_xml::Error::EndEventMismatch { expected, found }) => {
                return Err(BuildError::StartEndMismatch {
                    start: expected,
                    end: found,
                });
            }
            Err(e) => {
                return Err(BuildError::Markup(format!(
                    "at byte {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
        }
    }

    if !stack.is_empty() {
        let data = dom.get(stack[stack.len() - 1]);
        return Err(BuildError::Markup(format!(
            "unclosed tag <{}>",
            data.map(|d| d.tag.as_str()).unwrap_or("?")
        )));
    }

    Ok(dom)
}

/// Build element data from a start (or empty) tag event.
fn element_from_start(e: &BytesStart<'_>, self_closing: bool) -> Result<ElementData, BuildError> {
    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut data = ElementData::new(tag).self_closing(self_closing);

    for attr in e.attributes() {
        let attr = attr.map_err(|e| BuildError::Markup(e.to_string()))?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| BuildError::Markup(e.to_string()))?
            .into_owned();
        data.attrs.push((name, value));
    }

    Ok(data)
}

/// Attach an element under the current stack top, or as the tree root.
fn push_element(
    dom: &mut Dom,
    stack: &[ElementId],
    data: ElementData,
    root_seen: &mut bool,
) -> Result<ElementId, BuildError> {
    match stack.last() {
        Some(&parent) => Ok(dom.insert_child(parent, data)),
        None => {
            if *root_seen {
                return Err(BuildError::Markup(format!(
                    "multiple root elements: <{}>",
                    data.tag
                )));
            }
            *root_seen = true;
            Ok(dom.insert(data))
        }
    }
}
