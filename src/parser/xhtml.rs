//! Turns the events nested inside a text construct back into a markup
//! string.
use std::io::Read;

use super::base::{NestedEvent, NestedEventReader, XmlElement};
use crate::schema::{SchemaError, SchemaResult};
use crate::util::escape_text;

/// How character data is escaped in the produced markup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Escape {
    /// `&`, `<` and `>`: the text of `type="html"` constructs.
    Html,
    /// `&` and `<` only.
    Xhtml,
}

/// Serializes what is left of the element `children` reads, until its end
/// tag.  Elements without content are written as `<name/>`.
pub fn read_markup<R: Read>(children: &mut NestedEventReader<'_, R>, escape: Escape)
                            -> SchemaResult<String> {
    let mut out = String::new();
    write_children(children, escape, &mut out)?;
    Ok(out)
}

fn write_children<R: Read>(children: &mut NestedEventReader<'_, R>, escape: Escape,
                           out: &mut String) -> SchemaResult<()> {
    while let Some(event) = children.next() {
        match event? {
            NestedEvent::Characters(text) | NestedEvent::Whitespace(text) => {
                out.push_str(&escape_text(&text, escape == Escape::Html));
            }
            NestedEvent::Nested(element) if escape == Escape::Html => {
                return Err(SchemaError::violation(format!(
                    "Text constructs of type \"html\" MUST NOT contain child elements, \
                     found <{}>.", element.qualified_name()
                )));
            }
            NestedEvent::Nested(element) => write_element(element, escape, out)?,
        }
    }
    Ok(())
}

fn write_element<R: Read>(element: XmlElement<'_, R>, escape: Escape, out: &mut String)
                          -> SchemaResult<()> {
    let qname = element.qualified_name();
    let XmlElement { attributes, mut children, .. } = element;
    out.push('<');
    out.push_str(&qname);
    for attr in &attributes {
        out.push(' ');
        out.push_str(&attr.to_string());
    }
    let mut inner = String::new();
    write_children(&mut children, escape, &mut inner)?;
    if inner.is_empty() {
        out.push_str("/>");
    } else {
        out.push('>');
        out.push_str(&inner);
        out.push_str("</");
        out.push_str(&qname);
        out.push('>');
    }
    Ok(())
}
