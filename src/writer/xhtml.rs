//! Replays a stored markup string as emitter events.
//!
//! The markup is what the reader captured for XHTML text constructs, XML
//! typed content and extension elements: well-formed element and character
//! data, written with `&`/`<` escaped.  It is tokenized again here so that
//! the emitter keeps track of every element and namespace it writes.
use std::io::Write;

use xml::writer::{EventWriter, XmlEvent};

use crate::markup::{tokenize, StartTag, Token};
use crate::schema::{SchemaError, SchemaResult};
use crate::util::unescape;

/// Writes `markup` as a sequence of elements and character data.  Tags
/// must balance within the fragment.
pub fn write_fragment<W: Write>(writer: &mut EventWriter<W>, markup: &str) -> SchemaResult<()> {
    let mut open: Vec<&str> = vec![];
    for token in tokenize(markup) {
        match token? {
            Token::Text(text) => writer.write(XmlEvent::characters(&unescape(text)))?,
            Token::CData(text) => writer.write(XmlEvent::characters(text))?,
            Token::Comment(comment) => writer.write(XmlEvent::comment(comment))?,
            Token::ProcessingInstruction { target, data } =>
                writer.write(XmlEvent::processing_instruction(target, data))?,
            Token::End(name) => {
                match open.pop() {
                    Some(top) if top == name => { }
                    Some(top) => return Err(SchemaError::malformed(format!(
                        "</{}> does not close <{}>", name, top
                    ))),
                    None => return Err(SchemaError::malformed(format!(
                        "</{}> has no start tag", name
                    ))),
                }
                writer.write(XmlEvent::end_element())?;
            }
            Token::Start(tag) => {
                write_start_tag(writer, &tag)?;
                if tag.empty {
                    writer.write(XmlEvent::end_element())?;
                } else {
                    open.push(tag.name);
                }
            }
        }
    }
    match open.pop() {
        Some(name) => Err(SchemaError::malformed(format!("<{}> is never closed", name))),
        None => Ok(()),
    }
}

fn write_start_tag<W: Write>(writer: &mut EventWriter<W>, tag: &StartTag<'_>)
                             -> SchemaResult<()> {
    let mut event = XmlEvent::start_element(tag.name);
    for (name, value) in &tag.attributes {
        event = if *name == "xmlns" {
            event.default_ns(value.as_str())
        } else if let Some(prefix) = name.strip_prefix("xmlns:") {
            event.ns(prefix, value.as_str())
        } else {
            event.attr(*name, value)
        };
    }
    writer.write(event)?;
    Ok(())
}
