//! Error type and the traits shared by the reader and the writer.
use std::io;

use thiserror::Error;

use crate::parser::base::{NestedEvent, XmlElement};

pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(Debug, Error)]
pub enum SchemaError {
    /// The document or the constructed value breaks a rule of RFC 4287.
    #[error("{0}")]
    SpecViolation(String),

    /// Stored markup could not be tokenized again while writing.
    #[error("content is not valid XHTML: {0}")]
    MalformedMarkup(String),

    #[error("XML error: {0}")]
    Xml(#[from] xml::reader::Error),

    #[error("XML emitter error: {0}")]
    Emit(#[from] xml::writer::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl SchemaError {
    pub fn violation<S: Into<String>>(msg: S) -> SchemaError {
        SchemaError::SpecViolation(msg.into())
    }

    pub fn malformed<S: Into<String>>(msg: S) -> SchemaError {
        SchemaError::MalformedMarkup(msg.into())
    }

    pub fn is_violation(&self) -> bool {
        matches!(*self, SchemaError::SpecViolation(_))
    }
}

/// Converts between a value and its textual form inside an element.
pub trait Codec<T> {
    fn encode(&self, value: &T, w: &mut dyn io::Write) -> SchemaResult<()>;
    fn decode(&self, r: &str) -> SchemaResult<T>;
}

/// The root element of the document.
pub trait DocumentElement {
    fn tag() -> &'static str;
    fn xmlns() -> Option<&'static str>;
}

/// Accumulates the pieces of an element while its subtree streams by.
///
/// Implementors are builders; the validated value is produced afterwards so
/// that a missing required child is only reported once the element closes.
pub trait FromSchemaReader: Default + Sized {
    fn build_from<R: io::Read>(element: XmlElement<'_, R>) -> SchemaResult<Self> {
        let mut result: Self = Default::default();
        result.read_from(element)?;
        Ok(result)
    }

    fn read_from<R: io::Read>(&mut self, element: XmlElement<'_, R>) -> SchemaResult<()> {
        let XmlElement { attributes, mut children, .. } = element;
        self.match_attributes(attributes)?;
        while let Some(event) = children.next() {
            match event? {
                NestedEvent::Nested(child) => self.match_child(child)?,
                NestedEvent::Characters(text) => self.match_text(text)?,
                NestedEvent::Whitespace(_) => { }
            }
        }
        Ok(())
    }

    fn match_attributes(&mut self, _attributes: Vec<crate::feed::Attribute>) -> SchemaResult<()> {
        Ok(())
    }

    fn match_child<R: io::Read>(&mut self, _child: XmlElement<'_, R>) -> SchemaResult<()> {
        Ok(())
    }

    fn match_text(&mut self, _text: String) -> SchemaResult<()> {
        Ok(())
    }
}
