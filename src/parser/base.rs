use std::collections::BTreeMap;
use std::io::Read;

use tracing::trace;
use xml::name::OwnedName;
use xml::namespace::{Namespace, NS_XMLNS_PREFIX, NS_XML_PREFIX};
use xml::reader::{EventReader, ParserConfig, XmlEvent};

use crate::config::ReaderConfig;
use crate::feed::Attribute;
use crate::schema::{SchemaError, SchemaResult};

/// Prefix to namespace URI mapping in effect for an element.
pub type Scope = BTreeMap<String, String>;

/// Creates the tokenizer the reader is driven by.  CDATA sections arrive as
/// plain characters and comments are dropped.
pub fn event_reader<R: Read>(source: R) -> EventReader<R> {
    ParserConfig::new()
        .trim_whitespace(false)
        .whitespace_to_characters(false)
        .cdata_to_characters(true)
        .ignore_comments(true)
        .coalesce_characters(true)
        .create_reader(source)
}

/// A view over the flat event stream restricted to the children of a single
/// element.  It stops at the end event of the element it was opened for;
/// dropping it early skips whatever is left of that element.
pub struct NestedEventReader<'a, R: Read + 'a> {
    reader: &'a mut EventReader<R>,
    scope: Scope,
    config: ReaderConfig,
    finished: bool,
}

impl<'a, R: Read> NestedEventReader<'a, R> {
    pub fn new(reader: &'a mut EventReader<R>, config: ReaderConfig) -> NestedEventReader<'a, R> {
        NestedEventReader { reader, scope: Scope::new(), config, finished: false }
    }

    pub fn config(&self) -> ReaderConfig {
        self.config
    }

    #[inline]
    pub fn next(&mut self) -> Option<SchemaResult<NestedEvent<'_, R>>> {
        if self.finished {
            return None;
        }
        loop {
            let event = match self.reader.next() {
                Ok(event) => event,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(SchemaError::from(e)));
                }
            };
            match event {
                XmlEvent::StartElement { name, attributes, namespace } => {
                    let mut attrs = declarations(&self.scope, &namespace);
                    attrs.extend(attributes.into_iter().map(|attr| {
                        Attribute::from_parts(qualified_name(&attr.name), attr.value)
                    }));
                    let children = NestedEventReader {
                        reader: &mut *self.reader,
                        scope: namespace.0,
                        config: self.config,
                        finished: false,
                    };
                    return Some(Ok(NestedEvent::Nested(XmlElement {
                        name,
                        attributes: attrs,
                        children,
                    })));
                }
                XmlEvent::EndElement { .. } | XmlEvent::EndDocument => {
                    self.finished = true;
                    return None;
                }
                XmlEvent::Characters(text) | XmlEvent::CData(text) => {
                    return Some(Ok(NestedEvent::Characters(text)));
                }
                XmlEvent::Whitespace(text) => {
                    return Some(Ok(NestedEvent::Whitespace(text)));
                }
                other => {
                    trace!(event = ?other, "skipping event");
                }
            }
        }
    }

    /// Reads the rest of the element as character data.  `owner` names the
    /// element in the error raised for a child element.
    pub fn read_text(&mut self, owner: &str) -> SchemaResult<String> {
        let mut text = String::new();
        while let Some(event) = self.next() {
            match event? {
                NestedEvent::Characters(s) | NestedEvent::Whitespace(s) => text.push_str(&s),
                NestedEvent::Nested(child) => {
                    return Err(SchemaError::violation(format!(
                        "element '{}' must not contain child element '{}'",
                        owner,
                        child.qualified_name()
                    )));
                }
            }
        }
        Ok(text)
    }
}

impl<'a, R: Read> Drop for NestedEventReader<'a, R> {
    #[inline]
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        // drain all remained events of this element
        let mut depth = 0usize;
        loop {
            match self.reader.next() {
                Ok(XmlEvent::StartElement { .. }) => depth += 1,
                Ok(XmlEvent::EndElement { .. }) => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                Ok(XmlEvent::EndDocument) | Err(_) => break,
                Ok(_) => { }
            }
        }
        self.finished = true;
    }
}

pub enum NestedEvent<'a, R: Read + 'a> {
    Nested(XmlElement<'a, R>),
    Characters(String),
    Whitespace(String),
}

/// An opened element: its name, its attributes (namespace declarations made
/// on this element included, as `xmlns`/`xmlns:p` attributes) and a reader
/// over its children.
pub struct XmlElement<'a, R: Read + 'a> {
    pub name: OwnedName,
    pub attributes: Vec<Attribute>,
    pub children: NestedEventReader<'a, R>,
}

impl<'a, R: Read> XmlElement<'a, R> {
    pub fn local_name(&self) -> &str {
        &self.name.local_name
    }

    pub fn namespace_ref(&self) -> Option<&str> {
        self.name.namespace.as_deref()
    }

    pub fn qualified_name(&self) -> String {
        qualified_name(&self.name)
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attributes.iter().find(|a| a.name() == key).map(|a| a.value())
    }

    pub fn config(&self) -> ReaderConfig {
        self.children.config()
    }

    /// Concatenates the character data of the element.  Atom elements read
    /// through this carry text only, so a child element is an error.
    pub fn read_whole_text(self) -> SchemaResult<String> {
        let qname = self.qualified_name();
        let XmlElement { mut children, .. } = self;
        children.read_text(&qname)
    }
}

pub fn qualified_name(name: &OwnedName) -> String {
    match name.prefix {
        Some(ref prefix) if !prefix.is_empty() => format!("{}:{}", prefix, name.local_name),
        _ => name.local_name.clone(),
    }
}

/// Namespace declarations introduced by an element, i.e. the mappings of
/// `current` that are not already in effect in `parent`.
pub fn declarations(parent: &Scope, current: &Namespace) -> Vec<Attribute> {
    current
        .0
        .iter()
        .filter(|&(prefix, _)| prefix != NS_XML_PREFIX && prefix != NS_XMLNS_PREFIX)
        .filter(|&(prefix, uri)| match parent.get(prefix) {
            Some(old) => old != uri,
            None => !(prefix.is_empty() && uri.is_empty()),
        })
        .map(|(prefix, uri)| {
            if prefix.is_empty() {
                Attribute::from_parts("xmlns", uri.clone())
            } else {
                Attribute::from_parts(format!("xmlns:{}", prefix), uri.clone())
            }
        })
        .collect()
}
