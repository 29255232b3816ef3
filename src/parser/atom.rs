//! Atom documents read into the `feed` object model.
use std::io::Read;

use tracing::{debug, warn};

use super::base::{event_reader, NestedEvent, NestedEventReader, XmlElement};
use super::xhtml::{read_markup, Escape};
use crate::config::ReaderConfig;
use crate::feed::{ATOM_XMLNS, Attribute, Category, ContentType, DateConstruct, ElementKind, Entry,
                  EntryBuilder, Extension, Feed, FeedBuilder, Generator, Link, MetadataBuilder,
                  Person, PersonBuilder, SourceBuilder, TextConstruct, UriElement, is_xml_type,
                  set_once};
use crate::feed::validation::{check_root_prefixes, validate_attributes};
use crate::schema::{DocumentElement, FromSchemaReader, SchemaError, SchemaResult};

/// Reads Atom feed and entry documents.
#[derive(Clone, Copy, Debug, Default)]
pub struct AtomReader {
    config: ReaderConfig,
}

impl AtomReader {
    pub fn new(config: ReaderConfig) -> AtomReader {
        AtomReader { config }
    }

    pub fn read_feed<R: Read>(&self, source: R) -> SchemaResult<Feed> {
        let builder: FeedBuilder = self.read_root::<Feed, _, _>(source)?;
        let feed = builder.build()?;
        debug!(id = feed.id().value(), entries = feed.entries().len(), "feed read");
        Ok(feed)
    }

    pub fn read_entry<R: Read>(&self, source: R) -> SchemaResult<Entry> {
        let builder: EntryBuilder = self.read_root::<Entry, _, _>(source)?;
        let entry = builder.build()?;
        if !entry.has_author() {
            return Err(SchemaError::violation(
                "atom:entry elements MUST contain one or more atom:author elements, unless the \
                 atom:entry contains an atom:source element that contains an atom:author \
                 element or, in an Atom Feed Document, the atom:feed element contains an \
                 atom:author element itself."
            ));
        }
        check_root_prefixes(ElementKind::Entry, &entry)?;
        debug!(id = entry.id().value(), "entry read");
        Ok(entry)
    }

    fn read_root<D, B, R>(&self, source: R) -> SchemaResult<B>
        where D: DocumentElement, B: FromSchemaReader, R: Read
    {
        let mut events = event_reader(source);
        let mut document = NestedEventReader::new(&mut events, self.config);
        while let Some(event) = document.next() {
            if let NestedEvent::Nested(root) = event? {
                if root.namespace_ref() != D::xmlns() || root.local_name() != D::tag() {
                    return Err(SchemaError::violation(format!(
                        "expected an atom:{} document, found '{}'",
                        D::tag(), root.qualified_name()
                    )));
                }
                debug!(root = D::tag(), "reading document");
                return B::build_from(root);
            }
        }
        Err(SchemaError::violation("document has no root element"))
    }
}

pub fn read_feed<R: Read>(source: R) -> SchemaResult<Feed> {
    AtomReader::default().read_feed(source)
}

pub fn read_feed_str(xml: &str) -> SchemaResult<Feed> {
    read_feed(xml.as_bytes())
}

pub fn read_entry<R: Read>(source: R) -> SchemaResult<Entry> {
    AtomReader::default().read_entry(source)
}

pub fn read_entry_str(xml: &str) -> SchemaResult<Entry> {
    read_entry(xml.as_bytes())
}

/// The local name of an Atom element, `None` for foreign elements.
fn atom_tag<R: Read>(element: &XmlElement<'_, R>) -> Option<String> {
    match element.namespace_ref() {
        Some(ATOM_XMLNS) => Some(element.local_name().to_owned()),
        _ => None,
    }
}

fn unknown_child<R: Read>(parent: ElementKind, child: &XmlElement<'_, R>) -> SchemaError {
    SchemaError::violation(format!(
        "atom:{} elements MUST NOT contain atom:{} elements.", parent, child.local_name()
    ))
}

fn read_simple<R: Read>(element: XmlElement<'_, R>, kind: ElementKind) -> SchemaResult<String> {
    validate_attributes(kind, &element.attributes)?;
    Ok(element.read_whole_text()?.trim().to_owned())
}

fn read_uri<R: Read>(element: XmlElement<'_, R>, kind: ElementKind) -> SchemaResult<UriElement> {
    let attributes = element.attributes.clone();
    let text = element.read_whole_text()?;
    UriElement::new(kind, attributes, text)
}

fn read_date<R: Read>(element: XmlElement<'_, R>, kind: ElementKind)
                      -> SchemaResult<DateConstruct> {
    let offset = element.config().date_offset;
    let attributes = element.attributes.clone();
    let text = element.read_whole_text()?;
    DateConstruct::parse_with(kind, attributes, &text, offset)
}

/// Reads a text construct (or `atom:content`) after classifying it.
fn read_text<R: Read>(element: XmlElement<'_, R>, kind: ElementKind)
                      -> SchemaResult<TextConstruct> {
    let qname = element.qualified_name();
    let XmlElement { attributes, mut children, .. } = element;
    let text = match ContentType::classify(&attributes) {
        ContentType::External => {
            let ignored = read_markup(&mut children, Escape::Xhtml)?;
            if !ignored.trim().is_empty() {
                warn!(element = %qname, "ignoring the content of an out-of-line element");
            }
            None
        }
        ContentType::Html => Some(read_markup(&mut children, Escape::Html)?),
        ContentType::Xhtml => Some(read_markup(&mut children, Escape::Xhtml)?),
        ContentType::Other if is_xml_type(&attributes) =>
            Some(read_markup(&mut children, Escape::Xhtml)?),
        ContentType::Text | ContentType::Other => Some(children.read_text(&qname)?),
    };
    TextConstruct::new(kind, attributes, text)
}

/// Any element outside the Atom namespace, with its content as markup.
fn read_extension<R: Read>(element: XmlElement<'_, R>) -> SchemaResult<Extension> {
    let name = element.qualified_name();
    let XmlElement { attributes, mut children, .. } = element;
    let content = read_markup(&mut children, Escape::Xhtml)?;
    Extension::new(name, attributes, if content.is_empty() { None } else { Some(content) })
}

fn read_person<R: Read>(element: XmlElement<'_, R>, kind: ElementKind)
                        -> SchemaResult<Person> {
    let mut builder = PersonBuilder::new(kind);
    builder.read_from(element)?;
    builder.build()
}

/// Handles the children `atom:feed`, `atom:entry` and `atom:source` share.
/// Anything else is handed back.
fn read_metadata_child<'a, R: Read>(metadata: &mut MetadataBuilder, parent: ElementKind,
                                    child: XmlElement<'a, R>)
                                    -> SchemaResult<Option<XmlElement<'a, R>>> {
    match atom_tag(&child).as_deref() {
        Some("author") => metadata.authors.push(read_person(child, ElementKind::Author)?),
        Some("contributor") =>
            metadata.contributors.push(read_person(child, ElementKind::Contributor)?),
        Some("category") => metadata.categories.push(Category::new(child.attributes.clone())?),
        Some("link") => metadata.links.push(Link::new(child.attributes.clone())?),
        Some("id") => {
            let id = read_uri(child, ElementKind::Id)?;
            set_once(&mut metadata.id, id, parent, ElementKind::Id)?;
        }
        Some("title") => {
            let title = read_text(child, ElementKind::Title)?;
            set_once(&mut metadata.title, title, parent, ElementKind::Title)?;
        }
        Some("updated") => {
            let updated = read_date(child, ElementKind::Updated)?;
            set_once(&mut metadata.updated, updated, parent, ElementKind::Updated)?;
        }
        Some("rights") => {
            let rights = read_text(child, ElementKind::Rights)?;
            set_once(&mut metadata.rights, rights, parent, ElementKind::Rights)?;
        }
        _ => return Ok(Some(child)),
    }
    Ok(None)
}

impl FromSchemaReader for PersonBuilder {
    fn match_attributes(&mut self, attributes: Vec<Attribute>) -> SchemaResult<()> {
        self.attributes = attributes;
        Ok(())
    }

    fn match_child<R: Read>(&mut self, child: XmlElement<'_, R>) -> SchemaResult<()> {
        match atom_tag(&child).as_deref() {
            Some("name") => {
                let name = read_simple(child, ElementKind::Name)?;
                set_once(&mut self.name, name, self.kind, ElementKind::Name)
            }
            Some("uri") => {
                let uri = read_simple(child, ElementKind::Uri)?;
                set_once(&mut self.uri, uri, self.kind, ElementKind::Uri)
            }
            Some("email") => {
                let email = read_simple(child, ElementKind::Email)?;
                set_once(&mut self.email, email, self.kind, ElementKind::Email)
            }
            Some(_) => Err(unknown_child(self.kind, &child)),
            None => {
                self.extensions.push(read_extension(child)?);
                Ok(())
            }
        }
    }
}

impl FromSchemaReader for SourceBuilder {
    fn match_attributes(&mut self, attributes: Vec<Attribute>) -> SchemaResult<()> {
        self.attributes = attributes;
        Ok(())
    }

    fn match_child<R: Read>(&mut self, child: XmlElement<'_, R>) -> SchemaResult<()> {
        let kind = ElementKind::Source;
        let Some(child) = read_metadata_child(&mut self.metadata, kind, child)? else {
            return Ok(());
        };
        match atom_tag(&child).as_deref() {
            Some("generator") => {
                let attributes = child.attributes.clone();
                let generator = Generator::new(attributes, read_simple_text(child)?)?;
                set_once(&mut self.generator, generator, kind, ElementKind::Generator)
            }
            Some("icon") => {
                let icon = read_uri(child, ElementKind::Icon)?;
                set_once(&mut self.icon, icon, kind, ElementKind::Icon)
            }
            Some("logo") => {
                let logo = read_uri(child, ElementKind::Logo)?;
                set_once(&mut self.logo, logo, kind, ElementKind::Logo)
            }
            Some("subtitle") => {
                let subtitle = read_text(child, ElementKind::Subtitle)?;
                set_once(&mut self.subtitle, subtitle, kind, ElementKind::Subtitle)
            }
            Some(_) => Err(unknown_child(kind, &child)),
            None => {
                self.extensions.push(read_extension(child)?);
                Ok(())
            }
        }
    }
}

fn read_simple_text<R: Read>(element: XmlElement<'_, R>) -> SchemaResult<String> {
    Ok(element.read_whole_text()?.trim().to_owned())
}

impl FromSchemaReader for EntryBuilder {
    fn match_attributes(&mut self, attributes: Vec<Attribute>) -> SchemaResult<()> {
        self.attributes = attributes;
        Ok(())
    }

    fn match_child<R: Read>(&mut self, child: XmlElement<'_, R>) -> SchemaResult<()> {
        let kind = ElementKind::Entry;
        let Some(child) = read_metadata_child(&mut self.metadata, kind, child)? else {
            return Ok(());
        };
        match atom_tag(&child).as_deref() {
            Some("content") => {
                let content = read_text(child, ElementKind::Content)?;
                set_once(&mut self.content, content, kind, ElementKind::Content)
            }
            Some("summary") => {
                let summary = read_text(child, ElementKind::Summary)?;
                set_once(&mut self.summary, summary, kind, ElementKind::Summary)
            }
            Some("published") => {
                let published = read_date(child, ElementKind::Published)?;
                set_once(&mut self.published, published, kind, ElementKind::Published)
            }
            Some("source") => {
                let source = SourceBuilder::build_from(child)?.build()?;
                set_once(&mut self.source, source, kind, ElementKind::Source)
            }
            Some(_) => Err(unknown_child(kind, &child)),
            None => {
                self.extensions.push(read_extension(child)?);
                Ok(())
            }
        }
    }
}

impl FromSchemaReader for FeedBuilder {
    fn match_attributes(&mut self, attributes: Vec<Attribute>) -> SchemaResult<()> {
        self.attributes = attributes;
        Ok(())
    }

    fn match_child<R: Read>(&mut self, child: XmlElement<'_, R>) -> SchemaResult<()> {
        let kind = ElementKind::Feed;
        let Some(child) = read_metadata_child(&mut self.metadata, kind, child)? else {
            return Ok(());
        };
        match atom_tag(&child).as_deref() {
            Some("entry") => {
                self.entries.push(EntryBuilder::build_from(child)?.build()?);
                Ok(())
            }
            Some("generator") => {
                let attributes = child.attributes.clone();
                let generator = Generator::new(attributes, read_simple_text(child)?)?;
                set_once(&mut self.generator, generator, kind, ElementKind::Generator)
            }
            Some("icon") => {
                let icon = read_uri(child, ElementKind::Icon)?;
                set_once(&mut self.icon, icon, kind, ElementKind::Icon)
            }
            Some("logo") => {
                let logo = read_uri(child, ElementKind::Logo)?;
                set_once(&mut self.logo, logo, kind, ElementKind::Logo)
            }
            Some("subtitle") => {
                let subtitle = read_text(child, ElementKind::Subtitle)?;
                set_once(&mut self.subtitle, subtitle, kind, ElementKind::Subtitle)
            }
            Some(_) => Err(unknown_child(kind, &child)),
            None => {
                self.extensions.push(read_extension(child)?);
                Ok(())
            }
        }
    }
}
