//! The `feed` object model written back out as Atom XML.
use std::io::{self, Write};

use tracing::debug;
use xml::writer::{EmitterConfig, EventWriter, XmlEvent};
use xml::writer::events::StartElementBuilder;

use super::xhtml::write_fragment;
use crate::config::WriterConfig;
use crate::feed::{ATOM_XMLNS, Attribute, Body, Category, ContentType, DateConstruct,
                  ElementKind, Entry, Extension, Feed, Generator, Link, Metadata, Person,
                  Source, TextConstruct, UriElement};
use crate::feed::validation::check_root_prefixes;
use crate::schema::{DocumentElement, SchemaError, SchemaResult};
use crate::sort;
use crate::util::unescape;

/// Writes feed and entry documents to a sink.
///
/// Each `write_*` call produces one complete document and flushes the
/// sink; the sink itself is handed back by `into_inner`.
pub struct AtomWriter<W: Write> {
    writer: EventWriter<W>,
}

impl<W: Write> AtomWriter<W> {
    pub fn new(sink: W, config: WriterConfig) -> AtomWriter<W> {
        let writer = EmitterConfig::new()
            .perform_indent(config.indent)
            .write_document_declaration(config.write_document_declaration)
            .pad_self_closing(false)
            .create_writer(sink);
        AtomWriter { writer }
    }

    pub fn write_feed(&mut self, feed: &Feed) -> SchemaResult<()> {
        debug!(id = feed.id().value(), entries = feed.entries().len(), "writing feed");
        self.start_root(Feed::tag(), feed.attributes())?;
        self.uri_element(feed.id())?;
        self.text(feed.title())?;
        if let Some(subtitle) = feed.subtitle() {
            self.text(subtitle)?;
        }
        self.date(feed.updated())?;
        self.metadata(feed)?;
        if let Some(generator) = feed.generator() {
            self.generator(generator)?;
        }
        if let Some(icon) = feed.icon() {
            self.uri_element(icon)?;
        }
        if let Some(logo) = feed.logo() {
            self.uri_element(logo)?;
        }
        self.extensions(feed.extensions())?;

        let order = sort::resolve(feed.attributes(), feed.extensions());
        if order == feed.entries().order() {
            for entry in feed.entries() {
                self.entry(entry)?;
            }
        } else {
            for entry in &feed.entries().reordered(order) {
                self.entry(entry)?;
            }
        }
        self.end()?;
        self.flush()?;
        debug!(id = feed.id().value(), "feed written");
        Ok(())
    }

    /// Writes a standalone entry document.  Extension prefixes it uses
    /// must be declared on the entry itself.
    pub fn write_entry(&mut self, entry: &Entry) -> SchemaResult<()> {
        check_root_prefixes(ElementKind::Entry, entry)?;
        debug!(id = entry.id().value(), "writing entry");
        self.start_root(Entry::tag(), entry.attributes())?;
        self.entry_children(entry)?;
        self.end()?;
        self.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn flush(&mut self) -> SchemaResult<()> {
        self.writer.inner_mut().flush()?;
        Ok(())
    }

    fn start_root(&mut self, name: &str, attributes: &[Attribute]) -> SchemaResult<()> {
        let mut event = start_element(name, attributes);
        if !attributes.iter().any(|a| a.declared_prefix() == Some("")) {
            event = event.default_ns(ATOM_XMLNS);
        }
        self.writer.write(event)?;
        Ok(())
    }

    fn start(&mut self, name: &str, attributes: &[Attribute]) -> SchemaResult<()> {
        self.writer.write(start_element(name, attributes))?;
        Ok(())
    }

    fn end(&mut self) -> SchemaResult<()> {
        self.writer.write(XmlEvent::end_element())?;
        Ok(())
    }

    fn characters(&mut self, text: &str) -> SchemaResult<()> {
        if !text.is_empty() {
            self.writer.write(XmlEvent::characters(text))?;
        }
        Ok(())
    }

    fn simple(&mut self, name: &str, attributes: &[Attribute], text: &str) -> SchemaResult<()> {
        self.start(name, attributes)?;
        self.characters(text)?;
        self.end()
    }

    fn entry(&mut self, entry: &Entry) -> SchemaResult<()> {
        self.start(Entry::tag(), entry.attributes())?;
        self.entry_children(entry)?;
        self.end()
    }

    fn entry_children(&mut self, entry: &Entry) -> SchemaResult<()> {
        self.uri_element(entry.id())?;
        self.text(entry.title())?;
        self.date(entry.updated())?;
        if let Some(published) = entry.published() {
            self.date(published)?;
        }
        self.metadata(entry)?;
        if let Some(source) = entry.source() {
            self.source(source)?;
        }
        if let Some(summary) = entry.summary() {
            self.text(summary)?;
        }
        if let Some(content) = entry.content() {
            self.text(content)?;
        }
        self.extensions(entry.extensions())
    }

    fn source(&mut self, source: &Source) -> SchemaResult<()> {
        self.start(ElementKind::Source.tag(), source.attributes())?;
        if let Some(id) = source.id() {
            self.uri_element(id)?;
        }
        if let Some(title) = source.title() {
            self.text(title)?;
        }
        if let Some(subtitle) = source.subtitle() {
            self.text(subtitle)?;
        }
        if let Some(updated) = source.updated() {
            self.date(updated)?;
        }
        self.metadata(source)?;
        if let Some(generator) = source.generator() {
            self.generator(generator)?;
        }
        if let Some(icon) = source.icon() {
            self.uri_element(icon)?;
        }
        if let Some(logo) = source.logo() {
            self.uri_element(logo)?;
        }
        self.extensions(source.extensions())?;
        self.end()
    }

    /// The repeated children and `atom:rights`; extensions are written by
    /// the caller after the element's own children.
    fn metadata(&mut self, metadata: &Metadata) -> SchemaResult<()> {
        for author in metadata.authors() {
            self.person(author)?;
        }
        for contributor in metadata.contributors() {
            self.person(contributor)?;
        }
        for category in metadata.categories() {
            self.category(category)?;
        }
        for link in metadata.links() {
            self.link(link)?;
        }
        if let Some(rights) = metadata.rights() {
            self.text(rights)?;
        }
        Ok(())
    }

    fn person(&mut self, person: &Person) -> SchemaResult<()> {
        self.start(person.kind().tag(), person.attributes())?;
        self.simple(ElementKind::Name.tag(), &[], person.name())?;
        if let Some(uri) = person.uri() {
            self.simple(ElementKind::Uri.tag(), &[], uri)?;
        }
        if let Some(email) = person.email() {
            self.simple(ElementKind::Email.tag(), &[], email)?;
        }
        self.extensions(person.extensions())?;
        self.end()
    }

    fn category(&mut self, category: &Category) -> SchemaResult<()> {
        self.start(ElementKind::Category.tag(), category.attributes())?;
        self.end()
    }

    fn link(&mut self, link: &Link) -> SchemaResult<()> {
        self.start(ElementKind::Link.tag(), link.attributes())?;
        self.end()
    }

    fn generator(&mut self, generator: &Generator) -> SchemaResult<()> {
        self.simple(ElementKind::Generator.tag(), generator.attributes(), generator.value())
    }

    fn uri_element(&mut self, element: &UriElement) -> SchemaResult<()> {
        self.simple(element.kind().tag(), element.attributes(), element.value())
    }

    fn date(&mut self, date: &DateConstruct) -> SchemaResult<()> {
        self.simple(date.kind().tag(), date.attributes(), date.text())
    }

    /// A text construct or `atom:content`, written the way its type says.
    fn text(&mut self, text: &TextConstruct) -> SchemaResult<()> {
        self.start(text.kind().tag(), text.attributes())?;
        match (text.content_type(), text.body()) {
            (ContentType::External, _) | (_, None) => { }
            (ContentType::Html, Some(body)) => self.characters(&unescape(body.as_str()))?,
            (ContentType::Xhtml, Some(body)) => {
                let markup = match text.wrapper() {
                    Some(wrapper) => wrapper.wrap(body.as_str()),
                    None => body.as_str().to_owned(),
                };
                write_fragment(&mut self.writer, &markup)?;
            }
            (_, Some(Body::Markup(markup))) => write_fragment(&mut self.writer, markup)?,
            (_, Some(Body::Plain(plain))) => self.characters(plain)?,
        }
        self.end()
    }

    fn extensions(&mut self, extensions: &[Extension]) -> SchemaResult<()> {
        for extension in extensions {
            self.start(extension.name(), extension.attributes())?;
            if let Some(content) = extension.content() {
                write_fragment(&mut self.writer, content)?;
            }
            self.end()?;
        }
        Ok(())
    }
}

/// Namespace declarations go to the emitter's namespace stack, everything
/// else is a plain attribute.
fn start_element<'a>(name: &'a str, attributes: &'a [Attribute]) -> StartElementBuilder<'a> {
    let mut event = XmlEvent::start_element(name);
    for attr in attributes {
        event = match attr.declared_prefix() {
            Some("") => event.default_ns(attr.value()),
            Some(prefix) => event.ns(prefix, attr.value()),
            None => event.attr(attr.name(), attr.value()),
        };
    }
    event
}

/// Writes `feed` to `sink` with the default settings and returns the sink.
pub fn write_feed<W: Write>(feed: &Feed, sink: W) -> SchemaResult<W> {
    let mut writer = AtomWriter::new(sink, WriterConfig::default());
    writer.write_feed(feed)?;
    Ok(writer.into_inner())
}

pub fn write_entry<W: Write>(entry: &Entry, sink: W) -> SchemaResult<W> {
    let mut writer = AtomWriter::new(sink, WriterConfig::default());
    writer.write_entry(entry)?;
    Ok(writer.into_inner())
}

pub fn write_feed_to_string(feed: &Feed) -> SchemaResult<String> {
    into_string(write_feed(feed, Vec::new())?)
}

pub fn write_entry_to_string(entry: &Entry) -> SchemaResult<String> {
    into_string(write_entry(entry, Vec::new())?)
}

fn into_string(buf: Vec<u8>) -> SchemaResult<String> {
    String::from_utf8(buf).map_err(|e| SchemaError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}


#[cfg(test)]
mod test {
    use super::{write_entry_to_string, write_feed_to_string, AtomWriter};

    use chrono::{FixedOffset, TimeZone};

    use crate::config::WriterConfig;
    use crate::feed::{Attribute, DateConstruct, ElementKind, EntryBuilder, Extension,
                      FeedBuilder, Person, TextConstruct, UriElement};
    use crate::parser::{read_entry_str, read_feed_str};
    use crate::schema::SchemaError;
    use crate::sort::{EntryOrder, SortDirection, SortField};

    fn date(y: i32, m: u32, d: u32) -> DateConstruct {
        let tz = unwrap!(FixedOffset::east_opt(0).ok_or(()));
        let timestamp = unwrap!(tz.with_ymd_and_hms(y, m, d, 0, 0, 0).single().ok_or(()));
        unwrap!(DateConstruct::from_timestamp(ElementKind::Updated, timestamp))
    }

    fn entry(id: &str, title: &str, updated: DateConstruct) -> crate::feed::Entry {
        let mut builder = EntryBuilder::new();
        builder.id = Some(unwrap!(UriElement::id(id)));
        builder.title = Some(unwrap!(TextConstruct::plain(ElementKind::Title, title)));
        builder.updated = Some(updated);
        unwrap!(builder.build())
    }

    fn feed_builder() -> FeedBuilder {
        let mut builder = FeedBuilder::new();
        builder.id = Some(unwrap!(UriElement::id("urn:feed")));
        builder.title = Some(unwrap!(TextConstruct::plain(ElementKind::Title, "Feed & co")));
        builder.updated = Some(date(2013, 1, 1));
        builder.authors.push(unwrap!(Person::author("Hong Minhee")));
        builder
    }

    #[test]
    fn test_written_feed_reads_back() {
        let mut builder = feed_builder();
        builder.entries.push(entry("urn:1", "first", date(2013, 1, 2)));
        builder.entries.push(entry("urn:2", "<second>", date(2013, 1, 3)));
        let feed = unwrap!(builder.build());
        let xml = unwrap!(write_feed_to_string(&feed));
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#));
        assert!(xml.contains("<title>Feed &amp; co</title>"));
        assert!(xml.contains("<title>&lt;second></title>") ||
                xml.contains("<title>&lt;second&gt;</title>"));
        let again = unwrap!(read_feed_str(&xml));
        assert_eq!(again.id(), feed.id());
        assert_eq!(again.title(), feed.title());
        assert_eq!(again.authors(), feed.authors());
        assert_eq!(again.entries().len(), 2);
        assert_eq!(again.entry("urn:2").map(|e| e.updated().text()),
                   Some("2013-01-03T00:00:00.00+00:00"));
    }

    #[test]
    fn test_text_construct_kinds() {
        let mut builder = EntryBuilder::new();
        builder.id = Some(unwrap!(UriElement::id("urn:x")));
        builder.title = Some(unwrap!(TextConstruct::xhtml(ElementKind::Title,
                                                          "One <b>bold</b> foot forward")));
        builder.updated = Some(date(2009, 10, 15));
        builder.authors.push(unwrap!(Person::author("a")));
        builder.summary = Some(unwrap!(TextConstruct::html(ElementKind::Summary,
                                                           "<p>Fish & chips</p>")));
        builder.content = Some(unwrap!(TextConstruct::external("http://example.org/a.mp3",
                                                               Some("audio/mpeg"))));
        let entry = unwrap!(builder.build());
        let xml = unwrap!(write_entry_to_string(&entry));
        assert!(xml.contains(concat!(
            r#"<title type="xhtml"><div xmlns="http://www.w3.org/1999/xhtml">"#,
            "One <b>bold</b> foot forward</div></title>")));
        assert!(xml.contains("&lt;p>Fish &amp; chips&lt;/p>") ||
                xml.contains("&lt;p&gt;Fish &amp; chips&lt;/p&gt;"));
        assert!(xml.contains(r#"src="http://example.org/a.mp3""#));
        let again = unwrap!(read_entry_str(&xml));
        assert_eq!(again.title().text(), Some("One <b>bold</b> foot forward"));
        assert_eq!(again.summary().map(|s| s.value()), Some("<p>Fish & chips</p>".to_owned()));
        assert_eq!(again.content(), entry.content());
    }

    #[test]
    fn test_sort_directive_orders_entries() {
        let mut builder = feed_builder();
        builder.entries.push(entry("urn:b", "b", date(2013, 1, 2)));
        builder.entries.push(entry("urn:a", "a", date(2013, 1, 3)));
        let feed = unwrap!(builder.build());
        let sorted = unwrap!(feed.sorted_by(EntryOrder::new(SortField::Title,
                                                            SortDirection::Ascending)));
        let xml = unwrap!(write_feed_to_string(&sorted));
        assert!(xml.contains(r#"xmlns:sort="http://purl.org/rust-atom/sort/1.0""#));
        assert!(xml.contains(r#"<sort:asc type="title"/>"#));
        let a = unwrap!(xml.find("urn:a").ok_or(()));
        let b = unwrap!(xml.find("urn:b").ok_or(()));
        assert!(a < b);
        let again = unwrap!(read_feed_str(&xml));
        assert_eq!(again.entries().order(), sorted.entries().order());
    }

    #[test]
    fn test_extensions_are_written() {
        let mut builder = feed_builder();
        builder.attributes.push(unwrap!(Attribute::new("xmlns:dc",
                                                       "http://purl.org/dc/elements/1.1/")));
        builder.extensions.push(unwrap!(Extension::new(
            "dc:rights", vec![], Some("Some <dc:holder>one</dc:holder>".to_owned()))));
        let feed = unwrap!(builder.build());
        let xml = unwrap!(write_feed_to_string(&feed));
        assert!(xml.contains("<dc:rights>Some <dc:holder>one</dc:holder></dc:rights>"));
        let again = unwrap!(read_feed_str(&xml));
        assert_eq!(again.extensions(), feed.extensions());
    }

    #[test]
    fn test_entry_with_unbound_prefix_is_refused() {
        let mut builder = EntryBuilder::new();
        builder.id = Some(unwrap!(UriElement::id("urn:x")));
        builder.title = Some(unwrap!(TextConstruct::plain(ElementKind::Title, "t")));
        builder.updated = Some(date(2009, 10, 15));
        builder.authors.push(unwrap!(Person::author("a")));
        builder.extensions.push(unwrap!(Extension::new("x:thing", vec![], None)));
        let entry = unwrap!(builder.build());
        assert_violation!(write_entry_to_string(&entry), "( x )");
    }

    #[test]
    fn test_prefixes_inside_markup_are_checked() {
        let title = unwrap!(TextConstruct::new(
            ElementKind::Title, vec![unwrap!(Attribute::new("type", "xhtml"))],
            Some("<h:div>x <h:b>y</h:b></h:div>".to_owned())));
        let mut builder = EntryBuilder::new();
        builder.id = Some(unwrap!(UriElement::id("urn:x")));
        builder.title = Some(title);
        builder.updated = Some(date(2009, 10, 15));
        builder.authors.push(unwrap!(Person::author("a")));
        let entry = unwrap!(builder.build());
        assert_violation!(write_entry_to_string(&entry), "( h )");

        let mut feed = feed_builder();
        feed.entries.push(entry);
        assert_violation!(feed.clone().build(), "( h )");
        feed.attributes.push(unwrap!(Attribute::new("xmlns:h", "http://www.w3.org/1999/xhtml")));
        let feed = unwrap!(feed.build());
        let written = unwrap!(write_feed_to_string(&feed));
        let again = unwrap!(read_feed_str(&written));
        assert_eq!(again.entry("urn:x").map(|e| e.title().text()),
                   Some(Some("x <h:b>y</h:b>")));
    }

    #[test]
    fn test_malformed_markup_is_reported() {
        let mut builder = feed_builder();
        builder.attributes.push(unwrap!(Attribute::new("xmlns:x", "urn:x")));
        builder.extensions.push(unwrap!(Extension::new("x:broken", vec![],
                                                       Some("<b>open".to_owned()))));
        let feed = unwrap!(builder.build());
        assert_err!(write_feed_to_string(&feed), SchemaError::MalformedMarkup(_) => { });
    }

    #[test]
    fn test_writer_config() {
        let feed = unwrap!(feed_builder().build());
        let config = WriterConfig { indent: true, write_document_declaration: false };
        let mut writer = AtomWriter::new(Vec::new(), config);
        unwrap!(writer.write_feed(&feed));
        let xml = unwrap!(String::from_utf8(writer.into_inner()));
        assert!(xml.starts_with("<feed"));
        assert!(xml.contains("\n  <id>urn:feed</id>"));
    }
}
