use std::collections::BTreeSet;

use super::{Content, DateConstruct, Id, Metadata, MetadataBuilder, Source, Summary, Title};
use super::metadata::{date_as, missing, text_as};
use super::validation::{ElementKind, Prefixed, collect_unbound};
use crate::schema::{DocumentElement, SchemaError, SchemaResult};

/// Represent an individual entry, acting as a container for metadata and
/// data associated with the entry.  It corresponds to `atom:entry` element
/// of [RFC 4287 (section 4.1.2)][entry-element].
///
/// [entry-element]: https://tools.ietf.org/html/rfc4287#section-4.1.2
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Entry {
    metadata: Metadata,
    id: Id,
    title: Title,
    updated: DateConstruct,
    published: Option<DateConstruct>,
    summary: Option<Summary>,
    content: Option<Content>,
    source: Option<Source>,
}

impl_metadata!(Entry, EntryBuilder);

impl DocumentElement for Entry {
    fn tag() -> &'static str { "entry" }
    fn xmlns() -> Option<&'static str> { Some(super::ATOM_XMLNS) }
}

impl Entry {
    pub fn id(&self) -> &Id { &self.id }

    pub fn title(&self) -> &Title { &self.title }

    pub fn updated(&self) -> &DateConstruct { &self.updated }

    /// The time associated with an event early in the life cycle of the
    /// entry.  It corresponds to `atom:published` element of
    /// [RFC 4287 (section 4.2.9)][rfc-published].
    ///
    /// [rfc-published]: https://tools.ietf.org/html/rfc4287#section-4.2.9
    pub fn published(&self) -> Option<&DateConstruct> { self.published.as_ref() }

    pub fn summary(&self) -> Option<&Summary> { self.summary.as_ref() }

    pub fn content(&self) -> Option<&Content> { self.content.as_ref() }

    /// The metadata of the feed the entry was copied from.  It corresponds
    /// to `atom:source` element of [RFC 4287 (section 4.2.10)][rfc-source].
    ///
    /// [rfc-source]: https://tools.ietf.org/html/rfc4287#section-4.2.10
    pub fn source(&self) -> Option<&Source> { self.source.as_ref() }

    /// Whether the entry names an author itself or through its source.
    pub fn has_author(&self) -> bool {
        !self.authors().is_empty() ||
            self.source.as_ref().map_or(false, |s| !s.authors().is_empty())
    }

    pub fn to_builder(&self) -> EntryBuilder {
        EntryBuilder {
            metadata: MetadataBuilder::from_metadata(
                &self.metadata, Some(&self.id), Some(&self.title), Some(&self.updated)),
            published: self.published.clone(),
            summary: self.summary.clone(),
            content: self.content.clone(),
            source: self.source.clone(),
        }
    }
}

impl Prefixed for Entry {
    fn unbound_prefixes(&self) -> BTreeSet<String> {
        let mut children = self.metadata.child_prefixes();
        children.push(self.id.unbound_prefixes());
        children.push(self.title.unbound_prefixes());
        children.push(self.updated.unbound_prefixes());
        children.extend(self.published.iter().map(Prefixed::unbound_prefixes));
        children.extend(self.summary.iter().map(Prefixed::unbound_prefixes));
        children.extend(self.content.iter().map(Prefixed::unbound_prefixes));
        children.extend(self.source.iter().map(Prefixed::unbound_prefixes));
        collect_unbound(self.attributes(), children)
    }
}

#[derive(Clone, Debug, Default)]
pub struct EntryBuilder {
    pub metadata: MetadataBuilder,
    pub published: Option<DateConstruct>,
    pub summary: Option<Summary>,
    pub content: Option<Content>,
    pub source: Option<Source>,
}

impl EntryBuilder {
    pub fn new() -> EntryBuilder { Default::default() }

    pub fn build(self) -> SchemaResult<Entry> {
        let kind = ElementKind::Entry;
        let parts = self.metadata.build(kind)?;
        let id = parts.id.ok_or_else(|| missing(kind, ElementKind::Id))?;
        let title = parts.title.ok_or_else(|| missing(kind, ElementKind::Title))?;
        let updated = parts.updated.ok_or_else(|| missing(kind, ElementKind::Updated))?;
        let content = text_as(self.content, ElementKind::Content)?;
        let summary = text_as(self.summary, ElementKind::Summary)?;
        if summary.is_none() && content.as_ref().map_or(false, |c| c.requires_summary()) {
            return Err(SchemaError::violation(
                "atom:entry elements MUST contain an atom:summary element if the atom:entry \
                 contains an atom:content that has a \"src\" attribute (and is thus empty) or \
                 a \"type\" attribute that is neither a textual nor an XML media type."
            ));
        }
        Ok(Entry {
            metadata: parts.metadata,
            id,
            title,
            updated,
            published: self.published.map(|d| date_as(d, ElementKind::Published)),
            summary,
            content,
            source: self.source,
        })
    }
}


#[cfg(test)]
mod test {
    use super::EntryBuilder;

    use crate::feed::{Attribute, DateConstruct, ElementKind, Id, Person, Prefixed, Source,
                      TextConstruct};

    fn fx_builder() -> EntryBuilder {
        let mut builder = EntryBuilder::new();
        builder.id = Some(unwrap!(Id::id("urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a")));
        builder.title = Some(unwrap!(TextConstruct::plain(ElementKind::Title,
                                                          "Atom-Powered Robots Run Amok")));
        builder.updated = Some(unwrap!(DateConstruct::parse(ElementKind::Updated, vec![],
                                                            "2003-12-13T18:30:02Z")));
        builder
    }

    #[test]
    fn test_required_children() {
        let entry = unwrap!(fx_builder().build());
        assert_eq!(entry.id().value(), "urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a");
        assert_eq!(entry.title().text(), Some("Atom-Powered Robots Run Amok"));
        assert_eq!(entry.updated().text(), "2003-12-13T18:30:02.00+00:00");
        let mut no_id = fx_builder();
        no_id.id = None;
        assert_violation!(no_id.build(), "exactly one atom:id");
        let mut no_title = fx_builder();
        no_title.title = None;
        assert_violation!(no_title.build(), "exactly one atom:title");
        let mut no_updated = fx_builder();
        no_updated.updated = None;
        assert_violation!(no_updated.build(), "exactly one atom:updated");
    }

    #[test]
    fn test_summary_required_for_external_content() {
        let mut builder = fx_builder();
        builder.content = Some(unwrap!(TextConstruct::external("http://example.org/a.mp3",
                                                               Some("audio/mpeg"))));
        assert_violation!(builder.clone().build(), "MUST contain an atom:summary");
        builder.summary = Some(unwrap!(TextConstruct::plain(ElementKind::Summary, "a song")));
        unwrap!(builder.build());
    }

    #[test]
    fn test_summary_required_for_binary_content() {
        let mut builder = fx_builder();
        let attrs = vec![unwrap!(Attribute::new("type", "image/png"))];
        builder.content = Some(unwrap!(TextConstruct::new(ElementKind::Content, attrs,
                                                          Some("iVBORw0KGgo=".to_owned()))));
        assert_violation!(builder.build(), "atom:summary");
        let mut xml = fx_builder();
        let attrs = vec![unwrap!(Attribute::new("type", "image/svg+xml"))];
        xml.content = Some(unwrap!(TextConstruct::new(ElementKind::Content, attrs,
                                                      Some("<svg/>".to_owned()))));
        unwrap!(xml.build());
    }

    #[test]
    fn test_has_author() {
        let entry = unwrap!(fx_builder().build());
        assert!(!entry.has_author());
        let mut builder = entry.to_builder();
        let mut source = Source::builder();
        source.authors.push(unwrap!(Person::author("John Doe")));
        builder.source = Some(unwrap!(source.build()));
        assert!(unwrap!(builder.build()).has_author());
        let mut builder = entry.to_builder();
        builder.authors.push(unwrap!(Person::author("Jane Doe")));
        let entry = unwrap!(builder.build());
        assert!(entry.has_author());
        assert_eq!(unwrap!(entry.to_builder().build()), entry);
    }

    #[test]
    fn test_unbound_prefixes() {
        let mut builder = fx_builder();
        builder.attributes.push(unwrap!(Attribute::new("dc:x", "1")));
        let entry = unwrap!(builder.build());
        assert!(entry.unbound_prefixes().contains("dc"));
        let mut builder = entry.to_builder();
        builder.attributes.push(unwrap!(Attribute::new("xmlns:dc",
                                                       "http://purl.org/dc/elements/1.1/")));
        assert!(unwrap!(builder.build()).unbound_prefixes().is_empty());
    }
}
