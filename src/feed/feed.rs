use std::collections::BTreeSet;

use super::{DateConstruct, Entries, Entry, Generator, Icon, Id, Logo, Metadata, MetadataBuilder,
            Subtitle, Title};
use super::metadata::{missing, text_as};
use super::validation::{ElementKind, Prefixed, check_root_prefixes, collect_unbound};
use crate::schema::{DocumentElement, SchemaError, SchemaResult};
use crate::sort::{self, EntryOrder};

/// Atom feed document, acting as a container for metadata and data
/// associated with the feed.
///
/// It corresponds to `atom:feed` element of [RFC 4287 (section 4.1.1)
/// ][rfc-feed].
///
/// [rfc-feed]: https://tools.ietf.org/html/rfc4287#section-4.1.1
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Feed {
    metadata: Metadata,
    id: Id,
    title: Title,
    updated: DateConstruct,
    generator: Option<Generator>,
    icon: Option<Icon>,
    logo: Option<Logo>,
    subtitle: Option<Subtitle>,
    entries: Entries,
}

impl_metadata!(Feed, FeedBuilder);

impl DocumentElement for Feed {
    fn tag() -> &'static str { "feed" }
    fn xmlns() -> Option<&'static str> { Some(super::ATOM_XMLNS) }
}

impl Feed {
    pub fn id(&self) -> &Id { &self.id }

    pub fn title(&self) -> &Title { &self.title }

    pub fn updated(&self) -> &DateConstruct { &self.updated }

    pub fn generator(&self) -> Option<&Generator> { self.generator.as_ref() }

    pub fn icon(&self) -> Option<&Icon> { self.icon.as_ref() }

    pub fn logo(&self) -> Option<&Logo> { self.logo.as_ref() }

    pub fn subtitle(&self) -> Option<&Subtitle> { self.subtitle.as_ref() }

    /// The entries, ordered as the feed's sort directive says.
    pub fn entries(&self) -> &Entries { &self.entries }

    pub fn entry(&self, id: &str) -> Option<&Entry> { self.entries.get(id) }

    /// A copy of the feed carrying a sort directive for `order` (and the
    /// namespace declaration it needs) exactly once, with its entries
    /// reordered accordingly.
    pub fn sorted_by(&self, order: EntryOrder) -> SchemaResult<Feed> {
        let mut builder = self.to_builder();
        sort::apply_directive(&mut builder.metadata, order)?;
        builder.build()
    }

    pub fn to_builder(&self) -> FeedBuilder {
        FeedBuilder {
            metadata: MetadataBuilder::from_metadata(
                &self.metadata, Some(&self.id), Some(&self.title), Some(&self.updated)),
            generator: self.generator.clone(),
            icon: self.icon.clone(),
            logo: self.logo.clone(),
            subtitle: self.subtitle.clone(),
            entries: self.entries.as_slice().to_vec(),
        }
    }
}

impl Prefixed for Feed {
    fn unbound_prefixes(&self) -> BTreeSet<String> {
        let mut children = self.metadata.child_prefixes();
        children.push(self.id.unbound_prefixes());
        children.push(self.title.unbound_prefixes());
        children.push(self.updated.unbound_prefixes());
        children.extend(self.generator.iter().map(Prefixed::unbound_prefixes));
        children.extend(self.icon.iter().map(Prefixed::unbound_prefixes));
        children.extend(self.logo.iter().map(Prefixed::unbound_prefixes));
        children.extend(self.subtitle.iter().map(Prefixed::unbound_prefixes));
        children.extend(self.entries.iter().map(Prefixed::unbound_prefixes));
        collect_unbound(self.attributes(), children)
    }
}

#[derive(Clone, Debug, Default)]
pub struct FeedBuilder {
    pub metadata: MetadataBuilder,
    pub generator: Option<Generator>,
    pub icon: Option<Icon>,
    pub logo: Option<Logo>,
    pub subtitle: Option<Subtitle>,
    pub entries: Vec<Entry>,
}

impl FeedBuilder {
    pub fn new() -> FeedBuilder { Default::default() }

    pub fn build(self) -> SchemaResult<Feed> {
        let kind = ElementKind::Feed;
        let parts = self.metadata.build(kind)?;
        let id = parts.id.ok_or_else(|| missing(kind, ElementKind::Id))?;
        let title = parts.title.ok_or_else(|| missing(kind, ElementKind::Title))?;
        let updated = parts.updated.ok_or_else(|| missing(kind, ElementKind::Updated))?;
        if parts.metadata.authors().is_empty() && !self.entries.iter().all(Entry::has_author) {
            return Err(SchemaError::violation(
                "atom:feed elements MUST contain one or more atom:author elements, unless all \
                 of the atom:feed element's child atom:entry elements contain at least one \
                 atom:author element."
            ));
        }
        let order = sort::resolve(parts.metadata.attributes(), parts.metadata.extensions());
        let feed = Feed {
            metadata: parts.metadata,
            id,
            title,
            updated,
            generator: self.generator,
            icon: self.icon,
            logo: self.logo,
            subtitle: text_as(self.subtitle, ElementKind::Subtitle)?,
            entries: Entries::new(self.entries, order),
        };
        check_root_prefixes(kind, &feed)?;
        Ok(feed)
    }
}
