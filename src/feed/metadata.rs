use std::collections::{BTreeSet, HashSet};

use super::{Attribute, Category, DateConstruct, Extension, Id, Link, Person, Rights,
            TextConstruct, Title};
use super::validation::{ElementKind, Prefixed, validate_attributes};
use crate::schema::{SchemaError, SchemaResult};

/// The parts `atom:feed`, `atom:entry` and `atom:source` have in common
/// apart from `id`, `title` and `updated`, whose presence rules differ.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Metadata {
    attributes: Vec<Attribute>,
    authors: Vec<Person>,
    categories: Vec<Category>,
    contributors: Vec<Person>,
    links: Vec<Link>,
    rights: Option<Rights>,
    extensions: Vec<Extension>,
}

impl Metadata {
    pub fn attributes(&self) -> &[Attribute] { &self.attributes }
    pub fn authors(&self) -> &[Person] { &self.authors }
    pub fn categories(&self) -> &[Category] { &self.categories }
    pub fn contributors(&self) -> &[Person] { &self.contributors }
    pub fn links(&self) -> &[Link] { &self.links }
    pub fn rights(&self) -> Option<&Rights> { self.rights.as_ref() }
    pub fn extensions(&self) -> &[Extension] { &self.extensions }

    pub fn find_extension(&self, name: &str) -> Option<&Extension> {
        self.extensions.iter().find(|e| e.name() == name)
    }

    /// Unbound prefixes of the shared parts, before the element's own
    /// declarations are taken into account.
    pub(crate) fn child_prefixes(&self) -> Vec<BTreeSet<String>> {
        let mut sets: Vec<BTreeSet<String>> = vec![];
        sets.extend(self.authors.iter().map(Prefixed::unbound_prefixes));
        sets.extend(self.categories.iter().map(Prefixed::unbound_prefixes));
        sets.extend(self.contributors.iter().map(Prefixed::unbound_prefixes));
        sets.extend(self.links.iter().map(Prefixed::unbound_prefixes));
        sets.extend(self.rights.iter().map(Prefixed::unbound_prefixes));
        sets.extend(self.extensions.iter().map(Prefixed::unbound_prefixes));
        sets
    }
}

/// Mutable counterpart of `Metadata`, also carrying the singletons.
#[derive(Clone, Debug, Default)]
pub struct MetadataBuilder {
    pub attributes: Vec<Attribute>,
    pub authors: Vec<Person>,
    pub categories: Vec<Category>,
    pub contributors: Vec<Person>,
    pub id: Option<Id>,
    pub links: Vec<Link>,
    pub rights: Option<Rights>,
    pub title: Option<Title>,
    pub updated: Option<DateConstruct>,
    pub extensions: Vec<Extension>,
}

/// What `MetadataBuilder::build` hands back: the shared parts and the
/// singletons, still optional.
pub(crate) struct Parts {
    pub metadata: Metadata,
    pub id: Option<Id>,
    pub title: Option<Title>,
    pub updated: Option<DateConstruct>,
}

impl MetadataBuilder {
    pub fn from_metadata(metadata: &Metadata, id: Option<&Id>, title: Option<&Title>,
                         updated: Option<&DateConstruct>) -> MetadataBuilder {
        MetadataBuilder {
            attributes: metadata.attributes.clone(),
            authors: metadata.authors.clone(),
            categories: metadata.categories.clone(),
            contributors: metadata.contributors.clone(),
            id: id.cloned(),
            links: metadata.links.clone(),
            rights: metadata.rights.clone(),
            title: title.cloned(),
            updated: updated.cloned(),
            extensions: metadata.extensions.clone(),
        }
    }

    pub(crate) fn build(self, kind: ElementKind) -> SchemaResult<Parts> {
        validate_attributes(kind, &self.attributes)?;
        check_alternate_links(kind, &self.links)?;
        let authors = self.authors.into_iter()
            .map(|p| person_as(p, ElementKind::Author))
            .collect::<SchemaResult<Vec<_>>>()?;
        let contributors = self.contributors.into_iter()
            .map(|p| person_as(p, ElementKind::Contributor))
            .collect::<SchemaResult<Vec<_>>>()?;
        Ok(Parts {
            metadata: Metadata {
                attributes: self.attributes,
                authors,
                categories: self.categories,
                contributors,
                links: self.links,
                rights: text_as(self.rights, ElementKind::Rights)?,
                extensions: self.extensions,
            },
            id: self.id,
            title: text_as(self.title, ElementKind::Title)?,
            updated: self.updated.map(|d| date_as(d, ElementKind::Updated)),
        })
    }
}

/// Store `value` into an empty slot; a second value for the same
/// single-valued element is an error.
pub fn set_once<T>(slot: &mut Option<T>, value: T, parent: ElementKind, child: ElementKind)
                   -> SchemaResult<()> {
    if slot.is_some() {
        return Err(SchemaError::violation(format!(
            "atom:{} elements MUST NOT contain more than one atom:{} element.", parent, child
        )));
    }
    *slot = Some(value);
    Ok(())
}

pub(crate) fn missing(parent: ElementKind, child: ElementKind) -> SchemaError {
    SchemaError::violation(format!(
        "atom:{} elements MUST contain exactly one atom:{} element.", parent, child
    ))
}

/// A text construct placed under `kind`, re-validated when it was built for
/// another element.
pub(crate) fn text_as(text: Option<TextConstruct>, kind: ElementKind)
                      -> SchemaResult<Option<TextConstruct>> {
    match text {
        Some(text) if text.kind() != kind => text.with_kind(kind).map(Some),
        text => Ok(text),
    }
}

pub(crate) fn date_as(date: DateConstruct, kind: ElementKind) -> DateConstruct {
    if date.kind() == kind { date } else { date.with_kind(kind) }
}

fn person_as(person: Person, kind: ElementKind) -> SchemaResult<Person> {
    if person.kind() == kind {
        return Ok(person);
    }
    let mut builder = person.to_builder();
    builder.kind = kind;
    builder.build()
}

/// RFC 4287 (section 4.1.1): at most one alternate link per `type` and
/// `hreflang` combination.
fn check_alternate_links(kind: ElementKind, links: &[Link]) -> SchemaResult<()> {
    let mut seen = HashSet::new();
    for link in links.iter().filter(|l| l.rel() == "alternate") {
        if !seen.insert((link.mimetype(), link.hreflang())) {
            return Err(SchemaError::violation(format!(
                "atom:{} elements MUST NOT contain more than one atom:link element with a rel \
                 attribute value of \"alternate\" that has the same combination of type and \
                 hreflang attribute values.", kind
            )));
        }
    }
    Ok(())
}


#[cfg(test)]
mod test {
    use super::{MetadataBuilder, set_once};

    use crate::feed::{Attribute, ElementKind, Link, Person, TextConstruct};

    fn link(pairs: &[(&str, &str)]) -> Link {
        unwrap!(Link::new(pairs.iter().map(|&(n, v)| unwrap!(Attribute::new(n, v))).collect()))
    }

    #[test]
    fn test_set_once() {
        let mut slot = None;
        unwrap!(set_once(&mut slot, 1, ElementKind::Entry, ElementKind::Id));
        assert_violation!(set_once(&mut slot, 2, ElementKind::Entry, ElementKind::Id),
                          "atom:entry elements MUST NOT contain more than one atom:id element.");
        assert_eq!(slot, Some(1));
    }

    #[test]
    fn test_duplicate_alternate_links() {
        let mut builder = MetadataBuilder::default();
        builder.links.push(link(&[("href", "http://example.org/"), ("type", "text/html")]));
        builder.links.push(link(&[("href", "http://example.org/en"), ("type", "text/html"),
                                  ("hreflang", "en")]));
        builder.links.push(link(&[("href", "http://example.org/self"), ("rel", "self"),
                                  ("type", "text/html")]));
        assert!(builder.clone().build(ElementKind::Feed).is_ok());
        builder.links.push(link(&[("href", "http://example.org/again"), ("type", "text/html")]));
        assert_violation!(builder.build(ElementKind::Feed), "same combination of type");
    }

    #[test]
    fn test_kinds_are_normalized() {
        let mut builder = MetadataBuilder::default();
        builder.authors.push(unwrap!(Person::contributor("Jane")));
        builder.title = Some(unwrap!(TextConstruct::plain(ElementKind::Summary, "t")));
        let parts = unwrap!(builder.build(ElementKind::Entry));
        assert_eq!(parts.metadata.authors()[0].kind(), ElementKind::Author);
        assert_eq!(parts.title.unwrap().kind(), ElementKind::Title);
    }

    #[test]
    fn test_text_as_revalidates() {
        let mut builder = MetadataBuilder::default();
        builder.title = Some(unwrap!(TextConstruct::external("http://example.org/", None)));
        assert_violation!(builder.build(ElementKind::Entry),
                          "Unsupported attribute src in the atom:title element.");
    }
}
