use std::collections::BTreeSet;

use super::{DateConstruct, Generator, Icon, Id, Logo, Metadata, MetadataBuilder, Subtitle, Title};
use super::metadata::text_as;
use super::validation::{ElementKind, Prefixed, collect_unbound};
use crate::schema::SchemaResult;

/// All metadata for `atom:source` element.  Every child is optional.
///
/// RFC: <https://tools.ietf.org/html/rfc4287#section-4.2.11>
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Source {
    metadata: Metadata,
    id: Option<Id>,
    title: Option<Title>,
    updated: Option<DateConstruct>,
    generator: Option<Generator>,
    icon: Option<Icon>,
    logo: Option<Logo>,
    subtitle: Option<Subtitle>,
}

impl_metadata!(Source, SourceBuilder);

impl Source {
    pub fn builder() -> SourceBuilder { Default::default() }

    pub fn id(&self) -> Option<&Id> { self.id.as_ref() }
    pub fn title(&self) -> Option<&Title> { self.title.as_ref() }
    pub fn updated(&self) -> Option<&DateConstruct> { self.updated.as_ref() }
    pub fn generator(&self) -> Option<&Generator> { self.generator.as_ref() }
    pub fn icon(&self) -> Option<&Icon> { self.icon.as_ref() }
    pub fn logo(&self) -> Option<&Logo> { self.logo.as_ref() }
    pub fn subtitle(&self) -> Option<&Subtitle> { self.subtitle.as_ref() }

    pub fn to_builder(&self) -> SourceBuilder {
        SourceBuilder {
            metadata: MetadataBuilder::from_metadata(
                &self.metadata, self.id.as_ref(), self.title.as_ref(), self.updated.as_ref()),
            generator: self.generator.clone(),
            icon: self.icon.clone(),
            logo: self.logo.clone(),
            subtitle: self.subtitle.clone(),
        }
    }
}

impl Prefixed for Source {
    fn unbound_prefixes(&self) -> BTreeSet<String> {
        let mut children = self.metadata.child_prefixes();
        children.extend(self.id.iter().map(Prefixed::unbound_prefixes));
        children.extend(self.title.iter().map(Prefixed::unbound_prefixes));
        children.extend(self.updated.iter().map(Prefixed::unbound_prefixes));
        children.extend(self.generator.iter().map(Prefixed::unbound_prefixes));
        children.extend(self.icon.iter().map(Prefixed::unbound_prefixes));
        children.extend(self.logo.iter().map(Prefixed::unbound_prefixes));
        children.extend(self.subtitle.iter().map(Prefixed::unbound_prefixes));
        collect_unbound(self.attributes(), children)
    }
}

#[derive(Clone, Debug, Default)]
pub struct SourceBuilder {
    pub metadata: MetadataBuilder,
    pub generator: Option<Generator>,
    pub icon: Option<Icon>,
    pub logo: Option<Logo>,
    pub subtitle: Option<Subtitle>,
}

impl SourceBuilder {
    pub fn build(self) -> SchemaResult<Source> {
        let parts = self.metadata.build(ElementKind::Source)?;
        Ok(Source {
            metadata: parts.metadata,
            id: parts.id,
            title: parts.title,
            updated: parts.updated,
            generator: self.generator,
            icon: self.icon,
            logo: self.logo,
            subtitle: text_as(self.subtitle, ElementKind::Subtitle)?,
        })
    }
}
