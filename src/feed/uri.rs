use std::collections::BTreeSet;
use std::fmt;

use super::Attribute;
use super::validation::{ElementKind, Prefixed, unbound_prefixes, validate_attributes};
use crate::schema::{SchemaError, SchemaResult};

/// An element whose content is a single IRI: `atom:id` (RFC 4287 section
/// 4.2.6), `atom:icon` (4.2.5) and `atom:logo` (4.2.8).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UriElement {
    kind: ElementKind,
    attributes: Vec<Attribute>,
    value: String,
}

pub type Id = UriElement;
pub type Icon = UriElement;
pub type Logo = UriElement;

impl UriElement {
    pub fn new<S: AsRef<str>>(kind: ElementKind, attributes: Vec<Attribute>, value: S)
                              -> SchemaResult<UriElement> {
        validate_attributes(kind, &attributes)?;
        let value = value.as_ref().trim();
        if value.is_empty() {
            return Err(SchemaError::violation(format!(
                "atom:{} elements MUST NOT be empty.", kind
            )));
        }
        Ok(UriElement { kind, attributes, value: value.to_owned() })
    }

    pub fn id<S: AsRef<str>>(value: S) -> SchemaResult<UriElement> {
        UriElement::new(ElementKind::Id, vec![], value)
    }

    pub fn kind(&self) -> ElementKind { self.kind }

    pub fn attributes(&self) -> &[Attribute] { &self.attributes }

    pub fn value(&self) -> &str { &self.value }
}

impl Prefixed for UriElement {
    fn unbound_prefixes(&self) -> BTreeSet<String> {
        unbound_prefixes(&self.attributes)
    }
}

impl fmt::Display for UriElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.value)
    }
}
