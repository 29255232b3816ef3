use std::collections::BTreeSet;
use std::fmt;

use super::{Attribute, Extension};
use super::validation::{ElementKind, Prefixed, collect_unbound, validate_attributes};
use crate::schema::{SchemaError, SchemaResult};

/// Person construct defined in RFC 4287 (section 3.2), used for
/// `atom:author` and `atom:contributor`.
///
/// RFC: <https://tools.ietf.org/html/rfc4287#section-3.2>
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Person {
    kind: ElementKind,
    attributes: Vec<Attribute>,
    /// The human-readable name for the person.  It corresponds to
    /// `atom:name` element of [RFC 4287 (section 3.2.1)][rfc-person-1].
    ///
    /// [rfc-person-1]: https://tools.ietf.org/html/rfc4287#section-3.2.1
    name: String,
    /// It corresponds to `atom:uri` element of [RFC 4287 (section 3.2.2)
    /// ][rfc-person-2].
    ///
    /// [rfc-person-2]: https://tools.ietf.org/html/rfc4287#section-3.2.2
    uri: Option<String>,
    /// It corresponds to `atom:email` element of [RFC 4287 (section 3.2.3)
    /// ][rfc-person-3].
    ///
    /// [rfc-person-3]: https://tools.ietf.org/html/rfc4287#section-3.2.3
    email: Option<String>,
    extensions: Vec<Extension>,
}

impl Person {
    pub fn author<S: Into<String>>(name: S) -> SchemaResult<Person> {
        PersonBuilder::new(ElementKind::Author).name(name).build()
    }

    pub fn contributor<S: Into<String>>(name: S) -> SchemaResult<Person> {
        PersonBuilder::new(ElementKind::Contributor).name(name).build()
    }

    pub fn kind(&self) -> ElementKind { self.kind }
    pub fn attributes(&self) -> &[Attribute] { &self.attributes }
    pub fn name(&self) -> &str { &self.name }
    pub fn uri(&self) -> Option<&str> { self.uri.as_deref() }
    pub fn email(&self) -> Option<&str> { self.email.as_deref() }
    pub fn extensions(&self) -> &[Extension] { &self.extensions }

    pub fn to_builder(&self) -> PersonBuilder {
        PersonBuilder {
            kind: self.kind,
            attributes: self.attributes.clone(),
            name: Some(self.name.clone()),
            uri: self.uri.clone(),
            email: self.email.clone(),
            extensions: self.extensions.clone(),
        }
    }
}

impl Prefixed for Person {
    fn unbound_prefixes(&self) -> BTreeSet<String> {
        collect_unbound(&self.attributes, self.extensions.iter().map(Prefixed::unbound_prefixes))
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(r) = self.uri.as_ref().or(self.email.as_ref()) {
            write!(f, " <{}>", r)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct PersonBuilder {
    pub kind: ElementKind,
    pub attributes: Vec<Attribute>,
    pub name: Option<String>,
    pub uri: Option<String>,
    pub email: Option<String>,
    pub extensions: Vec<Extension>,
}

impl Default for PersonBuilder {
    fn default() -> PersonBuilder { PersonBuilder::new(ElementKind::Author) }
}

impl PersonBuilder {
    pub fn new(kind: ElementKind) -> PersonBuilder {
        PersonBuilder {
            kind, attributes: vec![], name: None, uri: None, email: None, extensions: vec![],
        }
    }

    pub fn name<S: Into<String>>(mut self, name: S) -> PersonBuilder {
        self.name = Some(name.into());
        self
    }

    pub fn uri<S: Into<String>>(mut self, uri: S) -> PersonBuilder {
        self.uri = Some(uri.into());
        self
    }

    pub fn email<S: Into<String>>(mut self, email: S) -> PersonBuilder {
        self.email = Some(email.into());
        self
    }

    pub fn build(self) -> SchemaResult<Person> {
        validate_attributes(self.kind, &self.attributes)?;
        let name = match self.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(SchemaError::violation(format!(
                "atom:{} elements MUST contain exactly one atom:name element.", self.kind
            ))),
        };
        Ok(Person {
            kind: self.kind,
            attributes: self.attributes,
            name,
            uri: self.uri,
            email: self.email,
            extensions: self.extensions,
        })
    }
}
