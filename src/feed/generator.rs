use std::collections::BTreeSet;
use std::fmt;

use super::{Attribute, find_attr};
use super::validation::{ElementKind, Prefixed, unbound_prefixes, validate_attributes};
use crate::schema::SchemaResult;

/// Identify the agent used to generate a feed, for debugging and other
/// purposes.  It corresponds to `atom:generator` element of
/// [RFC 4287 (section 4.2.4)][rfc-generator].
///
/// [rfc-generator]: https://tools.ietf.org/html/rfc4287#section-4.2.4
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Generator {
    attributes: Vec<Attribute>,
    value: String,
}

impl Generator {
    pub fn new<S: Into<String>>(attributes: Vec<Attribute>, value: S) -> SchemaResult<Generator> {
        validate_attributes(ElementKind::Generator, &attributes)?;
        Ok(Generator { attributes, value: value.into() })
    }

    pub fn attributes(&self) -> &[Attribute] { &self.attributes }

    /// The human-readable name of the generator.
    pub fn value(&self) -> &str { &self.value }

    /// A URI that represents something relevant to the agent.
    pub fn uri(&self) -> Option<&str> { find_attr(&self.attributes, "uri") }

    /// The version of the generating agent.
    pub fn version(&self) -> Option<&str> { find_attr(&self.attributes, "version") }
}

impl Prefixed for Generator {
    fn unbound_prefixes(&self) -> BTreeSet<String> {
        unbound_prefixes(&self.attributes)
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if let Some(version) = self.version() {
            write!(f, " {}", version)?;
        }
        Ok(())
    }
}
