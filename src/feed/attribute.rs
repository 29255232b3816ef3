use std::fmt;

use crate::schema::{SchemaError, SchemaResult};
use crate::util::escape_attribute;

/// An attribute of an Atom element, namespace declarations included.
///
/// Two attributes are equal when their canonical forms (`name="value"`) are.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Attribute {
    name: String,
    value: String,
}

impl Attribute {
    pub fn new<N, V>(name: N, value: V) -> SchemaResult<Attribute>
        where N: Into<String>, V: Into<String>
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SchemaError::violation("Attribute names SHOULD NOT be null."));
        }
        Ok(Attribute { name, value: value.into() })
    }

    pub(crate) fn from_parts<N, V>(name: N, value: V) -> Attribute
        where N: Into<String>, V: Into<String>
    {
        Attribute { name: name.into(), value: value.into() }
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn value(&self) -> &str { &self.value }

    /// The prefix of a qualified name, e.g. `xml` for `xml:lang`.
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// The prefix declared by an `xmlns:p` attribute, or `""` for `xmlns`.
    pub fn declared_prefix(&self) -> Option<&str> {
        if self.name == "xmlns" {
            Some("")
        } else {
            self.name.strip_prefix("xmlns:")
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}=\"{}\"", self.name, escape_attribute(&self.value))
    }
}

pub fn find_attr<'a>(attributes: &'a [Attribute], key: &str) -> Option<&'a str> {
    attributes.iter().find(|a| a.name == key).map(|a| a.value.as_str())
}
