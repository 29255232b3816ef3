use std::collections::BTreeSet;
use std::fmt;

use super::{Attribute, find_attr};
use super::validation::{ElementKind, Prefixed, require_attribute, unbound_prefixes,
                        validate_attributes};
use crate::schema::SchemaResult;

/// Category element defined in RFC 4287 (section 4.2.2).
///
/// RFC: <https://tools.ietf.org/html/rfc4287#section-4.2.2>
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Category {
    attributes: Vec<Attribute>,
}

impl Category {
    pub fn new(attributes: Vec<Attribute>) -> SchemaResult<Category> {
        validate_attributes(ElementKind::Category, &attributes)?;
        require_attribute(ElementKind::Category, &attributes, "term")?;
        Ok(Category { attributes })
    }

    pub fn with_term<S: Into<String>>(term: S) -> SchemaResult<Category> {
        Category::new(vec![Attribute::new("term", term)?])
    }

    pub fn attributes(&self) -> &[Attribute] { &self.attributes }

    /// The required term that identifies the category.
    pub fn term(&self) -> &str {
        find_attr(&self.attributes, "term").unwrap_or_default()
    }

    /// The IRI that identifies a categorization scheme.
    pub fn scheme(&self) -> Option<&str> { find_attr(&self.attributes, "scheme") }

    /// The human-readable label for display.
    pub fn label(&self) -> Option<&str> { find_attr(&self.attributes, "label") }
}

impl Prefixed for Category {
    fn unbound_prefixes(&self) -> BTreeSet<String> {
        unbound_prefixes(&self.attributes)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label().unwrap_or(self.term()))
    }
}
