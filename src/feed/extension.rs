use std::collections::BTreeSet;

use super::Attribute;
use super::validation::{Prefixed, collect_unbound, markup_prefixes};
use crate::schema::{SchemaError, SchemaResult};

/// An element from a namespace other than Atom's, kept with its markup.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Extension {
    name: String,
    attributes: Vec<Attribute>,
    content: Option<String>,
}

impl Extension {
    /// `name` must be qualified, e.g. `sort:desc`.  `content` is the inner
    /// markup, `None` for an empty element.
    pub fn new<S: Into<String>>(name: S, attributes: Vec<Attribute>, content: Option<String>)
                                -> SchemaResult<Extension> {
        let name = name.into();
        match name.split_once(':') {
            Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() => { }
            _ => return Err(SchemaError::violation(format!(
                "extension element '{}' is missing a namespace prefix.", name
            ))),
        }
        Ok(Extension { name, attributes, content })
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn prefix(&self) -> &str {
        self.name.split_once(':').map_or("", |(prefix, _)| prefix)
    }

    pub fn local_name(&self) -> &str {
        self.name.split_once(':').map_or(&self.name[..], |(_, local)| local)
    }

    pub fn attributes(&self) -> &[Attribute] { &self.attributes }

    pub fn content(&self) -> Option<&str> { self.content.as_deref() }
}

impl Prefixed for Extension {
    fn unbound_prefixes(&self) -> BTreeSet<String> {
        let own = BTreeSet::from([self.prefix().to_owned()]);
        let content = self.content.as_deref().map(markup_prefixes);
        let mut unbound = collect_unbound(&self.attributes, Some(own).into_iter().chain(content));
        unbound.remove("xml");
        unbound
    }
}
