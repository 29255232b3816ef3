//! Attribute whitelists and namespace-prefix binding rules.
use std::collections::BTreeSet;
use std::fmt;

use super::{ATOM_XMLNS, Attribute};
use crate::markup::{tokenize, Token};
use crate::schema::{SchemaError, SchemaResult};

/// The kinds of Atom elements, as far as attribute rules are concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Feed,
    Entry,
    Source,
    Author,
    Contributor,
    Name,
    Uri,
    Email,
    Category,
    Link,
    Generator,
    Id,
    Icon,
    Logo,
    Title,
    Subtitle,
    Summary,
    Rights,
    Content,
    Updated,
    Published,
}

impl ElementKind {
    /// The local name of the element in the Atom namespace.
    pub fn tag(&self) -> &'static str {
        match *self {
            ElementKind::Feed => "feed",
            ElementKind::Entry => "entry",
            ElementKind::Source => "source",
            ElementKind::Author => "author",
            ElementKind::Contributor => "contributor",
            ElementKind::Name => "name",
            ElementKind::Uri => "uri",
            ElementKind::Email => "email",
            ElementKind::Category => "category",
            ElementKind::Link => "link",
            ElementKind::Generator => "generator",
            ElementKind::Id => "id",
            ElementKind::Icon => "icon",
            ElementKind::Logo => "logo",
            ElementKind::Title => "title",
            ElementKind::Subtitle => "subtitle",
            ElementKind::Summary => "summary",
            ElementKind::Rights => "rights",
            ElementKind::Content => "content",
            ElementKind::Updated => "updated",
            ElementKind::Published => "published",
        }
    }

    /// Attributes allowed on top of the common ones.
    fn extra_attributes(&self) -> &'static [&'static str] {
        match *self {
            ElementKind::Category => &["term", "scheme", "label"],
            ElementKind::Link => &["href", "rel", "type", "hreflang", "title", "length"],
            ElementKind::Generator => &["uri", "version"],
            ElementKind::Title | ElementKind::Subtitle |
            ElementKind::Summary | ElementKind::Rights => &["type"],
            ElementKind::Content => &["type", "src"],
            _ => &[],
        }
    }

    pub fn is_text_construct(&self) -> bool {
        matches!(*self, ElementKind::Title | ElementKind::Subtitle |
                        ElementKind::Summary | ElementKind::Rights |
                        ElementKind::Content)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// `atomCommonAttributes`: `xml:base`, `xml:lang`, any namespaced attribute
/// and a default namespace declaration for Atom itself.
pub fn is_common_attribute(attr: &Attribute) -> bool {
    let name = attr.name();
    name == "xml:base" || name == "xml:lang" || name.contains(':') ||
        (name == "xmlns" && attr.value() == ATOM_XMLNS)
}

pub fn is_allowed(kind: ElementKind, attr: &Attribute) -> bool {
    is_common_attribute(attr) || kind.extra_attributes().contains(&attr.name())
}

/// Fail on the first attribute not allowed on `kind`.
pub fn validate_attributes(kind: ElementKind, attributes: &[Attribute]) -> SchemaResult<()> {
    match attributes.iter().find(|attr| !is_allowed(kind, attr)) {
        Some(attr) => Err(SchemaError::violation(format!(
            "Unsupported attribute {} in the atom:{} element.", attr.name(), kind
        ))),
        None => Ok(()),
    }
}

/// Fail unless an attribute named `key` is present and non-empty.
pub fn require_attribute<'a>(kind: ElementKind, attributes: &'a [Attribute], key: &str)
                             -> SchemaResult<&'a str> {
    match super::find_attr(attributes, key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(SchemaError::violation(format!(
            "atom:{} elements MUST have a \"{}\" attribute.", kind, key
        ))),
    }
}

/// Prefixes declared by `xmlns:p` attributes of the set.
pub fn declared_prefixes(attributes: &[Attribute]) -> BTreeSet<String> {
    attributes.iter()
        .filter_map(Attribute::declared_prefix)
        .filter(|prefix| !prefix.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Prefixes used by the attributes of the set that the same set does not
/// declare.  `xml` is always bound.
pub fn unbound_prefixes(attributes: &[Attribute]) -> BTreeSet<String> {
    let declared = declared_prefixes(attributes);
    attributes.iter()
        .filter(|attr| attr.declared_prefix().is_none())
        .filter_map(Attribute::prefix)
        .filter(|&prefix| prefix != "xml" && !declared.contains(prefix))
        .map(str::to_owned)
        .collect()
}

/// Removes from `unbound` the prefixes an enclosing element declares.
pub fn resolve_prefixes(mut unbound: BTreeSet<String>, ancestor: &[Attribute]) -> BTreeSet<String> {
    for prefix in declared_prefixes(ancestor) {
        unbound.remove(&prefix);
    }
    unbound
}

/// Unbound prefixes of an element given its own attributes and the sets
/// reported by its children.
pub fn collect_unbound<I>(attributes: &[Attribute], children: I) -> BTreeSet<String>
    where I: IntoIterator<Item = BTreeSet<String>>
{
    let mut unbound = unbound_prefixes(attributes);
    for child in children {
        unbound.extend(child);
    }
    resolve_prefixes(unbound, attributes)
}

/// Prefixes used by the tags of a stored markup string and not declared by
/// an enclosing tag inside it.  Scanning stops at the first token that does
/// not parse; the writer reports such markup when it gets to it.
pub fn markup_prefixes(markup: &str) -> BTreeSet<String> {
    let mut scopes: Vec<Vec<&str>> = vec![];
    let mut unbound = BTreeSet::new();
    for token in tokenize(markup) {
        match token {
            Ok(Token::Start(tag)) => {
                let declared: Vec<&str> = tag.declared_prefixes().collect();
                for prefix in tag.used_prefixes() {
                    let bound = declared.contains(&prefix) ||
                        scopes.iter().any(|scope| scope.contains(&prefix));
                    if !bound {
                        unbound.insert(prefix.to_owned());
                    }
                }
                if !tag.empty {
                    scopes.push(declared);
                }
            }
            Ok(Token::End(_)) => { scopes.pop(); }
            Ok(_) => { }
            Err(_) => break,
        }
    }
    unbound
}

/// Something whose prefixes must be bound by itself or its ancestors.
pub trait Prefixed {
    /// Prefixes used in this subtree and not declared inside it.
    fn unbound_prefixes(&self) -> BTreeSet<String>;
}

pub fn check_root_prefixes<T: Prefixed>(kind: ElementKind, root: &T) -> SchemaResult<()> {
    let unbound = root.unbound_prefixes();
    if unbound.is_empty() {
        return Ok(());
    }
    let names: Vec<&str> = unbound.iter().map(String::as_str).collect();
    Err(SchemaError::violation(format!(
        "the following extension prefix(es) ( {} ) are not bound to a namespace \
         declaration in atom:{} or its descendants.",
        names.join(" "), kind
    )))
}
