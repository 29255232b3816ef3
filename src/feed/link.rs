use std::collections::BTreeSet;
use std::fmt;
use std::iter::Filter;

use regex::Regex;
use url::Url;

use super::{Attribute, find_attr};
use super::validation::{ElementKind, Prefixed, require_attribute, unbound_prefixes,
                        validate_attributes};
use crate::mimetype::MimeType;
use crate::schema::SchemaResult;

/// Link element defined in RFC 4287 (section 4.2.7).
///
/// RFC: <https://tools.ietf.org/html/rfc4287#section-4.2.7>.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Link {
    attributes: Vec<Attribute>,
}

impl Link {
    pub fn new(attributes: Vec<Attribute>) -> SchemaResult<Link> {
        validate_attributes(ElementKind::Link, &attributes)?;
        require_attribute(ElementKind::Link, &attributes, "href")?;
        Ok(Link { attributes })
    }

    pub fn with_href<S: Into<String>>(href: S) -> SchemaResult<Link> {
        Link::new(vec![Attribute::new("href", href)?])
    }

    pub fn attributes(&self) -> &[Attribute] { &self.attributes }

    /// The link's required URI.  It corresponds to `href` attribute of
    /// [RFC 4287 (section 4.2.7.1)][rfc-link-1].
    ///
    /// [rfc-link-1]: https://tools.ietf.org/html/rfc4287#section-4.2.7.1
    pub fn href(&self) -> &str {
        find_attr(&self.attributes, "href").unwrap_or_default()
    }

    /// The relation type of the link.  It corresponds to `rel` attribute
    /// of [RFC 4287 (section 4.2.7.2)][rfc-link-2], `alternate` when absent.
    ///
    /// ### See also
    ///
    /// * [Existing rel values][rel-values] --- Microformats Wiki
    ///
    /// [rfc-link-2]: https://tools.ietf.org/html/rfc4287#section-4.2.7.2
    /// [rel-values]: http://microformats.org/wiki/existing-rel-values
    pub fn rel(&self) -> &str {
        find_attr(&self.attributes, "rel").unwrap_or("alternate")
    }

    /// The optional hint for the MIME media type of the linked content.
    /// It corresponds to `type` attribute of
    /// [RFC 4287 (section 4.2.7.3)][rfc-link-3].
    ///
    /// [rfc-link-3]: https://tools.ietf.org/html/rfc4287#section-4.2.7.3
    pub fn mimetype(&self) -> Option<&str> { find_attr(&self.attributes, "type") }

    /// The language of the linked content (`hreflang`).
    pub fn hreflang(&self) -> Option<&str> { find_attr(&self.attributes, "hreflang") }

    pub fn title(&self) -> Option<&str> { find_attr(&self.attributes, "title") }

    /// The optional hint for the length of the linked content in octets.
    /// It corresponds to `length` attribute of [RFC 4287 (section 4.2.7.6)
    /// ][rfc-link-6].
    ///
    /// [rfc-link-6]: https://tools.ietf.org/html/rfc4287#section-4.2.7.6
    pub fn length(&self) -> Option<u64> {
        find_attr(&self.attributes, "length").and_then(|v| v.trim().parse().ok())
    }

    /// Whether its `mimetype` is HTML (or XHTML).
    pub fn is_html(&self) -> bool {
        self.mimetype().and_then(MimeType::from_str).map_or(false, |m| m.is_html())
    }

    /// The absolute URL of the link.  `href` is resolved against the link's
    /// own `xml:base` if it has one, otherwise against `base`.
    pub fn resolve(&self, base: Option<&str>) -> Result<Url, url::ParseError> {
        match find_attr(&self.attributes, "xml:base").or(base) {
            Some(base) => Url::parse(base)?.join(self.href()),
            None => Url::parse(self.href()),
        }
    }
}

impl Prefixed for Link {
    fn unbound_prefixes(&self) -> BTreeSet<String> {
        unbound_prefixes(&self.attributes)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.href())
    }
}


pub enum Predicate<'a> {
    #[doc(hidden)] Simple(&'a str),
    #[doc(hidden)] Regex(Regex),
}

impl<'a> Predicate<'a> {
    fn new(pattern: &'a str) -> Predicate<'a> {
        if !pattern.contains('*') {
            return Predicate::Simple(pattern);
        }
        let parts: Vec<String> = pattern.split('*').map(regex::escape).collect();
        match Regex::new(&format!("^{}$", parts.join(".+?"))) {
            Ok(regex) => Predicate::Regex(regex),
            Err(_) => Predicate::Simple(pattern),
        }
    }

    fn matches(&self, link: &Link) -> bool {
        match (link.mimetype(), self) {
            (None, _) => false,
            (Some(t), Predicate::Simple(pattern)) => t == *pattern,
            (Some(t), Predicate::Regex(pattern)) => pattern.is_match(t),
        }
    }
}

pub trait LinkIteratorExt<'a>: Iterator<Item = &'a Link> + Sized {
    /// Filter links by their `mimetype` e.g.:
    ///
    /// ```
    /// # use atom::feed::{Link, LinkIteratorExt};
    /// # let links: Vec<Link> = Vec::new();
    /// links.iter().filter_by_mimetype("text/html")
    /// # ;
    /// ```
    ///
    /// `pattern` can include wildcards (`*`) as well e.g.:
    ///
    /// ```
    /// # use atom::feed::{Link, LinkIteratorExt};
    /// # let links: Vec<Link> = Vec::new();
    /// links.iter().filter_by_mimetype("application/xml+*")
    /// # ;
    /// ```
    #[allow(clippy::type_complexity)]
    fn filter_by_mimetype(self, pattern: &str)
                          -> Filter<Self, Box<dyn FnMut(&&'a Link) -> bool + '_>> {
        let predicate = Predicate::new(pattern);
        self.filter(Box::new(move |link: &&'a Link| predicate.matches(link)))
    }

    /// The most likely permanent link: HTML alternates first, then other
    /// HTML links, then other alternates.
    fn permalink(self) -> Option<&'a Link> {
        self.filter_map(|link| {
            let rel_is_alternate = link.rel() == "alternate";
            if link.is_html() || rel_is_alternate {
                Some((link, (link.is_html(), rel_is_alternate)))
            } else {
                None
            }
        }).fold(None, |best: Option<(&'a Link, (bool, bool))>, pair| match best {
            Some(best) if best.1 >= pair.1 => Some(best),
            _ => Some(pair),
        }).map(|pair| pair.0)
    }

    fn favicon(mut self) -> Option<&'a Link> {
        self.find(|link| link.rel().split(' ').any(|i| i == "icon"))
    }
}

impl<'a, I: Iterator<Item = &'a Link>> LinkIteratorExt<'a> for I { }
