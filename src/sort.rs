//! Entry ordering driven by a feed-level extension element.
//!
//! A feed that declares the sort namespace may carry one directive:
//!
//! ```xml
//! <feed xmlns="http://www.w3.org/2005/Atom"
//!       xmlns:sort="http://purl.org/rust-atom/sort/1.0">
//!   <sort:desc type="updated"/>
//!   ...
//! </feed>
//! ```
//!
//! `asc`/`desc` choose the direction and `type` one of `updated`, `title`
//! or `summary`.  Without a directive entries are ordered by `updated`,
//! oldest first.
use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, warn};

use crate::feed::{Attribute, Entry, Extension, MetadataBuilder, find_attr};
use crate::schema::SchemaResult;

/// The XML namespace name of sort directives.
pub const SORT_XMLNS: &str = "http://purl.org/rust-atom/sort/1.0";

const DEFAULT_PREFIX: &str = "sort";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortField {
    #[default]
    Updated,
    Title,
    Summary,
}

impl SortField {
    pub fn from_str(value: &str) -> Option<SortField> {
        match value.trim() {
            "updated" => Some(SortField::Updated),
            "title" => Some(SortField::Title),
            "summary" => Some(SortField::Summary),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            SortField::Updated => "updated",
            SortField::Title => "title",
            SortField::Summary => "summary",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Local name of the directive element.
    pub fn tag(&self) -> &'static str {
        match *self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EntryOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl EntryOrder {
    pub fn new(field: SortField, direction: SortDirection) -> EntryOrder {
        EntryOrder { field, direction }
    }

    pub fn compare(&self, a: &Entry, b: &Entry) -> Ordering {
        let ordering = match self.field {
            SortField::Updated => a.updated().timestamp().cmp(b.updated().timestamp()),
            SortField::Title => title_key(a).cmp(title_key(b)),
            SortField::Summary => summary_key(a).cmp(summary_key(b)),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for EntryOrder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.direction.tag(), self.field.as_str())
    }
}

fn title_key(entry: &Entry) -> &str {
    entry.title().text().unwrap_or("")
}

fn summary_key(entry: &Entry) -> &str {
    entry.summary().and_then(|s| s.text()).unwrap_or("")
}

/// The prefix the attributes bind to the sort namespace, if any.
pub fn sort_prefix(attributes: &[Attribute]) -> Option<&str> {
    attributes.iter()
        .filter(|attr| attr.value() == SORT_XMLNS)
        .filter_map(Attribute::declared_prefix)
        .find(|prefix| !prefix.is_empty())
}

/// Finds the order a feed asks for.  Anything unrecognized falls back to
/// the default order.
pub fn resolve(attributes: &[Attribute], extensions: &[Extension]) -> EntryOrder {
    let Some(prefix) = sort_prefix(attributes) else {
        return EntryOrder::default();
    };
    for ext in extensions.iter().filter(|e| e.prefix() == prefix) {
        let direction = match ext.local_name() {
            "asc" => SortDirection::Ascending,
            "desc" => SortDirection::Descending,
            _ => continue,
        };
        let Some(field) = find_attr(ext.attributes(), "type").and_then(SortField::from_str) else {
            warn!(directive = ext.name(), "ignoring sort directive with an unknown type");
            continue;
        };
        let order = EntryOrder::new(field, direction);
        debug!(%order, "sort directive found");
        return order;
    }
    EntryOrder::default()
}

fn is_directive(ext: &Extension, prefix: &str) -> bool {
    ext.prefix() == prefix && matches!(ext.local_name(), "asc" | "desc")
}

/// Replaces any sort directive of the builder by one for `order`, declaring
/// the sort namespace if the builder does not yet.
pub fn apply_directive(builder: &mut MetadataBuilder, order: EntryOrder) -> SchemaResult<()> {
    let prefix = match sort_prefix(&builder.attributes) {
        Some(prefix) => prefix.to_owned(),
        None => {
            let prefix = free_prefix(&builder.attributes);
            builder.attributes.push(Attribute::new(format!("xmlns:{}", prefix), SORT_XMLNS)?);
            prefix
        }
    };
    builder.extensions.retain(|ext| !is_directive(ext, &prefix));
    let attributes = vec![Attribute::new("type", order.field.as_str())?];
    builder.extensions.push(Extension::new(
        format!("{}:{}", prefix, order.direction.tag()), attributes, None,
    )?);
    debug!(%order, prefix = %prefix, "sort directive applied");
    Ok(())
}

fn free_prefix(attributes: &[Attribute]) -> String {
    let taken = |p: &str| attributes.iter().any(|a| a.declared_prefix() == Some(p));
    if !taken(DEFAULT_PREFIX) {
        return DEFAULT_PREFIX.to_owned();
    }
    (1..).map(|n| format!("{}{}", DEFAULT_PREFIX, n))
        .find(|p| !taken(p))
        .unwrap_or_else(|| DEFAULT_PREFIX.to_owned())
}


#[cfg(test)]
mod test {
    use super::*;

    fn attr(name: &str, value: &str) -> Attribute {
        unwrap!(Attribute::new(name, value))
    }

    fn directive(name: &str, field: &str) -> Extension {
        unwrap!(Extension::new(name, vec![attr("type", field)], None))
    }

    #[test]
    fn test_default_order() {
        assert_eq!(resolve(&[], &[]), EntryOrder::default());
        // not bound to the sort namespace
        let attrs = [attr("xmlns:sort", "urn:other")];
        assert_eq!(resolve(&attrs, &[directive("sort:desc", "title")]), EntryOrder::default());
    }

    #[test]
    fn test_resolve() {
        let attrs = [attr("xmlns:s", SORT_XMLNS)];
        let order = resolve(&attrs, &[directive("s:desc", "updated")]);
        assert_eq!(order, EntryOrder::new(SortField::Updated, SortDirection::Descending));
        let order = resolve(&attrs, &[directive("s:bogus", "title"),
                                      directive("s:asc", "nope"),
                                      directive("s:asc", "summary")]);
        assert_eq!(order, EntryOrder::new(SortField::Summary, SortDirection::Ascending));
    }

    #[test]
    fn test_apply_directive_is_idempotent() {
        let mut builder = MetadataBuilder::default();
        let order = EntryOrder::new(SortField::Title, SortDirection::Descending);
        unwrap!(apply_directive(&mut builder, order));
        unwrap!(apply_directive(&mut builder, order));
        assert_eq!(builder.attributes, [attr("xmlns:sort", SORT_XMLNS)]);
        assert_eq!(builder.extensions, [directive("sort:desc", "title")]);
        assert_eq!(resolve(&builder.attributes, &builder.extensions), order);
    }

    #[test]
    fn test_apply_directive_avoids_taken_prefix() {
        let mut builder = MetadataBuilder::default();
        builder.attributes.push(attr("xmlns:sort", "urn:something-else"));
        unwrap!(apply_directive(&mut builder, EntryOrder::default()));
        assert_eq!(sort_prefix(&builder.attributes), Some("sort1"));
        assert_eq!(builder.extensions[0].name(), "sort1:asc");
    }
}
