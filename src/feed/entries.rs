use std::slice;
use std::vec;

use super::Entry;
use crate::sort::EntryOrder;

/// The entries of a feed, kept in the active sort order.  Entries whose
/// keys compare equal stay in the order they were given.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Entries {
    order: EntryOrder,
    items: Vec<Entry>,
}

impl Entries {
    pub fn new(mut items: Vec<Entry>, order: EntryOrder) -> Entries {
        items.sort_by(|a, b| order.compare(a, b));
        Entries { order, items }
    }

    pub fn order(&self) -> EntryOrder { self.order }

    /// The same entries under another order.
    pub fn reordered(&self, order: EntryOrder) -> Entries {
        Entries::new(self.items.clone(), order)
    }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn iter(&self) -> slice::Iter<'_, Entry> { self.items.iter() }

    pub fn as_slice(&self) -> &[Entry] { &self.items }

    /// Look an entry up by its `atom:id`.
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.items.iter().find(|e| e.id().value() == id)
    }

    pub fn into_vec(self) -> Vec<Entry> { self.items }
}

impl<'a> IntoIterator for &'a Entries {
    type Item = &'a Entry;
    type IntoIter = slice::Iter<'a, Entry>;
    fn into_iter(self) -> slice::Iter<'a, Entry> { self.items.iter() }
}

impl IntoIterator for Entries {
    type Item = Entry;
    type IntoIter = vec::IntoIter<Entry>;
    fn into_iter(self) -> vec::IntoIter<Entry> { self.items.into_iter() }
}


#[cfg(test)]
mod test {
    use super::Entries;

    use crate::feed::{DateConstruct, ElementKind, Entry, EntryBuilder, Id, TextConstruct};
    use crate::sort::{EntryOrder, SortDirection, SortField};

    fn entry(id: &str, title: &str, updated: &str, summary: Option<&str>) -> Entry {
        let mut builder = EntryBuilder::new();
        builder.id = Some(unwrap!(Id::id(id)));
        builder.title = Some(unwrap!(TextConstruct::plain(ElementKind::Title, title)));
        builder.updated = Some(unwrap!(DateConstruct::parse(ElementKind::Updated, vec![],
                                                            updated)));
        builder.summary = summary.map(|s| unwrap!(TextConstruct::plain(ElementKind::Summary, s)));
        unwrap!(builder.build())
    }

    fn fx_entries() -> Vec<Entry> {
        vec![
            entry("urn:b", "Bravo", "2009-10-15T11:11:30Z", Some("two")),
            entry("urn:a", "Alpha", "2009-10-15T12:11:30+01:00", None),
            entry("urn:c", "Charlie", "2008-01-01T00:00:00.00-06:00", Some("one")),
        ]
    }

    fn ids(entries: &Entries) -> Vec<&str> {
        entries.iter().map(|e| e.id().value()).collect()
    }

    #[test]
    fn test_default_order_is_updated_ascending() {
        let entries = Entries::new(fx_entries(), EntryOrder::default());
        // urn:b and urn:a are the same instant
        assert_eq!(ids(&entries), ["urn:c", "urn:b", "urn:a"]);
    }

    #[test]
    fn test_descending_updated() {
        let order = EntryOrder::new(SortField::Updated, SortDirection::Descending);
        let entries = Entries::new(fx_entries(), order);
        assert_eq!(ids(&entries), ["urn:b", "urn:a", "urn:c"]);
    }

    #[test]
    fn test_title_and_summary() {
        let entries = Entries::new(fx_entries(),
                                   EntryOrder::new(SortField::Title, SortDirection::Ascending));
        assert_eq!(ids(&entries), ["urn:a", "urn:b", "urn:c"]);
        let entries = entries.reordered(EntryOrder::new(SortField::Summary,
                                                        SortDirection::Ascending));
        assert_eq!(ids(&entries), ["urn:a", "urn:c", "urn:b"]);
    }

    #[test]
    fn test_get() {
        let entries = Entries::new(fx_entries(), EntryOrder::default());
        assert_eq!(entries.get("urn:c").map(|e| e.title().value()), Some("Charlie".to_owned()));
        assert!(entries.get("urn:z").is_none());
        assert_eq!(entries.len(), 3);
        assert_eq!(entries.into_iter().count(), 3);
    }
}
