//! Reading Atom documents.
pub use self::atom::{AtomReader, read_entry, read_entry_str, read_feed, read_feed_str};

pub mod atom;
pub mod base;
pub mod xhtml;
