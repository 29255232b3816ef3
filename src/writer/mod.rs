//! Writing Atom documents.
pub use self::atom::{AtomWriter, write_entry, write_entry_to_string, write_feed,
                     write_feed_to_string};

pub mod atom;
pub mod xhtml;
