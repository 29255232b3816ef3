//! **rust-atom** reads and writes [Atom 1.0][RFC 4287] feed and entry
//! documents.
//!
//! Documents are streamed through [xml-rs][] into an immutable object model
//! (see the `feed` module) whose constructors enforce the structural rules of
//! the RFC: required children, attribute whitelists, date syntax, the
//! summary requirement for out-of-line content and namespace prefix
//! binding.  The model is written back through the same tokenizer library,
//! so that reading a document, writing it and reading the result again
//! yields an equal tree.
//!
//! ```no_run
//! let feed = atom::parser::read_feed_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">
//!   <id>urn:feed</id><title>t</title><updated>2013-01-01T00:00:00Z</updated>
//! </feed>"#).unwrap();
//! println!("{}", atom::writer::write_feed_to_string(&feed).unwrap());
//! ```
//!
//! [RFC 4287]: https://tools.ietf.org/html/rfc4287
//! [xml-rs]: https://crates.io/crates/xml-rs

#[cfg(test)]
#[macro_use]
mod test_utils;

#[macro_use]
mod macros;

pub mod codecs;
pub mod config;
pub mod feed;
pub mod markup;
pub mod mimetype;
pub mod parser;
pub mod schema;
pub mod sort;
pub mod util;
pub mod writer;

pub use crate::config::Config;
pub use crate::feed::{Entry, Feed};
pub use crate::parser::AtomReader;
pub use crate::schema::{SchemaError, SchemaResult};
pub use crate::writer::AtomWriter;
