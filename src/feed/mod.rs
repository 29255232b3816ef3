//! Data structures for feeds.
//!
//! The object model of [RFC 4287][]: every element is an immutable value
//! built through a validating constructor or builder, so a tree that exists
//! is a tree that satisfies the Atom structural rules.  "Modifying" a value
//! means turning it back into its builder with `to_builder()`, changing
//! fields and building again.
//!
//! [RFC 4287]: https://tools.ietf.org/html/rfc4287
pub use self::attribute::{Attribute, find_attr};
pub use self::category::Category;
pub use self::date::DateConstruct;
pub use self::entries::Entries;
pub use self::entry::{Entry, EntryBuilder};
pub use self::extension::Extension;
pub use self::feed::{Feed, FeedBuilder};
pub use self::generator::Generator;
pub use self::link::{Link, LinkIteratorExt};
pub use self::metadata::{Metadata, MetadataBuilder, set_once};
pub use self::person::{Person, PersonBuilder};
pub use self::source::{Source, SourceBuilder};
pub use self::text::{Body, Content, ContentType, Rights, Subtitle, Summary, TextConstruct,
                     Title, XHTML_XMLNS, XhtmlWrapper};
pub use self::uri::{Icon, Id, Logo, UriElement};
pub use self::validation::{ElementKind, Prefixed};
pub(crate) use self::text::is_xml_type;

mod attribute;
mod category;
mod date;
mod entries;
mod entry;
mod extension;
mod feed;
mod generator;
mod link;
mod metadata;
mod person;
mod source;
mod text;
mod uri;
pub mod validation;


/// The XML namespace name used for Atom (RFC 4287).
pub const ATOM_XMLNS: &str = "http://www.w3.org/2005/Atom";
