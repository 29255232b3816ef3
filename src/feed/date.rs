use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};

use super::Attribute;
use super::validation::{ElementKind, Prefixed, unbound_prefixes, validate_attributes};
use crate::codecs::{Rfc3339, ZonedDate};
use crate::config::DateOffset;
use crate::schema::{Codec, SchemaResult};

/// Date construct defined in RFC 4287 (section 3.3), used for
/// `atom:updated` and `atom:published`.
///
/// The canonical text is always rendered in one pattern, e.g.
/// `2008-01-01T00:00:00.00-06:00`, whatever form the date was read in.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DateConstruct {
    kind: ElementKind,
    attributes: Vec<Attribute>,
    timestamp: DateTime<FixedOffset>,
    text: String,
}

impl DateConstruct {
    /// Parse `text` keeping the offset it was written with.
    pub fn parse(kind: ElementKind, attributes: Vec<Attribute>, text: &str)
                 -> SchemaResult<DateConstruct> {
        DateConstruct::parse_with(kind, attributes, text, DateOffset::Preserve)
    }

    pub fn parse_with(kind: ElementKind, attributes: Vec<Attribute>, text: &str,
                      offset: DateOffset) -> SchemaResult<DateConstruct> {
        validate_attributes(kind, &attributes)?;
        let timestamp = match Rfc3339.decode(text) {
            Ok(timestamp) => timestamp,
            Err(_) => ZonedDate.decode(text)?,
        };
        DateConstruct::build(kind, attributes, apply_offset(timestamp, offset))
    }

    pub fn from_timestamp<Tz: TimeZone>(kind: ElementKind, timestamp: DateTime<Tz>)
                                        -> SchemaResult<DateConstruct> {
        DateConstruct::build(kind, vec![], timestamp.fixed_offset())
    }

    fn build(kind: ElementKind, attributes: Vec<Attribute>,
             timestamp: DateTime<FixedOffset>) -> SchemaResult<DateConstruct> {
        let mut buf = Vec::new();
        Rfc3339.encode(&timestamp, &mut buf)?;
        let text = String::from_utf8_lossy(&buf).into_owned();
        Ok(DateConstruct { kind, attributes, timestamp, text })
    }

    pub fn kind(&self) -> ElementKind { self.kind }

    pub fn attributes(&self) -> &[Attribute] { &self.attributes }

    pub fn timestamp(&self) -> &DateTime<FixedOffset> { &self.timestamp }

    pub fn text(&self) -> &str { &self.text }

    /// Same date under another element kind.
    pub fn with_kind(&self, kind: ElementKind) -> DateConstruct {
        DateConstruct { kind, ..self.clone() }
    }
}

fn apply_offset(timestamp: DateTime<FixedOffset>, offset: DateOffset) -> DateTime<FixedOffset> {
    match offset {
        DateOffset::Preserve => timestamp,
        DateOffset::Local => {
            let local = Local.offset_from_utc_datetime(&timestamp.naive_utc());
            timestamp.with_timezone(&local)
        }
        DateOffset::Utc => timestamp.with_timezone(&Utc).fixed_offset(),
    }
}

impl Prefixed for DateConstruct {
    fn unbound_prefixes(&self) -> BTreeSet<String> {
        unbound_prefixes(&self.attributes)
    }
}

impl fmt::Display for DateConstruct {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}


#[cfg(test)]
mod test {
    use super::DateConstruct;

    use chrono::{FixedOffset, TimeZone, Utc};

    use crate::config::DateOffset;
    use crate::feed::{Attribute, ElementKind};

    fn parse(text: &str) -> DateConstruct {
        unwrap!(DateConstruct::parse(ElementKind::Updated, vec![], text))
    }

    #[test]
    fn test_cascade() {
        assert_eq!(parse("2008-01-01T00:00:00.00-06:00").text(),
                   "2008-01-01T00:00:00.00-06:00");
        assert_eq!(parse("2008-01-01T00:00:00-06:00").text(),
                   "2008-01-01T00:00:00.00-06:00");
        assert_eq!(parse("2009-10-15T11:11:30.5Z").text(), "2009-10-15T11:11:30.50+00:00");
        assert_eq!(parse("2009-10-15T11:11:30Z").text(), "2009-10-15T11:11:30.00+00:00");
        assert_eq!(parse("Tue Oct 20 02:48:09 GMT+10:00 2009").text(),
                   "2009-10-20T02:48:09.00+10:00");
    }

    #[test]
    fn test_not_a_date() {
        assert_violation!(DateConstruct::parse(ElementKind::Updated, vec![], "not-a-date"),
                          "not-a-date");
        assert_violation!(DateConstruct::parse(ElementKind::Published, vec![], ""),
                          "not a valid date");
    }

    #[test]
    fn test_offset_policy() {
        let utc = unwrap!(DateConstruct::parse_with(
            ElementKind::Updated, vec![], "2008-01-01T00:00:00.00-06:00", DateOffset::Utc));
        assert_eq!(utc.text(), "2008-01-01T06:00:00.00+00:00");
        let local = unwrap!(DateConstruct::parse_with(
            ElementKind::Updated, vec![], "2008-01-01T00:00:00.00-06:00", DateOffset::Local));
        assert_eq!(local.timestamp(), utc.timestamp());
    }

    #[test]
    fn test_from_timestamp() {
        let date = unwrap!(DateConstruct::from_timestamp(
            ElementKind::Published, Utc.with_ymd_and_hms(2013, 11, 2, 6, 0, 0).unwrap()));
        assert_eq!(date.to_string(), "2013-11-02T06:00:00.00+00:00");
        let east = FixedOffset::east_opt(9 * 3600).unwrap();
        let other = unwrap!(DateConstruct::from_timestamp(
            ElementKind::Published, east.with_ymd_and_hms(2013, 11, 2, 15, 0, 0).unwrap()));
        assert_eq!(date.timestamp(), other.timestamp());
        assert!(date != other);
    }

    #[test]
    fn test_date_attributes() {
        let lang = vec![unwrap!(Attribute::new("xml:lang", "en"))];
        unwrap!(DateConstruct::parse(ElementKind::Updated, lang, "2009-10-15T11:11:30Z"));
        let typed = vec![unwrap!(Attribute::new("type", "text"))];
        assert_violation!(DateConstruct::parse(ElementKind::Updated, typed, "2009-10-15T11:11:30Z"),
                          "Unsupported attribute type in the atom:updated element.");
    }
}
