use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// A MIME media type as found in `type` attributes.  Parameters (`; ...`)
/// are dropped.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MimeType {
    Text,
    Html,
    Xhtml,
    Other(String),
}

static MIMETYPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"^\s*"#,
        r#"(?P<type>[A-Za-z0-9!#$&.+^_-]{1,127})"#,
        r#"/"#,
        r#"(?P<subtype>[A-Za-z0-9!#$&.+^_-]{1,127})"#,
        r#"\s*(?:;.*)?$"#,
    )).unwrap()
});

impl MimeType {
    pub fn from_str(mimetype: &str) -> Option<MimeType> {
        let captures = MIMETYPE_PATTERN.captures(mimetype)?;
        // media types are case-insensitive
        let type_ = captures["type"].to_ascii_lowercase();
        let subtype = captures["subtype"].to_ascii_lowercase();
        Some(match (type_.as_str(), subtype.as_str()) {
            ("text", "plain") => MimeType::Text,
            ("text", "html") => MimeType::Html,
            ("application", "xhtml+xml") => MimeType::Xhtml,
            _ => MimeType::Other(format!("{}/{}", type_, subtype)),
        })
    }

    pub fn mimetype(&self) -> &str {
        match *self {
            MimeType::Text => "text/plain",
            MimeType::Html => "text/html",
            MimeType::Xhtml => "application/xhtml+xml",
            MimeType::Other(ref mimetype) => mimetype,
        }
    }

    /// `text/*`
    pub fn is_text(&self) -> bool {
        self.mimetype().starts_with("text/")
    }

    /// Whether content of this type is inline XML, i.e. `*/xml`, `*/*+xml`
    /// or `*/*-xml`.
    pub fn is_xml(&self) -> bool {
        let subtype = self.mimetype().split_once('/').map_or("", |(_, sub)| sub);
        subtype == "xml" || subtype.ends_with("+xml") || subtype.ends_with("-xml")
    }

    pub fn is_html(&self) -> bool {
        matches!(*self, MimeType::Html | MimeType::Xhtml)
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.mimetype())
    }
}


#[cfg(test)]
mod test {
    use super::MimeType;

    #[test]
    fn test_from_str() {
        assert_eq!(MimeType::from_str("text/plain"), Some(MimeType::Text));
        assert_eq!(MimeType::from_str("text/html; charset=utf-8"), Some(MimeType::Html));
        assert_eq!(MimeType::from_str("application/xhtml+xml"), Some(MimeType::Xhtml));
        assert_eq!(MimeType::from_str("image/PNG"),
                   Some(MimeType::Other("image/png".to_owned())));
        assert_eq!(MimeType::from_str("html"), None);
        assert_eq!(MimeType::from_str(""), None);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(MimeType::from_str("Text/HTML"), Some(MimeType::Html));
        assert!(unwrap!(MimeType::from_str("Text/HTML").ok_or(())).is_html());
        assert_eq!(MimeType::from_str("APPLICATION/XHTML+XML"), Some(MimeType::Xhtml));
        assert_eq!(MimeType::from_str("TEXT/Plain"), Some(MimeType::Text));
    }

    #[test]
    fn test_classes() {
        let svg = MimeType::from_str("image/svg+xml").unwrap();
        assert!(svg.is_xml());
        assert!(!svg.is_text());
        assert!(MimeType::from_str("application/xml").unwrap().is_xml());
        assert!(MimeType::from_str("text/xml").unwrap().is_text());
        assert!(MimeType::Xhtml.is_xml());
        assert!(MimeType::Xhtml.is_html());
        let png = MimeType::from_str("image/png").unwrap();
        assert!(!png.is_xml() && !png.is_text() && !png.is_html());
    }
}
