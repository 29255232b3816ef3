use std::collections::BTreeSet;
use std::fmt;

use super::{Attribute, find_attr};
use super::validation::{ElementKind, Prefixed, collect_unbound, markup_prefixes,
                        validate_attributes};
use crate::mimetype::MimeType;
use crate::schema::{SchemaError, SchemaResult};
use crate::util::{escape_text, unescape};

/// The XML namespace name used for XHTML.
pub const XHTML_XMLNS: &str = "http://www.w3.org/1999/xhtml";

/// How the content of a text construct (or `atom:content`) is to be read.
/// It corresponds to the `type` and `src` attributes of RFC 4287
/// (section 3.1.1 and 4.1.3.1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentType {
    Text,
    Html,
    Xhtml,
    /// A MIME media type given in `type`.
    Other,
    /// Out-of-line content referenced by `src`.
    External,
}

impl ContentType {
    /// `src` wins over `type`; an absent `type` means plain text.
    pub fn classify(attributes: &[Attribute]) -> ContentType {
        if find_attr(attributes, "src").is_some() {
            return ContentType::External;
        }
        match find_attr(attributes, "type") {
            None | Some("text") => ContentType::Text,
            Some("html") => ContentType::Html,
            Some("xhtml") => ContentType::Xhtml,
            Some(_) => ContentType::Other,
        }
    }
}

/// The canonical body of a text construct.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Body {
    /// Character data, written out escaped.
    Plain(String),
    /// A markup string: entity-escaped HTML for `html`, the inner XHTML
    /// (wrapper excluded) for `xhtml`, or inline XML for XML media types.
    Markup(String),
}

impl Body {
    pub fn as_str(&self) -> &str {
        match *self {
            Body::Plain(ref s) | Body::Markup(ref s) => s,
        }
    }
}

/// The `div` (or whatever element) wrapping XHTML content.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct XhtmlWrapper {
    pub name: String,
    /// Everything after the name inside the start tag, e.g.
    /// `xmlns="http://www.w3.org/1999/xhtml"`.
    pub attribute: Option<String>,
}

impl XhtmlWrapper {
    /// Split a wrapped XHTML string into the wrapper and the inner markup.
    pub fn split(kind: ElementKind, markup: &str) -> SchemaResult<(XhtmlWrapper, String)> {
        let malformed = || SchemaError::violation(format!(
            "The content of the atom:{} element is not wrapped in an XHTML element.", kind
        ));
        let markup = markup.trim();
        let gt = markup.find('>').ok_or_else(malformed)?;
        let start_tag = markup[..gt].strip_prefix('<').ok_or_else(malformed)?;
        let (start_tag, self_closing) = match start_tag.strip_suffix('/') {
            Some(tag) => (tag.trim_end(), true),
            None => (start_tag, false),
        };
        let (name, attribute) = match start_tag.find(char::is_whitespace) {
            Some(sp) => {
                let attribute = start_tag[sp..].trim();
                (&start_tag[..sp],
                 if attribute.is_empty() { None } else { Some(attribute.to_owned()) })
            }
            None => (start_tag, None),
        };
        if name.is_empty() {
            return Err(malformed());
        }
        let wrapper = XhtmlWrapper { name: name.to_owned(), attribute };
        if self_closing {
            return Ok((wrapper, String::new()));
        }
        let lt = markup.rfind('<').filter(|&lt| lt > gt).ok_or_else(malformed)?;
        if !markup[lt..].starts_with("</") {
            return Err(malformed());
        }
        Ok((wrapper, markup[gt + 1..lt].to_owned()))
    }

    /// Wrap inner markup again.
    pub fn wrap(&self, inner: &str) -> String {
        match self.attribute {
            Some(ref attribute) => format!("<{0} {1}>{2}</{0}>", self.name, attribute, inner),
            None => format!("<{0}>{1}</{0}>", self.name, inner),
        }
    }
}

/// Text construct defined in RFC 4287 (section 3.1); also used for
/// `atom:content` (section 4.1.3).
///
/// RFC: <https://tools.ietf.org/html/rfc4287#section-3.1>
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextConstruct {
    kind: ElementKind,
    attributes: Vec<Attribute>,
    content_type: ContentType,
    body: Option<Body>,
    wrapper: Option<XhtmlWrapper>,
}

pub type Title = TextConstruct;
pub type Subtitle = TextConstruct;
pub type Summary = TextConstruct;
pub type Rights = TextConstruct;
pub type Content = TextConstruct;

impl TextConstruct {
    /// Build a text construct from its attributes and canonical text.
    ///
    /// For `xhtml` the text must include the wrapper element, which is
    /// stripped here; `html` text is expected to be entity-escaped already.
    /// The text of out-of-line content is ignored.
    pub fn new(kind: ElementKind, attributes: Vec<Attribute>, text: Option<String>)
               -> SchemaResult<TextConstruct> {
        if !kind.is_text_construct() {
            return Err(SchemaError::violation(format!(
                "atom:{} is not a text construct.", kind
            )));
        }
        validate_attributes(kind, &attributes)?;
        let content_type = ContentType::classify(&attributes);
        let mut wrapper = None;
        let body = match content_type {
            ContentType::External => None,
            ContentType::Text => Some(Body::Plain(text.unwrap_or_default())),
            ContentType::Html => Some(Body::Markup(text.unwrap_or_default())),
            ContentType::Xhtml => {
                let text = text.unwrap_or_default();
                let (w, inner) = XhtmlWrapper::split(kind, &text)?;
                wrapper = Some(w);
                Some(Body::Markup(inner))
            }
            ContentType::Other => {
                let text = text.unwrap_or_default();
                if is_xml_type(&attributes) {
                    Some(Body::Markup(text))
                } else {
                    Some(Body::Plain(text))
                }
            }
        };
        Ok(TextConstruct { kind, attributes, content_type, body, wrapper })
    }

    pub fn plain<T: Into<String>>(kind: ElementKind, value: T) -> SchemaResult<TextConstruct> {
        TextConstruct::new(kind, vec![], Some(value.into()))
    }

    /// An `html` construct from raw HTML source.
    pub fn html(kind: ElementKind, html: &str) -> SchemaResult<TextConstruct> {
        let attributes = vec![Attribute::from_parts("type", "html")];
        TextConstruct::new(kind, attributes, Some(escape_text(html, true).into_owned()))
    }

    /// An `xhtml` construct from inner markup; an XHTML `div` is put around it.
    pub fn xhtml(kind: ElementKind, inner: &str) -> SchemaResult<TextConstruct> {
        let attributes = vec![Attribute::from_parts("type", "xhtml")];
        let wrapped = format!("<div xmlns=\"{}\">{}</div>", XHTML_XMLNS, inner);
        TextConstruct::new(kind, attributes, Some(wrapped))
    }

    /// Out-of-line `atom:content` pointing at `src`.
    pub fn external(src: &str, mimetype: Option<&str>) -> SchemaResult<TextConstruct> {
        let mut attributes = vec![Attribute::from_parts("src", src)];
        if let Some(mimetype) = mimetype {
            attributes.push(Attribute::from_parts("type", mimetype));
        }
        TextConstruct::new(ElementKind::Content, attributes, None)
    }

    pub fn kind(&self) -> ElementKind { self.kind }

    pub fn attributes(&self) -> &[Attribute] { &self.attributes }

    pub fn content_type(&self) -> ContentType { self.content_type }

    pub fn body(&self) -> Option<&Body> { self.body.as_ref() }

    pub fn wrapper(&self) -> Option<&XhtmlWrapper> { self.wrapper.as_ref() }

    /// The canonical text: inner markup for `xhtml`, escaped HTML for
    /// `html`, `None` for out-of-line content.
    pub fn text(&self) -> Option<&str> {
        self.body.as_ref().map(Body::as_str)
    }

    /// The text with `html` entities resolved back into markup.
    pub fn value(&self) -> String {
        match (self.content_type, self.text()) {
            (ContentType::Html, Some(text)) => unescape(text).into_owned(),
            (_, Some(text)) => text.to_owned(),
            (_, None) => String::new(),
        }
    }

    /// The value of the `type` attribute, if any.
    pub fn type_attribute(&self) -> Option<&str> {
        find_attr(&self.attributes, "type")
    }

    pub fn src(&self) -> Option<&str> {
        find_attr(&self.attributes, "src")
    }

    /// The media type of `Other`/`External` content.
    pub fn mimetype(&self) -> Option<MimeType> {
        match self.content_type {
            ContentType::Other | ContentType::External =>
                self.type_attribute().and_then(MimeType::from_str),
            _ => None,
        }
    }

    /// Whether RFC 4287 (section 4.1.1.1) asks the entry for a summary
    /// when this is its content.
    pub fn requires_summary(&self) -> bool {
        match self.content_type {
            ContentType::External => true,
            ContentType::Other => self.mimetype().map_or(false, |m| !m.is_xml() && !m.is_text()),
            _ => false,
        }
    }

    /// Same content under another element kind, e.g. a title reused as a
    /// summary.
    pub fn with_kind(&self, kind: ElementKind) -> SchemaResult<TextConstruct> {
        let text = match (&self.wrapper, self.text()) {
            (Some(wrapper), Some(inner)) => Some(wrapper.wrap(inner)),
            (_, text) => text.map(str::to_owned),
        };
        TextConstruct::new(kind, self.attributes.clone(), text)
    }
}

/// Whether `type` names an XML media type, whose content is inline markup.
pub(crate) fn is_xml_type(attributes: &[Attribute]) -> bool {
    find_attr(attributes, "type")
        .and_then(MimeType::from_str)
        .map_or(false, |m| m.is_xml())
}

impl Prefixed for TextConstruct {
    /// Covers the attributes, the XHTML wrapper and the tags of inline
    /// markup; declarations on the element itself bind all of them.
    fn unbound_prefixes(&self) -> BTreeSet<String> {
        let markup = match (self.content_type, &self.body, &self.wrapper) {
            (ContentType::Xhtml, Some(body), Some(wrapper)) =>
                Some(markup_prefixes(&wrapper.wrap(body.as_str()))),
            (ContentType::Xhtml, Some(body), None) |
            (ContentType::Other, Some(body @ Body::Markup(_)), _) =>
                Some(markup_prefixes(body.as_str())),
            _ => None,
        };
        collect_unbound(&self.attributes, markup)
    }
}

impl fmt::Display for TextConstruct {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}


#[cfg(test)]
mod test {
    use super::*;

    fn typed(t: &str) -> Vec<Attribute> {
        vec![unwrap!(Attribute::new("type", t))]
    }

    #[test]
    fn test_classify() {
        assert_eq!(ContentType::classify(&[]), ContentType::Text);
        assert_eq!(ContentType::classify(&typed("text")), ContentType::Text);
        assert_eq!(ContentType::classify(&typed("html")), ContentType::Html);
        assert_eq!(ContentType::classify(&typed("xhtml")), ContentType::Xhtml);
        assert_eq!(ContentType::classify(&typed("text/html")), ContentType::Other);
        assert_eq!(ContentType::classify(&typed("image/png")), ContentType::Other);
        let mut with_src = typed("xhtml");
        with_src.push(unwrap!(Attribute::new("src", "http://example.org/x")));
        assert_eq!(ContentType::classify(&with_src), ContentType::External);
    }

    #[test]
    fn test_xhtml_wrapper_is_stripped() {
        let title = unwrap!(TextConstruct::new(
            ElementKind::Title, typed("xhtml"),
            Some("<div>One <b>bold</b> foot forward</div>".to_owned())));
        assert_eq!(title.text(), Some("One <b>bold</b> foot forward"));
        assert_eq!(title.wrapper(), Some(&XhtmlWrapper { name: "div".to_owned(), attribute: None }));
    }

    #[test]
    fn test_xhtml_wrapper_attribute() {
        let markup = format!("\n  <div xmlns=\"{}\"><p class=\"a b\">x</p></div>\n", XHTML_XMLNS);
        let summary = unwrap!(TextConstruct::new(ElementKind::Summary, typed("xhtml"),
                                                 Some(markup)));
        assert_eq!(summary.text(), Some("<p class=\"a b\">x</p>"));
        let wrapper = summary.wrapper().unwrap();
        assert_eq!(wrapper.name, "div");
        assert_eq!(wrapper.attribute.as_deref(),
                   Some("xmlns=\"http://www.w3.org/1999/xhtml\""));
        assert_eq!(wrapper.wrap("y"),
                   "<div xmlns=\"http://www.w3.org/1999/xhtml\">y</div>");
    }

    #[test]
    fn test_self_closing_wrapper() {
        let rights = unwrap!(TextConstruct::new(ElementKind::Rights, typed("xhtml"),
                                                Some("<div/>".to_owned())));
        assert_eq!(rights.text(), Some(""));
    }

    #[test]
    fn test_malformed_wrapper() {
        assert_violation!(TextConstruct::new(ElementKind::Title, typed("xhtml"),
                                             Some("no markup here".to_owned())),
                          "atom:title");
        assert_violation!(TextConstruct::new(ElementKind::Title, typed("xhtml"),
                                             Some("<div>unterminated".to_owned())),
                          "not wrapped");
    }

    #[test]
    fn test_html_round_trips_through_value() {
        let summary = unwrap!(TextConstruct::html(ElementKind::Summary, "<p>Fish & chips</p>"));
        assert_eq!(summary.text(), Some("&lt;p&gt;Fish &amp; chips&lt;/p&gt;"));
        assert_eq!(summary.value(), "<p>Fish & chips</p>");
        assert_eq!(summary.to_string(), "<p>Fish & chips</p>");
    }

    #[test]
    fn test_external_content() {
        let content = unwrap!(TextConstruct::external("http://example.org/a.png",
                                                      Some("image/png")));
        assert_eq!(content.content_type(), ContentType::External);
        assert_eq!(content.text(), None);
        assert_eq!(content.src(), Some("http://example.org/a.png"));
        assert!(content.requires_summary());
    }

    #[test]
    fn test_other_content() {
        let png = unwrap!(TextConstruct::new(ElementKind::Content, typed("image/png"),
                                             Some("iVBORw0KGgo=".to_owned())));
        assert!(png.requires_summary());
        assert_eq!(png.body(), Some(&Body::Plain("iVBORw0KGgo=".to_owned())));
        let xml = unwrap!(TextConstruct::new(ElementKind::Content, typed("application/xml"),
                                             Some("<x/>".to_owned())));
        assert!(!xml.requires_summary());
        assert_eq!(xml.body(), Some(&Body::Markup("<x/>".to_owned())));
        let plain = unwrap!(TextConstruct::new(ElementKind::Content, typed("text/plain"),
                                               Some("hi".to_owned())));
        assert!(!plain.requires_summary());
    }

    #[test]
    fn test_src_not_allowed_on_title() {
        let attrs = vec![unwrap!(Attribute::new("src", "http://example.org/"))];
        assert_violation!(TextConstruct::new(ElementKind::Title, attrs, None),
                          "Unsupported attribute src");
    }

    #[test]
    fn test_prefixes_inside_xhtml() {
        let title = unwrap!(TextConstruct::new(
            ElementKind::Title, typed("xhtml"),
            Some("<h:div>x <h:b>y</h:b></h:div>".to_owned())));
        assert_eq!(title.unbound_prefixes().into_iter().collect::<Vec<_>>(), ["h"]);
        let mut declared = typed("xhtml");
        declared.push(unwrap!(Attribute::new("xmlns:h", XHTML_XMLNS)));
        let title = unwrap!(TextConstruct::new(
            ElementKind::Title, declared,
            Some("<h:div>x <h:b>y</h:b></h:div>".to_owned())));
        assert!(title.unbound_prefixes().is_empty());
        let inner = unwrap!(TextConstruct::xhtml(ElementKind::Summary,
                                                 r#"<m:math xmlns:m="urn:m"/><svg:g/>"#));
        assert_eq!(inner.unbound_prefixes().into_iter().collect::<Vec<_>>(), ["svg"]);
    }

    #[test]
    fn test_prefixes_inside_xml_content() {
        let content = unwrap!(TextConstruct::new(ElementKind::Content, typed("application/xml"),
                                                 Some("<a:doc/>".to_owned())));
        assert_eq!(content.unbound_prefixes().into_iter().collect::<Vec<_>>(), ["a"]);
        let html = unwrap!(TextConstruct::html(ElementKind::Summary, "<a:doc/>"));
        assert!(html.unbound_prefixes().is_empty());
    }

    #[test]
    fn test_with_kind_keeps_wrapper() {
        let title = unwrap!(TextConstruct::xhtml(ElementKind::Title, "<b>x</b>"));
        let summary = unwrap!(title.with_kind(ElementKind::Summary));
        assert_eq!(summary.kind(), ElementKind::Summary);
        assert_eq!(summary.text(), Some("<b>x</b>"));
        assert_eq!(summary.wrapper(), title.wrapper());
    }
}
