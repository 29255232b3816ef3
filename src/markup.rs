//! Tokenizer for the markup strings stored in text constructs and
//! extension elements.
//!
//! The strings are what the reader produced (or what a caller handed to a
//! constructor): elements and character data with `&` and `<` escaped.
//! Tags are not checked for balance here; that is up to the consumer.
use crate::schema::{SchemaError, SchemaResult};
use crate::util::unescape;

/// A start tag, or an empty-element tag when `empty` is set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartTag<'a> {
    pub name: &'a str,
    /// Names with their unescaped values, in document order.
    pub attributes: Vec<(&'a str, String)>,
    pub empty: bool,
}

impl<'a> StartTag<'a> {
    /// Prefixes declared by `xmlns:p` attributes of the tag.
    pub fn declared_prefixes(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.attributes.iter().filter_map(|&(name, _)| name.strip_prefix("xmlns:"))
    }

    /// Prefixes the tag itself uses: the element's and its attributes'.
    /// Declarations and `xml:` attributes are left out.
    pub fn used_prefixes(&self) -> impl Iterator<Item = &'a str> + '_ {
        let element = self.name.split_once(':').map(|(prefix, _)| prefix);
        let attributes = self.attributes.iter()
            .filter(|&&(name, _)| name != "xmlns")
            .filter_map(|&(name, _)| name.split_once(':').map(|(prefix, _)| prefix))
            .filter(|&prefix| prefix != "xmlns" && prefix != "xml");
        element.into_iter().chain(attributes)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// Character data, still escaped.
    Text(&'a str),
    Start(StartTag<'a>),
    End(&'a str),
    Comment(&'a str),
    CData(&'a str),
    ProcessingInstruction { target: &'a str, data: Option<&'a str> },
}

/// Iterates over the tokens of a markup string.  After the first error the
/// iterator is exhausted.
pub struct Tokens<'a> {
    rest: &'a str,
}

pub fn tokenize(markup: &str) -> Tokens<'_> {
    Tokens { rest: markup }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = SchemaResult<Token<'a>>;

    fn next(&mut self) -> Option<SchemaResult<Token<'a>>> {
        if self.rest.is_empty() {
            return None;
        }
        let result = self.scan();
        if result.is_err() {
            self.rest = "";
        }
        Some(result)
    }
}

impl<'a> Tokens<'a> {
    fn scan(&mut self) -> SchemaResult<Token<'a>> {
        let rest = self.rest;
        match rest.find('<') {
            None => {
                self.rest = "";
                return Ok(Token::Text(rest));
            }
            Some(lt) if lt > 0 => {
                self.rest = &rest[lt..];
                return Ok(Token::Text(&rest[..lt]));
            }
            Some(_) => { }
        }
        let (token, after) = if let Some(after) = rest.strip_prefix("<!--") {
            let (comment, after) = split_at_terminator(after, "-->", "comment")?;
            (Token::Comment(comment), after)
        } else if let Some(after) = rest.strip_prefix("<![CDATA[") {
            let (text, after) = split_at_terminator(after, "]]>", "CDATA section")?;
            (Token::CData(text), after)
        } else if let Some(after) = rest.strip_prefix("<?") {
            let (body, after) = split_at_terminator(after, "?>", "processing instruction")?;
            let (target, data) = match body.split_once(char::is_whitespace) {
                Some((target, data)) => (target, Some(data.trim()).filter(|d| !d.is_empty())),
                None => (body, None),
            };
            if target.is_empty() {
                return Err(SchemaError::malformed("a processing instruction has no target"));
            }
            (Token::ProcessingInstruction { target, data }, after)
        } else if let Some(after) = rest.strip_prefix("</") {
            let (name, after) = split_at_terminator(after, ">", "end tag")?;
            (Token::End(name.trim()), after)
        } else {
            let (tag, after) = parse_start_tag(&rest[1..])?;
            (Token::Start(tag), after)
        };
        self.rest = after;
        Ok(token)
    }
}

fn split_at_terminator<'a>(input: &'a str, terminator: &str, what: &str)
                           -> SchemaResult<(&'a str, &'a str)> {
    match input.find(terminator) {
        Some(end) => Ok((&input[..end], &input[end + terminator.len()..])),
        None => Err(SchemaError::malformed(format!("unterminated {}", what))),
    }
}

fn is_name_boundary(c: char) -> bool {
    c.is_whitespace() || c == '>' || c == '/' || c == '<' || c == '='
}

/// Parses a start tag; `input` begins right after `<`.  Attribute values
/// may be quoted with `"` or `'` and may contain whitespace.
fn parse_start_tag(input: &str) -> SchemaResult<(StartTag<'_>, &str)> {
    let name_end = input.find(is_name_boundary).unwrap_or(input.len());
    let name = &input[..name_end];
    if name.is_empty() {
        return Err(SchemaError::malformed("a start tag has no element name"));
    }
    let mut rest = &input[name_end..];
    let mut attributes = vec![];
    loop {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix("/>") {
            return Ok((StartTag { name, attributes, empty: true }, after));
        }
        if let Some(after) = rest.strip_prefix('>') {
            return Ok((StartTag { name, attributes, empty: false }, after));
        }
        if rest.is_empty() {
            return Err(SchemaError::malformed(format!("<{}> is not terminated", name)));
        }
        let attr_end = rest.find(is_name_boundary).unwrap_or(rest.len());
        let attr_name = &rest[..attr_end];
        let after_name = rest[attr_end..].trim_start();
        let value = match after_name.strip_prefix('=') {
            Some(value) if !attr_name.is_empty() => value.trim_start(),
            _ => return Err(SchemaError::malformed(format!(
                "attribute '{}' of <{}> has no value", attr_name, name
            ))),
        };
        let quote = match value.chars().next() {
            Some(c @ ('"' | '\'')) => c,
            _ => return Err(SchemaError::malformed(format!(
                "the value of attribute '{}' of <{}> is not quoted", attr_name, name
            ))),
        };
        let body = &value[1..];
        let close = body.find(quote).ok_or_else(|| SchemaError::malformed(format!(
            "unterminated quote in attribute '{}' of <{}>", attr_name, name
        )))?;
        attributes.push((attr_name, unescape(&body[..close]).into_owned()));
        rest = &body[close + 1..];
    }
}


#[cfg(test)]
mod test {
    use super::{tokenize, StartTag, Token};

    use crate::schema::{SchemaError, SchemaResult};

    fn tokens(markup: &str) -> SchemaResult<Vec<Token<'_>>> {
        tokenize(markup).collect()
    }

    #[test]
    fn test_tokens() {
        let tokens = unwrap!(tokens(r#"a &amp; <b class='x y'>c</b><br/><!-- n --><?php x ?>"#));
        assert_eq!(tokens, vec![
            Token::Text("a &amp; "),
            Token::Start(StartTag {
                name: "b",
                attributes: vec![("class", "x y".to_owned())],
                empty: false,
            }),
            Token::Text("c"),
            Token::End("b"),
            Token::Start(StartTag { name: "br", attributes: vec![], empty: true }),
            Token::Comment(" n "),
            Token::ProcessingInstruction { target: "php", data: Some("x") },
        ]);
    }

    #[test]
    fn test_prefixes_of_a_tag() {
        let tokens = unwrap!(tokens(r#"<h:p xmlns:m="urn:m" m:a="1" xml:lang="en" b="2"/>"#));
        let Token::Start(ref tag) = tokens[0] else { panic!("expected a start tag") };
        assert_eq!(tag.used_prefixes().collect::<Vec<_>>(), ["h", "m"]);
        assert_eq!(tag.declared_prefixes().collect::<Vec<_>>(), ["m"]);
    }

    #[test]
    fn test_errors_end_the_iteration() {
        let mut iter = tokenize(r#"<a href="x>l</a>"#);
        assert_err!(unwrap!(iter.next().ok_or(())), SchemaError::MalformedMarkup(msg) => {
            assert!(msg.contains("unterminated quote"));
        });
        assert!(iter.next().is_none());
        assert_err!(tokens("<?  ?>"), SchemaError::MalformedMarkup(_) => { });
    }
}
