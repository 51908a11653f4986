//! HTML fragment parser.
//!
//! Parses `.askew` and `.asite` sources into the DOM tree. This is a strict
//! subset of HTML5: tags must nest exactly (no implied end tags), stray
//! closing tags are errors. `.askew` sources are parsed under a body context;
//! `.asite` sources as a document with an optional doctype.

use super::ast::{Attribute, Element, Node};
use crate::error::{Error, Result};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Parse a source fragment (body context) into a list of top-level nodes.
pub fn parse_fragment(input: &str) -> Result<Vec<Node>> {
    Parser::new(input).parse_nodes(None)
}

/// Parse a full document. A leading `<!DOCTYPE …>` is skipped.
pub fn parse_document(input: &str) -> Result<Vec<Node>> {
    Parser::new(input).parse_nodes(None)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Parser {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, c)| self.chars.get(self.pos + i).copied() == Some(c))
    }

    fn starts_with_ignore_case(&self, s: &str) -> bool {
        s.chars().enumerate().all(|(i, c)| {
            self.chars
                .get(self.pos + i)
                .map(|g| g.eq_ignore_ascii_case(&c))
                .unwrap_or(false)
        })
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn parse_nodes(&mut self, closing: Option<&str>) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();
        loop {
            if self.eof() {
                return match closing {
                    Some(name) => Err(Error::parse(format!(
                        ": missing closing tag </{}>",
                        name
                    ))),
                    None => Ok(nodes),
                };
            }
            if self.starts_with("</") {
                let name = self.parse_closing_tag()?;
                return match closing {
                    Some(c) if c == name => Ok(nodes),
                    _ => Err(Error::parse(format!(
                        ": unexpected closing tag </{}>",
                        name
                    ))),
                };
            }
            if self.starts_with("<!--") {
                nodes.push(self.parse_comment()?);
            } else if self.starts_with("<!") {
                // doctype or other markup declaration
                while let Some(c) = self.bump() {
                    if c == '>' {
                        break;
                    }
                }
            } else if self.peek() == Some('<')
                && matches!(self.chars.get(self.pos + 1), Some(c) if c.is_ascii_alphabetic())
            {
                nodes.push(Node::Element(self.parse_element()?));
            } else {
                nodes.push(Node::Text(self.parse_text()?));
            }
        }
    }

    fn parse_text(&mut self) -> Result<String> {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '<'
                && (self.starts_with("</")
                    || self.starts_with("<!")
                    || matches!(self.chars.get(self.pos + 1), Some(n) if n.is_ascii_alphabetic()))
            {
                break;
            }
            if c == '&' {
                text.push_str(&self.parse_char_ref());
            } else {
                text.push(c);
                self.pos += 1;
            }
        }
        Ok(text)
    }

    fn parse_char_ref(&mut self) -> String {
        let start = self.pos;
        self.pos += 1; // '&'
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c == ';' || name.len() > 8 {
                break;
            }
            if !c.is_ascii_alphanumeric() && c != '#' && c != 'x' && c != 'X' {
                break;
            }
            name.push(c);
            self.pos += 1;
        }
        if self.peek() != Some(';') {
            self.pos = start + 1;
            return "&".to_string();
        }
        self.pos += 1; // ';'
        let decoded = match name.as_str() {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{a0}'),
            _ => {
                if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
                } else if let Some(dec) = name.strip_prefix('#') {
                    dec.parse::<u32>().ok().and_then(char::from_u32)
                } else {
                    None
                }
            }
        };
        match decoded {
            Some(c) => c.to_string(),
            None => {
                self.pos = start + 1;
                "&".to_string()
            }
        }
    }

    fn parse_comment(&mut self) -> Result<Node> {
        self.pos += 4; // "<!--"
        let mut content = String::new();
        loop {
            if self.eof() {
                return Err(Error::parse(": unterminated comment"));
            }
            if self.starts_with("-->") {
                self.pos += 3;
                return Ok(Node::Comment(content));
            }
            if let Some(c) = self.bump() {
                content.push(c);
            }
        }
    }

    fn parse_name(&mut self) -> Result<String> {
        let mut name = String::new();
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() => {}
            _ => return Err(Error::parse(": malformed tag name")),
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == ':' || c == '-' || c == '_' {
                name.push(c.to_ascii_lowercase());
                self.pos += 1;
            } else {
                break;
            }
        }
        Ok(name)
    }

    fn parse_closing_tag(&mut self) -> Result<String> {
        self.pos += 2; // "</"
        let name = self.parse_name()?;
        self.skip_ws();
        if self.bump() != Some('>') {
            return Err(Error::parse(format!(": malformed closing tag </{}", name)));
        }
        Ok(name)
    }

    fn parse_element(&mut self) -> Result<Element> {
        self.pos += 1; // '<'
        let name = self.parse_name()?;
        let mut el = Element::new(&name);
        loop {
            self.skip_ws();
            if self.starts_with("/>") {
                self.pos += 2;
                return Ok(el);
            }
            match self.peek() {
                None => return Err(Error::parse(format!(": unterminated tag <{}>", name))),
                Some('>') => {
                    self.pos += 1;
                    break;
                }
                _ => {
                    let attr = self.parse_attribute()?;
                    el.attrs.push(attr);
                }
            }
        }
        if VOID_ELEMENTS.contains(&name.as_str()) {
            return Ok(el);
        }
        if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            el.children = vec![Node::Text(self.parse_raw_text(&name)?)];
            return Ok(el);
        }
        el.children = self.parse_nodes(Some(&name))?;
        Ok(el)
    }

    fn parse_attribute(&mut self) -> Result<Attribute> {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() || c == '=' || c == '>' || c == '/' {
                break;
            }
            name.push(c.to_ascii_lowercase());
            self.pos += 1;
        }
        if name.is_empty() {
            return Err(Error::parse(": malformed attribute"));
        }
        self.skip_ws();
        if self.peek() != Some('=') {
            return Ok(Attribute {
                name,
                value: String::new(),
            });
        }
        self.pos += 1;
        self.skip_ws();
        let value = match self.peek() {
            Some(q @ ('"' | '\'')) => {
                self.pos += 1;
                let mut value = String::new();
                loop {
                    match self.peek() {
                        None => {
                            return Err(Error::parse(format!(
                                ": unterminated value for attribute `{}`",
                                name
                            )))
                        }
                        Some(c) if c == q => {
                            self.pos += 1;
                            break;
                        }
                        Some('&') => value.push_str(&self.parse_char_ref()),
                        Some(c) => {
                            value.push(c);
                            self.pos += 1;
                        }
                    }
                }
                value
            }
            _ => {
                let mut value = String::new();
                while let Some(c) = self.peek() {
                    if c.is_ascii_whitespace() || c == '>' {
                        break;
                    }
                    value.push(c);
                    self.pos += 1;
                }
                value
            }
        };
        Ok(Attribute { name, value })
    }

    fn parse_raw_text(&mut self, name: &str) -> Result<String> {
        let close = format!("</{}", name);
        let mut text = String::new();
        loop {
            if self.eof() {
                return Err(Error::parse(format!(": missing closing tag </{}>", name)));
            }
            if self.starts_with_ignore_case(&close) {
                self.pos += close.chars().count();
                self.skip_ws();
                if self.bump() != Some('>') {
                    return Err(Error::parse(format!(": malformed closing tag </{}", name)));
                }
                return Ok(text);
            }
            if let Some(c) = self.bump() {
                text.push(c);
            }
        }
    }
}
