//! Markup parsing and serialization
//!
//! Bridges between raw markup text and the [`crate::dom`] tree. The
//! parser is deliberately small: it understands exactly the dialect found
//! in native project artifacts (elements, attributes, text, comments,
//! CDATA, an optional declaration) and preserves comments as tree nodes so
//! the merge engine can address them. DOCTYPE and processing instructions
//! are skipped with a warning.
//!
//! Serialization is a deterministic pure function of the tree: same tree
//! in, same bytes out. That determinism is what lets callers compare two
//! runs of the tool byte for byte.

use log::warn;

use crate::dom::{Attributes, Document, Element, Node};
use crate::error::{Error, Result};

/// Parse markup text into a document tree.
pub fn parse(input: &str) -> Result<Document> {
    let mut parser = Parser::new(input);
    parser.parse_document()
}

/// Serialize a document tree back to markup text.
///
/// 2-space indentation, attribute order as stored, minimal entity
/// escaping, self-closing empty elements, and an element whose only child
/// is text collapsed onto one line. Output always ends with a newline.
pub fn serialize(document: &Document) -> String {
    let mut output = String::new();
    if let Some(declaration) = &document.declaration {
        output.push_str(declaration);
        output.push('\n');
    }
    for comment in &document.prolog_comments {
        output.push_str("<!--");
        output.push_str(comment);
        output.push_str("-->\n");
    }
    write_node(&mut output, &document.root, 0);
    output
}

fn write_node(output: &mut String, node: &Node, depth: usize) {
    for _ in 0..depth {
        output.push_str("  ");
    }
    match node {
        Node::Text(value) => {
            output.push_str(&escape_text(value));
            output.push('\n');
        }
        Node::Comment(value) => {
            output.push_str("<!--");
            output.push_str(value);
            output.push_str("-->\n");
        }
        Node::Element(element) => write_element(output, element, depth),
    }
}

fn write_element(output: &mut String, element: &Element, depth: usize) {
    output.push('<');
    output.push_str(&element.name);
    for (key, value) in &element.attributes {
        output.push(' ');
        output.push_str(key);
        output.push_str("=\"");
        output.push_str(&escape_attribute(value));
        output.push('"');
    }

    match element.children.as_slice() {
        [] => output.push_str("/>\n"),
        [Node::Text(value)] => {
            output.push('>');
            output.push_str(&escape_text(value));
            output.push_str("</");
            output.push_str(&element.name);
            output.push_str(">\n");
        }
        children => {
            output.push_str(">\n");
            for child in children {
                write_node(output, child, depth + 1);
            }
            for _ in 0..depth {
                output.push_str("  ");
            }
            output.push_str("</");
            output.push_str(&element.name);
            output.push_str(">\n");
        }
    }
}

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        // A UTF-8 BOM is formatting, not content.
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn parse_document(&mut self) -> Result<Document> {
        self.skip_whitespace();

        let declaration = if self.starts_with("<?xml") {
            Some(self.take_through("?>", "unterminated declaration")?.to_string())
        } else {
            None
        };

        let mut prolog_comments = Vec::new();
        loop {
            self.skip_whitespace();
            if self.starts_with("<!--") {
                prolog_comments.push(self.parse_comment()?);
            } else if self.starts_with("<!") {
                warn!("skipping markup declaration before document root");
                self.skip_doctype()?;
            } else if self.starts_with("<?") {
                warn!("skipping processing instruction before document root");
                self.take_through("?>", "unterminated processing instruction")?;
            } else {
                break;
            }
        }

        if self.current() != Some(b'<') {
            return Err(self.error("expected document root element"));
        }
        let root = Node::Element(self.parse_element()?);

        loop {
            self.skip_whitespace();
            if self.starts_with("<!--") {
                warn!("dropping comment after document root");
                self.parse_comment()?;
            } else {
                break;
            }
        }
        if !self.at_end() {
            return Err(self.error("unexpected content after document root"));
        }

        Ok(Document {
            declaration,
            prolog_comments,
            root,
        })
    }

    fn parse_element(&mut self) -> Result<Element> {
        self.expect(b'<')?;
        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        if self.eat("/>") {
            return Ok(Element {
                name,
                attributes,
                children: Vec::new(),
            });
        }
        self.expect(b'>')?;

        let mut children = Vec::new();
        loop {
            if self.starts_with("</") {
                self.pos += 2;
                let closing = self.parse_name()?;
                if closing != name {
                    return Err(self.error(format!(
                        "mismatched closing tag: expected </{name}>, found </{closing}>"
                    )));
                }
                self.skip_whitespace();
                self.expect(b'>')?;
                break;
            }
            if self.starts_with("<!--") {
                children.push(Node::Comment(self.parse_comment()?));
                continue;
            }
            if self.starts_with("<![CDATA[") {
                children.push(Node::Text(self.parse_cdata()?));
                continue;
            }
            if self.starts_with("<?") {
                warn!("skipping processing instruction inside <{}>", name);
                self.take_through("?>", "unterminated processing instruction")?;
                continue;
            }
            if self.starts_with("<!") {
                return Err(self.error("unexpected markup declaration inside element"));
            }
            if self.current() == Some(b'<') {
                children.push(Node::Element(self.parse_element()?));
                continue;
            }
            if self.at_end() {
                return Err(self.error(format!("unterminated element <{name}>")));
            }
            if let Some(text) = self.parse_text()? {
                children.push(Node::Text(text));
            }
        }

        Ok(Element {
            name,
            attributes,
            children,
        })
    }

    fn parse_attributes(&mut self) -> Result<Attributes> {
        let mut attributes = Attributes::new();
        loop {
            self.skip_whitespace();
            match self.current() {
                Some(b'/') | Some(b'>') => break,
                Some(_) => {}
                None => return Err(self.error("unexpected end of input in tag")),
            }

            let key = self.parse_name()?;
            self.skip_whitespace();
            self.expect(b'=')?;
            self.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attributes.contains_key(&key) {
                return Err(self.error(format!("duplicate attribute '{key}'")));
            }
            attributes.insert(key, value);
        }
        Ok(attributes)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.current() {
            Some(quote @ (b'"' | b'\'')) => quote,
            _ => return Err(self.error("expected quoted attribute value")),
        };
        self.pos += 1;

        let start = self.pos;
        while let Some(byte) = self.current() {
            if byte == quote {
                let raw = &self.input[start..self.pos];
                self.pos += 1;
                return Ok(decode_entities(raw));
            }
            self.pos += 1;
        }
        Err(self.error("unterminated attribute value"))
    }

    fn parse_text(&mut self) -> Result<Option<String>> {
        let start = self.pos;
        while let Some(byte) = self.current() {
            if byte == b'<' {
                break;
            }
            self.pos += 1;
        }
        let raw = &self.input[start..self.pos];
        let text = decode_entities(raw.trim());
        if text.is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }

    fn parse_name(&mut self) -> Result<String> {
        let start = self.pos;
        match self.current() {
            Some(byte) if is_name_start(byte) => self.pos += 1,
            _ => return Err(self.error("expected name")),
        }
        while let Some(byte) = self.current() {
            if is_name_char(byte) {
                self.pos += 1;
            } else {
                break;
            }
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_comment(&mut self) -> Result<String> {
        self.pos += 4; // "<!--"
        let start = self.pos;
        match self.input[start..].find("-->") {
            Some(offset) => {
                let value = self.input[start..start + offset].to_string();
                self.pos = start + offset + 3;
                Ok(value)
            }
            None => Err(self.error("unterminated comment")),
        }
    }

    fn parse_cdata(&mut self) -> Result<String> {
        self.pos += 9; // "<![CDATA["
        let start = self.pos;
        match self.input[start..].find("]]>") {
            Some(offset) => {
                let value = self.input[start..start + offset].to_string();
                self.pos = start + offset + 3;
                Ok(value)
            }
            None => Err(self.error("unterminated CDATA section")),
        }
    }

    fn skip_doctype(&mut self) -> Result<()> {
        // "<!DOCTYPE ...>", possibly with an internal subset in brackets.
        let mut in_subset = false;
        while let Some(byte) = self.current() {
            self.pos += 1;
            match byte {
                b'[' => in_subset = true,
                b']' => in_subset = false,
                b'>' if !in_subset => return Ok(()),
                _ => {}
            }
        }
        Err(self.error("unterminated markup declaration"))
    }

    fn take_through(&mut self, terminator: &str, message: &str) -> Result<&'a str> {
        let start = self.pos;
        match self.input[start..].find(terminator) {
            Some(offset) => {
                let end = start + offset + terminator.len();
                self.pos = end;
                Ok(&self.input[start..end])
            }
            None => Err(self.error(message)),
        }
    }

    fn current(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.input[self.pos..].starts_with(prefix)
    }

    fn eat(&mut self, prefix: &str) -> bool {
        if self.starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        if self.current() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", char::from(byte))))
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(byte) = self.current() {
            if byte.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        let consumed = &self.input[..self.pos];
        let line = consumed.matches('\n').count() + 1;
        let column = consumed.chars().rev().take_while(|ch| *ch != '\n').count() + 1;
        Error::Parse {
            message: message.into(),
            line,
            column,
        }
    }
}

fn is_name_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || byte == b':' || byte >= 0x80
}

fn is_name_char(byte: u8) -> bool {
    is_name_start(byte) || byte.is_ascii_digit() || byte == b'-' || byte == b'.'
}

fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let mut decoded = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(position) = rest.find('&') {
        decoded.push_str(&rest[..position]);
        rest = &rest[position..];
        match rest.find(';') {
            // Entities are short; a distant semicolon means a bare ampersand.
            Some(end) if end <= 10 => {
                let entity = &rest[1..end];
                let replacement = match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    _ => decode_numeric_entity(entity),
                };
                match replacement {
                    Some(ch) => {
                        decoded.push(ch);
                        rest = &rest[end + 1..];
                    }
                    None => {
                        decoded.push('&');
                        rest = &rest[1..];
                    }
                }
            }
            _ => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }
    decoded.push_str(rest);
    decoded
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<u32>().ok()?,
    };
    char::from_u32(code)
}
