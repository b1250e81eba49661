//! A minimal, lossless XML tree.
//!
//! Elements keep their original start tag (name and raw attributes) and the
//! namespace their prefix resolves to; everything else (text, comments,
//! declarations) is stored as the owned `quick-xml` event. Serializing a
//! parsed document without edits reproduces its input.

use std::{
    io::{BufRead, Write},
    path::Path,
};

use encoding_rs::Encoding;
use quick_xml::{
    Reader, Writer,
    events::{BytesStart, BytesText, Event},
};

use crate::{error::Error, files, traits::Parser};

/// Index path from the document's top-level nodes down to an element.
pub type NodePath = Vec<usize>;

#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Other(Event<'static>),
}

impl Node {
    /// A text node holding `text`, escaped as needed.
    pub fn text(text: &str) -> Self {
        Node::Other(Event::Text(BytesText::new(text).into_owned()))
    }

    /// The raw content of a text node made only of whitespace.
    pub fn as_whitespace(&self) -> Option<&str> {
        match self {
            Node::Other(Event::Text(text)) => std::str::from_utf8(text)
                .ok()
                .filter(|s| s.chars().all(char::is_whitespace)),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    start: BytesStart<'static>,
    namespace: Option<String>,
    children: Vec<Node>,
    empty: bool,
}

impl Element {
    /// Creates an element named `qualified_name` (optionally `prefix:local`).
    pub fn new(qualified_name: &str, namespace: Option<&str>) -> Self {
        Element {
            start: BytesStart::new(qualified_name.to_string()),
            namespace: namespace.map(str::to_string),
            children: Vec::new(),
            empty: false,
        }
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.start.push_attribute((key, value));
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.push(Node::text(text));
        self
    }

    pub fn qualified_name(&self) -> String {
        String::from_utf8_lossy(self.start.name().as_ref()).into_owned()
    }

    pub fn local_name(&self) -> String {
        String::from_utf8_lossy(self.start.local_name().as_ref()).into_owned()
    }

    pub fn prefix(&self) -> Option<String> {
        self.start
            .name()
            .prefix()
            .map(|prefix| String::from_utf8_lossy(prefix.as_ref()).into_owned())
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Unescaped value of attribute `key`.
    pub fn attribute(&self, key: &str) -> Option<String> {
        self.start
            .attributes()
            .with_checks(false)
            .filter_map(Result::ok)
            .find(|attr| attr.key.as_ref() == key.as_bytes())
            .and_then(|attr| attr.unescape_value().ok().map(|value| value.into_owned()))
    }

    /// Concatenated text content of the direct children.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Node::Other(Event::Text(text)) => match text.unescape() {
                    Ok(unescaped) => out.push_str(&unescaped),
                    Err(_) => out.push_str(&String::from_utf8_lossy(text)),
                },
                Node::Other(Event::CData(data)) => out.push_str(&String::from_utf8_lossy(data)),
                _ => {}
            }
        }
        out
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn push(&mut self, node: Node) {
        self.empty = false;
        self.children.push(node);
    }

    pub fn insert(&mut self, index: usize, node: Node) {
        self.empty = false;
        self.children.insert(index, node);
    }

    /// Whitespace text immediately before child `index`, if any.
    pub fn whitespace_before(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.children.get(i))
            .and_then(Node::as_whitespace)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
    bom: Option<&'static Encoding>,
}

type Scope = Vec<(Option<String>, String)>;

impl Document {
    /// Parses `text` into a tree.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(false);

        let mut nodes = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut scopes: Vec<Scope> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    scopes.push(namespace_declarations(&start)?);
                    let namespace = resolve_namespace(&start, &scopes);
                    stack.push(Element {
                        start: start.into_owned(),
                        namespace,
                        children: Vec::new(),
                        empty: false,
                    });
                }
                Event::Empty(start) => {
                    scopes.push(namespace_declarations(&start)?);
                    let namespace = resolve_namespace(&start, &scopes);
                    scopes.pop();
                    let element = Element {
                        start: start.into_owned(),
                        namespace,
                        children: Vec::new(),
                        empty: true,
                    };
                    attach(&mut stack, &mut nodes, Node::Element(element));
                }
                Event::End(_) => {
                    scopes.pop();
                    let element = stack.pop().ok_or_else(|| {
                        Error::InvalidManifest("closing tag without an open element".to_string())
                    })?;
                    attach(&mut stack, &mut nodes, Node::Element(element));
                }
                Event::Eof => break,
                other => attach(&mut stack, &mut nodes, Node::Other(other.into_owned())),
            }
        }

        if let Some(open) = stack.last() {
            return Err(Error::InvalidManifest(format!(
                "element `{}` is never closed",
                open.qualified_name()
            )));
        }
        if !nodes.iter().any(|node| matches!(node, Node::Element(_))) {
            return Err(Error::InvalidManifest("document has no root element".to_string()));
        }

        Ok(Document { nodes, bom: None })
    }

    pub fn root(&self) -> Option<&Element> {
        self.nodes.iter().find_map(Node::as_element)
    }

    pub fn has_utf8_bom(&self) -> bool {
        self.bom == Some(encoding_rs::UTF_8)
    }

    /// The byte-order mark the source started with; saving writes the same
    /// encoding back.
    pub fn bom(&self) -> Option<&'static Encoding> {
        self.bom
    }

    /// Paths of all elements matching `predicate`, in document order.
    pub fn find_all<F>(&self, predicate: F) -> Vec<NodePath>
    where
        F: Fn(&Element) -> bool,
    {
        fn walk<F: Fn(&Element) -> bool>(
            nodes: &[Node],
            path: &mut NodePath,
            predicate: &F,
            out: &mut Vec<NodePath>,
        ) {
            for (index, node) in nodes.iter().enumerate() {
                if let Node::Element(element) = node {
                    path.push(index);
                    if predicate(element) {
                        out.push(path.clone());
                    }
                    walk(&element.children, path, predicate, out);
                    path.pop();
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.nodes, &mut Vec::new(), &predicate, &mut out);
        out
    }

    pub fn element(&self, path: &[usize]) -> Option<&Element> {
        let (first, rest) = path.split_first()?;
        let mut current = self.nodes.get(*first)?.as_element()?;
        for index in rest {
            current = current.children.get(*index)?.as_element()?;
        }
        Some(current)
    }

    pub fn element_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let (first, rest) = path.split_first()?;
        let mut current = match self.nodes.get_mut(*first)? {
            Node::Element(element) => element,
            Node::Other(_) => return None,
        };
        for index in rest {
            current = match current.children.get_mut(*index)? {
                Node::Element(element) => element,
                Node::Other(_) => return None,
            };
        }
        Some(current)
    }

    /// Serializes the document to a string (without a byte-order mark).
    pub fn to_xml_string(&self) -> Result<String, Error> {
        let mut writer = Writer::new(Vec::new());
        for node in &self.nodes {
            write_node(&mut writer, node)?;
        }
        String::from_utf8(writer.into_inner())
            .map_err(|e| Error::InvalidManifest(e.to_string()))
    }
}

impl Parser for Document {
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let decoded = files::decode_bytes(&bytes)?;
        let mut document = Document::parse(&decoded.text)?;
        document.bom = decoded.bom;
        Ok(document)
    }

    /// Reads the file, remembering which byte-order mark it started with.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let decoded = files::read_decoded(path)?;
        let mut document = Document::parse(&decoded.text)?;
        document.bom = decoded.bom;
        Ok(document)
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let text = self.to_xml_string()?;
        writer.write_all(&files::encode_with_bom(&text, self.bom))?;
        Ok(())
    }
}

fn attach(stack: &mut [Element], nodes: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => nodes.push(node),
    }
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &Node) -> Result<(), Error> {
    match node {
        Node::Other(event) => writer.write_event(event.borrow())?,
        Node::Element(element) if element.empty && element.children.is_empty() => {
            writer.write_event(Event::Empty(element.start.borrow()))?
        }
        Node::Element(element) => {
            writer.write_event(Event::Start(element.start.borrow()))?;
            for child in &element.children {
                write_node(writer, child)?;
            }
            writer.write_event(Event::End(element.start.to_end()))?;
        }
    }
    Ok(())
}

fn namespace_declarations(start: &BytesStart) -> Result<Scope, Error> {
    let mut declared = Vec::new();
    for attr in start.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::InvalidManifest(e.to_string()))?;
        let key = attr.key.as_ref();
        if key == b"xmlns" {
            declared.push((None, attr.unescape_value()?.into_owned()));
        } else if let Some(prefix) = key.strip_prefix(b"xmlns:") {
            let prefix = String::from_utf8_lossy(prefix).into_owned();
            declared.push((Some(prefix), attr.unescape_value()?.into_owned()));
        }
    }
    Ok(declared)
}

/// Resolves the element's prefix against the innermost declaration in scope;
/// `xmlns=""` resets to no namespace.
fn resolve_namespace(start: &BytesStart, scopes: &[Scope]) -> Option<String> {
    let name = start.name();
    let prefix = name
        .prefix()
        .map(|prefix| String::from_utf8_lossy(prefix.as_ref()).into_owned());
    scopes
        .iter()
        .rev()
        .flat_map(|scope| scope.iter())
        .find(|(declared, _)| *declared == prefix)
        .map(|(_, uri)| uri.clone())
        .filter(|uri| !uri.is_empty())
}
