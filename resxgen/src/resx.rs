//! Support for the `.resx` resource format.
//!
//! Only `<data>` and `<resheader>` elements are read; the inline schema,
//! `<assembly>` aliases and `<metadata>` entries are skipped. Values and
//! comments are carried through verbatim, with `\r\n` normalized to `\n` the
//! way XML readers report them.

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use serde::Serialize;
use std::io::{BufRead, Write};

use crate::{error::Error, traits::Parser};

const STANDARD_HEADERS: [(&str, &str); 4] = [
    ("resmimetype", "text/microsoft-resx"),
    ("version", "2.0"),
    (
        "reader",
        "System.Resources.ResXResourceReader, System.Windows.Forms, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089",
    ),
    (
        "writer",
        "System.Resources.ResXResourceWriter, System.Windows.Forms, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089",
    ),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Format {
    pub headers: Vec<ResHeader>,
    pub data: Vec<DataNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResHeader {
    pub name: String,
    pub value: String,
}

/// One `<data>` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataNode {
    pub name: String,
    /// `None` when the element declares no `<value>` child.
    pub value: Option<String>,
    pub comment: Option<String>,
    pub type_name: Option<String>,
    pub mime_type: Option<String>,
}

impl Format {
    /// An empty document carrying the standard resx headers.
    pub fn new() -> Self {
        Format {
            headers: STANDARD_HEADERS
                .iter()
                .map(|(name, value)| ResHeader {
                    name: name.to_string(),
                    value: value.to_string(),
                })
                .collect(),
            data: Vec::new(),
        }
    }

    pub fn add(&mut self, node: DataNode) {
        self.data.push(node);
    }

    pub fn find(&self, name: &str) -> Option<&DataNode> {
        self.data.iter().find(|node| node.name == name)
    }

    /// Name/value pairs of every string entry that has a value.
    pub fn string_values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data
            .iter()
            .filter(|node| node.is_string())
            .filter_map(|node| node.value.as_deref().map(|value| (node.name.as_str(), value)))
    }
}

impl DataNode {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        DataNode {
            name: name.into(),
            value: Some(value.into()),
            comment: None,
            type_name: None,
            mime_type: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Whether the entry holds plain string data.
    ///
    /// Entries with a `mimetype` (serialized objects) or a non-`System.String`
    /// type (file references, images, numbers) are not strings.
    pub fn is_string(&self) -> bool {
        if self.mime_type.is_some() {
            return false;
        }
        match &self.type_name {
            None => true,
            Some(type_name) => {
                let type_name = type_name.split(',').next().unwrap_or_default().trim();
                type_name == "System.String"
            }
        }
    }
}

impl Parser for Format {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut format = Format::default();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"data" => {
                    let node = parse_data_attributes(e)?;
                    format.data.push(parse_children(node, &mut xml_reader, b"data")?);
                }
                Ok(Event::Empty(ref e)) if e.name().as_ref() == b"data" => {
                    format.data.push(parse_data_attributes(e)?);
                }
                Ok(Event::Start(ref e)) if e.name().as_ref() == b"resheader" => {
                    let node = parse_data_attributes(e)?;
                    let node = parse_children(node, &mut xml_reader, b"resheader")?;
                    format.headers.push(ResHeader {
                        name: node.name,
                        value: node.value.unwrap_or_default(),
                    });
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Error::XmlParse(e)),
            }
            buf.clear();
        }
        Ok(format)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(&mut writer);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        xml_writer.write_event(Event::Start(BytesStart::new("root")))?;

        for header in &self.headers {
            let mut elem = BytesStart::new("resheader");
            elem.push_attribute(("name", header.name.as_str()));
            xml_writer.write_event(Event::Text(BytesText::new("\n  ")))?;
            xml_writer.write_event(Event::Start(elem))?;
            write_child(&mut xml_writer, "value", &header.value)?;
            xml_writer.write_event(Event::Text(BytesText::new("\n  ")))?;
            xml_writer.write_event(Event::End(BytesEnd::new("resheader")))?;
        }

        for node in &self.data {
            let mut elem = BytesStart::new("data");
            elem.push_attribute(("name", node.name.as_str()));
            if let Some(type_name) = &node.type_name {
                elem.push_attribute(("type", type_name.as_str()));
            }
            if let Some(mime_type) = &node.mime_type {
                elem.push_attribute(("mimetype", mime_type.as_str()));
            }
            elem.push_attribute(("xml:space", "preserve"));

            xml_writer.write_event(Event::Text(BytesText::new("\n  ")))?;
            xml_writer.write_event(Event::Start(elem))?;
            if let Some(value) = &node.value {
                write_child(&mut xml_writer, "value", value)?;
            }
            if let Some(comment) = &node.comment {
                write_child(&mut xml_writer, "comment", comment)?;
            }
            xml_writer.write_event(Event::Text(BytesText::new("\n  ")))?;
            xml_writer.write_event(Event::End(BytesEnd::new("data")))?;
        }

        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        xml_writer.write_event(Event::End(BytesEnd::new("root")))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        Ok(())
    }
}

fn write_child<W: Write>(xml_writer: &mut Writer<W>, tag: &str, text: &str) -> Result<(), Error> {
    xml_writer.write_event(Event::Text(BytesText::new("\n    ")))?;
    xml_writer.write_event(Event::Start(BytesStart::new(tag)))?;
    xml_writer.write_event(Event::Text(BytesText::new(text)))?;
    xml_writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn parse_data_attributes(e: &BytesStart) -> Result<DataNode, Error> {
    let mut name = None;
    let mut type_name = None;
    let mut mime_type = None;

    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(|e| Error::InvalidResource(e.to_string()))?;
        match attr.key.as_ref() {
            b"name" => name = Some(attr.unescape_value()?.to_string()),
            b"type" => type_name = Some(attr.unescape_value()?.to_string()),
            b"mimetype" => mime_type = Some(attr.unescape_value()?.to_string()),
            _ => {}
        }
    }
    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let name = name.ok_or_else(|| Error::InvalidResource(format!("{tag} tag missing 'name'")))?;

    Ok(DataNode {
        name,
        value: None,
        comment: None,
        type_name,
        mime_type,
    })
}

fn parse_children<R: BufRead>(
    mut node: DataNode,
    xml_reader: &mut Reader<R>,
    end: &[u8],
) -> Result<DataNode, Error> {
    let mut buf = Vec::new();
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"value" => node.value = Some(read_text(xml_reader, b"value")?),
                b"comment" => node.comment = Some(read_text(xml_reader, b"comment")?),
                _ => {
                    xml_reader.read_to_end_into(e.name(), &mut Vec::new())?;
                }
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"value" => node.value = Some(String::new()),
                b"comment" => node.comment = Some(String::new()),
                _ => {}
            },
            Ok(Event::End(e)) if e.name().as_ref() == end => break,
            Ok(Event::Eof) => {
                return Err(Error::InvalidResource(format!(
                    "unexpected end of file inside `{}`",
                    node.name
                )));
            }
            Ok(_) => {}
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }
    Ok(node)
}

fn read_text<R: BufRead>(xml_reader: &mut Reader<R>, end: &[u8]) -> Result<String, Error> {
    let mut buf = Vec::new();
    let mut text = String::new();
    loop {
        match xml_reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => text.push_str(&e.unescape().map_err(Error::XmlParse)?),
            Ok(Event::CData(e)) => text.push_str(&String::from_utf8_lossy(&e)),
            Ok(Event::End(e)) if e.name().as_ref() == end => break,
            Ok(Event::Eof) => {
                return Err(Error::InvalidResource("unexpected end of file".to_string()));
            }
            Ok(_) => {}
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }
    Ok(text.replace("\r\n", "\n"))
}
