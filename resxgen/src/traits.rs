//! Traits for reading and writing the XML documents resxgen works with.

use std::{
    io::{BufRead, Cursor, Write},
    path::Path,
};

use crate::{error::Error, files};

/// A trait for parsing and writing one document from/to one file.
///
/// `read_from` decodes the file with BOM detection before parsing, so UTF-16
/// resource files and manifests saved with a byte-order mark are accepted.
///
/// # Example
///
/// ```rust,no_run
/// use resxgen::traits::Parser;
/// let resx = resxgen::resx::Format::read_from("Properties/Strings.resx")?;
/// resx.write_to("Properties/Strings.copy.resx")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let decoded = files::read_decoded(path)?;
        Self::from_str(&decoded.text)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path, clearing read-only protection on an existing file.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut buffer = Vec::new();
        self.to_writer(&mut buffer)?;
        files::write_clearing_readonly(path, &buffer)
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }

    /// Parse from bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(bytes))
    }
}
