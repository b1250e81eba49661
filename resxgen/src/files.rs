//! File-system helpers shared by the resource reader, the manifest and the
//! generator.

use std::{fs, io::Read, path::Path};

use encoding_rs::Encoding;

use crate::error::Error;

/// Text decoded from a file, plus the byte-order mark it started with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub bom: Option<&'static Encoding>,
}

impl DecodedText {
    /// Whether the source began with a UTF-8 byte-order mark.
    pub fn has_utf8_bom(&self) -> bool {
        self.bom == Some(encoding_rs::UTF_8)
    }
}

/// Reads a file, auto-detecting a BOM and decoding to UTF-8.
pub fn read_decoded<P: AsRef<Path>>(path: P) -> Result<DecodedText, Error> {
    let bytes = fs::read(path)?;
    decode_bytes(&bytes)
}

/// Decodes raw bytes; UTF-16 input with a BOM is transcoded, anything else
/// must already be UTF-8.
pub fn decode_bytes(bytes: &[u8]) -> Result<DecodedText, Error> {
    let bom = Encoding::for_bom(bytes).map(|(encoding, _)| encoding);

    let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
        .bom_override(true)
        .strip_bom(true)
        .build(bytes);

    let mut text = String::new();
    decoder.read_to_string(&mut text)?;
    if let Some(stripped) = text.strip_prefix('\u{feff}') {
        text = stripped.to_string();
    }

    Ok(DecodedText { text, bom })
}

/// Encodes `text` back into the encoding announced by `bom`, writing the
/// mark itself first. Without a mark the text is written as plain UTF-8.
pub fn encode_with_bom(text: &str, bom: Option<&'static Encoding>) -> Vec<u8> {
    match bom {
        Some(encoding) if encoding == encoding_rs::UTF_16LE => {
            let mut bytes = vec![0xFF, 0xFE];
            bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
            bytes
        }
        Some(encoding) if encoding == encoding_rs::UTF_16BE => {
            let mut bytes = vec![0xFE, 0xFF];
            bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
            bytes
        }
        Some(_) => {
            let mut bytes = vec![0xEF, 0xBB, 0xBF];
            bytes.extend_from_slice(text.as_bytes());
            bytes
        }
        None => text.as_bytes().to_vec(),
    }
}

/// Writes `bytes` to `path`, clearing read-only protection on an existing
/// file first (source-controlled files are often checked out read-only).
#[allow(clippy::permissions_set_readonly_false)]
pub fn write_clearing_readonly<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<(), Error> {
    let path = path.as_ref();
    if let Ok(metadata) = fs::metadata(path) {
        let mut permissions = metadata.permissions();
        if permissions.readonly() {
            permissions.set_readonly(false);
            fs::set_permissions(path, permissions)?;
        }
    }
    fs::write(path, bytes)?;
    Ok(())
}
