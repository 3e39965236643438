use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{Result, SalesError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
    Windows1252,
}

impl TextEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
            Self::Windows1252 => "cp1252",
        }
    }

    /// Strict decode of the whole buffer. `None` if any byte sequence is not
    /// representable in this encoding.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => encoding_rs::UTF_8
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|s| s.into_owned()),
            Self::Latin1 => Some(encoding_rs::mem::decode_latin1(bytes).into_owned()),
            Self::Windows1252 => encoding_rs::WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|s| s.into_owned()),
        }
    }
}

/// Tried in order; the first one that decodes everything wins.
pub const CANDIDATE_ENCODINGS: &[TextEncoding] = &[
    TextEncoding::Utf8,
    TextEncoding::Latin1,
    TextEncoding::Windows1252,
];

pub fn decode_text(bytes: &[u8]) -> Option<(String, TextEncoding)> {
    CANDIDATE_ENCODINGS
        .iter()
        .find_map(|enc| enc.decode(bytes).map(|text| (text, *enc)))
}

fn line_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\r\n|[\n\r\x0B\x0C\x1C-\x1E\x{85}\x{2028}\x{2029}]").expect("static regex")
    })
}

/// Drop the header (first raw line), trim the rest and skip blanks.
/// Any Unicode line boundary ends a line, including a lone `\r`.
pub fn data_lines(text: &str) -> Vec<String> {
    line_break_re()
        .split(text)
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_sales_data(path: &Path) -> Result<Vec<String>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SalesError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    let (text, encoding) =
        decode_text(&bytes).ok_or_else(|| SalesError::Encoding(path.to_path_buf()))?;
    debug!(path = %path.display(), encoding = encoding.name(), "decoded sales file");
    Ok(data_lines(&text))
}

/// Pipeline entry point: a missing or undecodable file degrades to no data.
pub fn read_sales_data_or_empty(path: &Path) -> Vec<String> {
    match read_sales_data(path) {
        Ok(lines) => lines,
        Err(e) => {
            warn!("{e}");
            Vec::new()
        }
    }
}
