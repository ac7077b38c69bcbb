//! Front-matter parser.
//!
//! # Responsibility
//! - Detect an optional `---` delimited header at the top of an entry.
//! - Decode the header block into tags and a syntax hint.
//!
//! # Invariants
//! - Content not starting with a `---` line is returned byte-for-byte as
//!   the body.
//! - An opened header without a closing `---` line is a parse failure.
//! - Unknown header fields are ignored.

use serde::{Deserialize, Deserializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DELIMITER_LINE: &str = "---\n";

pub type ParseResult<T> = Result<T, ParseError>;

/// Front-matter parse failure. Both variants are the `MalformedHeader` kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Header opened with `---` but never closed.
    UnclosedHeader,
    /// Header block is not valid structured data.
    InvalidHeader(String),
}

impl ParseError {
    pub fn is_malformed_header(&self) -> bool {
        matches!(self, Self::UnclosedHeader | Self::InvalidHeader(_))
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnclosedHeader => write!(f, "malformed header: failed to delimit header"),
            Self::InvalidHeader(message) => {
                write!(f, "malformed header: failed to decode header: {message}")
            }
        }
    }
}

impl Error for ParseError {}

/// Recognized header fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EntryHeader {
    #[serde(default)]
    pub syntax: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
}

/// Parsed `(header, body)` pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedEntry {
    pub header: EntryHeader,
    pub body: String,
}

/// Parses raw entry content.
///
/// # Errors
/// - [`ParseError::UnclosedHeader`] when the closing delimiter is missing.
/// - [`ParseError::InvalidHeader`] when the header block cannot be decoded.
pub fn parse_entry(raw: &str) -> ParseResult<ParsedEntry> {
    let Some(rest) = raw.strip_prefix(DELIMITER_LINE) else {
        return Ok(ParsedEntry {
            header: EntryHeader::default(),
            body: raw.to_string(),
        });
    };

    let (block, body) = split_header(rest).ok_or(ParseError::UnclosedHeader)?;
    Ok(ParsedEntry {
        header: decode_header(block)?,
        body: body.to_string(),
    })
}

/// Splits at the first line consisting of exactly `---\n`.
///
/// The closing delimiter needs its newline; `---` as the final line without
/// one does not close the header.
fn split_header(rest: &str) -> Option<(&str, &str)> {
    if let Some(body) = rest.strip_prefix(DELIMITER_LINE) {
        return Some(("", body));
    }
    rest.find("\n---\n")
        .map(|idx| (&rest[..=idx], &rest[idx + 5..]))
}

fn decode_header(block: &str) -> ParseResult<EntryHeader> {
    if block.trim().is_empty() {
        return Ok(EntryHeader::default());
    }

    serde_yaml::from_str::<Option<EntryHeader>>(block)
        .map(Option::unwrap_or_default)
        .map_err(|err| ParseError::InvalidHeader(err.to_string()))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
