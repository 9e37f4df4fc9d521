//! # Canonical Envelope Layout
//!
//! Both PSK layers share one byte layout:
//!
//! ```text
//! ["PSK/1.0\n"]        optional status line (public layer only)
//! "Name: Value\n"*     header lines, insertion order
//! "\n"                 blank line — the layer delimiter
//! <body bytes>         raw, appended unmodified
//! ```
//!
//! Pure bytes-in/bytes-out — no I/O, no crypto. The body is never
//! inspected here; the blank line is found by scanning from the start, so
//! body bytes containing `"\n\n"` are unambiguous.

use serde::Serialize;

use crate::config::{DATA_DELIMITER, STATUS_LINE};

use super::error::ProtocolError;
use super::headers::Headers;

/// A decoded envelope layer: its headers and raw body bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub headers: Headers,
    pub body: Vec<u8>,
}

/// Encodes one envelope layer.
///
/// With `status_line` set, the literal `PSK/1.0` line is emitted first.
/// An empty body encodes as zero bytes after the delimiter.
pub fn encode(status_line: bool, headers: &Headers, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(64 + body.len());
    if status_line {
        out.extend_from_slice(STATUS_LINE.as_bytes());
        out.push(b'\n');
    }
    for (name, value) in headers.iter() {
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(b": ");
        out.extend_from_slice(value.as_bytes());
        out.push(b'\n');
    }
    out.push(b'\n');
    out.extend_from_slice(body);
    out
}

/// Encodes one envelope layer with a structured body, canonicalized to
/// UTF-8 JSON.
pub fn encode_json<T: Serialize>(
    status_line: bool,
    headers: &Headers,
    body: &T,
) -> Result<Vec<u8>, serde_json::Error> {
    Ok(encode(status_line, headers, &serde_json::to_vec(body)?))
}

/// Decodes one envelope layer.
///
/// The first blank line splits header text from body. With
/// `expect_status_line` set, the first header-text line must be exactly
/// `PSK/1.0`.
///
/// # Errors
///
/// - [`ProtocolError::InvalidRequest`] — no delimiter, or non-UTF-8
///   header text.
/// - [`ProtocolError::InvalidStatusLine`] — status line expected and the
///   first line is something else.
/// - [`ProtocolError::InvalidHeaderLine`] — a line that is not
///   `Name: Value`.
pub fn decode(bytes: &[u8], expect_status_line: bool) -> Result<Envelope, ProtocolError> {
    // A layer with no status line and no headers is just the delimiter's
    // trailing newline followed by the body.
    let (head, body) = if bytes.first() == Some(&b'\n') {
        (&bytes[..0], &bytes[1..])
    } else {
        let delimiter = DATA_DELIMITER.as_bytes();
        let index = bytes
            .windows(delimiter.len())
            .position(|w| w == delimiter)
            .ok_or(ProtocolError::InvalidRequest)?;
        (&bytes[..index], &bytes[index + delimiter.len()..])
    };

    let head = std::str::from_utf8(head).map_err(|_| ProtocolError::InvalidRequest)?;
    let mut lines = head.split('\n').filter(|l| !l.is_empty());

    if expect_status_line {
        match lines.next() {
            Some(line) if line == STATUS_LINE => {}
            other => {
                return Err(ProtocolError::InvalidStatusLine(
                    other.unwrap_or_default().to_string(),
                ))
            }
        }
    }

    let mut headers = Headers::new();
    for line in lines {
        let (name, value) = line
            .split_once(": ")
            .filter(|(n, v)| !n.is_empty() && !v.is_empty())
            .ok_or_else(|| ProtocolError::InvalidHeaderLine(line.to_string()))?;
        headers.insert(name, value);
    }

    Ok(Envelope {
        headers,
        body: body.to_vec(),
    })
}
