//! Reading post-processor output files into lines.
//!
//! Files are decoded as UTF-8 first. Anything that is not valid UTF-8 is
//! decoded once more as Windows-1252, replacing bytes it cannot map, so a
//! readable file always produces lines.

use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1252;
use thiserror::Error;

/// Errors that can occur when reading an input file.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Input file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read `path` and split it into lines.
///
/// # Errors
///
/// Returns `InputError::NotFound` if the file doesn't exist and
/// `InputError::ReadError` if it cannot be read. Decoding never fails.
pub fn read_lines(path: &Path) -> Result<Vec<String>, InputError> {
    if !path.is_file() {
        return Err(InputError::NotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|source| InputError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    let text = decode(&bytes, path);
    Ok(split_lines(&text))
}

/// Windows-1252 leaves these bytes unassigned; `encoding_rs` passes them
/// through as the matching C1 controls.
const UNDEFINED_1252: [char; 5] = ['\u{81}', '\u{8D}', '\u{8F}', '\u{90}', '\u{9D}'];

/// Line boundaries: the usual newlines plus vertical tab, form feed, the
/// file/group/record separators, NEL and the Unicode line and paragraph
/// separators.
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Decode raw bytes as UTF-8, falling back to Windows-1252.
#[must_use]
pub fn decode(bytes: &[u8], path: &Path) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(e) => {
            tracing::info!(
                path = %path.display(),
                offset = e.valid_up_to(),
                "not valid UTF-8, decoding as Windows-1252"
            );
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            if text.contains(UNDEFINED_1252) {
                tracing::warn!(path = %path.display(), "replaced undecodable bytes");
                text.replace(UNDEFINED_1252, "\u{FFFD}")
            } else {
                text.into_owned()
            }
        }
    }
}

/// Split on any line boundary character, with `\r\n` counting as one break. A
/// trailing terminator does not produce an extra empty line.
#[must_use]
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        match rest.find(LINE_BREAKS) {
            Some(pos) => {
                lines.push(rest[..pos].to_string());
                let skip = if rest[pos..].starts_with("\r\n") {
                    2
                } else {
                    rest[pos..].chars().next().map_or(1, char::len_utf8)
                };
                rest = &rest[pos + skip..];
            }
            None => {
                lines.push(rest.to_string());
                break;
            }
        }
    }

    lines
}
