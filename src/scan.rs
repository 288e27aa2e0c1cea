//! C13: the symbol-dump scanner.
//!
//! A line-oriented parser for `nm -f posix`-style input. Grounded on
//! `scan_file` in `original_source/ldep.c`; kept entirely decoupled from
//! the graph (it knows nothing about [`crate::graph::LinkGraph`]), producing
//! the same [`crate::graph::ingest::Record`] stream the ingestor consumes,
//! matching §4.9's "text format decoupled from the in-memory model" goal.

use crate::graph::ingest::Record;

/// Lines longer than this are a fatal scan error, mirroring the reference
/// tool's fixed `MAXBUF`.
pub const MAX_LINE: usize = 500;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("{input}:{line}: line exceeds the {MAX_LINE}-byte scan buffer")]
    LineTooLong { input: String, line: usize },

    #[error(
        "{input}:{line}: object header not ':'-terminated - did you use 'nm -f posix'?"
    )]
    MissingHeaderColon { input: String, line: usize },

    #[error("{input}:{line}: malformed symbol entry '{text}'")]
    MalformedSymbolEntry {
        input: String,
        line: usize,
        text: String,
    },
}

/// Parses one already-trimmed, non-empty line of scan input. `line_no` and
/// `input_name` are used only to annotate errors.
///
/// A line with a single whitespace-separated field must end in `:` (an
/// object/library header); a line with two or more fields is a symbol
/// entry (`name type_char [start end]`, with `start`/`end` ignored, as in
/// the reference tool).
pub fn scan_line<'a>(
    input_name: &str,
    line_no: usize,
    line: &'a str,
) -> Result<Option<Record<'a>>, ScanError> {
    if line.len() > MAX_LINE {
        return Err(ScanError::LineTooLong {
            input: input_name.to_string(),
            line: line_no,
        });
    }

    let trimmed = line.trim_end_matches(['\r', '\n']);
    if trimmed.trim().is_empty() {
        return Ok(None);
    }

    let mut fields = trimmed.split_whitespace();
    let first = fields.next().expect("non-empty line has at least one field");

    match fields.next() {
        None => match first.strip_suffix(':') {
            Some(name) => Ok(Some(Record::ObjectHeader(name))),
            None => Err(ScanError::MissingHeaderColon {
                input: input_name.to_string(),
                line: line_no,
            }),
        },
        Some(type_field) => {
            let mut chars = type_field.chars();
            let type_char = chars.next().ok_or_else(|| ScanError::MalformedSymbolEntry {
                input: input_name.to_string(),
                line: line_no,
                text: trimmed.to_string(),
            })?;
            if chars.next().is_some() {
                return Err(ScanError::MalformedSymbolEntry {
                    input: input_name.to_string(),
                    line: line_no,
                    text: trimmed.to_string(),
                });
            }
            Ok(Some(Record::SymbolEntry {
                name: first,
                type_char,
            }))
        }
    }
}
