//! Label block parsing (panic-free).
//!
//! A label block is the text between `{` and `}` on an exposition line:
//! `name="value"` pairs separated by commas. Parsed sets are sorted by name so
//! two lines that list the same labels in a different order land on the same
//! series.

use std::iter::Peekable;
use std::str::Chars;

use serde::Serialize;

use crate::error::{LatProbeError, Result};

/// Histogram bucket upper bound label.
pub const LE: &str = "le";

/// One `name="value"` pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Label {
    pub name: String,
    pub value: String,
}

/// Parse a raw label block (without the braces) into a name-sorted label set.
///
/// Accepts surrounding whitespace and a trailing comma. Value escapes `\\`,
/// `\"` and `\n` are decoded.
pub fn parse_label_block(raw: &str) -> Result<Vec<Label>> {
    let mut out = Vec::new();
    let mut chars = raw.chars().peekable();

    loop {
        skip_ws(&mut chars);
        if chars.peek().is_none() {
            break;
        }

        let name = read_name(&mut chars)?;
        skip_ws(&mut chars);
        expect_char(&mut chars, '=')?;
        skip_ws(&mut chars);
        expect_char(&mut chars, '"')?;
        let value = read_quoted(&mut chars)?;
        out.push(Label { name, value });

        skip_ws(&mut chars);
        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(c) => {
                return Err(LatProbeError::Malformed(format!(
                    "unexpected '{c}' after label value"
                )))
            }
        }
    }

    out.sort();
    Ok(out)
}

/// Look up a label value by name.
pub fn find<'a>(labels: &'a [Label], name: &str) -> Option<&'a str> {
    labels
        .iter()
        .find(|l| l.name == name)
        .map(|l| l.value.as_str())
}

/// Find `name="value"` directly in a raw label block.
///
/// Used for blocks that did not parse as a whole. The name must start the
/// block or follow `,` or whitespace; the value runs to the next `"`.
pub fn scan_raw<'a>(raw: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("{name}=\"");
    raw.match_indices(needle.as_str()).find_map(|(start, _)| {
        let at_boundary = raw
            .get(..start)?
            .chars()
            .next_back()
            .map_or(true, |c| c == ',' || c.is_whitespace());
        if !at_boundary {
            return None;
        }
        let rest = raw.get(start + needle.len()..)?;
        rest.split_once('"').map(|(value, _)| value)
    })
}

/// Render a sorted label set back into exposition form (`a="1",b="2"`).
pub fn canonical(labels: &[Label]) -> String {
    labels
        .iter()
        .map(|l| format!("{}=\"{}\"", l.name, escape_label(&l.value)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn skip_ws(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

fn expect_char(chars: &mut Peekable<Chars<'_>>, want: char) -> Result<()> {
    match chars.next() {
        Some(c) if c == want => Ok(()),
        Some(c) => Err(LatProbeError::Malformed(format!(
            "expected '{want}' in label block, found '{c}'"
        ))),
        None => Err(LatProbeError::Malformed(format!(
            "expected '{want}' in label block, found end of input"
        ))),
    }
}

fn read_name(chars: &mut Peekable<Chars<'_>>) -> Result<String> {
    let mut name = String::new();
    if let Some(c) = chars.next_if(|c| c.is_ascii_alphabetic() || *c == '_') {
        name.push(c);
    } else {
        return Err(LatProbeError::Malformed("label name missing".into()));
    }
    while let Some(c) = chars.next_if(|c| c.is_ascii_alphanumeric() || *c == '_') {
        name.push(c);
    }
    Ok(name)
}

fn read_quoted(chars: &mut Peekable<Chars<'_>>) -> Result<String> {
    let mut value = String::new();
    loop {
        match chars.next() {
            None => {
                return Err(LatProbeError::Malformed(
                    "unterminated label value".into(),
                ))
            }
            Some('"') => return Ok(value),
            Some('\\') => match chars.next() {
                Some('n') => value.push('\n'),
                Some(c) => value.push(c),
                None => {
                    return Err(LatProbeError::Malformed(
                        "dangling escape in label value".into(),
                    ))
                }
            },
            Some(c) => value.push(c),
        }
    }
}
