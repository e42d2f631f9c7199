//! Line-oriented `key=value` property files.
//!
//! The grammar follows the classic property-file rules: `#` and `!` start
//! comments, a key ends at the first unescaped `=`, `:` or whitespace, an odd
//! number of trailing backslashes continues the logical line, and values may
//! contain `\t`, `\n`, `\r`, `\f` and `\uXXXX` escapes.

use std::io::Read;
use std::iter::Peekable;

use super::{Charset, DecodeError, Decoder, Entries, read_bytes};

/// Decoder for text property files.
///
/// Without an explicit encoding the bytes are read as ISO-8859-1, so
/// non-Latin text must either use `\uXXXX` escapes or name its encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PropertiesDecoder;

impl PropertiesDecoder {
    /// Parse already-decoded property text.
    ///
    /// Later duplicates of a key replace earlier ones.
    ///
    /// ```
    /// use bundlekit_common::PropertiesDecoder;
    ///
    /// let entries = PropertiesDecoder::parse("# greeting\nhello = Hello, \\\n    world\n")
    ///     .expect("valid properties");
    /// assert_eq!(entries.get("hello").map(String::as_str), Some("Hello, world"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Malformed`] for a broken `\uXXXX` escape or an
    /// unpaired surrogate.
    pub fn parse(text: &str) -> Result<Entries, DecodeError> {
        let mut entries = Entries::new();
        for line in logical_lines(text) {
            let (raw_key, raw_value) = split_entry(&line);
            entries.insert(unescape(raw_key)?, unescape(raw_value)?);
        }
        Ok(entries)
    }
}

impl Decoder for PropertiesDecoder {
    fn decode(&self, stream: &mut dyn Read, encoding: Option<&str>) -> Result<Entries, DecodeError> {
        let charset = Charset::for_label(encoding)?;
        let bytes = read_bytes(stream)?;
        Self::parse(&charset.decode(&bytes)?)
    }
}

const fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{c}')
}

const fn is_line_end(c: char) -> bool {
    matches!(c, '\n' | '\r')
}

fn ends_with_odd_backslashes(line: &[char]) -> bool {
    line.iter().rev().take_while(|&&c| c == '\\').count() % 2 == 1
}

fn skip_while<I, F>(chars: &mut Peekable<I>, mut predicate: F)
where
    I: Iterator<Item = char>,
    F: FnMut(char) -> bool,
{
    while chars.next_if(|&c| predicate(c)).is_some() {}
}

/// Split `text` into logical lines with comments, blank lines, and
/// continuations already handled. Escapes are left in place.
fn logical_lines(text: &str) -> Vec<Vec<char>> {
    let mut lines = Vec::new();
    let mut chars = text.chars().peekable();

    loop {
        skip_while(&mut chars, |c| is_blank(c) || is_line_end(c));
        let Some(&first) = chars.peek() else {
            break;
        };

        if matches!(first, '#' | '!') {
            skip_while(&mut chars, |c| !is_line_end(c));
            continue;
        }

        let mut line = Vec::new();
        loop {
            match chars.next() {
                None => {
                    if ends_with_odd_backslashes(&line) {
                        line.pop();
                    }
                    break;
                }
                Some(end) if is_line_end(end) => {
                    if !ends_with_odd_backslashes(&line) {
                        break;
                    }
                    line.pop();
                    if end == '\r' {
                        chars.next_if_eq(&'\n');
                    }
                    skip_while(&mut chars, is_blank);
                }
                Some(c) => line.push(c),
            }
        }
        lines.push(line);
    }

    lines
}

/// Separate the raw key from the raw value of one logical line.
fn split_entry(line: &[char]) -> (&[char], &[char]) {
    let mut key_end = line.len();
    let mut value_start = line.len();
    let mut has_separator = false;
    let mut escaped = false;

    for (index, &c) in line.iter().enumerate() {
        if !escaped && matches!(c, '=' | ':') {
            (key_end, value_start, has_separator) = (index, index + 1, true);
            break;
        }
        if !escaped && is_blank(c) {
            (key_end, value_start) = (index, index + 1);
            break;
        }
        escaped = c == '\\' && !escaped;
    }

    let rest = line.get(value_start..).unwrap_or_default();
    let mut skipped = 0;
    for &c in rest {
        if is_blank(c) {
            skipped += 1;
        } else if !has_separator && matches!(c, '=' | ':') {
            has_separator = true;
            skipped += 1;
        } else {
            break;
        }
    }

    (
        line.get(..key_end).unwrap_or_default(),
        rest.get(skipped..).unwrap_or_default(),
    )
}

fn unescape(raw: &[char]) -> Result<String, DecodeError> {
    let mut units: Vec<u16> = Vec::with_capacity(raw.len());
    let mut buffer = [0_u16; 2];
    let mut chars = raw.iter().copied();

    while let Some(c) = chars.next() {
        let decoded = if c == '\\' {
            match chars.next() {
                Some('u') => {
                    units.push(read_code_unit(&mut chars)?);
                    continue;
                }
                Some('t') => '\t',
                Some('n') => '\n',
                Some('r') => '\r',
                Some('f') => '\u{c}',
                Some(other) => other,
                None => break,
            }
        } else {
            c
        };
        units.extend_from_slice(decoded.encode_utf16(&mut buffer));
    }

    String::from_utf16(&units)
        .map_err(|_| DecodeError::malformed("unpaired surrogate in \\uXXXX escape"))
}

fn read_code_unit(chars: &mut impl Iterator<Item = char>) -> Result<u16, DecodeError> {
    let mut value = 0_u32;
    for _ in 0..4 {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| DecodeError::malformed("malformed \\uXXXX escape"))?;
        value = value * 16 + digit;
    }
    u16::try_from(value).map_err(|_| DecodeError::malformed("malformed \\uXXXX escape"))
}
