//! Decoding of string and bytes literals

use std::iter::Peekable;
use std::str::Chars;

use super::ParseErrorKind;

/// The decoded value of one string literal
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Literal {
    Text(String),
    Bytes(Vec<u8>),
    /// An f-string; its replacement fields are not evaluated
    Formatted,
}

/// Decode the source text of one literal, including its prefix and quotes
pub(super) fn decode(lexeme: &str) -> Result<Literal, ParseErrorKind> {
    let quote_at = lexeme
        .find(['\'', '"'])
        .ok_or_else(|| ParseErrorKind::InvalidString(lexeme.to_string()))?;
    let (prefix, quoted) = lexeme.split_at(quote_at);
    let prefix = prefix.to_ascii_lowercase();
    let raw = prefix.contains('r');

    let quote = &quoted[..1];
    let delimiter = if quoted.len() >= 6 && quoted.starts_with(&quote.repeat(3)) {
        3
    } else {
        1
    };
    if quoted.len() < delimiter * 2 {
        return Err(ParseErrorKind::InvalidString(lexeme.to_string()));
    }
    // Source newlines inside literals always read as \n
    let body = quoted[delimiter..quoted.len() - delimiter]
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    if prefix.contains('f') {
        return Ok(Literal::Formatted);
    }
    if prefix.contains('b') {
        if !body.is_ascii() {
            return Err(ParseErrorKind::InvalidString(
                "bytes can only contain ASCII literal characters".to_string(),
            ));
        }
        return if raw {
            Ok(Literal::Bytes(body.into_bytes()))
        } else {
            unescape_bytes(&body).map(Literal::Bytes)
        };
    }
    if raw {
        Ok(Literal::Text(body))
    } else {
        unescape(&body).map(Literal::Text)
    }
}

fn unescape(body: &str) -> Result<String, ParseErrorKind> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            // Escaped newline continues the literal on the next line
            '\n' => {}
            '\\' | '\'' | '"' => out.push(next),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0C'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0B'),
            '0'..='7' => {
                let value = octal_escape(next, &mut chars);
                out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            'x' => out.push(code_point(hex_escape(&mut chars, 2, 'x')?)?),
            'u' => out.push(code_point(hex_escape(&mut chars, 4, 'u')?)?),
            'U' => out.push(code_point(hex_escape(&mut chars, 8, 'U')?)?),
            // Unknown escapes, and named escapes which need the Unicode name table, stay verbatim
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    Ok(out)
}

fn unescape_bytes(body: &str) -> Result<Vec<u8>, ParseErrorKind> {
    let mut out = Vec::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            push_ascii(&mut out, c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push(b'\\');
            break;
        };
        match next {
            '\n' => {}
            '\\' | '\'' | '"' => push_ascii(&mut out, next),
            'a' => out.push(0x07),
            'b' => out.push(0x08),
            'f' => out.push(0x0C),
            'n' => out.push(b'\n'),
            'r' => out.push(b'\r'),
            't' => out.push(b'\t'),
            'v' => out.push(0x0B),
            '0'..='7' => {
                let value = octal_escape(next, &mut chars);
                out.push(u8::try_from(value).map_err(|_| {
                    ParseErrorKind::InvalidString(format!("octal escape out of range: {value:o}"))
                })?);
            }
            'x' => {
                let value = hex_escape(&mut chars, 2, 'x')?;
                out.push(u8::try_from(value).unwrap_or(u8::MAX));
            }
            other => {
                out.push(b'\\');
                push_ascii(&mut out, other);
            }
        }
    }
    Ok(out)
}

/// Only called on ASCII input
fn push_ascii(out: &mut Vec<u8>, c: char) {
    let mut buf = [0; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

/// Up to three octal digits, the first already consumed
fn octal_escape(first: char, chars: &mut Peekable<Chars<'_>>) -> u32 {
    let mut value = first.to_digit(8).unwrap_or(0);
    for _ in 0..2 {
        match chars.peek().and_then(|c| c.to_digit(8)) {
            Some(digit) => {
                value = value * 8 + digit;
                chars.next();
            }
            None => break,
        }
    }
    value
}

fn hex_escape(
    chars: &mut Peekable<Chars<'_>>,
    digits: usize,
    marker: char,
) -> Result<u32, ParseErrorKind> {
    let mut value = 0u32;
    for _ in 0..digits {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| ParseErrorKind::InvalidString(format!("truncated \\{marker} escape")))?;
        value = value * 16 + digit;
    }
    Ok(value)
}

/// Lone surrogates have no `char` form and decode to U+FFFD
fn code_point(value: u32) -> Result<char, ParseErrorKind> {
    if value > 0x0010_FFFF {
        return Err(ParseErrorKind::InvalidString(format!(
            "illegal Unicode character \\U{value:08x}"
        )));
    }
    Ok(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER))
}
