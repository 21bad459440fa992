//! Brace-balance scanner for object literals inlined in script text.

use crate::errors::ParseError;

/// Returns the object literal that starts at the first non-whitespace
/// character at or after `from`.
///
/// Braces inside string literals (double or single quoted, with backslash
/// escapes) do not count toward nesting, so the literal may contain nested
/// objects and arbitrary string content.
///
/// # Errors
///
/// Returns [`ParseError::MissingObject`] if the next token is not `{`, and
/// [`ParseError::UnterminatedLiteral`] if the text ends before the literal is
/// closed.
pub fn scan_object_literal(text: &str, from: usize) -> Result<&str, ParseError> {
    let rest = text.get(from..).ok_or(ParseError::MissingObject)?;
    let skipped = rest.len() - rest.trim_start().len();
    let start = from + skipped;

    if !text[start..].starts_with('{') {
        return Err(ParseError::MissingObject);
    }

    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut escaped = false;

    for (offset, &byte) in text.as_bytes()[start..].iter().enumerate() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == q {
                quote = None;
            }
            continue;
        }

        match byte {
            b'"' | b'\'' => quote = Some(byte),
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    Err(ParseError::UnterminatedLiteral { start })
}
