//! Escape handling for quoted string literals.

use crate::parser::{ParseError, ParseErrorKind, Span};

/// Resolve escape sequences in the body of a string literal.
///
/// `offset` is the byte offset of `body` within `source`, used to point the
/// error at the offending escape.
pub(crate) fn unescape(body: &str, source: &str, offset: usize) -> Result<String, ParseError> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some((j, escaped)) = chars.next() else {
            return Err(invalid(body, source, offset, i, body.len()));
        };
        let resolved = match escaped {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            _ => return Err(invalid(body, source, offset, i, j + escaped.len_utf8())),
        };
        out.push(resolved);
    }
    Ok(out)
}

fn invalid(body: &str, source: &str, offset: usize, start: usize, end: usize) -> ParseError {
    ParseError::new(
        ParseErrorKind::InvalidEscape {
            sequence: body[start..end].to_string(),
        },
        source,
        Span::new(offset + start, offset + end),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(unescape("standard", "'standard'", 1).unwrap(), "standard");
    }

    #[test]
    fn known_escapes_resolve() {
        assert_eq!(
            unescape(r#"a\nb\t\'c\"\\"#, "", 0).unwrap(),
            "a\nb\t'c\"\\"
        );
    }

    #[test]
    fn unknown_escape_points_at_sequence() {
        let source = r"'ab\qc'";
        let err = unescape(r"ab\qc", source, 1).unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::InvalidEscape {
                sequence: r"\q".to_string()
            }
        );
        assert_eq!(err.span, Span::new(3, 5));
    }
}
