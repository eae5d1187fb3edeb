//! Reversible escaping of plain text inside the stringified message form.
//!
//! Non-text segments are written as `{kind:payload}` blocks, so braces in
//! plain text must not appear literally:
//!
//! | raw | escaped |
//! |-----|---------|
//! | `\` | `\\`    |
//! | `[` | `\[`    |
//! | `]` | `\]`    |
//! | `{` | `[[`    |
//! | `}` | `]]`    |
//!
//! Every other character is copied unchanged.

use crate::error::EscapeError;

/// Escapes `text` for embedding in a stringified message.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '[' => out.push_str("\\["),
            ']' => out.push_str("\\]"),
            '{' => out.push_str("[["),
            '}' => out.push_str("]]"),
            c => out.push(c),
        }
    }
    out
}

/// Reverses [`escape`].
///
/// Fails when an introducer (`\`, `[` or `]`) ends the input or is followed
/// by a character it does not pair with.
pub fn unescape(escaped: &str) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.char_indices();

    while let Some((position, c)) = chars.next() {
        if !matches!(c, '\\' | '[' | ']') {
            out.push(c);
            continue;
        }

        let Some((_, next)) = chars.next() else {
            return Err(EscapeError::TrailingIntroducer {
                position,
                introducer: c,
            });
        };

        let decoded = match (c, next) {
            ('\\', '\\' | '[' | ']') => next,
            ('[', '[') => '{',
            (']', ']') => '}',
            _ => {
                return Err(EscapeError::InvalidSequence {
                    position,
                    introducer: c,
                    found: next,
                });
            }
        };
        out.push(decoded);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_table() {
        assert_eq!(escape("{}"), "[[]]");
        assert_eq!(escape("\\"), "\\\\");
        assert_eq!(escape("a[b]c"), "a\\[b\\]c");
        assert_eq!(escape("a{b}c"), "a[[b]]c");
        assert_eq!(escape("plain text"), "plain text");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn test_unescape_inverts_escape() {
        for raw in ["", "hello", "{}", "[[", "]]", "\\[{]}\\", "a{b}c", "中文{表情}"] {
            assert_eq!(unescape(&escape(raw)).as_deref(), Ok(raw));
        }
    }

    #[test]
    fn test_unescape_trailing_introducer() {
        assert_eq!(
            unescape("abc\\"),
            Err(EscapeError::TrailingIntroducer {
                position: 3,
                introducer: '\\'
            })
        );
        assert!(matches!(
            unescape("["),
            Err(EscapeError::TrailingIntroducer { position: 0, .. })
        ));
    }

    #[test]
    fn test_unescape_invalid_sequence() {
        assert_eq!(
            unescape("[x"),
            Err(EscapeError::InvalidSequence {
                position: 0,
                introducer: '[',
                found: 'x'
            })
        );
        assert!(matches!(
            unescape("ok\\q"),
            Err(EscapeError::InvalidSequence { position: 2, found: 'q', .. })
        ));
        assert!(unescape("a]b").is_err());
    }
}
