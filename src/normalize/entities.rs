//! Lenient character reference decoding.
//!
//! Named references are looked up in the HTML5 entity table shipped with `quick-xml`.
//! Anything that does not resolve is kept as literal text.
use std::borrow::Cow;

use quick_xml::escape::resolve_html5_entity;

/// Longest reference body (between `&` and `;`) we look at.
const MAX_REFERENCE_LEN: usize = 32;

/// Decode named, decimal and hexadecimal character references.
///
/// Unknown or unterminated references are left untouched, and numeric references
/// that do not map to a valid character decode to U+FFFD.
pub fn decode(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];

        match reference_body(tail) {
            Some(body) if push_reference(body, &mut out) => {
                // body + ';'
                rest = &tail[body.len() + 1..];
            }
            _ => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}

/// Get the text between `&` and the closing `;`, if it is short enough and has no blanks.
#[inline]
fn reference_body(tail: &str) -> Option<&str> {
    for (idx, c) in tail.char_indices().take(MAX_REFERENCE_LEN + 1) {
        match c {
            ';' if idx > 0 => return Some(&tail[..idx]),
            ';' | '&' | '<' => return None,
            c if c.is_whitespace() => return None,
            _ => (),
        }
    }
    None
}

/// Push the decoded reference into `out`, returning false if it is not a reference.
fn push_reference(body: &str, out: &mut String) -> bool {
    if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(|c: char| c == 'x' || c == 'X') {
            Some(hex) if !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()) => {
                u32::from_str_radix(hex, 16).ok()
            }
            None if !num.is_empty() && num.chars().all(|c| c.is_ascii_digit()) => {
                num.parse::<u32>().ok()
            }
            _ => return false,
        };

        let c = code
            .filter(|&code| code != 0)
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        out.push(c);
        return true;
    }

    match resolve_html5_entity(body) {
        Some(decoded) => {
            out.push_str(decoded);
            true
        }
        None => false,
    }
}
