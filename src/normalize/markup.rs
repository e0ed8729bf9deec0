/*! Inline markup scanning.

Splits a string into text runs and tags. A `<` that does not open a well-formed
tag (`a < b`, `<3`, an unterminated `<p class="x`) is handed back as text.
!*/
use std::collections::BTreeSet;

/// Start tag, with its raw attribute string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag<'a> {
    name: &'a str,
    attributes: &'a str,
    self_closing: bool,
}

impl<'a> StartTag<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn self_closing(&self) -> bool {
        self.self_closing
    }

    /// Get the value of attribute `key` (case insensitive), quotes removed.
    pub fn attribute(&self, key: &str) -> Option<&'a str> {
        let mut rest = self.attributes;
        loop {
            rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '/');
            if rest.is_empty() {
                return None;
            }

            let name_end = rest
                .find(|c: char| c.is_whitespace() || c == '=')
                .unwrap_or(rest.len());
            let name = &rest[..name_end];
            rest = rest[name_end..].trim_start();

            let value = match rest.strip_prefix('=') {
                Some(after) => {
                    let after = after.trim_start();
                    let (value, remaining) = split_value(after);
                    rest = remaining;
                    value
                }
                None => "",
            };

            if name.eq_ignore_ascii_case(key) {
                return Some(value);
            }
        }
    }
}

/// Split an attribute value from what follows it.
fn split_value(s: &str) -> (&str, &str) {
    match s.chars().next() {
        Some(q @ ('"' | '\'')) => match s[1..].find(q) {
            Some(end) => (&s[1..end + 1], &s[end + 2..]),
            None => (&s[1..], ""),
        },
        _ => {
            let end = s.find(char::is_whitespace).unwrap_or(s.len());
            (&s[..end], &s[end..])
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Text(&'a str),
    Start(StartTag<'a>),
    End(&'a str),
    /// Comments, declarations and processing instructions.
    Other,
}

/// Iterator over the [Token]s of a string.
///
/// The scanner only holds a cursor into the source string,
/// each scan starts from a fresh one.
pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn text_until_next_tag(&mut self, skip: usize) -> Token<'a> {
        let rest = &self.src[self.pos..];
        let end = rest[skip..]
            .find('<')
            .map(|idx| idx + skip)
            .unwrap_or(rest.len());
        self.pos += end;
        Token::Text(&rest[..end])
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.src[self.pos..];
        if rest.is_empty() {
            return None;
        }

        if !rest.starts_with('<') {
            return Some(self.text_until_next_tag(0));
        }

        match lex_tag(rest) {
            Some((token, len)) => {
                self.pos += len;
                Some(token)
            }
            // literal '<'
            None => Some(self.text_until_next_tag(1)),
        }
    }
}

#[inline]
fn tag_name_len(s: &str) -> usize {
    s.find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')))
        .unwrap_or(s.len())
}

/// Lex a tag at the start of `s`, returning the token and its length in bytes.
fn lex_tag(s: &str) -> Option<(Token<'_>, usize)> {
    if let Some(comment) = s.strip_prefix("<!--") {
        let end = comment.find("-->")?;
        return Some((Token::Other, 4 + end + 3));
    }
    if s.starts_with("<!") || s.starts_with("<?") {
        let end = s.find('>')?;
        return Some((Token::Other, end + 1));
    }
    if let Some(closing) = s.strip_prefix("</") {
        if !closing.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return None;
        }
        let name = &closing[..tag_name_len(closing)];
        let end = closing.find('>')?;
        return Some((Token::End(name), 2 + end + 1));
    }

    let opening = &s[1..];
    if !opening.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let name_len = tag_name_len(opening);
    let after_name = &opening[name_len..];
    if !after_name.starts_with(|c: char| c.is_whitespace() || c == '>' || c == '/') {
        return None;
    }
    let end = tag_end(after_name)?;

    let inner = &after_name[..end];
    let self_closing = inner.trim_end().ends_with('/');
    let token = Token::Start(StartTag {
        name: &opening[..name_len],
        attributes: inner,
        self_closing,
    });

    Some((token, 1 + name_len + end + 1))
}

/// Find the closing `>` of a start tag, skipping quoted attribute values.
fn tag_end(s: &str) -> Option<usize> {
    let mut quote = None;
    let mut prev = ' ';
    for (idx, c) in s.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => continue,
            None => match c {
                '>' => return Some(idx),
                '"' | '\'' if prev == '=' => quote = Some(c),
                _ => (),
            },
        }
        if !c.is_whitespace() {
            prev = c;
        }
    }
    None
}

/// Collect the (lowercased) names of the start tags found in `text`.
pub fn tag_names(text: &str) -> BTreeSet<String> {
    Scanner::new(text)
        .filter_map(|token| match token {
            Token::Start(tag) => Some(tag.name().to_ascii_lowercase()),
            _ => None,
        })
        .collect()
}
