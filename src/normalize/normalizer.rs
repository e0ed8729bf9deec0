//! Text normalizer.
use std::fmt;
use std::str::FromStr;

use super::entities;
use super::markup::{Scanner, Token};
use super::urls::{self, UrlKind};

/// What to do with the text of `<a href=...>` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkText {
    /// Strip the anchor tag like any other tag: its text stays, its `href` goes.
    #[default]
    Keep,
    /// Replace the whole anchor element by the placeholder of its `href`.
    Placeholder,
}

impl FromStr for LinkText {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep" => Ok(LinkText::Keep),
            "placeholder" => Ok(LinkText::Placeholder),
            other => Err(format!(
                "unknown link text policy {other:?} (expected `keep` or `placeholder`)"
            )),
        }
    }
}

impl fmt::Display for LinkText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkText::Keep => f.write_str("keep"),
            LinkText::Placeholder => f.write_str("placeholder"),
        }
    }
}

/// Turns raw conversation text into clean text.
///
/// Normalizing is done in this order:
/// 1. character references are decoded,
/// 2. surrounding whitespace is trimmed,
/// 3. markup tags are removed, their text content is kept,
/// 4. URLs are replaced by `[URL-IMG]` or `[URL]`.
///
/// Normalizing never fails: malformed references and tags are kept as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Normalizer {
    link_text: LinkText,
}

impl Normalizer {
    pub fn new(link_text: LinkText) -> Self {
        Self { link_text }
    }

    pub fn normalize(&self, raw: &str) -> String {
        let decoded = entities::decode(raw);
        let text = self.strip_markup(decoded.trim());
        urls::replace(&text).into_owned()
    }

    /// Remove tags, decoding the text between them once more
    /// so that doubly escaped references come out as characters.
    fn strip_markup(&self, src: &str) -> String {
        let mut out = String::with_capacity(src.len());

        // text of an anchor that has been replaced by a placeholder
        let mut link: Option<String> = None;

        for token in Scanner::new(src) {
            match token {
                Token::Text(text) => match link.as_mut() {
                    Some(link) => link.push_str(&entities::decode(text)),
                    None => out.push_str(&entities::decode(text)),
                },
                Token::Start(tag)
                    if link.is_none()
                        && self.link_text == LinkText::Placeholder
                        && tag.is("a") =>
                {
                    if let Some(href) = tag.attribute("href") {
                        out.push_str(UrlKind::of(&entities::decode(href)).placeholder());
                        if !tag.self_closing() {
                            link = Some(String::new());
                        }
                    }
                }
                Token::End(name) if link.is_some() && name.eq_ignore_ascii_case("a") => {
                    link = None
                }
                _ => (),
            }
        }

        // anchor never closed: its text is kept
        if let Some(link) = link {
            out.push_str(&link);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANCHOR: &str = "Check this: <a href='http://x.com/cat.jpg'>here</a>";

    #[test]
    fn anchor_text_is_kept_by_default() {
        let n = Normalizer::default();
        assert_eq!(n.normalize(ANCHOR), "Check this: here");
    }

    #[test]
    fn anchor_placeholder() {
        let n = Normalizer::new(LinkText::Placeholder);
        assert_eq!(n.normalize(ANCHOR), "Check this: [URL-IMG]");
        assert_eq!(
            n.normalize("<a href=\"http://x.com/page\">a <b>link</b></a> after"),
            "[URL] after"
        );
        // no href: plain tag
        assert_eq!(n.normalize("<a name=\"top\">top</a>"), "top");
    }

    #[test]
    fn unclosed_anchor_keeps_text() {
        let n = Normalizer::new(LinkText::Placeholder);
        assert_eq!(
            n.normalize("<a href='http://x.com/p'>link and the rest of a long post"),
            "[URL]link and the rest of a long post"
        );
    }

    #[test]
    fn escaped_href() {
        let n = Normalizer::new(LinkText::Placeholder);
        assert_eq!(
            n.normalize("<a href='http://x.com/cat&amp;period;jpg'>cat</a>"),
            "[URL-IMG]"
        );
    }

    #[test]
    fn doubly_escaped_references() {
        let n = Normalizer::default();
        assert_eq!(
            n.normalize("caf&amp;eacute; x &amp;nbsp;y"),
            "caf\u{e9} x \u{a0}y"
        );
        assert_eq!(n.normalize("&amp;amp;lt;3"), "&lt;3");
    }

    #[test]
    fn plain_link() {
        for n in [
            Normalizer::new(LinkText::Keep),
            Normalizer::new(LinkText::Placeholder),
        ] {
            assert_eq!(n.normalize("Visit http://x.com/page"), "Visit [URL]");
        }
    }

    #[test]
    fn escaped_markup() {
        let n = Normalizer::default();
        assert_eq!(
            n.normalize("  I &lt;3 &lt;b&gt;this&lt;/b&gt; &amp; that&nbsp;  "),
            "I <3 this & that"
        );
    }

    #[test]
    fn url_revealed_by_stripping() {
        let n = Normalizer::default();
        assert_eq!(
            n.normalize("&lt;br /&gt;pic: http://i.imgur.com/x.PNG&lt;br /&gt;"),
            "pic: [URL-IMG]"
        );
    }

    #[test]
    fn idempotent_on_clean_text() {
        let n = Normalizer::default();
        for clean in [
            "",
            "just some words.",
            "Visit [URL] and look at [URL-IMG]",
            "I <3 you, a < b",
        ] {
            let once = n.normalize(clean);
            assert_eq!(once, clean);
            assert_eq!(n.normalize(&once), once);
        }
    }

    #[test]
    fn malformed_degrades() {
        let n = Normalizer::default();
        assert_eq!(n.normalize("AT&T <p class=\"x"), "AT&T <p class=\"x");
    }

    #[test]
    fn link_text_from_str() {
        assert_eq!("keep".parse::<LinkText>(), Ok(LinkText::Keep));
        assert_eq!("placeholder".parse::<LinkText>(), Ok(LinkText::Placeholder));
        assert!("drop".parse::<LinkText>().is_err());
    }
}
