//! URL detection and placeholder replacement.
//!
//! The pattern is John Gruber's "liberal, accurate" URL matcher
//! (<https://gist.github.com/gruber/249502>).
use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Placeholder for links to images.
pub const IMAGE_PLACEHOLDER: &str = "[URL-IMG]";
/// Placeholder for any other link.
pub const URL_PLACEHOLDER: &str = "[URL]";

/// Path suffixes that make a link an image link.
pub const IMAGE_EXTENSIONS: [&str; 3] = [".png", ".jpg", ".jpeg"];

lazy_static! {
    static ref URL: Regex = Regex::new(concat!(
        r"(?i)\b(",
        // scheme, www prefix or domain followed by a slash
        r"(?:[a-z][\w-]+:(?:/{1,3}|[a-z0-9%])|www\d{0,3}[.]|[a-z0-9.\-]+[.][a-z]{2,4}/)",
        // body, with up to two levels of balanced parens
        r"(?:[^\s()<>]+|\(([^\s()<>]+|(\([^\s()<>]+\)))*\))+",
        // no trailing punctuation
        r#"(?:\(([^\s()<>]+|(\([^\s()<>]+\)))*\)|[^\s`!()\[\]{};:'".,<>?«»“”‘’])"#,
        r")"
    ))
    .unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    Image,
    Other,
}

impl UrlKind {
    /// Classify a link from the extension of its path (query and fragment are ignored).
    pub fn of(url: &str) -> Self {
        let path = match url.find(|c: char| c == '?' || c == '#') {
            Some(end) => &url[..end],
            None => url,
        };
        let path = path.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
            UrlKind::Image
        } else {
            UrlKind::Other
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            UrlKind::Image => IMAGE_PLACEHOLDER,
            UrlKind::Other => URL_PLACEHOLDER,
        }
    }
}

/// Replace every URL-like substring of `text` by its placeholder.
pub fn replace(text: &str) -> Cow<'_, str> {
    URL.replace_all(text, |caps: &Captures| UrlKind::of(&caps[0]).placeholder())
}
