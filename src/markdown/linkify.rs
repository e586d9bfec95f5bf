//! Detection of bare URLs in text.

use std::sync::LazyLock;

use regex::Regex;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:https?://|www\.)[^\s<>]+").expect("URL pattern is valid")
});

/// Characters that end a sentence rather than a URL.
const TRAILING_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', '\'', '"', '\u{2019}', '\u{201d}', '*', '_',
];

/// Piece of text split around detected URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkSegment<'a> {
    Text(&'a str),
    Link { href: String, text: &'a str },
}

/// Split `text` into plain runs and URLs.
pub fn split_links(text: &str) -> Vec<LinkSegment<'_>> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for found in URL_PATTERN.find_iter(text) {
        let url = trim_url(found.as_str());
        if url.is_empty() || !has_host(url) {
            continue;
        }
        let start = found.start();
        let end = start + url.len();

        if start > cursor {
            segments.push(LinkSegment::Text(&text[cursor..start]));
        }
        let href = if url.to_ascii_lowercase().starts_with("www.") {
            format!("http://{}", url)
        } else {
            url.to_string()
        };
        segments.push(LinkSegment::Link { href, text: url });
        cursor = end;
    }

    if cursor < text.len() {
        segments.push(LinkSegment::Text(&text[cursor..]));
    }

    segments
}

fn trim_url(mut url: &str) -> &str {
    loop {
        let Some(last) = url.chars().last() else {
            return url;
        };
        let unbalanced_paren = last == ')' && url.matches(')').count() > url.matches('(').count();
        if TRAILING_PUNCTUATION.contains(&last) || unbalanced_paren {
            url = &url[..url.len() - last.len_utf8()];
        } else {
            return url;
        }
    }
}

/// Reject bare prefixes such as "https://" or "www." with nothing after them.
fn has_host(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .or_else(|| lower.strip_prefix("www."))
        .unwrap_or("");
    rest.chars().next().is_some_and(|c| c.is_alphanumeric())
}
