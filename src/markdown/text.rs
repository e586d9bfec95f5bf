//! Plain-text extraction from rendered HTML.

use std::sync::LazyLock;

use regex::Regex;

static MARKUP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->|<[^>]*>").expect("markup pattern is valid"));

/// Strip tags and comments from `html`, decode entities and trim.
pub fn html_to_text(html: &str) -> String {
    let stripped = MARKUP_PATTERN.replace_all(html, "");
    decode_entities(&stripped).trim().to_string()
}

/// Decode named and numeric character references.
///
/// Numeric references are always decoded. Named references cover the
/// markup escapes plus the common Latin-1 and typographic names; any other
/// name, or a malformed reference, is left as written.
pub fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        match tail.find(';').filter(|semi| *semi <= 32) {
            Some(semi) => match decode_reference(&tail[1..semi]) {
                Some(ch) => {
                    out.push(ch);
                    rest = &tail[semi + 1..];
                }
                None => {
                    out.push('&');
                    rest = &tail[1..];
                }
            },
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }

    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "ndash" => Some('\u{2013}'),
        "mdash" => Some('\u{2014}'),
        "hellip" => Some('\u{2026}'),
        "lsquo" => Some('\u{2018}'),
        "rsquo" => Some('\u{2019}'),
        "ldquo" => Some('\u{201c}'),
        "rdquo" => Some('\u{201d}'),
        "laquo" => Some('\u{ab}'),
        "raquo" => Some('\u{bb}'),
        "bull" => Some('\u{2022}'),
        "middot" => Some('\u{b7}'),
        "copy" => Some('\u{a9}'),
        "reg" => Some('\u{ae}'),
        "trade" => Some('\u{2122}'),
        "deg" => Some('\u{b0}'),
        "plusmn" => Some('\u{b1}'),
        "times" => Some('\u{d7}'),
        "divide" => Some('\u{f7}'),
        "micro" => Some('\u{b5}'),
        "sect" => Some('\u{a7}'),
        "para" => Some('\u{b6}'),
        "cent" => Some('\u{a2}'),
        "pound" => Some('\u{a3}'),
        "yen" => Some('\u{a5}'),
        "euro" => Some('\u{20ac}'),
        "larr" => Some('\u{2190}'),
        "rarr" => Some('\u{2192}'),
        "uarr" => Some('\u{2191}'),
        "darr" => Some('\u{2193}'),
        "check" => Some('\u{2713}'),
        "cross" => Some('\u{2717}'),
        _ => None,
    }
}
