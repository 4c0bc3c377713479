use base64::prelude::*;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // RFC 2047 encoded-word: =?charset?B|Q?payload?=
    static ref ENCODED_WORD: Regex =
        Regex::new(r"=\?[^?]+\?([bBqQ])\?([^?]*)\?=").unwrap();
}

const ZERO_WIDTH_CHARS: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}'];

/// Fold common homoglyphs (Cyrillic, Greek, digit substitutions) to their
/// Latin lookalike so that "paypa1" and "paypal" compare equal.
pub fn fold_homoglyphs(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| match c {
            '0' | 'О' | 'о' | 'ο' => 'o',
            '1' | 'l' | 'І' | 'і' | '|' => 'i',
            '3' => 'e',
            '4' => 'a',
            '5' => 's',
            '7' => 't',
            '8' => 'b',
            'а' | 'α' | 'ɑ' => 'a',
            'е' => 'e',
            'р' => 'p',
            'с' => 'c',
            'у' => 'y',
            'х' => 'x',
            'ν' => 'v',
            'ω' => 'w',
            'ɡ' => 'g',
            _ => c,
        })
        .collect()
}

pub fn strip_zero_width(s: &str) -> String {
    s.chars().filter(|c| !ZERO_WIDTH_CHARS.contains(c)).collect()
}

/// Decode RFC 2047 encoded-words in a header value. Undecodable payloads are
/// left in place rather than dropped.
pub fn decode_encoded_words(value: &str) -> String {
    ENCODED_WORD
        .replace_all(value, |caps: &regex::Captures| {
            let encoding = &caps[1];
            let payload = &caps[2];
            match encoding {
                "b" | "B" => BASE64_STANDARD
                    .decode(payload)
                    .ok()
                    .and_then(|bytes| String::from_utf8(bytes).ok())
                    .unwrap_or_else(|| caps[0].to_string()),
                _ => decode_q_encoding(payload),
            }
        })
        .into_owned()
}

// Q-encoding: '_' is space, =XX is a hex-encoded byte
fn decode_q_encoding(payload: &str) -> String {
    let mut bytes = Vec::with_capacity(payload.len());
    let mut chars = payload.chars();
    while let Some(c) = chars.next() {
        match c {
            '_' => bytes.push(b' '),
            '=' => {
                let hi = chars.next();
                let lo = chars.next();
                match (hi, lo) {
                    (Some(h), Some(l)) => {
                        if let Ok(byte) = u8::from_str_radix(&format!("{h}{l}"), 16) {
                            bytes.push(byte);
                        }
                    }
                    _ => bytes.push(b'='),
                }
            }
            _ => {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Full header normalization: decode encoded-words, then drop zero-width
/// characters used to break up keywords.
pub fn normalize_header(value: &str) -> String {
    strip_zero_width(&decode_encoded_words(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_homoglyphs() {
        assert_eq!(fold_homoglyphs("paypa1"), fold_homoglyphs("paypal"));
        assert_eq!(fold_homoglyphs("PayPa1"), fold_homoglyphs("paypal"));
        assert_eq!(fold_homoglyphs("аpple"), "apple"); // Cyrillic а
        assert_eq!(fold_homoglyphs("netf1ix"), fold_homoglyphs("netflix"));
        assert_eq!(fold_homoglyphs("example"), "exampie"); // l folds with 1
    }

    #[test]
    fn test_strip_zero_width() {
        assert_eq!(strip_zero_width("pay\u{200B}pal"), "paypal");
        assert_eq!(strip_zero_width("plain"), "plain");
    }

    #[test]
    fn test_decode_base64_encoded_word() {
        // "Hello" in base64
        assert_eq!(decode_encoded_words("=?UTF-8?B?SGVsbG8=?="), "Hello");
    }

    #[test]
    fn test_decode_q_encoded_word() {
        assert_eq!(
            decode_encoded_words("=?utf-8?Q?Your_invoice?="),
            "Your invoice"
        );
        assert_eq!(decode_encoded_words("=?iso-8859-1?q?=41=42?="), "AB");
    }

    #[test]
    fn test_undecodable_payload_kept() {
        let raw = "=?UTF-8?B?not-base64!!?=";
        assert_eq!(decode_encoded_words(raw), raw);
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(normalize_header("Your July invoice"), "Your July invoice");
    }
}
