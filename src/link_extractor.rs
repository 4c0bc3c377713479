use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ANCHOR_LINK: Regex =
        Regex::new(r#"(?is)<a\s[^>]*href=["']([^"']+)["'][^>]*>(.*?)</a>"#).unwrap();
    static ref MARKDOWN_LINK: Regex =
        Regex::new(r"\[([^\]]+)\]\((https?://[^)\s]+)\)").unwrap();
    static ref PLAIN_URL: Regex = Regex::new(r#"https?://[^\s<>"')\]]+"#).unwrap();
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
}

/// A hyperlink found in free text. `text` is the visible label when the
/// source form carries one (anchor, Markdown), None for bare URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    pub text: Option<String>,
    pub href: String,
}

/// Extract HTML anchors, Markdown links, and bare URLs from free text.
/// Deduplicated by href, first occurrence wins, order preserved.
pub fn extract_links(text: &str) -> Vec<LinkRef> {
    let mut links: Vec<LinkRef> = Vec::new();

    for cap in ANCHOR_LINK.captures_iter(text) {
        let label = HTML_TAG.replace_all(&cap[2], "").trim().to_string();
        push_unique(
            &mut links,
            LinkRef {
                text: if label.is_empty() { None } else { Some(label) },
                href: cap[1].trim().to_string(),
            },
        );
    }

    for cap in MARKDOWN_LINK.captures_iter(text) {
        push_unique(
            &mut links,
            LinkRef {
                text: Some(cap[1].trim().to_string()),
                href: cap[2].to_string(),
            },
        );
    }

    for m in PLAIN_URL.find_iter(text) {
        let href = m.as_str().trim_end_matches(&['.', ',', ';'][..]).to_string();
        push_unique(&mut links, LinkRef { text: None, href });
    }

    links
}

fn push_unique(links: &mut Vec<LinkRef>, link: LinkRef) {
    if !links.iter().any(|l| l.href == link.href) {
        links.push(link);
    }
}
