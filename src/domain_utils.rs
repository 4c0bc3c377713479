use url::Url;

/// Minimal domain hierarchy utilities
pub struct DomainUtils;

impl DomainUtils {
    /// Extract domain from an email address, handling "Name <user@host>" forms
    pub fn extract_domain(email: &str) -> Option<String> {
        let address = match (email.rfind('<'), email.rfind('>')) {
            (Some(start), Some(end)) if start < end => &email[start + 1..end],
            _ => email.trim(),
        };
        address
            .rsplit('@')
            .next()
            .filter(|d| !d.is_empty() && *d != address)
            .map(|d| d.trim().to_lowercase())
    }

    /// Public-suffix-aware registered domain (eTLD+1). Falls back to the raw
    /// hostname when the suffix list has no answer.
    pub fn registered_domain(host: &str) -> String {
        let host = Self::canonicalize_domain(host);
        psl::domain_str(&host)
            .map(|d| d.to_string())
            .unwrap_or(host)
    }

    /// Registered domain of a URL, or None when the URL does not parse or has
    /// no hostname (mailto:, data:, ...)
    pub fn url_registered_domain(raw_url: &str) -> Option<String> {
        let parsed = Url::parse(raw_url).ok()?;
        let host = parsed.host_str()?;
        Some(Self::registered_domain(host))
    }

    /// Hostname of a URL, lowercased
    pub fn url_host(raw_url: &str) -> Option<String> {
        Url::parse(raw_url)
            .ok()?
            .host_str()
            .map(|h| h.to_lowercase())
    }

    /// Check if domain matches any in list (with hierarchy support)
    pub fn matches_domain_list(domain: &str, domain_list: &[String]) -> bool {
        let domain_lower = domain.to_lowercase();

        for pattern in domain_list {
            let pattern_lower = pattern.to_lowercase();

            if domain_lower == pattern_lower {
                return true;
            }

            // Subdomain match (domain ends with .pattern)
            if domain_lower.ends_with(&format!(".{}", pattern_lower)) {
                return true;
            }
        }

        false
    }

    /// Check if domain1 is a subdomain of domain2 (or the same domain).
    /// Examples:
    /// - is_subdomain_of("mail.etsy.com", "etsy.com") -> true
    /// - is_subdomain_of("etsy.com", "mail.etsy.com") -> false
    /// - is_subdomain_of("notetsy.com", "etsy.com") -> false
    pub fn is_subdomain_of(domain1: &str, domain2: &str) -> bool {
        if domain1 == domain2 {
            return true;
        }

        if domain1.len() > domain2.len() && domain1.ends_with(domain2) {
            let prefix_len = domain1.len() - domain2.len();
            domain1.chars().nth(prefix_len - 1) == Some('.')
        } else {
            false
        }
    }

    /// Canonicalize domain (remove www prefix)
    pub fn canonicalize_domain(domain: &str) -> String {
        let domain_lower = domain.trim().trim_end_matches('.').to_lowercase();
        if let Some(stripped) = domain_lower.strip_prefix("www.") {
            stripped.to_string()
        } else {
            domain_lower
        }
    }

    /// True when any DNS label is punycode-encoded (IDN homograph vector)
    pub fn has_punycode_label(host: &str) -> bool {
        host.to_lowercase()
            .split('.')
            .any(|label| label.starts_with("xn--"))
    }

    /// Rough test for link text that is itself a URL or bare domain, which
    /// makes a differing href a mismatch worth flagging
    pub fn looks_like_domain(text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() || text.contains(char::is_whitespace) {
            return false;
        }
        if text.starts_with("http://") || text.starts_with("https://") {
            return true;
        }
        let host = text.split('/').next().unwrap_or(text);
        host.contains('.')
            && host
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_domain() {
        assert_eq!(
            DomainUtils::extract_domain("user@example.com"),
            Some("example.com".to_string())
        );
        assert_eq!(
            DomainUtils::extract_domain("Support Team <help@Example.COM>"),
            Some("example.com".to_string())
        );
        assert_eq!(DomainUtils::extract_domain("invalid"), None);
        assert_eq!(DomainUtils::extract_domain(""), None);
    }

    #[test]
    fn test_registered_domain() {
        assert_eq!(
            DomainUtils::registered_domain("mail.example.com"),
            "example.com"
        );
        assert_eq!(
            DomainUtils::registered_domain("a.b.example.co.uk"),
            "example.co.uk"
        );
        assert_eq!(
            DomainUtils::registered_domain("www.example.com"),
            "example.com"
        );
    }

    #[test]
    fn test_url_registered_domain() {
        assert_eq!(
            DomainUtils::url_registered_domain("https://login.example.com/reset"),
            Some("example.com".to_string())
        );
        assert_eq!(DomainUtils::url_registered_domain("not a url"), None);
        assert_eq!(DomainUtils::url_registered_domain("mailto:a@b.com"), None);
    }

    #[test]
    fn test_matches_domain_list() {
        let domains = vec!["example.com".to_string(), "test.org".to_string()];

        assert!(DomainUtils::matches_domain_list("example.com", &domains));
        assert!(DomainUtils::matches_domain_list(
            "mail.example.com",
            &domains
        ));
        assert!(!DomainUtils::matches_domain_list("other.com", &domains));
        assert!(!DomainUtils::matches_domain_list("notexample.com", &domains));
    }

    #[test]
    fn test_is_subdomain_of() {
        assert!(DomainUtils::is_subdomain_of("mail.etsy.com", "etsy.com"));
        assert!(DomainUtils::is_subdomain_of("etsy.com", "etsy.com"));
        assert!(!DomainUtils::is_subdomain_of("etsy.com", "mail.etsy.com"));
        assert!(!DomainUtils::is_subdomain_of("notetsy.com", "etsy.com"));
    }

    #[test]
    fn test_has_punycode_label() {
        assert!(DomainUtils::has_punycode_label("xn--pypal-4ve.com"));
        assert!(DomainUtils::has_punycode_label("login.xn--ggle-0nda.com"));
        assert!(!DomainUtils::has_punycode_label("paypal.com"));
    }

    #[test]
    fn test_looks_like_domain() {
        assert!(DomainUtils::looks_like_domain("paypal.com"));
        assert!(DomainUtils::looks_like_domain("https://paypal.com/login"));
        assert!(DomainUtils::looks_like_domain("secure.bank.example"));
        assert!(!DomainUtils::looks_like_domain("Click here"));
        assert!(!DomainUtils::looks_like_domain(""));
    }
}
