use crate::attachment_analyzer::{AttachmentAnalyzer, AttachmentRisk};
use crate::authentication::{parse_authentication_results, AuthResults};
use crate::config::{AnalyzerConfig, BrandProfile};
use crate::domain_utils::DomainUtils;
use crate::link_extractor::{extract_links, LinkRef};
use crate::normalization;

use regex::Regex;
use serde::{Deserialize, Serialize};

// Rule weights are fixed; only the category threshold is caller-tunable.
pub const WEIGHT_URGENT_KEYWORD: u32 = 2;
pub const WEIGHT_LONG_DOMAIN: u32 = 1;
pub const WEIGHT_PUNYCODE: u32 = 3;
pub const WEIGHT_DOMAIN_KEYWORD: u32 = 2;
pub const WEIGHT_BRAND_LOOKALIKE: u32 = 4;
pub const WEIGHT_LINK_MISMATCH: u32 = 3;
pub const WEIGHT_DANGEROUS_ATTACHMENT: u32 = 4;
pub const WEIGHT_MACRO_ATTACHMENT: u32 = 3;
pub const WEIGHT_DOUBLE_EXTENSION: u32 = 3;
pub const WEIGHT_REPLY_TO_MISMATCH: u32 = 2;
pub const WEIGHT_SPF_NOT_PASSING: u32 = 2;
pub const WEIGHT_FREE_PROVIDER_BRAND: u32 = 3;

/// One email to analyze. Immutable per evaluation call.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct EmailInput {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub from_addr: String,
    #[serde(default)]
    pub reply_to: String,
    /// Raw Authentication-Results header text, empty when unavailable
    #[serde(default)]
    pub authentication_results: String,
    #[serde(default)]
    pub attachments: Vec<String>,
}

/// A triggered rule: name, human-readable reason, fixed weight
#[derive(Debug, Clone, Serialize)]
pub struct RuleHit {
    pub rule: &'static str,
    pub reason: String,
    pub weight: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskCategory {
    LikelySafe,
    NeedsReview,
    Suspicious,
}

impl RiskCategory {
    pub fn from_score(score: u32, threshold: u32) -> Self {
        if score >= threshold.saturating_mul(2) {
            RiskCategory::Suspicious
        } else if score >= threshold {
            RiskCategory::NeedsReview
        } else {
            RiskCategory::LikelySafe
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::LikelySafe => "Likely Safe",
            RiskCategory::NeedsReview => "Needs Review",
            RiskCategory::Suspicious => "Suspicious",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskReport {
    pub score: u32,
    /// Triggered reasons in rule evaluation order
    pub hits: Vec<RuleHit>,
    pub category: RiskCategory,
    pub auth: AuthResults,
}

impl RiskReport {
    pub fn reasons(&self) -> Vec<&str> {
        self.hits.iter().map(|h| h.reason.as_str()).collect()
    }
}

// A domain under inspection: full host plus its registered (eTLD+1) form
#[derive(Debug, Clone)]
struct DomainInfo {
    host: String,
    registered: String,
}

pub struct RiskAnalyzer {
    config: AnalyzerConfig,
    urgent_patterns: Vec<Regex>,
    attachment_analyzer: AttachmentAnalyzer,
}

impl RiskAnalyzer {
    /// Pre-compiles all configured keyword patterns; invalid patterns are a
    /// construction-time error, never an evaluation-time one.
    pub fn new(config: AnalyzerConfig) -> anyhow::Result<Self> {
        let mut urgent_patterns = Vec::with_capacity(config.urgent_keywords.len());
        for pattern in &config.urgent_keywords {
            let regex = Regex::new(pattern)
                .map_err(|e| anyhow::anyhow!("invalid urgent keyword pattern '{pattern}': {e}"))?;
            urgent_patterns.push(regex);
        }

        let attachment_analyzer =
            AttachmentAnalyzer::new(&config.dangerous_extensions, &config.macro_extensions);

        Ok(RiskAnalyzer {
            config,
            urgent_patterns,
            attachment_analyzer,
        })
    }

    /// Evaluate every enabled rule against the input. Rules are independent
    /// and additive; the hit list preserves evaluation order.
    pub fn evaluate(&self, input: &EmailInput) -> RiskReport {
        let mut hits: Vec<RuleHit> = Vec::new();

        let subject = normalization::normalize_header(&input.subject);
        let from_addr = normalization::normalize_header(&input.from_addr);
        let combined_text = format!("{}\n{}", subject, input.body);

        let links = extract_links(&input.body);
        let from_domain = DomainUtils::extract_domain(&from_addr);
        let reply_to_domain = DomainUtils::extract_domain(&input.reply_to);
        let domains = self.collect_domains(&links, &from_domain, &reply_to_domain);

        if self.config.check_urgent_keywords {
            self.check_urgent_keywords(&combined_text, &mut hits);
        }
        if self.config.check_long_domains {
            self.check_long_domains(&domains, &mut hits);
        }
        if self.config.check_punycode {
            self.check_punycode(&domains, &mut hits);
        }
        if self.config.check_domain_keywords {
            self.check_domain_keywords(&domains, &mut hits);
        }
        if self.config.check_brand_lookalike {
            self.check_brand_lookalike(&domains, &mut hits);
        }
        if self.config.check_link_mismatch {
            self.check_link_mismatch(&links, &mut hits);
        }
        if self.config.check_attachments {
            self.check_attachments(&input.attachments, &mut hits);
        }

        let auth = parse_authentication_results(&input.authentication_results);

        if self.config.check_reply_to_mismatch {
            self.check_reply_to_mismatch(&from_domain, &reply_to_domain, &mut hits);
        }
        if self.config.check_spf && !auth.spf.passed() {
            hits.push(RuleHit {
                rule: "spf",
                reason: "SPF did not pass for the sending domain".to_string(),
                weight: WEIGHT_SPF_NOT_PASSING,
            });
        }
        if self.config.check_free_provider_brand {
            self.check_free_provider_brand(
                &subject,
                &from_addr,
                &from_domain,
                &reply_to_domain,
                &mut hits,
            );
        }

        let score: u32 = hits.iter().map(|h| h.weight).sum();
        let category = RiskCategory::from_score(score, self.config.risk_threshold);

        for hit in &hits {
            log::debug!("rule '{}' (+{}): {}", hit.rule, hit.weight, hit.reason);
        }
        log::info!(
            "email scored {} -> {} ({} reasons)",
            score,
            category.label(),
            hits.len()
        );

        RiskReport {
            score,
            hits,
            category,
            auth,
        }
    }

    // Link domains first, then sender and reply-to; unique by host
    fn collect_domains(
        &self,
        links: &[LinkRef],
        from_domain: &Option<String>,
        reply_to_domain: &Option<String>,
    ) -> Vec<DomainInfo> {
        let mut domains: Vec<DomainInfo> = Vec::new();
        let mut push = |host: String| {
            if !domains.iter().any(|d| d.host == host) {
                let registered = DomainUtils::registered_domain(&host);
                domains.push(DomainInfo { host, registered });
            }
        };

        for link in links {
            if let Some(host) = DomainUtils::url_host(&link.href) {
                push(host);
            }
        }
        if let Some(domain) = from_domain {
            push(domain.clone());
        }
        if let Some(domain) = reply_to_domain {
            push(domain.clone());
        }

        domains
    }

    fn check_urgent_keywords(&self, text: &str, hits: &mut Vec<RuleHit>) {
        for regex in &self.urgent_patterns {
            if let Some(m) = regex.find(text) {
                hits.push(RuleHit {
                    rule: "urgent-keyword",
                    reason: format!("urgency cue \"{}\" in subject or body", m.as_str().trim()),
                    weight: WEIGHT_URGENT_KEYWORD,
                });
            }
        }
    }

    fn check_long_domains(&self, domains: &[DomainInfo], hits: &mut Vec<RuleHit>) {
        for domain in domains {
            if domain.host.len() >= self.config.long_domain_cutoff {
                hits.push(RuleHit {
                    rule: "long-domain",
                    reason: format!(
                        "unusually long domain name ({} chars): {}",
                        domain.host.len(),
                        domain.host
                    ),
                    weight: WEIGHT_LONG_DOMAIN,
                });
            }
        }
    }

    fn check_punycode(&self, domains: &[DomainInfo], hits: &mut Vec<RuleHit>) {
        for domain in domains {
            if DomainUtils::has_punycode_label(&domain.host) {
                hits.push(RuleHit {
                    rule: "punycode",
                    reason: format!("punycode-encoded domain: {}", domain.host),
                    weight: WEIGHT_PUNYCODE,
                });
            }
        }
    }

    fn check_domain_keywords(&self, domains: &[DomainInfo], hits: &mut Vec<RuleHit>) {
        for domain in domains {
            for keyword in &self.config.suspicious_domain_keywords {
                if domain.registered.contains(keyword.as_str()) {
                    hits.push(RuleHit {
                        rule: "domain-keyword",
                        reason: format!(
                            "suspicious keyword \"{}\" in domain {}",
                            keyword, domain.registered
                        ),
                        weight: WEIGHT_DOMAIN_KEYWORD,
                    });
                    break;
                }
            }
        }
    }

    fn check_brand_lookalike(&self, domains: &[DomainInfo], hits: &mut Vec<RuleHit>) {
        for domain in domains {
            if let Some(brand) = self.lookalike_brand(domain) {
                hits.push(RuleHit {
                    rule: "brand-lookalike",
                    reason: format!(
                        "domain {} imitates brand \"{}\"",
                        domain.registered, brand.name
                    ),
                    weight: WEIGHT_BRAND_LOOKALIKE,
                });
            }
        }
    }

    fn lookalike_brand(&self, domain: &DomainInfo) -> Option<&BrandProfile> {
        // Label part of the registered domain, e.g. "paypa1" of "paypa1.com"
        let label = domain.registered.split('.').next().unwrap_or("");
        if label.is_empty() {
            return None;
        }
        let folded_label = normalization::fold_homoglyphs(label);

        for brand in &self.config.brands {
            if DomainUtils::matches_domain_list(&domain.host, &brand.legitimate_domains) {
                continue;
            }
            let folded_brand = normalization::fold_homoglyphs(&brand.name);
            if folded_label == folded_brand || folded_label.contains(&folded_brand) {
                return Some(brand);
            }
        }
        None
    }

    fn check_link_mismatch(&self, links: &[LinkRef], hits: &mut Vec<RuleHit>) {
        for link in links {
            let text = match &link.text {
                Some(text) if DomainUtils::looks_like_domain(text) => text,
                _ => continue,
            };
            let text_domain = Self::domain_of_link_text(text);
            let href_domain = DomainUtils::url_registered_domain(&link.href);
            if let (Some(text_domain), Some(href_domain)) = (text_domain, href_domain) {
                if text_domain != href_domain {
                    hits.push(RuleHit {
                        rule: "link-mismatch",
                        reason: format!(
                            "link text shows {} but points to {}",
                            text_domain, href_domain
                        ),
                        weight: WEIGHT_LINK_MISMATCH,
                    });
                }
            }
        }
    }

    fn domain_of_link_text(text: &str) -> Option<String> {
        if text.starts_with("http://") || text.starts_with("https://") {
            DomainUtils::url_registered_domain(text)
        } else {
            let host = text.split('/').next()?;
            Some(DomainUtils::registered_domain(host))
        }
    }

    fn check_attachments(&self, attachments: &[String], hits: &mut Vec<RuleHit>) {
        for filename in attachments {
            let (rule, reason, weight) = match self.attachment_analyzer.classify(filename) {
                AttachmentRisk::Dangerous => (
                    "dangerous-attachment",
                    format!("executable attachment: {filename}"),
                    WEIGHT_DANGEROUS_ATTACHMENT,
                ),
                AttachmentRisk::MacroEnabled => (
                    "macro-attachment",
                    format!("macro-enabled document: {filename}"),
                    WEIGHT_MACRO_ATTACHMENT,
                ),
                AttachmentRisk::DoubleExtension => (
                    "double-extension",
                    format!("double file extension: {filename}"),
                    WEIGHT_DOUBLE_EXTENSION,
                ),
                AttachmentRisk::Benign => continue,
            };
            hits.push(RuleHit {
                rule,
                reason,
                weight,
            });
        }
    }

    fn check_reply_to_mismatch(
        &self,
        from_domain: &Option<String>,
        reply_to_domain: &Option<String>,
        hits: &mut Vec<RuleHit>,
    ) {
        if let (Some(from), Some(reply_to)) = (from_domain, reply_to_domain) {
            let from_registered = DomainUtils::registered_domain(from);
            let reply_registered = DomainUtils::registered_domain(reply_to);
            if from_registered != reply_registered {
                hits.push(RuleHit {
                    rule: "reply-to-mismatch",
                    reason: format!(
                        "Reply-To domain {} differs from sender domain {}",
                        reply_registered, from_registered
                    ),
                    weight: WEIGHT_REPLY_TO_MISMATCH,
                });
            }
        }
    }

    fn check_free_provider_brand(
        &self,
        subject: &str,
        from_addr: &str,
        from_domain: &Option<String>,
        reply_to_domain: &Option<String>,
        hits: &mut Vec<RuleHit>,
    ) {
        let on_free_provider = |domain: &Option<String>| {
            domain
                .as_ref()
                .map(|d| DomainUtils::matches_domain_list(d, &self.config.free_email_providers))
                .unwrap_or(false)
        };
        if !on_free_provider(from_domain) && !on_free_provider(reply_to_domain) {
            return;
        }

        let haystack = format!("{subject}\n{from_addr}").to_lowercase();
        for brand in &self.config.brands {
            if haystack.contains(&brand.name.to_lowercase()) {
                hits.push(RuleHit {
                    rule: "free-provider-brand",
                    reason: format!(
                        "free email provider address while claiming to be \"{}\"",
                        brand.name
                    ),
                    weight: WEIGHT_FREE_PROVIDER_BRAND,
                });
                return;
            }
        }
    }
}
