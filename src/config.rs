use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Score at or above this is "needs review"; twice this is "suspicious"
    #[serde(default = "default_risk_threshold")]
    pub risk_threshold: u32,
    #[serde(default = "default_enabled")]
    pub check_urgent_keywords: bool,
    #[serde(default = "default_enabled")]
    pub check_long_domains: bool,
    #[serde(default = "default_enabled")]
    pub check_punycode: bool,
    #[serde(default = "default_enabled")]
    pub check_domain_keywords: bool,
    #[serde(default = "default_enabled")]
    pub check_brand_lookalike: bool,
    #[serde(default = "default_enabled")]
    pub check_link_mismatch: bool,
    #[serde(default = "default_enabled")]
    pub check_attachments: bool,
    #[serde(default = "default_enabled")]
    pub check_reply_to_mismatch: bool,
    #[serde(default = "default_enabled")]
    pub check_spf: bool,
    #[serde(default = "default_enabled")]
    pub check_free_provider_brand: bool,
    /// Hostnames this long or longer are flagged
    #[serde(default = "default_long_domain_cutoff")]
    pub long_domain_cutoff: usize,
    /// Regex patterns matched against subject and body
    #[serde(default = "default_urgent_keywords")]
    pub urgent_keywords: Vec<String>,
    /// Substrings that are suspicious inside a domain name
    #[serde(default = "default_domain_keywords")]
    pub suspicious_domain_keywords: Vec<String>,
    #[serde(default = "default_brands")]
    pub brands: Vec<BrandProfile>,
    #[serde(default = "default_free_providers")]
    pub free_email_providers: Vec<String>,
    #[serde(default = "default_dangerous_extensions")]
    pub dangerous_extensions: Vec<String>,
    #[serde(default = "default_macro_extensions")]
    pub macro_extensions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandProfile {
    pub name: String,
    /// Official domains excluded from lookalike matching
    pub legitimate_domains: Vec<String>,
}

impl BrandProfile {
    fn new(name: &str, legitimate_domains: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            legitimate_domains: legitimate_domains.iter().map(|d| d.to_string()).collect(),
        }
    }
}

fn default_risk_threshold() -> u32 {
    7
}

fn default_enabled() -> bool {
    true
}

fn default_long_domain_cutoff() -> usize {
    30
}

fn default_urgent_keywords() -> Vec<String> {
    [
        r"(?i)\burgent\b",
        r"(?i)\bimmediately\b",
        r"(?i)act now",
        r"(?i)verify your (?:account|identity)",
        r"(?i)account (?:has been )?(?:suspended|locked|limited)",
        r"(?i)password (?:has )?expired",
        r"(?i)unusual (?:sign.?in|activity)",
        r"(?i)final (?:notice|warning)",
        r"(?i)within 24 hours",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_domain_keywords() -> Vec<String> {
    [
        "login", "signin", "verify", "secure", "account", "update", "billing", "webscr",
        "password", "banking",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_brands() -> Vec<BrandProfile> {
    vec![
        BrandProfile::new("paypal", &["paypal.com", "paypal.me"]),
        BrandProfile::new("microsoft", &["microsoft.com", "office.com", "outlook.com", "live.com"]),
        BrandProfile::new("apple", &["apple.com", "icloud.com"]),
        BrandProfile::new("amazon", &["amazon.com", "amazon.co.uk", "aws.amazon.com"]),
        BrandProfile::new("google", &["google.com", "gmail.com", "youtube.com"]),
        BrandProfile::new("netflix", &["netflix.com"]),
        BrandProfile::new("facebook", &["facebook.com", "fb.com", "meta.com"]),
        BrandProfile::new("docusign", &["docusign.com", "docusign.net"]),
        BrandProfile::new("dropbox", &["dropbox.com"]),
        BrandProfile::new("linkedin", &["linkedin.com"]),
        BrandProfile::new("chase", &["chase.com"]),
        BrandProfile::new("wellsfargo", &["wellsfargo.com"]),
        BrandProfile::new("dhl", &["dhl.com", "dhl.de"]),
        BrandProfile::new("fedex", &["fedex.com"]),
        BrandProfile::new("usps", &["usps.com"]),
    ]
}

fn default_free_providers() -> Vec<String> {
    [
        "gmail.com",
        "yahoo.com",
        "hotmail.com",
        "outlook.com",
        "aol.com",
        "mail.com",
        "protonmail.com",
        "proton.me",
        "gmx.com",
        "icloud.com",
        "yandex.com",
        "zoho.com",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_dangerous_extensions() -> Vec<String> {
    [
        ".exe", ".scr", ".bat", ".cmd", ".com", ".pif", ".vbs", ".js", ".jar", ".msi", ".app",
        ".run", ".hta", ".ps1",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_macro_extensions() -> Vec<String> {
    [".docm", ".xlsm", ".pptm", ".dotm", ".xlam", ".ppam"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            risk_threshold: default_risk_threshold(),
            check_urgent_keywords: true,
            check_long_domains: true,
            check_punycode: true,
            check_domain_keywords: true,
            check_brand_lookalike: true,
            check_link_mismatch: true,
            check_attachments: true,
            check_reply_to_mismatch: true,
            check_spf: true,
            check_free_provider_brand: true,
            long_domain_cutoff: default_long_domain_cutoff(),
            urgent_keywords: default_urgent_keywords(),
            suspicious_domain_keywords: default_domain_keywords(),
            brands: default_brands(),
            free_email_providers: default_free_providers(),
            dangerous_extensions: default_dangerous_extensions(),
            macro_extensions: default_macro_extensions(),
        }
    }
}

impl AnalyzerConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AnalyzerConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
