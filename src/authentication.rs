use serde::Serialize;

/// Outcome of one authentication mechanism as reported in an
/// Authentication-Results header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthVerdict {
    Pass,
    Fail,
    SoftFail,
    Neutral,
    None,
    /// Mechanism not mentioned at all
    Absent,
}

impl AuthVerdict {
    pub fn passed(&self) -> bool {
        matches!(self, AuthVerdict::Pass)
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct AuthResults {
    pub spf: AuthVerdict,
    pub dkim: AuthVerdict,
    pub dmarc: AuthVerdict,
}

/// Parse raw Authentication-Results text by token scan. Unknown or garbled
/// values fall back to Absent rather than erroring.
pub fn parse_authentication_results(raw: &str) -> AuthResults {
    let lower = raw.to_lowercase();
    AuthResults {
        spf: verdict_for(&lower, "spf"),
        dkim: verdict_for(&lower, "dkim"),
        dmarc: verdict_for(&lower, "dmarc"),
    }
}

fn verdict_for(lower: &str, mechanism: &str) -> AuthVerdict {
    let token = |value: &str| format!("{mechanism}={value}");
    if lower.contains(&token("pass")) {
        AuthVerdict::Pass
    } else if lower.contains(&token("softfail")) {
        AuthVerdict::SoftFail
    } else if lower.contains(&token("fail")) {
        AuthVerdict::Fail
    } else if lower.contains(&token("neutral")) {
        AuthVerdict::Neutral
    } else if lower.contains(&token("none")) {
        AuthVerdict::None
    } else {
        AuthVerdict::Absent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_pass() {
        let results =
            parse_authentication_results("mx.example.com; spf=pass dkim=pass dmarc=pass");
        assert!(results.spf.passed());
        assert!(results.dkim.passed());
        assert!(results.dmarc.passed());
    }

    #[test]
    fn test_softfail_not_mistaken_for_fail() {
        let results = parse_authentication_results("spf=softfail dkim=fail");
        assert_eq!(results.spf, AuthVerdict::SoftFail);
        assert_eq!(results.dkim, AuthVerdict::Fail);
        assert_eq!(results.dmarc, AuthVerdict::Absent);
    }

    #[test]
    fn test_empty_input_is_absent() {
        let results = parse_authentication_results("");
        assert_eq!(results.spf, AuthVerdict::Absent);
        assert!(!results.spf.passed());
    }

    #[test]
    fn test_case_insensitive() {
        let results = parse_authentication_results("SPF=Pass DMARC=NONE");
        assert_eq!(results.spf, AuthVerdict::Pass);
        assert_eq!(results.dmarc, AuthVerdict::None);
    }
}
