use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum PasswordStrength {
    VeryWeak,
    Weak,
    Fair,
    Strong,
    VeryStrong,
}

impl PasswordStrength {
    pub fn label(&self) -> &'static str {
        match self {
            PasswordStrength::VeryWeak => "Very Weak",
            PasswordStrength::Weak => "Weak",
            PasswordStrength::Fair => "Fair",
            PasswordStrength::Strong => "Strong",
            PasswordStrength::VeryStrong => "Very Strong",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordReport {
    /// 0-100
    pub score: u32,
    pub strength: PasswordStrength,
    pub observations: Vec<String>,
    /// Offline estimate at ~10^10 guesses/second
    pub crack_time: &'static str,
}

// Short embedded list; enough for the teaching scenarios this ships with
const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "123456",
    "12345678",
    "123456789",
    "qwerty",
    "qwerty123",
    "abc123",
    "letmein",
    "welcome",
    "admin",
    "iloveyou",
    "monkey",
    "dragon",
    "sunshine",
    "princess",
    "football",
    "baseball",
    "master",
    "shadow",
    "superman",
    "trustno1",
    "696969",
    "111111",
    "000000",
];

pub struct PasswordAnalyzer;

impl PasswordAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, password: &str) -> PasswordReport {
        let mut observations = Vec::new();

        if password.is_empty() {
            return PasswordReport {
                score: 0,
                strength: PasswordStrength::VeryWeak,
                observations: vec!["password is empty".to_string()],
                crack_time: "instant",
            };
        }

        let lower = password.to_lowercase();
        if COMMON_PASSWORDS.contains(&lower.as_str()) {
            observations.push("appears in common password lists".to_string());
            return PasswordReport {
                score: 5,
                strength: PasswordStrength::VeryWeak,
                observations,
                crack_time: "instant",
            };
        }

        let length = password.chars().count();
        let mut score: u32 = match length {
            0..=5 => 5,
            6..=7 => 15,
            8..=11 => 30,
            12..=15 => 45,
            16..=19 => 55,
            _ => 65,
        };
        if length < 8 {
            observations.push(format!("short password ({length} characters)"));
        }

        let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());
        let classes =
            [has_lower, has_upper, has_digit, has_symbol].iter().filter(|b| **b).count() as u32;
        score += classes * 10;
        if classes <= 1 {
            observations.push("only one character class".to_string());
        }

        if has_repeated_run(password) {
            score = score.saturating_sub(10);
            observations.push("repeated character runs".to_string());
        }
        if has_sequential_run(&lower) {
            score = score.saturating_sub(10);
            observations.push("sequential characters (abc/123)".to_string());
        }

        let score = score.min(100);
        let strength = strength_for(score);
        PasswordReport {
            score,
            strength,
            observations,
            crack_time: crack_time_for(score),
        }
    }
}

impl Default for PasswordAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn strength_for(score: u32) -> PasswordStrength {
    match score {
        0..=19 => PasswordStrength::VeryWeak,
        20..=39 => PasswordStrength::Weak,
        40..=59 => PasswordStrength::Fair,
        60..=79 => PasswordStrength::Strong,
        _ => PasswordStrength::VeryStrong,
    }
}

fn crack_time_for(score: u32) -> &'static str {
    match score {
        0..=19 => "instant",
        20..=39 => "minutes to hours",
        40..=59 => "days to months",
        60..=79 => "years",
        _ => "centuries",
    }
}

// Three or more of the same character in a row
fn has_repeated_run(password: &str) -> bool {
    let chars: Vec<char> = password.chars().collect();
    chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
}

// Three or more ascending code points in a row (abc, 123)
fn has_sequential_run(lower: &str) -> bool {
    let chars: Vec<char> = lower.chars().collect();
    chars.windows(3).any(|w| {
        let (a, b, c) = (w[0] as u32, w[1] as u32, w[2] as u32);
        b == a + 1 && c == b + 1
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_password_is_very_weak() {
        let analyzer = PasswordAnalyzer::new();
        let report = analyzer.evaluate("password123");
        assert_eq!(report.strength, PasswordStrength::VeryWeak);
        assert_eq!(report.crack_time, "instant");
        assert!(report
            .observations
            .iter()
            .any(|o| o.contains("common password")));
    }

    #[test]
    fn test_empty_password() {
        let report = PasswordAnalyzer::new().evaluate("");
        assert_eq!(report.score, 0);
        assert_eq!(report.strength, PasswordStrength::VeryWeak);
    }

    #[test]
    fn test_short_single_class() {
        let report = PasswordAnalyzer::new().evaluate("kitten");
        assert!(report.strength <= PasswordStrength::Weak);
        assert!(report.observations.iter().any(|o| o.contains("short")));
    }

    #[test]
    fn test_long_passphrase_is_strong() {
        let report = PasswordAnalyzer::new().evaluate("Horse!Battery9Staple&Orbit");
        assert!(report.strength >= PasswordStrength::Strong);
        assert!(report.score >= 60);
    }

    #[test]
    fn test_sequences_are_penalized() {
        let analyzer = PasswordAnalyzer::new();
        let plain = analyzer.evaluate("xk9f2mqp");
        let sequential = analyzer.evaluate("xk123mqp");
        assert!(sequential.score <= plain.score);
        assert!(sequential
            .observations
            .iter()
            .any(|o| o.contains("sequential")));
    }

    #[test]
    fn test_deterministic() {
        let analyzer = PasswordAnalyzer::new();
        let a = analyzer.evaluate("Tr0ub4dor&3");
        let b = analyzer.evaluate("Tr0ub4dor&3");
        assert_eq!(a.score, b.score);
        assert_eq!(a.observations, b.observations);
    }
}
