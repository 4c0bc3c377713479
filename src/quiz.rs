use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub choices: Vec<String>,
    /// Index into `choices`
    pub answer: usize,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    pub name: String,
    pub questions: Vec<QuizQuestion>,
}

impl QuestionBank {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let bank: QuestionBank = serde_yaml::from_str(&content)?;
        bank.validate()?;
        Ok(bank)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.questions.is_empty() {
            anyhow::bail!("question bank '{}' has no questions", self.name);
        }
        for (i, question) in self.questions.iter().enumerate() {
            if question.choices.len() < 2 {
                anyhow::bail!("question {} has fewer than two choices", i + 1);
            }
            if question.answer >= question.choices.len() {
                anyhow::bail!(
                    "question {} answer index {} out of range",
                    i + 1,
                    question.answer
                );
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    /// The choice that was actually right
    pub correct_choice: String,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizSummary {
    pub total: usize,
    pub correct: usize,
    pub percent: u32,
}

/// One run through a question bank. Position only moves forward; answering
/// past the end is an error, not a panic.
pub struct QuizSession {
    bank: QuestionBank,
    position: usize,
    correct: usize,
    outcomes: Vec<bool>,
}

impl QuizSession {
    pub fn new(bank: QuestionBank) -> Self {
        Self {
            bank,
            position: 0,
            correct: 0,
            outcomes: Vec::new(),
        }
    }

    pub fn bank_name(&self) -> &str {
        &self.bank.name
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total(&self) -> usize {
        self.bank.questions.len()
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.bank.questions.len()
    }

    /// The question awaiting an answer, None once finished
    pub fn current(&self) -> Option<&QuizQuestion> {
        self.bank.questions.get(self.position)
    }

    pub fn answer(&mut self, choice: usize) -> anyhow::Result<AnswerOutcome> {
        let question = self
            .current()
            .ok_or_else(|| anyhow::anyhow!("quiz is already finished"))?;
        if choice >= question.choices.len() {
            anyhow::bail!(
                "choice {} out of range (question has {} choices)",
                choice,
                question.choices.len()
            );
        }

        let correct = choice == question.answer;
        let outcome = AnswerOutcome {
            correct,
            correct_choice: question.choices[question.answer].clone(),
            explanation: question.explanation.clone(),
        };

        if correct {
            self.correct += 1;
        }
        self.outcomes.push(correct);
        self.position += 1;
        log::debug!(
            "question {}/{} answered {}",
            self.position,
            self.total(),
            if correct { "correctly" } else { "incorrectly" }
        );
        Ok(outcome)
    }

    /// Per-question results in answer order
    pub fn outcomes(&self) -> &[bool] {
        &self.outcomes
    }

    pub fn summary(&self) -> QuizSummary {
        let total = self.bank.questions.len();
        let percent = if total == 0 {
            0
        } else {
            (self.correct * 100 / total) as u32
        };
        QuizSummary {
            total,
            correct: self.correct,
            percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bank() -> QuestionBank {
        QuestionBank {
            name: "phishing-basics".to_string(),
            questions: vec![
                QuizQuestion {
                    prompt: "An email says your account is locked and links to paypa1.com. What is this?"
                        .to_string(),
                    choices: vec![
                        "A routine notice".to_string(),
                        "A lookalike-domain phishing attempt".to_string(),
                    ],
                    answer: 1,
                    explanation: Some("The digit 1 replaces the letter l.".to_string()),
                },
                QuizQuestion {
                    prompt: "Which attachment is safest to open?".to_string(),
                    choices: vec![
                        "invoice.pdf.exe".to_string(),
                        "invoice.pdf".to_string(),
                        "invoice.docm".to_string(),
                    ],
                    answer: 1,
                    explanation: None,
                },
            ],
        }
    }

    #[test]
    fn test_full_run_all_correct() {
        let mut session = QuizSession::new(sample_bank());
        assert!(!session.is_finished());

        let first = session.answer(1).unwrap();
        assert!(first.correct);
        assert!(first.explanation.is_some());

        let second = session.answer(1).unwrap();
        assert!(second.correct);

        assert!(session.is_finished());
        let summary = session.summary();
        assert_eq!(summary.correct, 2);
        assert_eq!(summary.percent, 100);
    }

    #[test]
    fn test_wrong_answer_reports_correct_choice() {
        let mut session = QuizSession::new(sample_bank());
        let outcome = session.answer(0).unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.correct_choice, "A lookalike-domain phishing attempt");
    }

    #[test]
    fn test_answer_after_finish_errors() {
        let mut session = QuizSession::new(sample_bank());
        session.answer(1).unwrap();
        session.answer(1).unwrap();
        assert!(session.answer(0).is_err());
    }

    #[test]
    fn test_out_of_range_choice_errors_without_advancing() {
        let mut session = QuizSession::new(sample_bank());
        assert!(session.answer(9).is_err());
        assert_eq!(session.position(), 0);
    }

    #[test]
    fn test_validate_rejects_bad_answer_index() {
        let mut bank = sample_bank();
        bank.questions[0].answer = 5;
        assert!(bank.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_bank() {
        let bank = QuestionBank {
            name: "empty".to_string(),
            questions: vec![],
        };
        assert!(bank.validate().is_err());
    }

    #[test]
    fn test_bank_yaml_round_trip() {
        let bank = sample_bank();
        let yaml = serde_yaml::to_string(&bank).unwrap();
        let parsed: QuestionBank = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.questions.len(), bank.questions.len());
        assert_eq!(parsed.questions[0].answer, 1);
    }
}
