//! Multiple-choice practice quiz.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::model::ids::QuestionId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("unknown question: {0}")]
    UnknownQuestion(QuestionId),

    #[error("question {question} has {options} options, got option {got}")]
    OptionOutOfRange {
        question: QuestionId,
        options: usize,
        got: usize,
    },
}

/// Selected option index (0-based) per question.
pub type QuizAnswers = BTreeMap<QuestionId, usize>;

/// A question with its options and the index of the correct one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    id: QuestionId,
    prompt: &'static str,
    options: &'static [&'static str],
    answer: usize,
}

impl QuizQuestion {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &'static str {
        self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &'static [&'static str] {
        self.options
    }

    #[must_use]
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.answer
    }
}

const REFERENCE_QUESTIONS: [QuizQuestion; 2] = [
    QuizQuestion {
        id: QuestionId::new(1),
        prompt: "Which of the following is NOT typically part of AML checks?",
        options: &[
            "Customer identity verification",
            "Transaction monitoring",
            "User interface design",
            "Sanctions screening",
        ],
        answer: 2,
    },
    QuizQuestion {
        id: QuestionId::new(2),
        prompt: "Open Banking APIs are mainly used to:",
        options: &[
            "Share customer-permissioned financial data",
            "Encrypt payments",
            "Create blockchain wallets",
            "Host websites",
        ],
        answer: 0,
    },
];

/// Number of matching answers out of the bank size, shown as `"correct / total"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizScore {
    pub correct: usize,
    pub total: usize,
}

impl fmt::Display for QuizScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.correct, self.total)
    }
}

/// Immutable question bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizBank {
    questions: Vec<QuizQuestion>,
}

impl QuizBank {
    /// The two-question FinTech bank.
    #[must_use]
    pub fn reference() -> Self {
        Self {
            questions: REFERENCE_QUESTIONS.to_vec(),
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<&QuizQuestion> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Count exact matches against the answer key. Missing answers are wrong.
    #[must_use]
    pub fn score(&self, answers: &QuizAnswers) -> QuizScore {
        let correct = self
            .questions
            .iter()
            .filter(|q| answers.get(&q.id).is_some_and(|sel| q.is_correct(*sel)))
            .count();
        QuizScore {
            correct,
            total: self.questions.len(),
        }
    }
}

impl Default for QuizBank {
    fn default() -> Self {
        Self::reference()
    }
}

/// A user's pass through the quiz: current selections and the last submitted score.
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    bank: QuizBank,
    answers: QuizAnswers,
    score: Option<QuizScore>,
}

impl QuizSession {
    #[must_use]
    pub fn bank(&self) -> &QuizBank {
        &self.bank
    }

    #[must_use]
    pub fn answers(&self) -> &QuizAnswers {
        &self.answers
    }

    /// Score of the last submission, `None` until [`QuizSession::submit`] is called.
    #[must_use]
    pub fn score(&self) -> Option<QuizScore> {
        self.score
    }

    /// Select an option, replacing any earlier choice for that question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::UnknownQuestion` or `QuizError::OptionOutOfRange`;
    /// selections are unchanged on error.
    pub fn select(&mut self, question: QuestionId, option: usize) -> Result<(), QuizError> {
        let q = self
            .bank
            .question(question)
            .ok_or(QuizError::UnknownQuestion(question))?;
        if option >= q.options().len() {
            return Err(QuizError::OptionOutOfRange {
                question,
                options: q.options().len(),
                got: option,
            });
        }
        self.answers.insert(question, option);
        Ok(())
    }

    pub fn submit(&mut self) -> QuizScore {
        let score = self.bank.score(&self.answers);
        self.score = Some(score);
        score
    }
}
