/// Relationship trivia questions
use crate::error::{CupidError, Result};
use serde::{Deserialize, Serialize};

/// Option labels, in display order
pub const TRIVIA_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

/// A single multiple-choice trivia question
///
/// Serialized with the field names the page already consumes
/// (`q`, `options`, `answer`, `funFact`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaQuestion {
    /// Question text
    #[serde(alias = "question")]
    pub q: String,

    /// Exactly four options, each conventionally prefixed "A) ", "B) ", ...
    pub options: Vec<String>,

    /// Correct option label (`A`-`D`)
    #[serde(alias = "correct", alias = "correctOptionLabel")]
    pub answer: String,

    /// Fun fact shown after answering
    #[serde(rename = "funFact", alias = "fun_fact", default)]
    pub fun_fact: String,
}

impl TriviaQuestion {
    /// Validate shape: non-empty question, four options, answer label in A-D
    pub fn validate(&self) -> Result<()> {
        if self.q.trim().is_empty() {
            return Err(CupidError::invalid_trivia("question text is empty"));
        }

        if self.options.len() != TRIVIA_LABELS.len() {
            return Err(CupidError::invalid_trivia(format!(
                "expected 4 options, got {}",
                self.options.len()
            )));
        }

        if self.options.iter().any(|o| o.trim().is_empty()) {
            return Err(CupidError::invalid_trivia("option text is empty"));
        }

        if self.answer_index().is_none() {
            return Err(CupidError::invalid_trivia(format!(
                "answer {:?} is not one of A-D",
                self.answer
            )));
        }

        Ok(())
    }

    /// Index of the correct option, if the label is valid
    pub fn answer_index(&self) -> Option<usize> {
        let mut chars = self.answer.trim().chars();
        let label = chars.next()?.to_ascii_uppercase();
        // Accept "B" and "B)" but not "Banana"
        match chars.next() {
            None | Some(')' | '.') => {}
            Some(_) => return None,
        }
        TRIVIA_LABELS.iter().position(|l| *l == label)
    }

    /// Whether the selected option text is the correct one
    pub fn is_correct(&self, selected: &str) -> bool {
        let Some(index) = self.answer_index() else {
            return false;
        };
        let label = TRIVIA_LABELS[index];
        let selected = selected.trim_start();
        selected.starts_with(&format!("{label})")) || selected.starts_with(&format!("{label} "))
    }
}
