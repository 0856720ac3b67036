use serde::{Deserialize, Serialize};

use super::Language;
use crate::error::EngineError;

/// One answer option: English text plus the optional Malayalam rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerOption {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_ml: Option<String>,
}

/// A single quiz item from the question bank.
///
/// Options are a structured list; the loader converts the bank's
/// `option1`/`malayalam_option1` field pairs once, so nothing downstream
/// ever builds field names by string concatenation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub subject: String,
    pub chapter: u32,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_ml: Option<String>,
    pub options: Vec<AnswerOption>,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_ml: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

pub const OPTIONS_PER_QUESTION: usize = 4;

impl Question {
    /// Question text in the given language, falling back to English when no
    /// Malayalam rendering exists.
    pub fn prompt_text(&self, language: Language) -> &str {
        match language {
            Language::Malayalam => self.prompt_ml.as_deref().unwrap_or(&self.prompt),
            Language::English => &self.prompt,
        }
    }

    pub fn option_text(&self, index: usize, language: Language) -> Option<&str> {
        let option = self.options.get(index)?;
        Some(match language {
            Language::Malayalam => option.text_ml.as_deref().unwrap_or(&option.text),
            Language::English => &option.text,
        })
    }

    /// Canonical correct answer text for the given language. Falls back to
    /// the English answer when the bank carries no Malayalam answer, which
    /// matches the display fallback of `option_text`.
    pub fn correct_text(&self, language: Language) -> &str {
        match language {
            Language::Malayalam => self.answer_ml.as_deref().unwrap_or(&self.answer),
            Language::English => &self.answer,
        }
    }

    /// Index of the option carrying the correct answer in the given language.
    pub fn correct_option_index(&self, language: Language) -> Option<usize> {
        let correct = self.correct_text(language).trim();
        self.options.iter().position(|option| {
            let text = match language {
                Language::Malayalam => option.text_ml.as_deref().unwrap_or(&option.text),
                Language::English => option.text.as_str(),
            };
            text.trim() == correct
        })
    }

    /// Checks the structural invariants: exactly four options, the answer
    /// matches one option's text (trimmed, case-sensitive), and when a
    /// Malayalam answer exists it matches one option's Malayalam text.
    pub fn ensure_well_formed(&self) -> Result<(), EngineError> {
        if self.options.len() != OPTIONS_PER_QUESTION {
            return Err(EngineError::MalformedQuestion {
                id: self.id.clone(),
                reason: format!(
                    "expected {} options, found {}",
                    OPTIONS_PER_QUESTION,
                    self.options.len()
                ),
            });
        }

        let answer = self.answer.trim();
        if !self
            .options
            .iter()
            .any(|option| option.text.trim() == answer)
        {
            return Err(EngineError::MalformedQuestion {
                id: self.id.clone(),
                reason: "correct answer does not match any option".to_string(),
            });
        }

        if let Some(answer_ml) = self.answer_ml.as_deref() {
            let answer_ml = answer_ml.trim();
            if !self
                .options
                .iter()
                .any(|option| option.text_ml.as_deref().map(str::trim) == Some(answer_ml))
            {
                return Err(EngineError::MalformedQuestion {
                    id: self.id.clone(),
                    reason: "Malayalam answer does not match any Malayalam option".to_string(),
                });
            }
        }

        Ok(())
    }
}
