use anyhow::{bail, Context, Result};
use serde::Deserialize;
use validator::Validate;

use super::repository::QuestionRepository;
use crate::models::question::{AnswerOption, Question};

/// Wire shape of one bank record, matching the original `questions.json`
/// layout with its numbered option fields. Converted into the structured
/// [`Question`] exactly once, here.
#[derive(Debug, Deserialize, Validate)]
pub struct RawQuestionRecord {
    #[validate(length(min = 1, message = "Question text must not be empty"))]
    pub question: String,
    #[serde(default)]
    pub malayalam_question: Option<String>,

    #[validate(length(min = 1, message = "Option 1 must not be empty"))]
    pub option1: String,
    #[validate(length(min = 1, message = "Option 2 must not be empty"))]
    pub option2: String,
    #[validate(length(min = 1, message = "Option 3 must not be empty"))]
    pub option3: String,
    #[validate(length(min = 1, message = "Option 4 must not be empty"))]
    pub option4: String,

    #[serde(default)]
    pub malayalam_option1: Option<String>,
    #[serde(default)]
    pub malayalam_option2: Option<String>,
    #[serde(default)]
    pub malayalam_option3: Option<String>,
    #[serde(default)]
    pub malayalam_option4: Option<String>,

    #[validate(length(min = 1, message = "Answer must not be empty"))]
    pub answer: String,
    #[serde(default)]
    pub malayalam_answer: Option<String>,

    #[serde(default)]
    pub image: Option<String>,

    #[validate(length(min = 1, message = "Subject must not be empty"))]
    pub subject: String,
    pub chapter: u32,
}

impl RawQuestionRecord {
    fn into_question(self, index: usize) -> Question {
        Question {
            id: format!("q{:04}", index + 1),
            subject: self.subject,
            chapter: self.chapter,
            prompt: self.question,
            prompt_ml: normalize_text(self.malayalam_question),
            options: vec![
                AnswerOption {
                    text: self.option1,
                    text_ml: normalize_text(self.malayalam_option1),
                },
                AnswerOption {
                    text: self.option2,
                    text_ml: normalize_text(self.malayalam_option2),
                },
                AnswerOption {
                    text: self.option3,
                    text_ml: normalize_text(self.malayalam_option3),
                },
                AnswerOption {
                    text: self.option4,
                    text_ml: normalize_text(self.malayalam_option4),
                },
            ],
            answer: self.answer,
            answer_ml: normalize_text(self.malayalam_answer),
            image: normalize_image(self.image),
        }
    }
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// The bank marks "no image" as an absent field, an empty string, or the
/// literal "null".
fn normalize_image(value: Option<String>) -> Option<String> {
    value.filter(|path| {
        let path = path.trim();
        !path.is_empty() && path != "null"
    })
}

/// One-shot bulk loader for the question bank. The location is a local
/// file path or an `http(s)://` URL; the load is performed once before any
/// session starts, with no retry or caching.
pub struct QuestionSource {
    location: String,
    http: reqwest::Client,
}

impl QuestionSource {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            http: reqwest::Client::new(),
        }
    }

    pub async fn load(&self) -> Result<Vec<Question>> {
        let body = if self.is_remote() {
            self.fetch_remote().await?
        } else {
            tokio::fs::read_to_string(&self.location)
                .await
                .with_context(|| format!("Failed to read question bank {}", self.location))?
        };

        let records: Vec<RawQuestionRecord> =
            serde_json::from_str(&body).context("Failed to parse question bank JSON")?;
        if records.is_empty() {
            bail!("Question bank {} contains no questions", self.location);
        }

        let mut questions = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            record
                .validate()
                .with_context(|| format!("Invalid question record at position {}", index + 1))?;
            questions.push(record.into_question(index));
        }

        tracing::info!(
            "Loaded {} questions from {}",
            questions.len(),
            self.location
        );
        Ok(questions)
    }

    pub async fn load_repository(&self) -> Result<QuestionRepository> {
        Ok(QuestionRepository::new(self.load().await?))
    }

    fn is_remote(&self) -> bool {
        self.location.starts_with("http://") || self.location.starts_with("https://")
    }

    async fn fetch_remote(&self) -> Result<String> {
        let response = self
            .http
            .get(&self.location)
            .send()
            .await
            .with_context(|| format!("Failed to fetch question bank {}", self.location))?;

        if !response.status().is_success() {
            bail!(
                "Question bank fetch {} returned {}",
                self.location,
                response.status()
            );
        }

        response
            .text()
            .await
            .context("Failed to read question bank response body")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_BANK: &str = r#"[
        {
            "question": "What is 2 + 2?",
            "malayalam_question": "2 + 2 എത്ര?",
            "option1": "3",
            "option2": "4",
            "option3": "5",
            "option4": "6",
            "malayalam_option1": "മൂന്ന്",
            "malayalam_option2": "നാല്",
            "malayalam_option3": "അഞ്ച്",
            "malayalam_option4": "ആറ്",
            "answer": "4",
            "malayalam_answer": "നാല്",
            "image": "null",
            "subject": "Maths",
            "chapter": 1
        },
        {
            "question": "Pick the noun.",
            "option1": "run",
            "option2": "blue",
            "option3": "dog",
            "option4": "quickly",
            "answer": "dog",
            "subject": "English",
            "chapter": 2
        }
    ]"#;

    fn temp_bank(contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("scholarprep-bank-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_and_structures_records() {
        let path = temp_bank(SAMPLE_BANK);
        let source = QuestionSource::new(path.to_string_lossy());
        let questions = tokio_test::block_on(source.load()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(questions.len(), 2);

        let maths = &questions[0];
        assert_eq!(maths.id, "q0001");
        assert_eq!(maths.subject, "Maths");
        assert_eq!(maths.options.len(), 4);
        assert_eq!(maths.options[1].text, "4");
        assert_eq!(maths.options[1].text_ml.as_deref(), Some("നാല്"));
        assert_eq!(maths.answer_ml.as_deref(), Some("നാല്"));
        // "null" sentinel means no image
        assert!(maths.image.is_none());
        assert!(maths.ensure_well_formed().is_ok());

        let english = &questions[1];
        assert_eq!(english.id, "q0002");
        assert!(english.prompt_ml.is_none());
        assert!(english.options[0].text_ml.is_none());
    }

    #[test]
    fn empty_bank_is_rejected() {
        let path = temp_bank("[]");
        let source = QuestionSource::new(path.to_string_lossy());
        let result = tokio_test::block_on(source.load());
        std::fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn blank_answer_fails_validation() {
        let bank = SAMPLE_BANK.replace("\"answer\": \"dog\"", "\"answer\": \"\"");
        let path = temp_bank(&bank);
        let source = QuestionSource::new(path.to_string_lossy());
        let result = tokio_test::block_on(source.load());
        std::fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn missing_bank_file_is_reported() {
        let source = QuestionSource::new("does-not-exist.json");
        assert!(tokio_test::block_on(source.load()).is_err());
    }

    #[test]
    fn image_sentinels() {
        assert_eq!(normalize_image(None), None);
        assert_eq!(normalize_image(Some(String::new())), None);
        assert_eq!(normalize_image(Some("null".to_string())), None);
        assert_eq!(
            normalize_image(Some("images/q1.png".to_string())),
            Some("images/q1.png".to_string())
        );
    }
}
