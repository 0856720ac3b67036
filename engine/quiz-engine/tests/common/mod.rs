#![allow(dead_code)]

use scholarprep_engine::models::question::{AnswerOption, Question};
use scholarprep_engine::services::repository::QuestionRepository;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Builds a well-formed question whose correct answer sits at option B.
pub fn question(
    id: &str,
    subject: &str,
    chapter: u32,
    answer: &str,
    distractors: [&str; 3],
) -> Question {
    let mut options: Vec<AnswerOption> = distractors
        .iter()
        .map(|text| AnswerOption {
            text: text.to_string(),
            text_ml: None,
        })
        .collect();
    options.insert(
        1,
        AnswerOption {
            text: answer.to_string(),
            text_ml: Some(format!("{answer}-ml")),
        },
    );

    Question {
        id: id.to_string(),
        subject: subject.to_string(),
        chapter,
        prompt: format!("prompt {id}"),
        prompt_ml: Some(format!("prompt-ml {id}")),
        options,
        answer: answer.to_string(),
        answer_ml: Some(format!("{answer}-ml")),
        image: None,
    }
}

/// 3 Maths questions + 1 English question, the under-representation
/// fixture used by the composition scenarios.
pub fn small_repository() -> QuestionRepository {
    QuestionRepository::new(vec![
        question("m1", "Maths", 1, "4", ["3", "5", "6"]),
        question("m2", "Maths", 1, "9", ["7", "8", "10"]),
        question("m3", "Maths", 2, "16", ["12", "14", "18"]),
        question("e1", "English", 1, "noun", ["verb", "adverb", "article"]),
    ])
}
