use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::question::Question;
use super::timer::{TimeExpired, TimerEvent, TimerTick};
use super::Language;
use crate::error::EngineError;

/// Behaviour flags for one session. Flow variants (scored exam vs
/// teacher/review presentation) are flags here, never separate code paths.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Allow advancing past an unanswered question (review mode).
    pub allow_skip: bool,
    /// When skipping is allowed, require the answer to be revealed first.
    pub require_reveal_before_advance: bool,
    /// Optional whole-session time limit; expiry is reported via `tick`,
    /// the session itself never force-finishes.
    pub time_limit_seconds: Option<u32>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            allow_skip: false,
            require_reveal_before_advance: false,
            time_limit_seconds: None,
        }
    }
}

impl SessionOptions {
    /// Teacher/review presentation: skipping allowed, but only after the
    /// answer has been shown.
    pub fn review() -> Self {
        Self {
            allow_skip: true,
            require_reveal_before_advance: true,
            time_limit_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Active,
    Finished,
}

/// One recorded answer. The language the question was answered under is kept
/// so the comparison context never changes retroactively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedAnswer {
    pub selected_text: String,
    pub is_correct: bool,
    pub language: Language,
    pub answered_at_elapsed_ms: i64,
}

/// Presentation-boundary view of the current question: plain data in the
/// active language, no rendering concerns.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub total: usize,
    pub subject: String,
    pub chapter: u32,
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub answered: bool,
    pub revealed: bool,
}

/// One row of the post-exam answer sheet.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerSheetRow {
    pub index: usize,
    pub subject: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option: Option<usize>,
    pub selected_text: Option<String>,
    pub is_correct: Option<bool>,
}

/// One exam attempt: an immutable question list plus the cursor, answers and
/// score accumulated by explicit transitions. `answer_current` is the single
/// mutation point for `score`.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: String,
    questions: Vec<Question>,
    current_index: usize,
    answers: BTreeMap<usize, RecordedAnswer>,
    revealed: BTreeSet<usize>,
    score: u32,
    language: Language,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    options: SessionOptions,
}

impl QuizSession {
    pub fn new(
        questions: Vec<Question>,
        options: SessionOptions,
        language: Language,
    ) -> Result<Self, EngineError> {
        if questions.is_empty() {
            return Err(EngineError::InvalidSession);
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            questions,
            current_index: 0,
            answers: BTreeMap::new(),
            revealed: BTreeSet::new(),
            score: 0,
            language,
            started_at: Utc::now(),
            finished_at: None,
            options,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        if self.finished_at.is_some() {
            SessionState::Finished
        } else {
            SessionState::Active
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &BTreeMap<usize, RecordedAnswer> {
        &self.answers
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn percentage(&self) -> u32 {
        (self.score as f64 / self.questions.len() as f64 * 100.0).round() as u32
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.is_finished() {
            return None;
        }
        self.questions.get(self.current_index)
    }

    /// Records the answer for the current question and scores it against the
    /// canonical answer text for the active language (both sides trimmed).
    /// Re-answering an already answered question is rejected without
    /// touching the score.
    pub fn answer_current(&mut self, selected: &str) -> Result<bool, EngineError> {
        if self.is_finished() {
            return Err(EngineError::SessionFinished);
        }

        let index = self.current_index;
        if self.answers.contains_key(&index) {
            return Err(EngineError::AlreadyAnswered { index });
        }

        let question = &self.questions[index];
        let is_correct = selected.trim() == question.correct_text(self.language).trim();
        let answered_at_elapsed_ms = self.elapsed().num_milliseconds();

        self.answers.insert(
            index,
            RecordedAnswer {
                selected_text: selected.trim().to_string(),
                is_correct,
                language: self.language,
                answered_at_elapsed_ms,
            },
        );
        // Answering shows correctness, so the question counts as revealed.
        self.revealed.insert(index);

        if is_correct {
            self.score += 1;
        }

        Ok(is_correct)
    }

    /// Marks the current question revealed and returns the correct answer
    /// text in the active language.
    pub fn reveal_current(&mut self) -> Result<&str, EngineError> {
        if self.is_finished() {
            return Err(EngineError::SessionFinished);
        }

        let index = self.current_index;
        self.revealed.insert(index);
        Ok(self.questions[index].correct_text(self.language))
    }

    /// Moves to the next question; reaching the end transitions to
    /// `Finished` exactly once and stamps `finished_at`.
    pub fn advance(&mut self) -> Result<SessionState, EngineError> {
        if self.is_finished() {
            return Err(EngineError::SessionFinished);
        }

        let index = self.current_index;
        if !self.answers.contains_key(&index) {
            if !self.options.allow_skip {
                return Err(EngineError::AnswerRequired);
            }
            if self.options.require_reveal_before_advance && !self.revealed.contains(&index) {
                return Err(EngineError::RevealRequired);
            }
        }

        self.current_index += 1;
        if self.current_index == self.questions.len() {
            self.finished_at = Some(Utc::now());
        }

        Ok(self.state())
    }

    /// Display-language toggle. Already recorded answers keep the language
    /// context they were answered under.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Elapsed session time: monotonically non-decreasing while active,
    /// frozen at `finished_at` once finished.
    pub fn elapsed(&self) -> Duration {
        match self.finished_at {
            Some(finished_at) => finished_at - self.started_at,
            None => Utc::now() - self.started_at,
        }
    }

    /// Periodic read-only clock sample. Reports `TimeExpired` once the
    /// elapsed time reaches the configured limit; never mutates the session.
    pub fn tick(&self) -> TimerEvent {
        let elapsed_seconds = self.elapsed().num_seconds().max(0) as u64;
        let timestamp = Utc::now();

        if let Some(limit) = self.options.time_limit_seconds {
            let limit = u64::from(limit);
            if elapsed_seconds >= limit {
                return TimerEvent::TimeExpired(TimeExpired {
                    session_id: self.id.clone(),
                    timestamp,
                });
            }
            return TimerEvent::TimerTick(TimerTick {
                session_id: self.id.clone(),
                elapsed_seconds,
                remaining_seconds: Some(limit - elapsed_seconds),
                timestamp,
            });
        }

        TimerEvent::TimerTick(TimerTick {
            session_id: self.id.clone(),
            elapsed_seconds,
            remaining_seconds: None,
            timestamp,
        })
    }

    /// Current question as plain display data in the active language.
    pub fn view(&self) -> Result<QuestionView, EngineError> {
        let question = self.current_question().ok_or(EngineError::SessionFinished)?;
        let index = self.current_index;

        Ok(QuestionView {
            index,
            total: self.questions.len(),
            subject: question.subject.clone(),
            chapter: question.chapter,
            prompt: question.prompt_text(self.language).to_string(),
            options: (0..question.options.len())
                .map(|i| {
                    question
                        .option_text(i, self.language)
                        .unwrap_or_default()
                        .to_string()
                })
                .collect(),
            image: question.image.clone(),
            answered: self.answers.contains_key(&index),
            revealed: self.revealed.contains(&index),
        })
    }

    /// Full per-question answer sheet, only available once finished.
    pub fn answer_sheet(&self) -> Result<Vec<AnswerSheetRow>, EngineError> {
        if !self.is_finished() {
            return Err(EngineError::SessionNotFinished);
        }

        Ok(self
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let recorded = self.answers.get(&index);
                AnswerSheetRow {
                    index,
                    subject: question.subject.clone(),
                    prompt: question.prompt_text(self.language).to_string(),
                    options: (0..question.options.len())
                        .map(|i| {
                            question
                                .option_text(i, self.language)
                                .unwrap_or_default()
                                .to_string()
                        })
                        .collect(),
                    correct_option: question.correct_option_index(self.language),
                    selected_text: recorded.map(|answer| answer.selected_text.clone()),
                    is_correct: recorded.map(|answer| answer.is_correct),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::AnswerOption;

    fn question(id: &str, subject: &str, answer: &str, distractors: [&str; 3]) -> Question {
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
            chapter: 1,
            prompt: format!("prompt {id}"),
            prompt_ml: Some(format!("prompt-ml {id}")),
            options,
            answer: answer.to_string(),
            answer_ml: Some(format!("{answer}-ml")),
            image: None,
        }
    }

    fn three_question_session(options: SessionOptions) -> QuizSession {
        QuizSession::new(
            vec![
                question("q1", "Maths", "4", ["3", "5", "6"]),
                question("q2", "Maths", "9", ["7", "8", "10"]),
                question("q3", "English", "noun", ["verb", "adverb", "article"]),
            ],
            options,
            Language::English,
        )
        .unwrap()
    }

    #[test]
    fn empty_question_list_is_rejected() {
        let err = QuizSession::new(Vec::new(), SessionOptions::default(), Language::English)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidSession));
    }

    #[test]
    fn correct_answer_increments_score() {
        let mut session = three_question_session(SessionOptions::default());
        assert!(session.answer_current("4").unwrap());
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn answer_comparison_trims_whitespace() {
        let mut session = three_question_session(SessionOptions::default());
        assert!(session.answer_current("  4  ").unwrap());
    }

    #[test]
    fn double_answer_is_rejected_and_score_unchanged() {
        let mut session = three_question_session(SessionOptions::default());
        session.answer_current("4").unwrap();
        let err = session.answer_current("3").unwrap_err();
        assert!(matches!(err, EngineError::AlreadyAnswered { index: 0 }));
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn advance_without_answer_is_rejected_in_exam_mode() {
        let mut session = three_question_session(SessionOptions::default());
        let err = session.advance().unwrap_err();
        assert!(matches!(err, EngineError::AnswerRequired));
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn review_mode_requires_reveal_before_skip() {
        let mut session = three_question_session(SessionOptions::review());
        let err = session.advance().unwrap_err();
        assert!(matches!(err, EngineError::RevealRequired));

        assert_eq!(session.reveal_current().unwrap(), "4");
        assert_eq!(session.advance().unwrap(), SessionState::Active);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn full_run_finishes_exactly_once() {
        let mut session = three_question_session(SessionOptions::default());

        session.answer_current("4").unwrap();
        assert_eq!(session.advance().unwrap(), SessionState::Active);
        session.answer_current("7").unwrap();
        assert_eq!(session.advance().unwrap(), SessionState::Active);
        session.answer_current("noun").unwrap();
        assert_eq!(session.advance().unwrap(), SessionState::Finished);

        assert!(session.is_finished());
        assert!(session.finished_at().is_some());
        assert_eq!(session.current_index(), session.total());
        assert_eq!(session.score(), 2);

        assert!(matches!(
            session.advance().unwrap_err(),
            EngineError::SessionFinished
        ));
        assert!(matches!(
            session.answer_current("4").unwrap_err(),
            EngineError::SessionFinished
        ));
    }

    #[test]
    fn score_matches_correct_answer_count() {
        let mut session = three_question_session(SessionOptions::default());
        session.answer_current("4").unwrap();
        session.advance().unwrap();
        session.answer_current("8").unwrap();
        session.advance().unwrap();
        session.answer_current("noun").unwrap();
        session.advance().unwrap();

        let correct = session
            .answers()
            .values()
            .filter(|answer| answer.is_correct)
            .count();
        assert_eq!(session.score() as usize, correct);
        assert_eq!(session.score(), 2);
        assert_eq!(session.percentage(), 67);
    }

    #[test]
    fn malayalam_answers_compare_against_malayalam_text() {
        let mut session = three_question_session(SessionOptions::default());
        session.set_language(Language::Malayalam);
        assert!(session.answer_current("4-ml").unwrap());

        let recorded = &session.answers()[&0];
        assert_eq!(recorded.language, Language::Malayalam);
        assert!(recorded.is_correct);
    }

    #[test]
    fn language_toggle_does_not_rewrite_recorded_answers() {
        let mut session = three_question_session(SessionOptions::default());
        session.answer_current("4").unwrap();
        session.set_language(Language::Malayalam);

        let recorded = &session.answers()[&0];
        assert_eq!(recorded.language, Language::English);
        assert_eq!(recorded.selected_text, "4");
    }

    #[test]
    fn view_reflects_active_language() {
        let mut session = three_question_session(SessionOptions::default());
        let view = session.view().unwrap();
        assert_eq!(view.prompt, "prompt q1");
        assert_eq!(view.total, 3);
        assert!(!view.answered);

        session.set_language(Language::Malayalam);
        let view = session.view().unwrap();
        assert_eq!(view.prompt, "prompt-ml q1");
        assert_eq!(view.options[1], "4-ml");
    }

    #[test]
    fn answer_sheet_only_after_finish() {
        let mut session = three_question_session(SessionOptions::default());
        assert!(matches!(
            session.answer_sheet().unwrap_err(),
            EngineError::SessionNotFinished
        ));

        session.answer_current("4").unwrap();
        session.advance().unwrap();
        session.answer_current("7").unwrap();
        session.advance().unwrap();
        session.answer_current("noun").unwrap();
        session.advance().unwrap();

        let sheet = session.answer_sheet().unwrap();
        assert_eq!(sheet.len(), 3);
        assert_eq!(sheet[0].correct_option, Some(1));
        assert_eq!(sheet[0].is_correct, Some(true));
        assert_eq!(sheet[1].is_correct, Some(false));
        assert_eq!(sheet[1].selected_text.as_deref(), Some("7"));
    }

    #[test]
    fn tick_reports_expiry_once_limit_reached() {
        let mut options = SessionOptions::default();
        options.time_limit_seconds = Some(0);
        let session = three_question_session(options);
        assert!(matches!(session.tick(), TimerEvent::TimeExpired(_)));

        let session = three_question_session(SessionOptions::default());
        match session.tick() {
            TimerEvent::TimerTick(tick) => {
                assert_eq!(tick.remaining_seconds, None);
                assert_eq!(tick.session_id, session.id());
            }
            TimerEvent::TimeExpired(_) => panic!("no limit configured"),
        }
    }
}
