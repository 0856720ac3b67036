use chrono::Utc;

use crate::error::EngineError;
use crate::models::history::{
    Analytics, HistoryRecord, SubjectAccuracy, SubjectTally, NO_SUBJECT_DATA,
};
use crate::models::session::QuizSession;

pub const DEFAULT_PASS_MARK: u32 = 70;

/// Turns finished sessions into history records and computes longitudinal
/// analytics over the retained history.
pub struct ResultAggregator {
    pass_mark: u32,
}

impl ResultAggregator {
    pub fn new(pass_mark: u32) -> Self {
        Self { pass_mark }
    }

    pub fn pass_mark(&self) -> u32 {
        self.pass_mark
    }

    /// Builds the persisted summary of one finished session. Answers are
    /// bucketed by subject in question-index order, so `per_subject`
    /// preserves the exam's subject order.
    pub fn summarize(&self, session: &QuizSession) -> Result<HistoryRecord, EngineError> {
        if !session.is_finished() {
            return Err(EngineError::SessionNotFinished);
        }

        let mut per_subject: Vec<SubjectTally> = Vec::new();
        for (index, answer) in session.answers() {
            let subject = &session.questions()[*index].subject;
            let position = per_subject
                .iter()
                .position(|tally| &tally.subject == subject);
            let tally = match position {
                Some(position) => &mut per_subject[position],
                None => {
                    per_subject.push(SubjectTally {
                        subject: subject.clone(),
                        correct: 0,
                        wrong: 0,
                    });
                    per_subject.last_mut().expect("just pushed")
                }
            };

            if answer.is_correct {
                tally.correct += 1;
            } else {
                tally.wrong += 1;
            }
        }

        let score = session.score();
        let total = session.total() as u32;
        let percentage = session.percentage();

        tracing::info!(
            "Session {} summarized: {}/{} ({}%)",
            session.id(),
            score,
            total,
            percentage
        );

        Ok(HistoryRecord {
            date: Utc::now(),
            score,
            total,
            percentage,
            passed: percentage >= self.pass_mark,
            per_subject,
        })
    }

    /// Analytics over the newest `window_size` records (or fewer).
    /// Strongest/weakest ties resolve to the first-encountered subject.
    pub fn analyze(&self, history: &[HistoryRecord], window_size: usize) -> Analytics {
        let window = &history[..window_size.min(history.len())];

        let sum_score: u64 = window.iter().map(|record| u64::from(record.score)).sum();
        let sum_total: u64 = window.iter().map(|record| u64::from(record.total)).sum();
        let average_score_percent = if sum_total == 0 {
            0
        } else {
            (sum_score as f64 / sum_total as f64 * 100.0).round() as u32
        };

        let mut accumulated: Vec<SubjectTally> = Vec::new();
        for record in window {
            for tally in &record.per_subject {
                let position = accumulated
                    .iter()
                    .position(|existing| existing.subject == tally.subject);
                match position {
                    Some(position) => {
                        accumulated[position].correct += tally.correct;
                        accumulated[position].wrong += tally.wrong;
                    }
                    None => accumulated.push(tally.clone()),
                }
            }
        }

        let per_subject: Vec<SubjectAccuracy> = accumulated
            .into_iter()
            .map(|tally| {
                let accuracy_percent = if tally.total() == 0 {
                    0
                } else {
                    (tally.correct as f64 / tally.total() as f64 * 100.0).round() as u32
                };
                SubjectAccuracy {
                    subject: tally.subject,
                    correct: tally.correct,
                    wrong: tally.wrong,
                    accuracy_percent,
                }
            })
            .collect();

        let mut strongest_subject = NO_SUBJECT_DATA.to_string();
        let mut weakest_subject = NO_SUBJECT_DATA.to_string();
        let mut best = -1i64;
        let mut worst = 101i64;
        for accuracy in &per_subject {
            let percent = i64::from(accuracy.accuracy_percent);
            if percent > best {
                best = percent;
                strongest_subject = accuracy.subject.clone();
            }
            if percent < worst {
                worst = percent;
                weakest_subject = accuracy.subject.clone();
            }
        }

        Analytics {
            sessions_analyzed: window.len(),
            average_score_percent,
            per_subject,
            strongest_subject,
            weakest_subject,
            passed: average_score_percent >= self.pass_mark,
        }
    }
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_PASS_MARK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(per_subject: Vec<SubjectTally>) -> HistoryRecord {
        let score: u32 = per_subject.iter().map(|tally| tally.correct).sum();
        let total: u32 = per_subject.iter().map(SubjectTally::total).sum();
        let percentage = if total == 0 {
            0
        } else {
            (score as f64 / total as f64 * 100.0).round() as u32
        };
        HistoryRecord {
            date: Utc::now(),
            score,
            total,
            percentage,
            passed: percentage >= DEFAULT_PASS_MARK,
            per_subject,
        }
    }

    fn tally(subject: &str, correct: u32, wrong: u32) -> SubjectTally {
        SubjectTally {
            subject: subject.to_string(),
            correct,
            wrong,
        }
    }

    #[test]
    fn empty_history_yields_sentinels() {
        let analytics = ResultAggregator::default().analyze(&[], 10);
        assert_eq!(analytics.sessions_analyzed, 0);
        assert_eq!(analytics.average_score_percent, 0);
        assert_eq!(analytics.strongest_subject, NO_SUBJECT_DATA);
        assert_eq!(analytics.weakest_subject, NO_SUBJECT_DATA);
        assert!(!analytics.passed);
    }

    #[test]
    fn average_is_weighted_over_the_window() {
        let history = vec![
            record(vec![tally("Maths", 10, 0)]),
            record(vec![tally("Maths", 0, 10)]),
        ];
        let analytics = ResultAggregator::default().analyze(&history, 10);
        assert_eq!(analytics.average_score_percent, 50);
        assert_eq!(analytics.sessions_analyzed, 2);
    }

    #[test]
    fn window_limits_how_far_back_analysis_reaches() {
        let history = vec![
            record(vec![tally("Maths", 10, 0)]),
            record(vec![tally("Maths", 0, 10)]),
        ];
        let analytics = ResultAggregator::default().analyze(&history, 1);
        assert_eq!(analytics.sessions_analyzed, 1);
        assert_eq!(analytics.average_score_percent, 100);
    }

    #[test]
    fn strongest_and_weakest_by_aggregate_accuracy() {
        let history = vec![
            record(vec![tally("Maths", 9, 1), tally("English", 2, 3)]),
            record(vec![tally("Maths", 8, 2), tally("English", 1, 4)]),
        ];
        let analytics = ResultAggregator::default().analyze(&history, 10);
        assert_eq!(analytics.strongest_subject, "Maths");
        assert_eq!(analytics.weakest_subject, "English");

        let maths = &analytics.per_subject[0];
        assert_eq!(maths.subject, "Maths");
        assert_eq!(maths.accuracy_percent, 85);
    }

    #[test]
    fn ties_resolve_to_first_encountered_subject() {
        let history = vec![record(vec![
            tally("Maths", 5, 5),
            tally("English", 5, 5),
            tally("Basic Science", 5, 5),
        ])];
        let analytics = ResultAggregator::default().analyze(&history, 10);
        assert_eq!(analytics.strongest_subject, "Maths");
        assert_eq!(analytics.weakest_subject, "Maths");
    }

    #[test]
    fn perfect_single_record_averages_100() {
        let history = vec![record(vec![tally("Maths", 2, 0)])];
        let analytics = ResultAggregator::default().analyze(&history, 10);
        assert_eq!(analytics.average_score_percent, 100);
        assert!(analytics.passed);
    }
}
