use rand::Rng;

use super::repository::QuestionRepository;
use crate::error::EngineError;
use crate::models::exam::ExamSpec;
use crate::models::question::Question;

/// Assembles exams from the repository: per-section filter, unbiased
/// shuffle, bounded take, sections concatenated in spec order.
pub struct ExamComposer;

impl ExamComposer {
    /// Composes an exam for the given spec. Each section contributes
    /// `min(count, available)` questions; a short pool is never padded with
    /// duplicates. Fails with `EmptyExam` when nothing matched at all, and
    /// with `MalformedQuestion` when a selected question violates its
    /// structural invariants.
    pub fn compose<R: Rng>(
        repository: &QuestionRepository,
        spec: &ExamSpec,
        chapter_filter: Option<&[u32]>,
        rng: &mut R,
    ) -> Result<Vec<Question>, EngineError> {
        let mut exam: Vec<Question> = Vec::with_capacity(spec.total_required());

        for section in &spec.sections {
            let mut pool = repository.filter(&section.subject, chapter_filter);
            fisher_yates(&mut pool, rng);

            let take = section.count.min(pool.len());
            if take < section.count {
                tracing::debug!(
                    "Subject {:?} under-represented: {} of {} requested",
                    section.subject,
                    take,
                    section.count
                );
            }

            for question in &pool[..take] {
                question.ensure_well_formed()?;
                exam.push((*question).clone());
            }
        }

        if exam.is_empty() {
            return Err(EngineError::EmptyExam);
        }

        tracing::info!(
            "Composed exam: {} questions across {} sections",
            exam.len(),
            spec.sections.len()
        );
        Ok(exam)
    }

    /// Single-subject practice draw, shuffled and capped at `limit`.
    pub fn compose_practice<R: Rng>(
        repository: &QuestionRepository,
        subject: &str,
        limit: usize,
        rng: &mut R,
    ) -> Result<Vec<Question>, EngineError> {
        Self::compose(
            repository,
            &ExamSpec::single_subject(subject, limit),
            None,
            rng,
        )
    }
}

/// Unbiased Fisher–Yates: for i from the last index down to 1, swap with a
/// uniformly random index in [0, i].
fn fisher_yates<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}
