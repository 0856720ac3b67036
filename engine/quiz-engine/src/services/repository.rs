use crate::models::question::Question;

/// Immutable access to the loaded question bank, indexed by subject and
/// chapter. Never mutated after loading.
pub struct QuestionRepository {
    questions: Vec<Question>,
}

impl QuestionRepository {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn all(&self) -> &[Question] {
        &self.questions
    }

    /// Unique subjects in bank first-appearance order.
    pub fn subjects(&self) -> Vec<String> {
        let mut subjects: Vec<String> = Vec::new();
        for question in &self.questions {
            if !subjects.iter().any(|subject| subject == &question.subject) {
                subjects.push(question.subject.clone());
            }
        }
        subjects
    }

    /// Unique chapter numbers, ascending.
    pub fn chapters(&self) -> Vec<u32> {
        let mut chapters: Vec<u32> = self
            .questions
            .iter()
            .map(|question| question.chapter)
            .collect();
        chapters.sort_unstable();
        chapters.dedup();
        chapters
    }

    /// Questions of one subject, optionally restricted to a chapter set.
    /// An empty chapter filter means "no restriction".
    pub fn filter(&self, subject: &str, chapters: Option<&[u32]>) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|question| question.subject == subject)
            .filter(|question| match chapters {
                Some(chapters) if !chapters.is_empty() => chapters.contains(&question.chapter),
                _ => true,
            })
            .collect()
    }
}
