use serde::{Deserialize, Serialize};

/// One section of an exam: how many questions to draw for a subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectRequirement {
    pub subject: String,
    pub count: usize,
}

/// Ordered exam composition. Sections appear in the final exam in the order
/// listed here; a section short on questions contributes what it has.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamSpec {
    pub sections: Vec<SubjectRequirement>,
}

impl ExamSpec {
    /// The fixed scholarship exam distribution: 45 questions across the six
    /// paper subjects.
    pub fn scholarship_exam() -> Self {
        let sections = [
            ("Part I Malayalam", 5),
            ("Part II Malayalam", 5),
            ("Maths", 10),
            ("English", 5),
            ("Basic Science", 10),
            ("Social Science", 10),
        ]
        .into_iter()
        .map(|(subject, count)| SubjectRequirement {
            subject: subject.to_string(),
            count,
        })
        .collect();

        Self { sections }
    }

    /// Single-subject practice composition.
    pub fn single_subject(subject: impl Into<String>, count: usize) -> Self {
        Self {
            sections: vec![SubjectRequirement {
                subject: subject.into(),
                count,
            }],
        }
    }

    pub fn total_required(&self) -> usize {
        self.sections.iter().map(|section| section.count).sum()
    }
}

impl Default for ExamSpec {
    fn default() -> Self {
        Self::scholarship_exam()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scholarship_exam_totals_45() {
        let spec = ExamSpec::scholarship_exam();
        assert_eq!(spec.sections.len(), 6);
        assert_eq!(spec.total_required(), 45);
        assert_eq!(spec.sections[0].subject, "Part I Malayalam");
        assert_eq!(spec.sections[5].subject, "Social Science");
    }

    #[test]
    fn single_subject_spec() {
        let spec = ExamSpec::single_subject("Maths", 20);
        assert_eq!(spec.sections.len(), 1);
        assert_eq!(spec.total_required(), 20);
    }
}
