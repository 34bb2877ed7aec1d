use std::collections::BTreeMap;

use crate::model::deck::Deck;
use crate::model::ids::SubjectName;
use crate::model::mastery::MasteryRecord;

/// Full progress state: one `MasteryRecord` per subject studied so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    subjects: BTreeMap<SubjectName, MasteryRecord>,
}

impl Progress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, subject: &SubjectName) -> Option<&MasteryRecord> {
        self.subjects.get(subject)
    }

    /// Copy of the subject's record, or a fresh one if it was never studied.
    #[must_use]
    pub fn record_or_default(&self, subject: &SubjectName) -> MasteryRecord {
        self.subjects.get(subject).cloned().unwrap_or_default()
    }

    /// Replace the subject's record, returning the previous one.
    pub fn insert(&mut self, subject: SubjectName, record: MasteryRecord) -> Option<MasteryRecord> {
        self.subjects.insert(subject, record)
    }

    /// Reset one subject. Returns `false` if the subject has no record.
    pub fn reset(&mut self, subject: &SubjectName) -> bool {
        match self.subjects.get_mut(subject) {
            Some(record) => {
                record.reset();
                true
            }
            None => false,
        }
    }

    /// Percentage of `deck` mastered for `subject`; 0 when unknown or empty.
    #[must_use]
    pub fn percentage_mastered(&self, subject: &SubjectName, deck: &Deck) -> f64 {
        self.subjects
            .get(subject)
            .map_or(0.0, |record| record.percentage_mastered(deck))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SubjectName, &MasteryRecord)> {
        self.subjects.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

impl FromIterator<(SubjectName, MasteryRecord)> for Progress {
    fn from_iter<T: IntoIterator<Item = (SubjectName, MasteryRecord)>>(iter: T) -> Self {
        Self {
            subjects: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CardDraft, DeckScope};

    fn subject(name: &str) -> SubjectName {
        SubjectName::new(name).unwrap()
    }

    #[test]
    fn reset_only_touches_the_named_subject() {
        let mut progress: Progress = [
            (subject("a"), MasteryRecord::from_persisted(["Q".to_string()], 40)),
            (subject("b"), MasteryRecord::from_persisted(["R".to_string()], 70)),
        ]
        .into_iter()
        .collect();

        assert!(progress.reset(&subject("a")));

        assert_eq!(progress.get(&subject("a")), Some(&MasteryRecord::new()));
        let b = progress.get(&subject("b")).unwrap();
        assert!(b.is_mastered("R"));
        assert_eq!(b.time_spent_secs(), 70);
    }

    #[test]
    fn reset_of_unknown_subject_is_a_no_op() {
        let mut progress = Progress::new();
        assert!(!progress.reset(&subject("missing")));
        assert!(progress.is_empty());
    }

    #[test]
    fn percentage_for_unknown_subject_is_zero() {
        let deck = Deck::from_drafts(
            subject("a"),
            DeckScope::AllFiles,
            [CardDraft::new("Q", ["x", "y"], "x")],
        )
        .unwrap();
        assert!(Progress::new().percentage_mastered(&subject("a"), &deck).abs() < f64::EPSILON);
    }
}
