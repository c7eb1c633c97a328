//! Gate between raw user input and the record set. Everything the aggregation code receives
//! went through here (or through deserialization, which performs the same checks).

use thiserror::Error;
use tracing::warn;

use crate::{storage::entities::WordRecord, utils::time::parse_day};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Project name can't be empty")]
    EmptyProject,

    #[error("Can't read {0:?} as a day, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Word count must be a whole non-negative number, got {0:?}")]
    InvalidWords(String),

    #[error("Word count {0} is more than anyone writes in a day")]
    TooManyWords(u64),
}

/// A record as typed by the user. Nothing about it is trusted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCandidate {
    pub project: String,
    pub date: String,
    pub words: String,
}

impl RecordCandidate {
    pub fn new(
        project: impl Into<String>,
        date: impl Into<String>,
        words: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            date: date.into(),
            words: words.into(),
        }
    }

    /// Turns the candidate into a record, or explains why it can't become one. Checks run in form
    /// order: project, date, then words.
    pub fn validate(&self) -> Result<WordRecord, ValidationError> {
        if self.project.trim().is_empty() {
            return Err(ValidationError::EmptyProject);
        }
        let date =
            parse_day(&self.date).ok_or_else(|| ValidationError::InvalidDate(self.date.clone()))?;
        let words = self
            .words
            .trim()
            .parse::<u64>()
            .map_err(|_| ValidationError::InvalidWords(self.words.clone()))?;
        WordRecord::new(&self.project, date, words)
    }
}

/// Validates a batch of candidates. Rejected ones are logged and left out.
pub fn admit(candidates: impl IntoIterator<Item = RecordCandidate>) -> Vec<WordRecord> {
    candidates
        .into_iter()
        .filter_map(|candidate| match candidate.validate() {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Ignoring {candidate:?}: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::storage::entities::{WordRecord, MAX_WORDS};

    use super::{admit, RecordCandidate, ValidationError};

    #[test]
    fn test_validate_basic() {
        let record = RecordCandidate::new(" Novel ", "2024-01-02", " 250 ")
            .validate()
            .unwrap();
        assert_eq!(
            record,
            WordRecord::new("Novel", NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 250).unwrap()
        );
    }

    #[test]
    fn test_validate_zero_words() {
        let record = RecordCandidate::new("Novel", "2024-01-02", "0")
            .validate()
            .unwrap();
        assert_eq!(record.words(), 0);
    }

    #[test]
    fn test_validate_empty_project() {
        assert_eq!(
            RecordCandidate::new("   ", "2024-01-02", "10").validate(),
            Err(ValidationError::EmptyProject)
        );
    }

    #[test]
    fn test_validate_bad_date() {
        for date in ["", "2024-13-01", "2024-02-30", "tomorrow", "02/01/2024"] {
            assert_eq!(
                RecordCandidate::new("Novel", date, "10").validate(),
                Err(ValidationError::InvalidDate(date.into())),
                "{date}"
            );
        }
    }

    #[test]
    fn test_validate_bad_words() {
        for words in ["", "-5", "12.5", "12abc", "many"] {
            assert_eq!(
                RecordCandidate::new("Novel", "2024-01-02", words).validate(),
                Err(ValidationError::InvalidWords(words.into())),
                "{words}"
            );
        }
    }

    #[test]
    fn test_validate_word_count_limit() {
        assert_eq!(
            RecordCandidate::new("A", "2024-01-01", "18446744073709551615").validate(),
            Err(ValidationError::TooManyWords(u64::MAX))
        );
        assert_eq!(
            RecordCandidate::new("A", "2024-01-01", MAX_WORDS.to_string())
                .validate()
                .map(|record| record.words()),
            Ok(MAX_WORDS)
        );
        // Past u64 there's nothing to bound, the number just doesn't parse.
        assert_eq!(
            RecordCandidate::new("A", "2024-01-01", "18446744073709551616").validate(),
            Err(ValidationError::InvalidWords("18446744073709551616".into()))
        );
    }

    #[test]
    fn test_admit_skips_invalid() {
        let records = admit([
            RecordCandidate::new("A", "2024-01-01", "100"),
            RecordCandidate::new("", "2024-01-01", "100"),
            RecordCandidate::new("B", "someday", "100"),
            RecordCandidate::new("B", "2024-01-02", "-1"),
            RecordCandidate::new("B", "2024-01-02", "50"),
        ]);

        assert_eq!(records.len(), 2);
        assert_eq!(&**records[0].project(), "A");
        assert_eq!(&**records[1].project(), "B");
        assert_eq!(records[1].words(), 50);
    }
}
