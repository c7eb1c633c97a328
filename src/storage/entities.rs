use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{intake::ValidationError, utils::time::day_start};

/// Largest word count a single record may hold.
pub const MAX_WORDS: u64 = 1_000_000_000;

/// One logged observation: `words` written for `project` on `date`.
///
/// Records can only be created through [WordRecord::new] (or deserialized, which goes through
/// the same checks), so the project name is always trimmed and non-empty.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
#[serde(try_from = "RawWordRecord")]
pub struct WordRecord {
    project: Arc<str>,
    date: NaiveDate,
    words: u64,
}

impl WordRecord {
    pub fn new(project: &str, date: NaiveDate, words: u64) -> Result<Self, ValidationError> {
        let project = project.trim();
        if project.is_empty() {
            return Err(ValidationError::EmptyProject);
        }
        if words > MAX_WORDS {
            return Err(ValidationError::TooManyWords(words));
        }
        Ok(Self {
            project: project.into(),
            date,
            words,
        })
    }

    pub fn project(&self) -> &Arc<str> {
        &self.project
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn words(&self) -> u64 {
        self.words
    }

    /// Moment the record's day starts. Rolling windows compare against it.
    pub fn start(&self) -> DateTime<Utc> {
        day_start(self.date)
    }
}

/// Shape of a record on disk before it went through validation.
#[derive(Deserialize)]
struct RawWordRecord {
    project: String,
    date: NaiveDate,
    words: u64,
}

impl TryFrom<RawWordRecord> for WordRecord {
    type Error = ValidationError;

    fn try_from(
        RawWordRecord {
            project,
            date,
            words,
        }: RawWordRecord,
    ) -> Result<Self, Self::Error> {
        WordRecord::new(&project, date, words)
    }
}
