use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::CoreError;

pub type WordId = Uuid;
pub type ReviewId = Uuid;

/// Three-bucket recall rating. Serialized as the bare integer.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "i64", into = "i64")]
pub enum Difficulty {
    Forgot,
    #[default]
    Vague,
    Remembered,
}

impl Difficulty {
    pub fn as_rating(&self) -> i64 {
        match self {
            Difficulty::Forgot => -1,
            Difficulty::Vague => 0,
            Difficulty::Remembered => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Forgot => "forgot",
            Difficulty::Vague => "vague",
            Difficulty::Remembered => "remembered",
        }
    }
}

impl TryFrom<i64> for Difficulty {
    type Error = CoreError;

    fn try_from(rating: i64) -> Result<Self, Self::Error> {
        match rating {
            -1 => Ok(Difficulty::Forgot),
            0 => Ok(Difficulty::Vague),
            1 => Ok(Difficulty::Remembered),
            other => Err(CoreError::InvalidRating(other)),
        }
    }
}

impl From<Difficulty> for i64 {
    fn from(d: Difficulty) -> Self {
        d.as_rating()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Word {
    pub id: WordId,
    pub word: String,
    pub definition: String,
    #[serde(default)]
    pub example: String,
    pub created_at: DateTime<Utc>,
}

impl Word {
    pub fn new(
        word: impl Into<String>,
        definition: impl Into<String>,
        example: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            word: word.into(),
            definition: definition.into(),
            example: example.into(),
            created_at: Utc::now(),
        }
    }
}

/// Scheduling state of one word.
///
/// `phase` indexes the interval table and may sit one past its end once the
/// word has graduated; in that case `next_review` is `None` and `completed`
/// is set.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Progress {
    #[serde(default)]
    pub phase: u32,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_review: Option<DateTime<Utc>>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub completed: bool,
}

impl Progress {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            phase: 0,
            review_count: 0,
            last_reviewed: None,
            next_review: Some(now),
            difficulty: Difficulty::Vague,
            completed: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Review {
    pub id: ReviewId,
    pub word_id: WordId,
    pub difficulty: Difficulty,
    pub reviewed_at: DateTime<Utc>,
    pub phase_after: u32,
    #[serde(default)]
    pub interval_days: Option<u32>,
}

impl Review {
    pub fn new(
        word_id: WordId,
        difficulty: Difficulty,
        reviewed_at: DateTime<Utc>,
        phase_after: u32,
        interval_days: Option<u32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            word_id,
            difficulty,
            reviewed_at,
            phase_after,
            interval_days,
        }
    }
}
