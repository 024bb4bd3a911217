use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ConcernId, GeographicLevel, UserId, VoteDelta};
use crate::Record;

/// A short report scoped to one geographic bucket.
///
/// Everything except the counters and `updated_at` is fixed at submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Record)]
#[record(collection = "concerns")]
pub struct Concern {
    #[record(key)]
    pub id: ConcernId,
    pub author_id: Option<UserId>,
    /// Free text shown as the author; independent of `author_id`.
    pub author_display_name: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub geographic_level: GeographicLevel,
    pub location_identifier: String,
    pub upvotes: u64,
    pub downvotes: u64,
}

impl Concern {
    /// Upvotes minus downvotes; the leaderboard ranking key. Saturates at
    /// the `i64` bounds instead of wrapping.
    pub fn net_votes(&self) -> i64 {
        let up = i64::try_from(self.upvotes).unwrap_or(i64::MAX);
        let down = i64::try_from(self.downvotes).unwrap_or(i64::MAX);
        up.saturating_sub(down)
    }

    /// Counters after `delta`, or None if either would go negative.
    pub(crate) fn with_delta(&self, delta: VoteDelta, at: DateTime<Utc>) -> Option<Concern> {
        let upvotes = self.upvotes.checked_add_signed(delta.upvotes)?;
        let downvotes = self.downvotes.checked_add_signed(delta.downvotes)?;
        Some(Concern {
            upvotes,
            downvotes,
            updated_at: at,
            ..self.clone()
        })
    }
}

/// Submission input for a new concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewConcern {
    pub author_id: Option<UserId>,
    pub author_display_name: Option<String>,
    pub text: String,
    pub geographic_level: GeographicLevel,
    pub location_identifier: String,
}

impl NewConcern {
    /// An anonymous concern without a display name.
    pub fn new(
        text: impl Into<String>,
        geographic_level: GeographicLevel,
        location_identifier: impl Into<String>,
    ) -> Self {
        Self {
            author_id: None,
            author_display_name: None,
            text: text.into(),
            geographic_level,
            location_identifier: location_identifier.into(),
        }
    }

    pub fn author(mut self, author_id: impl Into<UserId>) -> Self {
        self.author_id = Some(author_id.into());
        self
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.author_display_name = Some(name.into());
        self
    }
}
