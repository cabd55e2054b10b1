use std::ops::Deref;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::model::common::{CandidateIndex, ElectionId};

use super::election_core::ElectionMetadata;

/// A read-only snapshot of an election, as returned by queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionView {
    pub id: ElectionId,
    #[serde(flatten)]
    pub metadata: ElectionMetadata,
    pub candidates: Vec<CandidateView>,
}

impl ElectionView {
    /// Total number of votes accepted so far.
    pub fn total_votes(&self) -> u64 {
        self.candidates.iter().map(|c| c.votes).sum()
    }

    /// When the election would end if the recorded duration were honoured.
    /// `None` until the election has started, or if that moment is past the
    /// end of representable time.
    ///
    /// This is for display only; elections end solely through the
    /// administrator.
    pub fn advisory_end_time(&self) -> Option<DateTime<Utc>> {
        let duration = Duration::minutes(self.metadata.duration_minutes.into());
        self.metadata
            .start_time
            .and_then(|start| start.checked_add_signed(duration))
    }

    /// Has the advisory end time passed at `now`?
    pub fn is_past_advisory_end(&self, now: DateTime<Utc>) -> bool {
        self.advisory_end_time().map_or(false, |end| now > end)
    }
}

impl Deref for ElectionView {
    type Target = ElectionMetadata;

    fn deref(&self) -> &Self::Target {
        &self.metadata
    }
}

/// A read-only snapshot of a single candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateView {
    pub index: CandidateIndex,
    pub name: String,
    pub votes: u64,
}
