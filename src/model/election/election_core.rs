use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::common::{CandidateIndex, ElectionId, ElectionState};

use super::spec::ElectionSpec;
use super::view::{CandidateView, ElectionView};

/// A single candidate and their running tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub votes: u64,
}

/// A view on just the election's top-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionMetadata {
    /// Election name.
    pub name: String,
    /// Election state.
    pub state: ElectionState,
    /// When the election was created.
    pub created_at: DateTime<Utc>,
    /// When the election was started, if it has been.
    pub start_time: Option<DateTime<Utc>>,
    /// When the election was ended, if it has been.
    pub end_time: Option<DateTime<Utc>>,
    /// Intended duration in minutes. Advisory only.
    pub duration_minutes: u32,
}

/// An election as held by the ledger.
///
/// The candidate list is fixed at construction; only the tallies and the
/// lifecycle metadata ever change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Election {
    pub id: ElectionId,
    pub metadata: ElectionMetadata,
    candidates: Box<[Candidate]>,
}

impl Election {
    /// Create a new, `Upcoming` election with zeroed tallies.
    /// The `spec` must already have been validated.
    pub fn new(id: ElectionId, spec: ElectionSpec, created_at: DateTime<Utc>) -> Self {
        let candidates = spec
            .candidates
            .into_iter()
            .map(|name| Candidate { name, votes: 0 })
            .collect();

        Self {
            id,
            metadata: ElectionMetadata {
                name: spec.name,
                state: ElectionState::Upcoming,
                created_at,
                start_time: None,
                end_time: None,
                duration_minutes: spec.duration_minutes,
            },
            candidates,
        }
    }

    pub fn state(&self) -> ElectionState {
        self.metadata.state
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Check that the election may move to state `to` right now.
    pub fn ensure_transition(&self, to: ElectionState) -> Result<()> {
        let from = self.state();
        if from.can_transition_to(to) {
            Ok(())
        } else {
            Err(Error::InvalidStateTransition {
                election_id: self.id,
                from,
                to,
            })
        }
    }

    /// Open the election. Callers must check [`Self::ensure_transition`] first.
    pub(crate) fn start(&mut self, at: DateTime<Utc>) {
        debug_assert_eq!(self.state(), ElectionState::Upcoming);
        self.metadata.state = ElectionState::Active;
        self.metadata.start_time = Some(at);
    }

    /// Close the election. Callers must check [`Self::ensure_transition`] first.
    pub(crate) fn end(&mut self, at: DateTime<Utc>) {
        debug_assert_eq!(self.state(), ElectionState::Active);
        self.metadata.state = ElectionState::Ended;
        self.metadata.end_time = Some(at);
    }

    /// Check that a vote for `candidate_index` could be accepted, ignoring
    /// who is casting it. Lifecycle is checked before the index, so an
    /// out-of-range index only yields `InvalidCandidate` while the election
    /// is `Active`; otherwise the lifecycle error wins.
    pub fn check_ballot(&self, candidate_index: CandidateIndex) -> Result<()> {
        match self.state() {
            ElectionState::Upcoming => return Err(Error::ElectionNotStarted(self.id)),
            ElectionState::Ended => return Err(Error::ElectionEnded(self.id)),
            ElectionState::Active => {}
        }
        if candidate_index >= self.candidates.len() {
            return Err(Error::InvalidCandidate {
                election_id: self.id,
                candidate_index,
            });
        }
        Ok(())
    }

    /// Add one vote to a candidate. Callers must check [`Self::check_ballot`] first.
    pub(crate) fn record_vote(&mut self, candidate_index: CandidateIndex) {
        self.candidates[candidate_index].votes += 1;
    }

    /// Take a read-only snapshot.
    pub fn view(&self) -> ElectionView {
        ElectionView {
            id: self.id,
            metadata: self.metadata.clone(),
            candidates: self.candidate_views(),
        }
    }

    pub fn candidate_views(&self) -> Vec<CandidateView> {
        self.candidates
            .iter()
            .enumerate()
            .map(|(index, candidate)| CandidateView {
                index,
                name: candidate.name.clone(),
                votes: candidate.votes,
            })
            .collect()
    }
}
