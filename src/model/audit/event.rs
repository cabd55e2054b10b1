use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::common::{Address, CandidateIndex, ElectionId};

/// An accepted mutation, as recorded in the audit trail.
///
/// Events carry everything needed to rebuild the ledger from scratch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum AuditEvent {
    ElectionCreated {
        election_id: ElectionId,
        name: String,
        candidates: Vec<String>,
        duration_minutes: u32,
    },
    ElectionStarted {
        election_id: ElectionId,
        start_time: DateTime<Utc>,
    },
    ElectionEnded {
        election_id: ElectionId,
        end_time: DateTime<Utc>,
    },
    VoteCast {
        election_id: ElectionId,
        candidate_index: CandidateIndex,
        voter: Address,
    },
}

impl AuditEvent {
    /// The election this event concerns.
    pub fn election_id(&self) -> ElectionId {
        match self {
            Self::ElectionCreated { election_id, .. }
            | Self::ElectionStarted { election_id, .. }
            | Self::ElectionEnded { election_id, .. }
            | Self::VoteCast { election_id, .. } => *election_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ElectionCreated { .. } => "ElectionCreated",
            Self::ElectionStarted { .. } => "ElectionStarted",
            Self::ElectionEnded { .. } => "ElectionEnded",
            Self::VoteCast { .. } => "VoteCast",
        }
    }
}
