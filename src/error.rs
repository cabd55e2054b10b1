use thiserror::Error;

use crate::model::{
    audit::AuditError,
    common::{Address, CandidateIndex, ElectionId, ElectionState},
};

pub type Result<T> = std::result::Result<T, Error>;

/// Everything a ledger operation can fail with.
///
/// Rule violations leave the ledger untouched. Infrastructure failures
/// (`Journal`, `Encoding`) are raised before any state is mutated, so they
/// are equally side-effect free.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unauthorized: {caller} may not {operation}")]
    Unauthorized {
        caller: Address,
        operation: &'static str,
    },
    #[error("Not found: election {0}")]
    NotFound(ElectionId),
    #[error("Election {election_id} cannot move from {from} to {to}")]
    InvalidStateTransition {
        election_id: ElectionId,
        from: ElectionState,
        to: ElectionState,
    },
    #[error("Invalid candidate list: {0}")]
    InvalidCandidateList(String),
    #[error("Invalid election: {0}")]
    InvalidElectionSpec(String),
    #[error("Election {0} has not started")]
    ElectionNotStarted(ElectionId),
    #[error("Election {0} has ended")]
    ElectionEnded(ElectionId),
    #[error("Election {election_id} has no candidate {candidate_index}")]
    InvalidCandidate {
        election_id: ElectionId,
        candidate_index: CandidateIndex,
    },
    #[error("{voter} has already voted in election {election_id}")]
    AlreadyVoted {
        election_id: ElectionId,
        voter: Address,
    },
    #[error("Journal I/O failed: {0}")]
    Journal(#[from] std::io::Error),
    #[error("Journal encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error(transparent)]
    Audit(#[from] AuditError),
}

/// The kind of an [`Error`], without its payload.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    NotFound,
    InvalidStateTransition,
    InvalidCandidateList,
    InvalidElectionSpec,
    ElectionNotStarted,
    ElectionEnded,
    InvalidCandidate,
    AlreadyVoted,
    Journal,
    Encoding,
    Audit,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidStateTransition { .. } => ErrorKind::InvalidStateTransition,
            Self::InvalidCandidateList(_) => ErrorKind::InvalidCandidateList,
            Self::InvalidElectionSpec(_) => ErrorKind::InvalidElectionSpec,
            Self::ElectionNotStarted(_) => ErrorKind::ElectionNotStarted,
            Self::ElectionEnded(_) => ErrorKind::ElectionEnded,
            Self::InvalidCandidate { .. } => ErrorKind::InvalidCandidate,
            Self::AlreadyVoted { .. } => ErrorKind::AlreadyVoted,
            Self::Journal(_) => ErrorKind::Journal,
            Self::Encoding(_) => ErrorKind::Encoding,
            Self::Audit(_) => ErrorKind::Audit,
        }
    }

    /// Is this a rejection by the ledger rules, as opposed to an
    /// infrastructure failure?
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self.kind(),
            ErrorKind::Journal | ErrorKind::Encoding | ErrorKind::Audit
        )
    }
}
