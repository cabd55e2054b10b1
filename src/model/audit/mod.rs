//! The append-only audit trail.
//!
//! Every accepted mutation produces exactly one [`AuditRecord`]. Records are
//! hash-chained: each one commits to the digest of its predecessor, so any
//! edit, insertion, removal or reordering is detectable by
//! [`verify_chain`].

use thiserror::Error;

pub use digest::Digest;
pub use event::AuditEvent;
pub use record::{verify_chain, AuditLog, AuditRecord};

mod digest;
mod event;
mod record;

/// Ways an audit trail can fail verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditError {
    #[error("Audit record {found} is out of sequence, expected {expected}")]
    Sequence { expected: u64, found: u64 },
    #[error("Audit record {sequence} does not link to its predecessor")]
    BrokenLink { sequence: u64 },
    #[error("Audit record {sequence} has been altered")]
    DigestMismatch { sequence: u64 },
    #[error("Audit record {sequence} was rejected on replay: {reason}")]
    Rejected { sequence: u64, reason: String },
}

impl AuditError {
    /// The sequence number of the offending record.
    pub fn sequence(&self) -> u64 {
        match self {
            Self::Sequence { found, .. } => *found,
            Self::BrokenLink { sequence }
            | Self::DigestMismatch { sequence }
            | Self::Rejected { sequence, .. } => *sequence,
        }
    }
}
