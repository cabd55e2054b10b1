use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AuditError, AuditEvent, Digest};

/// One link in the audit chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Position in the chain, starting at zero.
    pub sequence: u64,
    /// Ledger time at which the mutation was accepted.
    pub recorded_at: DateTime<Utc>,
    pub event: AuditEvent,
    /// Digest of the previous record, or [`Digest::ZERO`] for the first.
    pub previous: Digest,
    /// Digest over all of the above.
    pub digest: Digest,
}

impl AuditRecord {
    /// Create a record, computing its digest.
    pub fn new(
        sequence: u64,
        recorded_at: DateTime<Utc>,
        event: AuditEvent,
        previous: Digest,
    ) -> Self {
        let digest = Self::digest_of(sequence, &recorded_at, &event, &previous);
        Self {
            sequence,
            recorded_at,
            event,
            previous,
            digest,
        }
    }

    /// Recompute the digest from the record's contents.
    pub fn compute_digest(&self) -> Digest {
        Self::digest_of(self.sequence, &self.recorded_at, &self.event, &self.previous)
    }

    fn digest_of(
        sequence: u64,
        recorded_at: &DateTime<Utc>,
        event: &AuditEvent,
        previous: &Digest,
    ) -> Digest {
        let body = serde_json::to_vec(&(recorded_at, event)).expect("Serialisation is infallible");
        Digest::of_parts([
            &previous.as_bytes()[..],
            &sequence.to_be_bytes()[..],
            &body[..],
        ])
    }
}

/// Check that `records` form an unbroken chain starting from the beginning.
/// The first failing record is reported.
pub fn verify_chain(records: &[AuditRecord]) -> Result<(), AuditError> {
    let mut previous = Digest::ZERO;
    for (expected, record) in (0u64..).zip(records) {
        if record.sequence != expected {
            return Err(AuditError::Sequence {
                expected,
                found: record.sequence,
            });
        }
        if record.previous != previous {
            return Err(AuditError::BrokenLink {
                sequence: record.sequence,
            });
        }
        if record.compute_digest() != record.digest {
            return Err(AuditError::DigestMismatch {
                sequence: record.sequence,
            });
        }
        previous = record.digest;
    }
    Ok(())
}

/// The in-memory audit trail of a ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLog {
    records: Vec<AuditRecord>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[AuditRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Digest of the latest record, or [`Digest::ZERO`] if there are none.
    pub fn head(&self) -> Digest {
        self.records.last().map_or(Digest::ZERO, |r| r.digest)
    }

    /// When the latest record was made.
    pub fn last_recorded_at(&self) -> Option<DateTime<Utc>> {
        self.records.last().map(|r| r.recorded_at)
    }

    /// Build the record that would come next, without appending it.
    pub fn prepare(&self, event: AuditEvent, recorded_at: DateTime<Utc>) -> AuditRecord {
        AuditRecord::new(self.records.len() as u64, recorded_at, event, self.head())
    }

    /// Append a record produced by [`Self::prepare`] (or verified against
    /// this log during replay).
    pub(crate) fn push(&mut self, record: AuditRecord) {
        debug_assert_eq!(record.sequence, self.records.len() as u64);
        debug_assert_eq!(record.previous, self.head());
        self.records.push(record);
    }

    pub fn verify(&self) -> Result<(), AuditError> {
        verify_chain(&self.records)
    }
}
