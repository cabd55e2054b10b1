//! The election ledger: owns every election, candidate tally and vote
//! record, and is the only thing that mutates them.
//!
//! Every mutation follows the same path:
//!
//! 1. Authorise the caller (administrative operations only).
//! 2. Build the `AuditEvent` describing the change and `Ledger::check`
//!    it against the current state. Nothing has changed yet.
//! 3. `Ledger::commit` it: write the audit record to the journal (if
//!    any), then apply the event and append the record in memory.
//!
//! Step 3 can only fail while writing the journal, before anything in
//! memory is touched, so every operation either fully applies or has no
//! effect.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::journal::Journal;
use crate::model::{
    audit::{AuditEvent, AuditLog},
    common::{Address, ElectionId, ElectionState},
    election::{Election, ElectionSpec},
};

pub use guard::{AccessGuard, VoteGuard};
pub use shared::SharedLedger;

mod admin;
mod guard;
mod public;
mod replay;
mod shared;
mod voting;

pub struct Ledger {
    access: AccessGuard,
    votes: VoteGuard,
    /// Election `n` lives at index `n - 1`.
    elections: Vec<Election>,
    audit: AuditLog,
    journal: Option<Journal>,
    clock: Arc<dyn Clock>,
}

impl Ledger {
    /// An empty, in-memory ledger administered by `admin`.
    pub fn new(admin: impl Into<Address>) -> Self {
        Self::with_clock(admin, Arc::new(SystemClock))
    }

    /// An empty, in-memory ledger that takes its time from `clock`.
    pub fn with_clock(admin: impl Into<Address>, clock: Arc<dyn Clock>) -> Self {
        Self {
            access: AccessGuard::new(admin.into()),
            votes: VoteGuard::new(),
            elections: Vec::new(),
            audit: AuditLog::new(),
            journal: None,
            clock,
        }
    }

    /// Build a ledger from configuration. If a journal is configured, any
    /// records already in it are replayed and new records are appended to it.
    pub fn open(config: &Config) -> Result<Self> {
        Self::open_with_clock(config, Arc::new(SystemClock))
    }

    pub fn open_with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let admin = config.admin().clone();
        let Some(path) = config.journal() else {
            info!("Opened in-memory ledger administered by {admin}");
            return Ok(Self::with_clock(admin, clock));
        };

        let (journal, records) = Journal::open(path)?;
        let mut ledger = Self::replay(admin, records, clock)?;
        info!(
            "Opened ledger journal {} ({} records, {} elections)",
            path.display(),
            ledger.audit.len(),
            ledger.elections.len()
        );
        ledger.journal = Some(journal);
        Ok(ledger)
    }

    /// The id the next created election will get.
    fn next_election_id(&self) -> ElectionId {
        self.elections.len() as ElectionId + 1
    }

    fn slot(&self, election_id: ElectionId) -> Option<usize> {
        let index = usize::try_from(election_id).ok()?.checked_sub(1)?;
        (index < self.elections.len()).then_some(index)
    }

    fn election(&self, election_id: ElectionId) -> Result<&Election> {
        self.slot(election_id)
            .map(|index| &self.elections[index])
            .ok_or(Error::NotFound(election_id))
    }

    /// Check that `event` could be applied right now, without changing anything.
    fn check(&self, event: &AuditEvent) -> Result<()> {
        match event {
            AuditEvent::ElectionCreated {
                name,
                candidates,
                duration_minutes,
                ..
            } => ElectionSpec::new(name.clone(), candidates.clone(), *duration_minutes).validate(),
            AuditEvent::ElectionStarted { election_id, .. } => self
                .election(*election_id)?
                .ensure_transition(ElectionState::Active),
            AuditEvent::ElectionEnded { election_id, .. } => self
                .election(*election_id)?
                .ensure_transition(ElectionState::Ended),
            AuditEvent::VoteCast {
                election_id,
                candidate_index,
                voter,
            } => {
                self.election(*election_id)?.check_ballot(*candidate_index)?;
                self.votes.check(*election_id, voter)
            }
        }
    }

    /// Apply an event that has passed [`Self::check`].
    fn apply(&mut self, event: &AuditEvent, at: DateTime<Utc>) {
        match event {
            AuditEvent::ElectionCreated {
                election_id,
                name,
                candidates,
                duration_minutes,
            } => {
                debug_assert_eq!(*election_id, self.next_election_id());
                let spec = ElectionSpec::new(name.clone(), candidates.clone(), *duration_minutes);
                self.elections.push(Election::new(*election_id, spec, at));
            }
            AuditEvent::ElectionStarted {
                election_id,
                start_time,
            } => self.checked_election_mut(*election_id).start(*start_time),
            AuditEvent::ElectionEnded {
                election_id,
                end_time,
            } => self.checked_election_mut(*election_id).end(*end_time),
            AuditEvent::VoteCast {
                election_id,
                candidate_index,
                voter,
            } => {
                self.votes.record(*election_id, voter.clone());
                self.checked_election_mut(*election_id)
                    .record_vote(*candidate_index);
            }
        }
    }

    /// Look up an election whose existence [`Self::check`] has already confirmed.
    fn checked_election_mut(&mut self, election_id: ElectionId) -> &mut Election {
        let index = election_id as usize - 1;
        &mut self.elections[index]
    }

    /// Persist and apply a checked event, stamped with the current time.
    fn commit(&mut self, event: AuditEvent, at: DateTime<Utc>) -> Result<()> {
        let record = self.audit.prepare(event, at);
        if let Some(journal) = self.journal.as_mut() {
            journal.append(&record)?;
        }
        self.apply(&record.event, record.recorded_at);
        debug!(
            "Recorded audit #{} {} for election {} ({})",
            record.sequence,
            record.event.name(),
            record.event.election_id(),
            record.digest
        );
        self.audit.push(record);
        Ok(())
    }

    /// The clock's time, held back so the audit trail never runs backwards.
    fn now(&self) -> DateTime<Utc> {
        let now = self.clock.now();
        self.audit
            .last_recorded_at()
            .map_or(now, |last| now.max(last))
    }
}
