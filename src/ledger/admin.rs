//! Administrator-only operations.

use crate::error::Result;
use crate::logging::{log_outcome, OperationId};
use crate::model::{
    audit::AuditEvent,
    common::{Address, ElectionId, ElectionState},
    election::ElectionSpec,
};

use super::Ledger;

impl Ledger {
    /// Create a new `Upcoming` election and return its id.
    pub fn create_election(&mut self, caller: &Address, spec: ElectionSpec) -> Result<ElectionId> {
        let op = OperationId::next();
        info!(
            "->op{op} createElection by {caller}: \"{}\" with {} candidates",
            spec.name,
            spec.candidates.len()
        );
        let result = self.try_create_election(caller, spec);
        log_outcome(op, "createElection", &result);
        result
    }

    fn try_create_election(&mut self, caller: &Address, spec: ElectionSpec) -> Result<ElectionId> {
        self.access.authorize(caller, "create elections")?;

        let election_id = self.next_election_id();
        let event = AuditEvent::ElectionCreated {
            election_id,
            name: spec.name,
            candidates: spec.candidates,
            duration_minutes: spec.duration_minutes,
        };
        self.check(&event)?;
        let now = self.now();
        self.commit(event, now)?;
        Ok(election_id)
    }

    /// Open an `Upcoming` election for voting.
    pub fn start_election(&mut self, caller: &Address, election_id: ElectionId) -> Result<()> {
        let op = OperationId::next();
        info!("->op{op} startElection by {caller}: election {election_id}");
        let result = self.try_transition(caller, election_id, ElectionState::Active);
        log_outcome(op, "startElection", &result);
        result
    }

    /// Close an `Active` election, freezing its tallies for good.
    pub fn end_election(&mut self, caller: &Address, election_id: ElectionId) -> Result<()> {
        let op = OperationId::next();
        info!("->op{op} endElection by {caller}: election {election_id}");
        let result = self.try_transition(caller, election_id, ElectionState::Ended);
        log_outcome(op, "endElection", &result);
        result
    }

    fn try_transition(
        &mut self,
        caller: &Address,
        election_id: ElectionId,
        to: ElectionState,
    ) -> Result<()> {
        let operation = match to {
            ElectionState::Active => "start elections",
            _ => "end elections",
        };
        self.access.authorize(caller, operation)?;

        let now = self.now();
        let event = match to {
            ElectionState::Active => AuditEvent::ElectionStarted {
                election_id,
                start_time: now,
            },
            _ => AuditEvent::ElectionEnded {
                election_id,
                end_time: now,
            },
        };
        self.check(&event)?;
        self.commit(event, now)
    }
}
