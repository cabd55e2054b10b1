//! Read-only queries. Callable by anyone; none of them has side effects.

use crate::error::Result;
use crate::model::{
    audit::AuditLog,
    common::{Address, ElectionId},
    election::{CandidateView, ElectionView},
};

use super::Ledger;

impl Ledger {
    pub fn get_election(&self, election_id: ElectionId) -> Result<ElectionView> {
        self.election(election_id).map(|election| election.view())
    }

    /// Every election ever created, in id order.
    pub fn get_all_elections(&self) -> Vec<ElectionView> {
        self.elections.iter().map(|election| election.view()).collect()
    }

    /// The election's candidates in ballot order, with current tallies.
    pub fn get_candidates(&self, election_id: ElectionId) -> Result<Vec<CandidateView>> {
        self.election(election_id)
            .map(|election| election.candidate_views())
    }

    /// Has `voter` voted in the election? `false` for unknown elections.
    pub fn has_voted(&self, election_id: ElectionId, voter: &Address) -> bool {
        self.votes.has_voted(election_id, voter)
    }

    /// How many distinct voters have voted in the election.
    pub fn turnout(&self, election_id: ElectionId) -> usize {
        self.votes.turnout(election_id)
    }

    pub fn admin(&self) -> &Address {
        self.access.admin()
    }

    pub fn is_admin(&self, caller: &Address) -> bool {
        self.access.is_admin(caller)
    }

    /// Number of elections ever created, which is also the highest id.
    pub fn election_count(&self) -> u64 {
        self.elections.len() as u64
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }
}
