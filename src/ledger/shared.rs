use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::Result;
use crate::model::{
    audit::AuditRecord,
    common::{Address, CandidateIndex, ElectionId},
    election::{CandidateView, ElectionSpec, ElectionView},
};

use super::Ledger;

/// A [`Ledger`] that can be shared between threads.
///
/// Mutations take the write lock, so they are totally ordered; queries take
/// the read lock and see the state as of the last completed mutation.
#[derive(Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    // A panic inside a mutation happens before any state is touched, so a
    // poisoned lock still guards a consistent ledger.
    fn read(&self) -> RwLockReadGuard<'_, Ledger> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Ledger> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create_election(&self, caller: &Address, spec: ElectionSpec) -> Result<ElectionId> {
        self.write().create_election(caller, spec)
    }

    pub fn start_election(&self, caller: &Address, election_id: ElectionId) -> Result<()> {
        self.write().start_election(caller, election_id)
    }

    pub fn end_election(&self, caller: &Address, election_id: ElectionId) -> Result<()> {
        self.write().end_election(caller, election_id)
    }

    pub fn vote(
        &self,
        voter: &Address,
        election_id: ElectionId,
        candidate_index: CandidateIndex,
    ) -> Result<()> {
        self.write().vote(voter, election_id, candidate_index)
    }

    pub fn get_election(&self, election_id: ElectionId) -> Result<ElectionView> {
        self.read().get_election(election_id)
    }

    pub fn get_all_elections(&self) -> Vec<ElectionView> {
        self.read().get_all_elections()
    }

    pub fn get_candidates(&self, election_id: ElectionId) -> Result<Vec<CandidateView>> {
        self.read().get_candidates(election_id)
    }

    pub fn has_voted(&self, election_id: ElectionId, voter: &Address) -> bool {
        self.read().has_voted(election_id, voter)
    }

    pub fn admin(&self) -> Address {
        self.read().admin().clone()
    }

    /// A copy of the audit trail so far.
    pub fn audit_records(&self) -> Vec<AuditRecord> {
        self.read().audit_log().records().to_vec()
    }

    /// Run `f` against a consistent snapshot of the whole ledger.
    pub fn with_ledger<T>(&self, f: impl FnOnce(&Ledger) -> T) -> T {
        f(&self.read())
    }
}

impl From<Ledger> for SharedLedger {
    fn from(ledger: Ledger) -> Self {
        Self::new(ledger)
    }
}
