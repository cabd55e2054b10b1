use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::model::common::{Address, ElectionId};

/// Gate on administrative operations: only the administrator fixed at
/// construction gets through.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    admin: Address,
}

impl AccessGuard {
    pub fn new(admin: Address) -> Self {
        Self { admin }
    }

    pub fn admin(&self) -> &Address {
        &self.admin
    }

    pub fn is_admin(&self, caller: &Address) -> bool {
        *caller == self.admin
    }

    /// Fail with [`Error::Unauthorized`] unless `caller` is the administrator.
    pub fn authorize(&self, caller: &Address, operation: &'static str) -> Result<()> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(Error::Unauthorized {
                caller: caller.clone(),
                operation,
            })
        }
    }
}

/// Who has voted where. Entries are never removed.
#[derive(Debug, Clone, Default)]
pub struct VoteGuard {
    voted: HashMap<ElectionId, HashSet<Address>>,
}

impl VoteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_voted(&self, election_id: ElectionId, voter: &Address) -> bool {
        self.voted
            .get(&election_id)
            .map_or(false, |voters| voters.contains(voter))
    }

    /// Fail with [`Error::AlreadyVoted`] if `voter` has a vote record in the election.
    pub fn check(&self, election_id: ElectionId, voter: &Address) -> Result<()> {
        if self.has_voted(election_id, voter) {
            Err(Error::AlreadyVoted {
                election_id,
                voter: voter.clone(),
            })
        } else {
            Ok(())
        }
    }

    /// Record that `voter` has voted. Callers must [`Self::check`] first.
    pub(crate) fn record(&mut self, election_id: ElectionId, voter: Address) {
        let inserted = self.voted.entry(election_id).or_default().insert(voter);
        debug_assert!(inserted, "vote recorded twice");
    }

    /// Number of voters who have voted in the election.
    pub fn turnout(&self, election_id: ElectionId) -> usize {
        self.voted.get(&election_id).map_or(0, HashSet::len)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;

    use super::*;

    #[test]
    fn access_guard() {
        let guard = AccessGuard::new(Address::example_admin());
        assert_eq!(guard.admin(), &Address::example_admin());

        guard
            .authorize(&Address::example_admin(), "create elections")
            .unwrap();
        let err = guard
            .authorize(&Address::example_voter1(), "create elections")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(
            err.to_string(),
            format!(
                "Unauthorized: {} may not create elections",
                Address::example_voter1()
            )
        );
    }

    #[test]
    fn vote_guard() {
        let mut guard = VoteGuard::new();
        let voter = Address::example_voter1();

        guard.check(1, &voter).unwrap();
        guard.record(1, voter.clone());
        assert!(guard.has_voted(1, &voter));
        assert_eq!(guard.check(1, &voter).unwrap_err().kind(), ErrorKind::AlreadyVoted);

        // Records are per election and per voter.
        assert!(!guard.has_voted(2, &voter));
        assert!(!guard.has_voted(1, &Address::example_voter2()));
        assert_eq!(guard.turnout(1), 1);
        assert_eq!(guard.turnout(2), 0);
    }
}
