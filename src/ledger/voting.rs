//! Vote casting. Open to any caller.

use crate::error::Result;
use crate::logging::{log_outcome, OperationId};
use crate::model::{
    audit::AuditEvent,
    common::{Address, CandidateIndex, ElectionId},
};

use super::Ledger;

impl Ledger {
    /// Cast `voter`'s single vote in an election.
    ///
    /// Checks run in a fixed order and the first failure is reported:
    /// the election must exist, be `Active`, have the candidate, and the
    /// voter must not have voted in it yet. On success the vote record and
    /// the tally increment are applied together.
    pub fn vote(
        &mut self,
        voter: &Address,
        election_id: ElectionId,
        candidate_index: CandidateIndex,
    ) -> Result<()> {
        let op = OperationId::next();
        info!("->op{op} vote by {voter}: election {election_id}, candidate {candidate_index}");
        let result = self.try_vote(voter, election_id, candidate_index);
        log_outcome(op, "vote", &result);
        result
    }

    fn try_vote(
        &mut self,
        voter: &Address,
        election_id: ElectionId,
        candidate_index: CandidateIndex,
    ) -> Result<()> {
        let event = AuditEvent::VoteCast {
            election_id,
            candidate_index,
            voter: voter.clone(),
        };
        self.check(&event)?;
        let now = self.now();
        self.commit(event, now)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{Error, ErrorKind};
    use crate::model::election::ElectionSpec;

    use super::*;

    fn active_ledger() -> (Ledger, ElectionId) {
        log4rs_test_utils::test_logging::init_logging_once_for(["ballot_ledger"], None, None);
        let admin = Address::example_admin();
        let mut ledger = Ledger::new(admin.clone());
        let id = ledger.create_election(&admin, ElectionSpec::example()).unwrap();
        ledger.start_election(&admin, id).unwrap();
        (ledger, id)
    }

    fn tallies(ledger: &Ledger, id: ElectionId) -> Vec<u64> {
        ledger
            .get_candidates(id)
            .unwrap()
            .into_iter()
            .map(|c| c.votes)
            .collect()
    }

    #[test]
    fn vote_counts_once() {
        let (mut ledger, id) = active_ledger();
        let voter = Address::example_voter1();

        assert!(!ledger.has_voted(id, &voter));
        ledger.vote(&voter, id, 0).unwrap();
        assert!(ledger.has_voted(id, &voter));
        assert_eq!(tallies(&ledger, id), [1, 0]);

        // Same arguments, and a different candidate: both refused.
        assert!(matches!(
            ledger.vote(&voter, id, 0),
            Err(Error::AlreadyVoted { election_id: 1, .. })
        ));
        assert_eq!(
            ledger.vote(&voter, id, 1).unwrap_err().kind(),
            ErrorKind::AlreadyVoted
        );
        assert_eq!(tallies(&ledger, id), [1, 0]);

        // The administrator is an ordinary voter here.
        ledger.vote(&Address::example_admin(), id, 1).unwrap();
        ledger.vote(&Address::example_voter2(), id, 1).unwrap();
        assert_eq!(tallies(&ledger, id), [1, 2]);
        assert_eq!(ledger.get_election(id).unwrap().total_votes(), 3);
    }

    #[test]
    fn vote_outside_active_window() {
        let admin = Address::example_admin();
        let voter = Address::example_voter1();
        let mut ledger = Ledger::new(admin.clone());
        let id = ledger.create_election(&admin, ElectionSpec::example()).unwrap();

        assert!(matches!(
            ledger.vote(&voter, id, 0),
            Err(Error::ElectionNotStarted(1))
        ));
        assert!(!ledger.has_voted(id, &voter));

        ledger.start_election(&admin, id).unwrap();
        ledger.end_election(&admin, id).unwrap();
        assert!(matches!(
            ledger.vote(&voter, id, 0),
            Err(Error::ElectionEnded(1))
        ));
        assert!(!ledger.has_voted(id, &voter));
        assert_eq!(tallies(&ledger, id), [0, 0]);
    }

    #[test]
    fn validation_order() {
        let (mut ledger, id) = active_ledger();
        let voter = Address::example_voter1();

        // Missing election beats everything.
        assert!(matches!(ledger.vote(&voter, 2, 99), Err(Error::NotFound(2))));

        // Bad candidate in an active election.
        assert!(matches!(
            ledger.vote(&voter, id, 2),
            Err(Error::InvalidCandidate {
                election_id: 1,
                candidate_index: 2
            })
        ));
        assert!(!ledger.has_voted(id, &voter));

        // A voter who has voted and then names a bad candidate hears about
        // the candidate first.
        ledger.vote(&voter, id, 1).unwrap();
        assert_eq!(
            ledger.vote(&voter, id, 5).unwrap_err().kind(),
            ErrorKind::InvalidCandidate
        );

        // Once ended, lifecycle is reported before anything else.
        let admin = Address::example_admin();
        ledger.end_election(&admin, id).unwrap();
        assert_eq!(
            ledger.vote(&voter, id, 5).unwrap_err().kind(),
            ErrorKind::ElectionEnded
        );
        assert_eq!(tallies(&ledger, id), [0, 1]);
    }

    #[test]
    fn vote_records_are_per_election() {
        let (mut ledger, first) = active_ledger();
        let admin = Address::example_admin();
        let voter = Address::example_voter1();
        let second = ledger.create_election(&admin, ElectionSpec::example2()).unwrap();
        ledger.start_election(&admin, second).unwrap();

        ledger.vote(&voter, first, 0).unwrap();
        ledger.vote(&voter, second, 2).unwrap();
        assert_eq!(tallies(&ledger, first), [1, 0]);
        assert_eq!(tallies(&ledger, second), [0, 0, 1]);

        // Vote records outlive the election.
        ledger.end_election(&admin, first).unwrap();
        assert!(ledger.has_voted(first, &voter));
        assert_eq!(ledger.turnout(first), 1);
    }
}
