//! Rebuilding a ledger from its audit trail.

use std::sync::Arc;

use crate::clock::Clock;
use crate::error::Result;
use crate::model::{
    audit::{verify_chain, AuditError, AuditEvent, AuditRecord},
    common::Address,
};

use super::Ledger;

impl Ledger {
    /// Rebuild a ledger by re-applying `records` in order.
    ///
    /// The chain is verified first. Each event is then checked against the
    /// same rules the live operations enforce; administrative events are
    /// taken to have been authorised when they were recorded. The rebuilt
    /// ledger's audit log is exactly `records`.
    pub fn replay(
        admin: impl Into<Address>,
        records: Vec<AuditRecord>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        verify_chain(&records)?;

        let mut ledger = Self::with_clock(admin, clock);
        for record in records {
            ledger.replay_record(record)?;
        }
        debug!(
            "Replayed {} audit records into {} elections",
            ledger.audit.len(),
            ledger.elections.len()
        );
        Ok(ledger)
    }

    fn replay_record(&mut self, record: AuditRecord) -> std::result::Result<(), AuditError> {
        let rejected = |reason: String| AuditError::Rejected {
            sequence: record.sequence,
            reason,
        };

        if let Some(last) = self.audit.last_recorded_at() {
            if record.recorded_at < last {
                return Err(rejected(format!(
                    "recorded at {}, before the previous record at {last}",
                    record.recorded_at
                )));
            }
        }

        match &record.event {
            AuditEvent::ElectionCreated { election_id, .. } => {
                let expected = self.next_election_id();
                if *election_id != expected {
                    return Err(rejected(format!(
                        "election created as {election_id}, expected {expected}"
                    )));
                }
            }
            AuditEvent::ElectionStarted {
                start_time: at, ..
            }
            | AuditEvent::ElectionEnded { end_time: at, .. } => {
                if *at != record.recorded_at {
                    return Err(rejected(format!(
                        "election {} changed state at {at} but was recorded at {}",
                        record.event.election_id(),
                        record.recorded_at
                    )));
                }
            }
            AuditEvent::VoteCast { .. } => {}
        }
        self.check(&record.event)
            .map_err(|err| rejected(err.to_string()))?;

        self.apply(&record.event, record.recorded_at);
        self.audit.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::clock::SystemClock;
    use crate::error::{Error, ErrorKind};
    use crate::model::{audit::AuditLog, election::ElectionSpec};

    use super::*;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(SystemClock)
    }

    fn busy_ledger() -> Ledger {
        let admin = Address::example_admin();
        let mut ledger = Ledger::new(admin.clone());
        let first = ledger.create_election(&admin, ElectionSpec::example()).unwrap();
        let second = ledger.create_election(&admin, ElectionSpec::example2()).unwrap();
        ledger.start_election(&admin, first).unwrap();
        ledger.start_election(&admin, second).unwrap();
        ledger.vote(&Address::example_voter1(), first, 1).unwrap();
        ledger.vote(&Address::example_voter2(), first, 1).unwrap();
        ledger.vote(&Address::example_voter1(), second, 0).unwrap();
        ledger.end_election(&admin, first).unwrap();
        ledger
    }

    #[test]
    fn replay_reproduces_state() {
        let original = busy_ledger();
        let records = original.audit_log().records().to_vec();

        let replayed = Ledger::replay(Address::example_admin(), records, clock()).unwrap();
        assert_eq!(replayed.get_all_elections(), original.get_all_elections());
        assert_eq!(replayed.audit_log(), original.audit_log());
        assert!(replayed.has_voted(1, &Address::example_voter2()));
        assert!(!replayed.has_voted(2, &Address::example_voter2()));

        // The replayed ledger carries on enforcing the rules.
        let mut replayed = replayed;
        assert_eq!(
            replayed
                .vote(&Address::example_voter1(), 2, 1)
                .unwrap_err()
                .kind(),
            ErrorKind::AlreadyVoted
        );
        replayed.vote(&Address::example_voter2(), 2, 1).unwrap();
        replayed.audit_log().verify().unwrap();
    }

    #[test]
    fn replay_rejects_tampered_chain() {
        let mut records = busy_ledger().audit_log().records().to_vec();
        records.swap(4, 5);
        assert!(matches!(
            Ledger::replay(Address::example_admin(), records, clock()),
            Err(Error::Audit(AuditError::Sequence { expected: 4, .. }))
        ));
    }

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    /// Build a correctly chained log with the given record times.
    fn forged_at(events: Vec<(AuditEvent, DateTime<Utc>)>) -> Vec<AuditRecord> {
        let mut log = AuditLog::new();
        for (event, at) in events {
            let record = log.prepare(event, at);
            log.push(record);
        }
        log.records().to_vec()
    }

    /// Build a correctly chained log around events the ledger would refuse.
    /// State changes are recorded at the time they carry, like live ones.
    fn forged(events: Vec<AuditEvent>) -> Vec<AuditRecord> {
        let mut at = base_time();
        forged_at(
            events
                .into_iter()
                .map(|event| {
                    match &event {
                        AuditEvent::ElectionStarted { start_time, .. } => at = *start_time,
                        AuditEvent::ElectionEnded { end_time, .. } => at = *end_time,
                        _ => {}
                    }
                    (event, at)
                })
                .collect(),
        )
    }

    fn assert_rejected_at(records: Vec<AuditRecord>, bad_sequence: u64) {
        let err = Ledger::replay(Address::example_admin(), records, clock())
            .err()
            .unwrap();
        match err {
            Error::Audit(audit_err @ AuditError::Rejected { .. }) => {
                assert_eq!(audit_err.sequence(), bad_sequence)
            }
            other => panic!("unexpected error {other}"),
        }
    }

    fn created(election_id: u64) -> AuditEvent {
        AuditEvent::ElectionCreated {
            election_id,
            name: "Class President".to_string(),
            candidates: vec!["Alice".to_string(), "Bob".to_string()],
            duration_minutes: 60,
        }
    }

    #[test]
    fn replay_rejects_rule_violations() {
        let now = base_time() + Duration::minutes(5);
        let vote = AuditEvent::VoteCast {
            election_id: 1,
            candidate_index: 0,
            voter: Address::example_voter1(),
        };
        let started = AuditEvent::ElectionStarted {
            election_id: 1,
            start_time: now,
        };

        let cases = [
            // Vote before the election started.
            (vec![created(1), vote.clone()], 1),
            // Double vote, hash chain intact.
            (vec![created(1), started.clone(), vote.clone(), vote.clone()], 3),
            // Ended without starting.
            (
                vec![
                    created(1),
                    AuditEvent::ElectionEnded {
                        election_id: 1,
                        end_time: now + Duration::minutes(1),
                    },
                ],
                1,
            ),
            // Skipped election id.
            (vec![created(2)], 0),
            // Unknown election.
            (vec![started], 0),
        ];

        for (events, bad_sequence) in cases {
            assert_rejected_at(forged(events), bad_sequence);
        }
    }

    #[test]
    fn replay_rejects_bad_timestamps() {
        let t0 = base_time();
        let far_future = DateTime::<Utc>::MAX_UTC - Duration::minutes(1);
        let started = |start_time| AuditEvent::ElectionStarted {
            election_id: 1,
            start_time,
        };
        let ended = |end_time| AuditEvent::ElectionEnded {
            election_id: 1,
            end_time,
        };

        // Start time that is not when the start was recorded.
        assert_rejected_at(
            forged_at(vec![(created(1), t0), (started(far_future), t0)]),
            1,
        );

        // End time that is not when the end was recorded.
        let start = t0 + Duration::minutes(1);
        assert_rejected_at(
            forged_at(vec![
                (created(1), t0),
                (started(start), start),
                (ended(start - Duration::days(3650)), start + Duration::minutes(1)),
            ]),
            2,
        );

        // A record made before the one it follows.
        let ten_years_back = start - Duration::days(3650);
        assert_rejected_at(
            forged_at(vec![
                (created(1), t0),
                (started(start), start),
                (ended(ten_years_back), ten_years_back),
            ]),
            2,
        );

        // Consistent timestamps replay, however late.
        let replayed = Ledger::replay(
            Address::example_admin(),
            forged_at(vec![(created(1), t0), (started(far_future), far_future)]),
            clock(),
        )
        .unwrap();
        let view = replayed.get_election(1).unwrap();
        assert_eq!(view.start_time, Some(far_future));
        assert_eq!(view.advisory_end_time(), None);
    }

    #[test]
    fn empty_replay() {
        let ledger = Ledger::replay(Address::example_admin(), Vec::new(), clock()).unwrap();
        assert_eq!(ledger.election_count(), 0);
        assert!(ledger.audit_log().is_empty());
    }
}
