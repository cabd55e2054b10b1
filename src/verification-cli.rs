//! A simple CLI tool for verifying ledger journals.
//! The journal is replayed through the ledger's own rules, so it accepts
//! exactly the histories the ledger itself could have produced.

use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::Arc;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use ballot_ledger::{
    journal::Journal, Address, AuditError, Config, ElectionId, ElectionState, ElectionView,
    ErrorKind, Ledger, SystemClock,
};

const PROGRAM_NAME: &str = "verify-ledger";

const ABOUT_TEXT: &str = "Verify the integrity of an election ledger journal \
and recount every election from it.

EXIT CODES:
     0: Verification succeeded.
   255: Ran successfully, but verification failed.
 Other: Error.";

const JOURNAL_PATH: &str = "JOURNAL_PATH";

const JOURNAL_PATH_HELP: &str = "The path to a ledger journal, one JSON audit record per line";

const ELECTION: &str = "election";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .arg(
            Arg::new(JOURNAL_PATH)
                .help(JOURNAL_PATH_HELP)
                .action(ArgAction::Set)
                .required(true),
        )
        .arg(
            Arg::new(ELECTION)
                .long(ELECTION)
                .short('e')
                .help("Only report this election")
                .action(ArgAction::Set)
                .value_parser(value_parser!(ElectionId)),
        )
}

/// Errors that this program may produce.
#[derive(Debug, Eq, PartialEq)]
enum Error {
    /// IO error described by the inner message.
    IO(String),
    /// Failed to decode the journal.
    Format(String),
    /// The requested election is not in the journal.
    NoSuchElection(ElectionId),
    /// Verification failed due to the contained reason.
    Verification(AuditError),
}

/// A friendly summary of one election's recounted results.
#[derive(Debug, Eq, PartialEq)]
struct FriendlyResults {
    pub election_id: ElectionId,
    pub name: String,
    pub state: ElectionState,
    /// Candidate names and tallies, most votes first.
    pub tallies: Vec<(String, u64)>,
}

impl From<ElectionView> for FriendlyResults {
    fn from(view: ElectionView) -> Self {
        let mut candidates = view.candidates;
        // Stable sort, so ties stay in ballot order.
        candidates.sort_by(|a, b| b.votes.cmp(&a.votes));
        Self {
            election_id: view.id,
            name: view.metadata.name,
            state: view.metadata.state,
            tallies: candidates.into_iter().map(|c| (c.name, c.votes)).collect(),
        }
    }
}

fn plural(count: u64) -> &'static str {
    if count != 1 {
        "s"
    } else {
        ""
    }
}

impl Display for FriendlyResults {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let total: u64 = self.tallies.iter().map(|(_, votes)| votes).sum();
        write!(
            f,
            "Election {} \"{}\" ({}, {} vote{})",
            self.election_id,
            self.name,
            self.state,
            total,
            plural(total)
        )?;
        for (name, votes) in &self.tallies {
            write!(f, "\n  {}: {} vote{}", name, votes, plural(*votes))?;
        }
        Ok(())
    }
}

/// Run verification.
fn verify(path: impl AsRef<Path>, election: Option<ElectionId>) -> Result<Vec<FriendlyResults>, Error> {
    // Load the journal.
    let records = Journal::load(path).map_err(|e| match e.kind() {
        ErrorKind::Journal => Error::IO(e.to_string()),
        _ => Error::Format(e.to_string()),
    })?;

    // Replay it. Replay never consults the administrator.
    let ledger = Ledger::replay(Address::new(PROGRAM_NAME), records, Arc::new(SystemClock))
        .map_err(|e| match e {
            ballot_ledger::Error::Audit(err) => Error::Verification(err),
            other => Error::Format(other.to_string()),
        })?;

    // Assemble the friendly results.
    match election {
        Some(election_id) => {
            let view = ledger
                .get_election(election_id)
                .map_err(|_| Error::NoSuchElection(election_id))?;
            Ok(vec![view.into()])
        }
        None => Ok(ledger
            .get_all_elections()
            .into_iter()
            .map(FriendlyResults::from)
            .collect()),
    }
}

/// Run verification, report the result, and return the exit code.
fn run(args: &ArgMatches) -> u8 {
    let path: &String = args.get_one(JOURNAL_PATH).unwrap(); // Required argument is guaranteed to be present.
    let election = args.get_one::<ElectionId>(ELECTION).copied();
    match verify(path, election) {
        Ok(friendly_results) => {
            println!("Verification succeeded.");
            for result in friendly_results {
                println!("{}", result);
            }
            0
        }
        Err(Error::IO(msg)) => {
            println!("IO error: {}", msg);
            1
        }
        Err(Error::Format(msg)) => {
            println!("Invalid journal: {}", msg);
            1
        }
        Err(Error::NoSuchElection(election_id)) => {
            println!("Election {} is not in the journal.", election_id);
            1
        }
        Err(Error::Verification(err)) => {
            let msg = match err {
                AuditError::Sequence { expected, found } => format!(
                    "Record {} appears where record {} should be; records are missing or reordered.",
                    found, expected
                ),
                AuditError::BrokenLink { sequence } => format!(
                    "Record {} does not follow from the record before it.",
                    sequence
                ),
                AuditError::DigestMismatch { sequence } => {
                    format!("Record {} has been altered.", sequence)
                }
                AuditError::Rejected { sequence, reason } => {
                    format!("Record {} breaks the ledger rules: {}", sequence, reason)
                }
            };
            println!("Verification failed: {}", msg);
            255
        }
    }
}

fn main() {
    if let Err(err) = ballot_ledger::logging::init(Config::load_log_config()) {
        eprintln!("{err}");
    }

    let args = cli().get_matches();
    let exit_code = run(&args);
    std::process::exit(exit_code.into())
}
