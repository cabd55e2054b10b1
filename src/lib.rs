//! An election ledger: administrator-controlled creation, an explicit
//! `Upcoming -> Active -> Ended` lifecycle, one vote per voter per election,
//! and a hash-chained audit trail that can rebuild every tally on its own.

#[macro_use]
extern crate log;

pub mod clock;
pub mod config;
pub mod error;
pub mod journal;
pub mod ledger;
pub mod logging;
pub mod model;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use ledger::{Ledger, SharedLedger};
pub use model::{
    audit::{AuditError, AuditEvent, AuditLog, AuditRecord, Digest},
    common::{Address, CandidateIndex, ElectionId, ElectionState},
    election::{CandidateView, ElectionSpec, ElectionView},
};
