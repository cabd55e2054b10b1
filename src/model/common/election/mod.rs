mod state;

pub use state::ElectionState;

/// Our election IDs are sequential integers, starting at 1.
pub type ElectionId = u64;
/// Candidates are addressed by their zero-based position on the ballot.
pub type CandidateIndex = usize;
