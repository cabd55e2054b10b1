mod address;
pub mod election;

pub use address::Address;
pub use election::{CandidateIndex, ElectionId, ElectionState};
