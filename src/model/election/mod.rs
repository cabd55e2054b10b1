pub use election_core::{Candidate, Election, ElectionMetadata};
pub use spec::ElectionSpec;
pub use view::{CandidateView, ElectionView};

mod election_core;
mod spec;
mod view;
