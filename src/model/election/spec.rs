use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The minimum number of candidates on a ballot.
pub const MIN_CANDIDATES: usize = 2;

/// An election specification, as supplied by the administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionSpec {
    /// Election name.
    pub name: String,
    /// Candidate names, in ballot order.
    pub candidates: Vec<String>,
    /// Intended duration in minutes. Recorded, never enforced.
    pub duration_minutes: u32,
}

impl ElectionSpec {
    pub fn new<I, S>(name: impl Into<String>, candidates: I, duration_minutes: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            candidates: candidates.into_iter().map(Into::into).collect(),
            duration_minutes,
        }
    }

    /// Check the specification describes a well-formed election.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidElectionSpec(
                "election name must not be empty".to_string(),
            ));
        }
        if self.duration_minutes == 0 {
            return Err(Error::InvalidElectionSpec(
                "duration must be at least one minute".to_string(),
            ));
        }

        if self.candidates.len() < MIN_CANDIDATES {
            return Err(Error::InvalidCandidateList(format!(
                "need at least {MIN_CANDIDATES} candidates, got {}",
                self.candidates.len()
            )));
        }
        let mut seen = HashSet::with_capacity(self.candidates.len());
        for (index, candidate) in self.candidates.iter().enumerate() {
            if candidate.trim().is_empty() {
                return Err(Error::InvalidCandidateList(format!(
                    "candidate {index} has an empty name"
                )));
            }
            if !seen.insert(candidate.as_str()) {
                return Err(Error::InvalidCandidateList(format!(
                    "candidate \"{candidate}\" appears more than once"
                )));
            }
        }

        Ok(())
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl ElectionSpec {
        pub fn example() -> Self {
            Self::new("Class President", ["Alice", "Bob"], 60)
        }

        pub fn example2() -> Self {
            Self::new(
                "Quidditch Captain",
                ["Chris Riches", "Parry Hotter", "Hermione Granger"],
                30,
            )
        }
    }
}
