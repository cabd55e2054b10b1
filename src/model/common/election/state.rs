use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// States in the Election lifecycle.
///
/// The only transitions are `Upcoming -> Active -> Ended`; nothing leaves
/// `Ended` and no state may be skipped.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElectionState {
    /// Created, not yet open for voting.
    #[default]
    Upcoming,
    /// Open for voting.
    Active,
    /// Closed. Tallies are frozen.
    Ended,
}

impl ElectionState {
    /// The state directly after this one, if any.
    pub fn successor(self) -> Option<Self> {
        match self {
            Self::Upcoming => Some(Self::Active),
            Self::Active => Some(Self::Ended),
            Self::Ended => None,
        }
    }

    /// Can an election in this state move straight to `next`?
    pub fn can_transition_to(self, next: Self) -> bool {
        self.successor() == Some(next)
    }
}

impl Display for ElectionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Upcoming => "Upcoming",
            Self::Active => "Active",
            Self::Ended => "Ended",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_transitions() {
        use ElectionState::*;

        assert_eq!(ElectionState::default(), Upcoming);

        assert!(Upcoming.can_transition_to(Active));
        assert!(Active.can_transition_to(Ended));

        // No skipping, no going back, nothing out of `Ended`.
        assert!(!Upcoming.can_transition_to(Ended));
        assert!(!Active.can_transition_to(Upcoming));
        assert!(!Ended.can_transition_to(Active));
        assert!(!Ended.can_transition_to(Upcoming));
        assert!(!Active.can_transition_to(Active));
        assert_eq!(Ended.successor(), None);
    }
}
