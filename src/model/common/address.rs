use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// An opaque caller identity, e.g. a wallet address.
///
/// The ledger never inspects the contents; it only compares addresses for
/// equality, against each other and against the administrator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Address {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for Address {
    fn from(address: String) -> Self {
        Self(address)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Address {
        pub fn example_admin() -> Self {
            Self::new("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266")
        }

        pub fn example_voter1() -> Self {
            Self::new("0x70997970c51812dc3a010c7d01b50e0d17dc79c8")
        }

        pub fn example_voter2() -> Self {
            Self::new("0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc")
        }
    }
}
