use std::fmt;

/// Result of looking up one UID in the directory service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// First matching entry carried a mail attribute
    Found(String),

    /// An entry matched but had no mail attribute
    EntryWithoutEmail,

    /// No entry matched the UID
    NoEntry,

    /// The query itself failed (timeout, server error, ...)
    Failed(String),
}

impl LookupOutcome {
    /// Email address, present only for [`LookupOutcome::Found`]
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Found(email) => Some(email),
            _ => None,
        }
    }

    /// Returns true if the query failed rather than simply missing
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for LookupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(email) => write!(f, "found {email}"),
            Self::EntryWithoutEmail => write!(f, "entry has no mail attribute"),
            Self::NoEntry => write!(f, "no matching entry"),
            Self::Failed(reason) => write!(f, "query failed: {reason}"),
        }
    }
}

/// Identity resolved for a UID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    /// UID that was looked up
    pub uid: u32,

    /// How the lookup ended
    pub outcome: LookupOutcome,
}

impl IdentityRecord {
    /// Create a new identity record
    #[must_use]
    pub const fn new(uid: u32, outcome: LookupOutcome) -> Self {
        Self { uid, outcome }
    }

    /// Resolved email, absent when no entry or no mail attribute was found
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.outcome.email()
    }
}
