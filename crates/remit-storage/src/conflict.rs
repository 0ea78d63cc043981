//! Conflict policies for inserts against unique indexes.

/// What an INSERT does when it hits a unique constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Keep the existing row and drop the new one silently. Transactions use
    /// this: the first insert of a uid wins.
    Ignore,
    /// Fail the statement. File registration uses this so a second
    /// registration of the same content hash is visible to the caller.
    Abort,
}

impl ConflictPolicy {
    /// Statement prefix up to (not including) `INTO`.
    pub fn insert_verb(self) -> &'static str {
        match self {
            Self::Ignore => "INSERT OR IGNORE",
            Self::Abort => "INSERT",
        }
    }
}
