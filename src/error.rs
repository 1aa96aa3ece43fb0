//! Typed failures for operations whose rejection the user must see. Storage
//! and file-system problems travel as `anyhow::Error` instead; these are the
//! precondition violations that turn into a blocking notice.

use thiserror::Error;

/// Reasons a partition request is refused. The `Display` text doubles as the
/// notice shown to the user, and `teams` is left untouched whenever one of
/// these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DistributeError {
    /// Nothing to distribute yet.
    #[error("Add some people first!")]
    EmptyRoster,
    /// More teams requested than there are participants.
    #[error("Team count ({requested}) cannot exceed the number of people ({available}).")]
    TooManyTeams { requested: usize, available: usize },
    /// A team count or team size of zero.
    #[error("The quantity must be at least 1.")]
    ZeroQuantity,
}
