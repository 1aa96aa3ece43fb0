//! Pure team partitioning. Every entry point shuffles a copy of the roster
//! with the caller's random source and then buckets it either into a fixed
//! number of teams or into teams of a fixed size. Nothing here touches
//! storage, which keeps the algorithms testable with a seeded RNG.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::error::DistributeError;
use crate::models::{Participant, Team};

/// How the `quantity` of a distribute request is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistributionMode {
    /// `quantity` is the number of teams to create.
    #[default]
    TeamCount,
    /// `quantity` is the number of people per team.
    TeamSize,
}

impl DistributionMode {
    pub fn toggle(self) -> Self {
        match self {
            DistributionMode::TeamCount => DistributionMode::TeamSize,
            DistributionMode::TeamSize => DistributionMode::TeamCount,
        }
    }
}

impl fmt::Display for DistributionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionMode::TeamCount => write!(f, "Number of teams"),
            DistributionMode::TeamSize => write!(f, "People per team"),
        }
    }
}

/// Return a uniformly random permutation of `users` without reordering the
/// input. `SliceRandom::shuffle` walks from the last index down to 1 and
/// swaps each slot with a uniform index in `[0, i]`.
pub fn shuffle<R: Rng + ?Sized>(users: &[Participant], rng: &mut R) -> Vec<Participant> {
    let mut shuffled = users.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

/// Dispatch on `mode`.
pub fn distribute<R: Rng + ?Sized>(
    users: &[Participant],
    mode: DistributionMode,
    quantity: usize,
    rng: &mut R,
) -> Result<Vec<Team>, DistributeError> {
    match mode {
        DistributionMode::TeamCount => distribute_by_teams(users, quantity, rng),
        DistributionMode::TeamSize => distribute_by_team_size(users, quantity, rng),
    }
}

/// Deal the shuffled roster round-robin into `team_count` teams. Sizes
/// differ by at most one and the first `n % team_count` teams carry the
/// extra member.
pub fn distribute_by_teams<R: Rng + ?Sized>(
    users: &[Participant],
    team_count: usize,
    rng: &mut R,
) -> Result<Vec<Team>, DistributeError> {
    if users.is_empty() {
        return Err(DistributeError::EmptyRoster);
    }
    if team_count == 0 {
        return Err(DistributeError::ZeroQuantity);
    }
    if team_count > users.len() {
        return Err(DistributeError::TooManyTeams {
            requested: team_count,
            available: users.len(),
        });
    }

    let mut teams: Vec<Team> = (0..team_count).map(Team::numbered).collect();
    for (index, person) in shuffle(users, rng).into_iter().enumerate() {
        teams[index % team_count].members.push(person);
    }

    debug!(people = users.len(), teams = team_count, "distributed by team count");
    Ok(teams)
}

/// Slice the shuffled roster into consecutive chunks of `team_size`. Only the
/// last team may come up short.
pub fn distribute_by_team_size<R: Rng + ?Sized>(
    users: &[Participant],
    team_size: usize,
    rng: &mut R,
) -> Result<Vec<Team>, DistributeError> {
    if users.is_empty() {
        return Err(DistributeError::EmptyRoster);
    }
    if team_size == 0 {
        return Err(DistributeError::ZeroQuantity);
    }

    let teams: Vec<Team> = shuffle(users, rng)
        .chunks(team_size)
        .enumerate()
        .map(|(index, chunk)| Team {
            members: chunk.to_vec(),
            ..Team::numbered(index)
        })
        .collect();

    debug!(people = users.len(), size = team_size, teams = teams.len(), "distributed by team size");
    Ok(teams)
}
