//! The roster store owns the single source of truth, `AppState`, together
//! with the storage connection it is mirrored to. Every mutating operation
//! runs to completion, then rewrites the persisted blob before returning, so
//! whatever a view reads next is already on disk.
//!
//! Rejected input (empty or duplicate names, unknown participants) is a
//! silent no-op: the methods report `false` and neither state nor storage
//! change.

use anyhow::Result;
use rand::Rng;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::DistributeError;
use crate::models::{AppState, Participant, Team};
use crate::partition::{distribute, DistributionMode};
use crate::persist::{load_state, save_state};

/// Outcome of a distribute request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Distribution {
    /// `teams` was replaced with this many new teams.
    Created(usize),
    /// A precondition failed; `teams` is unchanged.
    Rejected(DistributeError),
}

pub struct RosterStore {
    conn: Connection,
    state: AppState,
}

impl RosterStore {
    /// Wrap an already loaded state. Nothing is written until the first
    /// mutation.
    pub fn new(conn: Connection, state: AppState) -> Self {
        Self { conn, state }
    }

    /// Hydrate from whatever the connection holds, falling back to an empty
    /// roster.
    pub fn load(conn: Connection) -> Self {
        let state = load_state(&conn);
        Self::new(conn, state)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn users(&self) -> &[Participant] {
        &self.state.users
    }

    pub fn teams(&self) -> &[Team] {
        &self.state.teams
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Append a participant with a zero score. Returns `false` when the
    /// trimmed name is empty or already taken in any casing.
    pub fn add_participant(&mut self, raw_name: &str) -> Result<bool> {
        let name = raw_name.trim();
        if name.is_empty() {
            return Ok(false);
        }
        if self.state.users.iter().any(|user| user.same_name_as(name)) {
            debug!(name, "ignored duplicate participant");
            return Ok(false);
        }

        self.state.users.push(Participant::new(name));
        self.persist()?;
        info!(name, total = self.state.users.len(), "added participant");
        Ok(true)
    }

    /// Set the score of the participant called exactly `name`. Unparseable
    /// input becomes zero. Team entries for the same person pick up the new
    /// score as well.
    pub fn update_score(&mut self, name: &str, raw_value: &str) -> Result<bool> {
        let score = parse_score(raw_value);
        let Some(user) = self.state.users.iter_mut().find(|user| user.name == name) else {
            return Ok(false);
        };
        user.score = score;

        for member in self
            .state
            .teams
            .iter_mut()
            .flat_map(|team| team.members.iter_mut())
            .filter(|member| member.name == name)
        {
            member.score = score;
        }

        self.persist()?;
        debug!(name, score, "updated score");
        Ok(true)
    }

    /// Remove the participant called exactly `name` from the roster and from
    /// every generated team. Teams left empty keep their slot until the next
    /// partition.
    pub fn remove_participant(&mut self, name: &str) -> Result<bool> {
        let before = self.state.users.len();
        self.state.users.retain(|user| user.name != name);
        if self.state.users.len() == before {
            return Ok(false);
        }

        for team in &mut self.state.teams {
            team.members.retain(|member| member.name != name);
        }

        self.persist()?;
        info!(name, total = self.state.users.len(), "removed participant");
        Ok(true)
    }

    /// Partition the roster and replace `teams` with the result. Rejections
    /// leave the previous teams and the stored blob untouched.
    pub fn distribute<R: Rng + ?Sized>(
        &mut self,
        mode: DistributionMode,
        quantity: usize,
        rng: &mut R,
    ) -> Result<Distribution> {
        match distribute(&self.state.users, mode, quantity, rng) {
            Ok(teams) => {
                let created = teams.len();
                self.state.teams = teams;
                self.persist()?;
                info!(?mode, quantity, teams = created, "generated teams");
                Ok(Distribution::Created(created))
            }
            Err(err) => {
                debug!(?mode, quantity, error = %err, "distribute rejected");
                Ok(Distribution::Rejected(err))
            }
        }
    }

    /// Manual save: rewrite the stored blob unconditionally.
    pub fn save(&self) -> Result<()> {
        self.persist()?;
        info!("saved state on request");
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        save_state(&self.conn, &self.state)
    }
}

/// Read a score the way a lenient number field would: optional leading
/// whitespace, an optional sign, then as many digits as are present. Trailing
/// garbage is ignored, and no digits at all (or overflow) yields zero.
pub fn parse_score(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => ("-", &trimmed[1..]),
        Some(b'+') => ("", &trimmed[1..]),
        _ => ("", trimmed),
    };

    let digits_end = rest
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];

    // Sign and digits parse together so `i64::MIN` stays reachable.
    format!("{sign}{digits}").parse::<i64>().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::db::open_in_memory;
    use crate::persist::load_state;

    fn store() -> RosterStore {
        RosterStore::load(open_in_memory().unwrap())
    }

    fn store_with(names: &[&str]) -> RosterStore {
        let mut store = store();
        for name in names {
            assert!(store.add_participant(name).unwrap());
        }
        store
    }

    fn stored(store: &RosterStore) -> AppState {
        load_state(store.connection())
    }

    #[test]
    fn add_trims_and_persists() {
        let mut store = store();
        assert!(store.add_participant("  Alice  ").unwrap());
        assert_eq!(store.users(), [Participant::new("Alice")]);
        assert_eq!(stored(&store), *store.state());
    }

    #[test]
    fn add_rejects_blank_and_case_duplicates() {
        let mut store = store_with(&["Alice"]);
        assert!(!store.add_participant("   ").unwrap());
        assert!(!store.add_participant("alice").unwrap());
        assert!(!store.add_participant(" ALICE ").unwrap());
        assert_eq!(store.users().len(), 1);
    }

    #[test]
    fn update_score_coerces_garbage_to_zero() {
        let mut store = store_with(&["Bob"]);
        assert!(store.update_score("Bob", "17").unwrap());
        assert_eq!(store.users()[0].score, 17);
        assert!(store.update_score("Bob", "abc").unwrap());
        assert_eq!(store.users()[0].score, 0);
        assert!(store.update_score("Bob", "-4").unwrap());
        assert_eq!(stored(&store).users[0].score, -4);
    }

    #[test]
    fn update_score_uses_exact_name() {
        let mut store = store_with(&["Bob"]);
        assert!(!store.update_score("bob", "5").unwrap());
        assert_eq!(store.users()[0].score, 0);
    }

    #[test]
    fn score_edits_show_up_in_teams() {
        let mut store = store_with(&["Ada", "Bo"]);
        let mut rng = StdRng::seed_from_u64(11);
        store.distribute(DistributionMode::TeamCount, 1, &mut rng).unwrap();
        store.update_score("Ada", "9").unwrap();
        assert_eq!(store.teams()[0].total_score(), 9);
        assert_eq!(stored(&store).teams[0].total_score(), 9);
    }

    #[test]
    fn extreme_scores_do_not_overflow_team_strength() {
        let mut store = store_with(&["A", "B", "C"]);
        store.update_score("A", "9223372036854775807").unwrap();
        store.update_score("B", "1").unwrap();
        store.update_score("C", "9223372036854775807").unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        store.distribute(DistributionMode::TeamCount, 1, &mut rng).unwrap();

        let expected = 2 * i128::from(i64::MAX) + 1;
        assert_eq!(store.teams()[0].total_score(), expected);
    }

    #[test]
    fn remove_purges_teams_too() {
        let mut store = store_with(&["Ada", "Bo", "Cy"]);
        let mut rng = StdRng::seed_from_u64(5);
        store.distribute(DistributionMode::TeamCount, 3, &mut rng).unwrap();
        assert!(store.remove_participant("Bo").unwrap());
        assert_eq!(store.users().len(), 2);
        assert_eq!(store.teams().len(), 3);
        assert_eq!(store.state().assigned_count(), 2);
        assert!(store
            .teams()
            .iter()
            .all(|team| team.members.iter().all(|m| m.name != "Bo")));
        assert!(!store.remove_participant("Bo").unwrap());
    }

    #[test]
    fn distribute_replaces_teams_wholesale() {
        let mut store = store_with(&["A", "B", "C", "D", "E"]);
        let mut rng = StdRng::seed_from_u64(9);
        let first = store.distribute(DistributionMode::TeamCount, 2, &mut rng).unwrap();
        assert_eq!(first, Distribution::Created(2));
        let second = store.distribute(DistributionMode::TeamSize, 2, &mut rng).unwrap();
        assert_eq!(second, Distribution::Created(3));
        assert_eq!(store.teams().len(), 3);
        assert_eq!(store.state().assigned_count(), 5);
        assert_eq!(stored(&store).teams, store.teams());
    }

    #[test]
    fn rejected_distribute_keeps_previous_teams() {
        let mut store = store_with(&["A", "B"]);
        let mut rng = StdRng::seed_from_u64(4);
        store.distribute(DistributionMode::TeamCount, 2, &mut rng).unwrap();
        let before = store.teams().to_vec();

        let outcome = store.distribute(DistributionMode::TeamCount, 3, &mut rng).unwrap();
        assert_eq!(
            outcome,
            Distribution::Rejected(DistributeError::TooManyTeams {
                requested: 3,
                available: 2
            })
        );
        assert_eq!(store.teams(), before);
        assert_eq!(stored(&store).teams, before);
    }

    #[test]
    fn empty_roster_is_rejected() {
        let mut store = store();
        let mut rng = StdRng::seed_from_u64(0);
        let outcome = store.distribute(DistributionMode::TeamSize, 3, &mut rng).unwrap();
        assert_eq!(outcome, Distribution::Rejected(DistributeError::EmptyRoster));
        assert!(store.teams().is_empty());
    }

    #[test]
    fn parse_score_mirrors_lenient_integer_parsing() {
        assert_eq!(parse_score("42"), 42);
        assert_eq!(parse_score("  -7"), -7);
        assert_eq!(parse_score("+3"), 3);
        assert_eq!(parse_score("12abc"), 12);
        assert_eq!(parse_score("3.9"), 3);
        assert_eq!(parse_score("abc"), 0);
        assert_eq!(parse_score(""), 0);
        assert_eq!(parse_score("-"), 0);
        assert_eq!(parse_score("99999999999999999999"), 0);
        assert_eq!(parse_score("9223372036854775807"), i64::MAX);
        assert_eq!(parse_score("-9223372036854775808"), i64::MIN);
        assert_eq!(parse_score("-9223372036854775809"), 0);
    }
}
