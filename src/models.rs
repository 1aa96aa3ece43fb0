//! Domain models that get persisted as one JSON blob and passed throughout
//! the TUI. These stay light-weight data holders so the roster store,
//! partitioner and views can focus on their own logic. The serde shape of
//! these types is the storage and export format, so field names must not
//! drift.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A named entry on the roster together with the score used for team
/// strength and the leaderboard.
pub struct Participant {
    /// Display name. Unique within the roster when compared
    /// case-insensitively, always trimmed and never empty.
    pub name: String,
    /// Free-form integer score. Negative values are allowed.
    #[serde(default)]
    pub score: i64,
}

impl Participant {
    /// Build a participant with the default score of zero.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: 0,
        }
    }

    /// Build a participant with an explicit score.
    pub fn with_score(name: impl Into<String>, score: i64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }

    /// Case-insensitive name comparison used for the uniqueness check.
    pub fn same_name_as(&self, other: &str) -> bool {
        self.name.to_lowercase() == other.to_lowercase()
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.score)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One bucket produced by a partition. Members mirror roster entries: score
/// edits and removals on the roster are applied here too until the next
/// partition replaces every team.
pub struct Team {
    /// Generated label, `Team 1`, `Team 2`, ... in creation order.
    pub name: String,
    #[serde(default)]
    pub members: Vec<Participant>,
}

impl Team {
    /// Create an empty team labelled with its 1-based position.
    pub fn numbered(index: usize) -> Self {
        Self {
            name: format!("Team {}", index + 1),
            members: Vec::new(),
        }
    }

    /// Aggregate strength of the team. Derived on every call, never stored.
    /// Summed as `i128` so any mix of `i64` scores fits.
    pub fn total_score(&self) -> i128 {
        self.members
            .iter()
            .map(|member| i128::from(member.score))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// The persisted unit: the whole roster plus the teams of the most recent
/// partition.
pub struct AppState {
    /// Participants in the order they were added.
    #[serde(default)]
    pub users: Vec<Participant>,
    /// Teams from the latest partition, replaced wholesale each time.
    #[serde(default)]
    pub teams: Vec<Team>,
}

impl AppState {
    pub fn find_user(&self, name: &str) -> Option<&Participant> {
        self.users.iter().find(|user| user.name == name)
    }

    /// Total number of team slots currently assigned.
    pub fn assigned_count(&self) -> usize {
        self.teams.iter().map(Team::len).sum()
    }
}

/// Colour scheme preference, persisted separately from the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Stored representation, `"dark"` or `"light"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Parse a stored value. Anything unrecognised falls back to dark.
    pub fn from_stored(raw: &str) -> Self {
        match raw.trim() {
            "light" => Theme::Light,
            _ => Theme::Dark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_total_sums_member_scores() {
        let team = Team {
            name: "Team 1".to_string(),
            members: vec![
                Participant::with_score("Ada", 12),
                Participant::with_score("Bo", -2),
                Participant::new("Cy"),
            ],
        };
        assert_eq!(team.total_score(), 10);
        assert_eq!(team.len(), 3);
    }

    #[test]
    fn numbered_teams_are_one_based() {
        assert_eq!(Team::numbered(0).name, "Team 1");
        assert_eq!(Team::numbered(4).name, "Team 5");
    }

    #[test]
    fn missing_fields_default_when_decoding() {
        let state: AppState = serde_json::from_str(r#"{"users":[{"name":"Ada"}]}"#).unwrap();
        assert_eq!(state.users, vec![Participant::new("Ada")]);
        assert!(state.teams.is_empty());
    }

    #[test]
    fn theme_parses_stored_values() {
        assert_eq!(Theme::from_stored("light"), Theme::Light);
        assert_eq!(Theme::from_stored("dark"), Theme::Dark);
        assert_eq!(Theme::from_stored("neon"), Theme::Dark);
        assert_eq!(Theme::Light.toggle().as_str(), "dark");
    }

    #[test]
    fn name_comparison_ignores_case() {
        let ada = Participant::new("Ada");
        assert!(ada.same_name_as("ADA"));
        assert!(!ada.same_name_as("Adam"));
    }
}
