//! Leaderboard view derived from the roster on demand. Nothing here is
//! persisted; the sort direction lives in the UI and the ranking is rebuilt
//! every time it is drawn.

use crate::models::Participant;

/// Ordering applied to scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Descending,
    Ascending,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Descending => SortDirection::Ascending,
            SortDirection::Ascending => SortDirection::Descending,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortDirection::Descending => "High to low",
            SortDirection::Ascending => "Low to high",
        }
    }
}

/// Podium badge for the top three of a descending leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    fn for_position(position: usize) -> Option<Self> {
        match position {
            0 => Some(Medal::Gold),
            1 => Some(Medal::Silver),
            2 => Some(Medal::Bronze),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Medal::Gold => "🥇",
            Medal::Silver => "🥈",
            Medal::Bronze => "🥉",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// 1-based position in the sorted list.
    pub rank: usize,
    pub medal: Option<Medal>,
    pub participant: Participant,
}

impl LeaderboardEntry {
    /// Medal when awarded, otherwise the numeric rank.
    pub fn badge(&self) -> String {
        match self.medal {
            Some(medal) => medal.symbol().to_string(),
            None => format!("{}.", self.rank),
        }
    }
}

/// Sort a copy of `users` by score. The sort is stable, so equal scores keep
/// their roster order in either direction. Medals are only handed out when
/// sorting high to low.
pub fn rank(users: &[Participant], direction: SortDirection) -> Vec<LeaderboardEntry> {
    let mut sorted = users.to_vec();
    match direction {
        SortDirection::Descending => sorted.sort_by(|a, b| b.score.cmp(&a.score)),
        SortDirection::Ascending => sorted.sort_by(|a, b| a.score.cmp(&b.score)),
    }

    sorted
        .into_iter()
        .enumerate()
        .map(|(position, participant)| LeaderboardEntry {
            rank: position + 1,
            medal: match direction {
                SortDirection::Descending => Medal::for_position(position),
                SortDirection::Ascending => None,
            },
            participant,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(entries: &[LeaderboardEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.participant.name.as_str()).collect()
    }

    fn sample() -> Vec<Participant> {
        vec![
            Participant::with_score("A", 10),
            Participant::with_score("B", 30),
            Participant::with_score("C", 20),
        ]
    }

    #[test]
    fn descending_puts_highest_first() {
        let entries = rank(&sample(), SortDirection::Descending);
        assert_eq!(names(&entries), ["B", "C", "A"]);
        assert_eq!(entries[0].participant.score, 30);
    }

    #[test]
    fn ascending_puts_lowest_first() {
        let entries = rank(&sample(), SortDirection::Ascending);
        assert_eq!(names(&entries), ["A", "C", "B"]);
    }

    #[test]
    fn medals_only_when_descending() {
        let mut users = sample();
        users.push(Participant::with_score("D", 5));
        let desc = rank(&users, SortDirection::Descending);
        let medals: Vec<_> = desc.iter().map(|e| e.medal).collect();
        assert_eq!(
            medals,
            [Some(Medal::Gold), Some(Medal::Silver), Some(Medal::Bronze), None]
        );
        assert_eq!(desc[3].badge(), "4.");

        let asc = rank(&users, SortDirection::Ascending);
        assert!(asc.iter().all(|e| e.medal.is_none()));
        assert_eq!(asc[0].badge(), "1.");
    }

    #[test]
    fn ties_keep_roster_order() {
        let users = vec![
            Participant::with_score("X", 5),
            Participant::with_score("Y", 9),
            Participant::with_score("Z", 5),
        ];
        assert_eq!(names(&rank(&users, SortDirection::Descending)), ["Y", "X", "Z"]);
        assert_eq!(names(&rank(&users, SortDirection::Ascending)), ["X", "Z", "Y"]);
    }

    #[test]
    fn ranking_does_not_reorder_roster() {
        let users = sample();
        let _ = rank(&users, SortDirection::Descending);
        assert_eq!(users, sample());
    }

    #[test]
    fn direction_toggles() {
        assert_eq!(SortDirection::default(), SortDirection::Descending);
        assert_eq!(SortDirection::Descending.toggle(), SortDirection::Ascending);
    }
}
