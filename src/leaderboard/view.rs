//! Leaderboard presentation rows

use super::LeaderboardPage;
use crate::highscores::HighScores;

/// Rows shown in the leaderboard panel
pub const VIEW_SIZE: usize = 10;

/// Text shown when there is nothing to rank
pub const EMPTY_PLACEHOLDER: &str = "No scores yet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRow {
    /// Medal for the podium, `#n` below it
    pub rank_label: String,
    pub name: String,
    pub score: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeaderboardView {
    pub rows: Vec<ViewRow>,
    /// True when built from the local table because the service was unavailable
    pub offline: bool,
}

fn rank_label(rank: u32) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("#{n}"),
    }
}

impl LeaderboardView {
    pub fn from_page(page: &LeaderboardPage) -> Self {
        let rows = page
            .scores
            .iter()
            .take(VIEW_SIZE)
            .map(|row| ViewRow {
                rank_label: rank_label(row.rank),
                name: row
                    .nickname
                    .clone()
                    .unwrap_or_else(|| row.wallet_address.clone()),
                score: row.score,
            })
            .collect();
        Self {
            rows,
            offline: false,
        }
    }

    /// Built from the on-device table; ranks are positional
    pub fn from_local(scores: &HighScores) -> Self {
        let rows = scores
            .entries
            .iter()
            .take(VIEW_SIZE)
            .zip(1u32..)
            .map(|(entry, rank)| ViewRow {
                rank_label: rank_label(rank),
                name: entry.name.clone(),
                score: entry.score,
            })
            .collect();
        Self {
            rows,
            offline: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
