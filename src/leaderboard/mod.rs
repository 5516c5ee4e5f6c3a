//! Score service contract
//!
//! The leaderboard backend is an external collaborator. This module defines
//! its wire types and the async trait the client talks to; `MemoryLeaderboard`
//! implements the same contract in-process and `HttpScoreService` talks to the
//! real API from the browser.

pub mod memory;
pub mod view;

#[cfg(target_arch = "wasm32")]
pub mod http;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

pub use memory::MemoryLeaderboard;
pub use view::{LeaderboardView, ViewRow};

#[cfg(target_arch = "wasm32")]
pub use http::HttpScoreService;

/// Body of `POST /scores`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub wallet_address: String,
    pub score: u64,
}

/// Response of `POST /scores`; `score` is the best stored score for the wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub success: bool,
    pub score: u64,
}

/// Query of `GET /leaderboard`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// One ranked leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    pub rank: u32,
    /// Shortened for display (`0x1234...abcd`)
    pub wallet_address: String,
    #[serde(default)]
    pub nickname: Option<String>,
    pub score: u64,
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u32,
    pub items_per_page: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total_items: u32) -> Self {
        let total_pages = total_items.div_ceil(limit.max(1));
        Self {
            current_page: page,
            total_pages,
            total_items,
            items_per_page: limit,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }
}

/// Response of `GET /leaderboard`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardPage {
    pub scores: Vec<LeaderboardRow>,
    pub pagination: Pagination,
}

/// Client side of the score API
#[allow(async_fn_in_trait)]
pub trait ScoreService {
    /// Record a final score. The backend keeps the best score per wallet.
    async fn submit_score(&self, submission: &ScoreSubmission) -> Result<SubmitReceipt, ClientError>;

    async fn fetch_leaderboard(&self, query: PageQuery) -> Result<LeaderboardPage, ClientError>;

    /// Attach a display name to a wallet. Returns the stored nickname.
    async fn save_nickname(&self, wallet_address: &str, nickname: &str) -> Result<String, ClientError>;

    /// Claim the one-time free life for a wallet
    async fn claim_free_life(&self, wallet_address: &str) -> Result<(), ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_metadata() {
        let p = Pagination::new(1, 10, 25);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next_page);
        assert!(!p.has_prev_page);

        let p = Pagination::new(3, 10, 25);
        assert!(!p.has_next_page);
        assert!(p.has_prev_page);

        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next_page);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = r#"{
            "scores": [{"rank": 1, "walletAddress": "0x18cd...19B8", "score": 4200,
                        "lastUpdated": "2024-03-01T12:00:00Z"}],
            "pagination": {"currentPage": 1, "totalPages": 1, "totalItems": 1,
                           "itemsPerPage": 10, "hasNextPage": false, "hasPrevPage": false}
        }"#;
        let page: LeaderboardPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.scores[0].score, 4200);
        assert_eq!(page.scores[0].nickname, None);

        let body = serde_json::to_string(&ScoreSubmission {
            wallet_address: "0xabc".into(),
            score: 10,
        })
        .unwrap();
        assert_eq!(body, r#"{"walletAddress":"0xabc","score":10}"#);
    }
}
