//! In-process score backend
//!
//! Implements the full score API contract against a hash map: best-score
//! upserts, `RANK()`-style ties, pagination, nickname uniqueness, the
//! one-time free life and a per-wallet rate limit. Used by native builds and
//! tests, and handy for exercising retry paths via `fail_next`.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, SecondsFormat, Utc};

use super::{
    LeaderboardPage, LeaderboardRow, PageQuery, Pagination, ScoreService, ScoreSubmission,
    SubmitReceipt,
};
use crate::error::ClientError;
use crate::{short_address, validate};

/// Submissions allowed per wallet within `RATE_WINDOW_MS`
pub const RATE_LIMIT: usize = 5;
pub const RATE_WINDOW_MS: f64 = 60_000.0;

#[derive(Debug, Clone, Default)]
struct Record {
    /// Address as first submitted (keys are lowercased)
    address: String,
    /// False for wallets that only have a nickname or a free-life claim
    scored: bool,
    score: u64,
    nickname: Option<String>,
    free_life_claimed: bool,
    updated_ms: f64,
}

#[derive(Debug, Default)]
pub struct MemoryLeaderboard {
    records: RefCell<HashMap<String, Record>>,
    requests: RefCell<HashMap<String, VecDeque<f64>>>,
    clock_ms: Cell<f64>,
    failures: Cell<u32>,
}

impl MemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the backend clock forward (drives the rate-limit window)
    pub fn advance_clock(&self, ms: f64) {
        self.clock_ms.set(self.clock_ms.get() + ms);
    }

    /// Make the next `count` calls fail as if the service were unreachable
    pub fn fail_next(&self, count: u32) {
        self.failures.set(count);
    }

    pub fn stored_score(&self, wallet_address: &str) -> Option<u64> {
        self.records
            .borrow()
            .get(&wallet_address.to_lowercase())
            .map(|r| r.score)
    }

    fn check_outage(&self) -> Result<(), ClientError> {
        let remaining = self.failures.get();
        if remaining > 0 {
            self.failures.set(remaining - 1);
            return Err(ClientError::external("score-api", "service unavailable"));
        }
        Ok(())
    }

    fn check_rate(&self, identity: &str) -> Result<(), ClientError> {
        let now = self.clock_ms.get();
        let mut requests = self.requests.borrow_mut();
        let window = requests.entry(identity.to_string()).or_default();
        while window.front().is_some_and(|&t| now - t >= RATE_WINDOW_MS) {
            window.pop_front();
        }
        if window.len() >= RATE_LIMIT {
            return Err(ClientError::RateLimitExceeded);
        }
        window.push_back(now);
        Ok(())
    }

    fn ranked(&self) -> Vec<(String, Record)> {
        let mut rows: Vec<_> = self
            .records
            .borrow()
            .iter()
            .filter(|(_, v)| v.scored)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        // Highest score first; earliest update wins among equals for a stable order
        rows.sort_by(|a, b| {
            b.1.score
                .cmp(&a.1.score)
                .then(a.1.updated_ms.total_cmp(&b.1.updated_ms))
                .then(a.0.cmp(&b.0))
        });
        rows
    }
}

impl ScoreService for MemoryLeaderboard {
    async fn submit_score(&self, submission: &ScoreSubmission) -> Result<SubmitReceipt, ClientError> {
        self.check_outage()?;
        validate::wallet_address(&submission.wallet_address)?;
        let key = submission.wallet_address.to_lowercase();
        self.check_rate(&key)?;

        let now = self.clock_ms.get();
        let mut records = self.records.borrow_mut();
        let record = records.entry(key).or_insert_with(|| Record {
            address: submission.wallet_address.clone(),
            ..Record::default()
        });
        if !record.scored || submission.score > record.score {
            record.scored = true;
            record.score = submission.score;
            record.updated_ms = now;
        }
        Ok(SubmitReceipt {
            success: true,
            score: record.score,
        })
    }

    async fn fetch_leaderboard(&self, query: PageQuery) -> Result<LeaderboardPage, ClientError> {
        self.check_outage()?;
        validate::pagination(query.page, query.limit)?;

        let ranked = self.ranked();
        let mut ranks = Vec::with_capacity(ranked.len());
        for (i, (_, record)) in ranked.iter().enumerate() {
            let rank = match i {
                0 => 1,
                _ if ranked[i - 1].1.score == record.score => ranks[i - 1],
                _ => i as u32 + 1,
            };
            ranks.push(rank);
        }

        let offset = (query.page as usize - 1) * query.limit as usize;
        let scores = ranked
            .iter()
            .zip(&ranks)
            .skip(offset)
            .take(query.limit as usize)
            .map(|((_, record), &rank)| LeaderboardRow {
                rank,
                wallet_address: short_address(&record.address),
                nickname: record.nickname.clone(),
                score: record.score,
                last_updated: iso8601_utc(record.updated_ms),
            })
            .collect();

        Ok(LeaderboardPage {
            scores,
            pagination: Pagination::new(query.page, query.limit, ranked.len() as u32),
        })
    }

    async fn save_nickname(&self, wallet_address: &str, nickname: &str) -> Result<String, ClientError> {
        self.check_outage()?;
        validate::wallet_address(wallet_address)?;
        validate::nickname(nickname)?;
        let key = wallet_address.to_lowercase();

        let mut records = self.records.borrow_mut();
        let taken = records.iter().any(|(addr, r)| {
            *addr != key
                && r
                    .nickname
                    .as_deref()
                    .is_some_and(|n| n.eq_ignore_ascii_case(nickname))
        });
        if taken {
            return Err(ClientError::Conflict(format!(
                "nickname '{nickname}' is already taken"
            )));
        }
        records
            .entry(key)
            .or_insert_with(|| Record {
                address: wallet_address.to_string(),
                ..Record::default()
            })
            .nickname = Some(nickname.to_string());
        Ok(nickname.to_string())
    }

    async fn claim_free_life(&self, wallet_address: &str) -> Result<(), ClientError> {
        self.check_outage()?;
        validate::wallet_address(wallet_address)?;
        let mut records = self.records.borrow_mut();
        let record = records
            .entry(wallet_address.to_lowercase())
            .or_insert_with(|| Record {
                address: wallet_address.to_string(),
                ..Record::default()
            });
        if record.free_life_claimed {
            return Err(ClientError::Conflict("free life already claimed".into()));
        }
        record.free_life_claimed = true;
        Ok(())
    }
}

/// Format a Unix timestamp in ms as `YYYY-MM-DDTHH:MM:SSZ`
fn iso8601_utc(ms: f64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms as i64)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    const ALICE: &str = "0x18cd0B25309Df2e9c207f4417C5eaa7A7eaA19B8";
    const BOB: &str = "0xB97EF9Ef8734C71904D8002F8b6Bc66Dd9c48a6E";
    const CAROL: &str = "0x0000000000000000000000000000000000000001";

    fn submit(board: &MemoryLeaderboard, wallet: &str, score: u64) -> Result<SubmitReceipt, ClientError> {
        block_on(board.submit_score(&ScoreSubmission {
            wallet_address: wallet.into(),
            score,
        }))
    }

    #[test]
    fn test_keeps_best_score() {
        let board = MemoryLeaderboard::new();
        assert_eq!(submit(&board, ALICE, 500).unwrap().score, 500);
        assert_eq!(submit(&board, ALICE, 300).unwrap().score, 500);
        assert_eq!(submit(&board, ALICE, 900).unwrap().score, 900);
        assert_eq!(board.stored_score(ALICE), Some(900));
    }

    #[test]
    fn test_rejects_bad_wallet() {
        let board = MemoryLeaderboard::new();
        let err = submit(&board, "0x123", 10).unwrap_err();
        assert!(matches!(err, ClientError::InvalidInput(_)));
    }

    #[test]
    fn test_rank_ties() {
        let board = MemoryLeaderboard::new();
        submit(&board, ALICE, 700).unwrap();
        board.advance_clock(1000.0);
        submit(&board, BOB, 700).unwrap();
        submit(&board, CAROL, 100).unwrap();

        let page = block_on(board.fetch_leaderboard(PageQuery::default())).unwrap();
        let ranks: Vec<u32> = page.scores.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 1, 3]);
        assert_eq!(page.scores[0].wallet_address, "0x18cd...19B8");
        assert_eq!(page.pagination.total_items, 3);
    }

    #[test]
    fn test_pagination() {
        let board = MemoryLeaderboard::new();
        for i in 0..5u64 {
            let wallet = format!("0x{:040x}", i + 1);
            submit(&board, &wallet, i * 10).unwrap();
        }
        let page = block_on(board.fetch_leaderboard(PageQuery { page: 2, limit: 2 })).unwrap();
        assert_eq!(page.scores.len(), 2);
        assert_eq!(page.scores[0].rank, 3);
        assert!(page.pagination.has_next_page);
        assert!(page.pagination.has_prev_page);

        let err = block_on(board.fetch_leaderboard(PageQuery { page: 1, limit: 101 })).unwrap_err();
        assert!(matches!(err, ClientError::InvalidInput(_)));
    }

    #[test]
    fn test_rate_limit_window() {
        let board = MemoryLeaderboard::new();
        for _ in 0..RATE_LIMIT {
            submit(&board, ALICE, 1).unwrap();
        }
        assert_eq!(submit(&board, ALICE, 1), Err(ClientError::RateLimitExceeded));
        // Other wallets are unaffected
        assert!(submit(&board, BOB, 1).is_ok());

        board.advance_clock(RATE_WINDOW_MS);
        assert!(submit(&board, ALICE, 1).is_ok());
    }

    #[test]
    fn test_nickname_conflict() {
        let board = MemoryLeaderboard::new();
        assert_eq!(block_on(board.save_nickname(ALICE, "ace")).unwrap(), "ace");
        let err = block_on(board.save_nickname(BOB, "ACE")).unwrap_err();
        assert!(matches!(err, ClientError::Conflict(_)));
        // Re-saving your own name is fine
        assert!(block_on(board.save_nickname(ALICE, "ace")).is_ok());
    }

    #[test]
    fn test_free_life_once() {
        let board = MemoryLeaderboard::new();
        assert!(block_on(board.claim_free_life(ALICE)).is_ok());
        assert!(matches!(
            block_on(board.claim_free_life(ALICE)),
            Err(ClientError::Conflict(_))
        ));
    }

    #[test]
    fn test_outage_is_transient() {
        let board = MemoryLeaderboard::new();
        board.fail_next(1);
        assert!(submit(&board, ALICE, 1).unwrap_err().is_transient());
        assert!(submit(&board, ALICE, 1).is_ok());
    }

    #[test]
    fn test_iso8601() {
        assert_eq!(iso8601_utc(0.0), "1970-01-01T00:00:00Z");
        assert_eq!(iso8601_utc(1_709_294_400_000.0), "2024-03-01T12:00:00Z");
        // Sub-second part is dropped
        assert_eq!(iso8601_utc(1_709_294_400_999.0), "2024-03-01T12:00:00Z");
    }
}
