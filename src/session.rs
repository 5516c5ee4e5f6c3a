//! Score/session façade
//!
//! Tracks the running and best score, submits final scores with retry, keeps
//! unsent scores in a pending queue, and builds the leaderboard view with a
//! fallback to the local table.

use crate::error::ClientError;
use crate::highscores::HighScores;
use crate::leaderboard::{LeaderboardView, PageQuery, ScoreService, ScoreSubmission, SubmitReceipt};
use crate::persistence::{self, PendingScore};
use crate::platform::{Delay, KeyValueStore};
use crate::retry::RetryPolicy;
use crate::validate;

#[derive(Debug, Clone, Default)]
pub struct ScoreSession {
    current: u64,
    high: u64,
    /// A new best was already celebrated this session
    celebrated: bool,
}

impl ScoreSession {
    pub fn load(store: &impl KeyValueStore) -> Self {
        Self {
            high: persistence::load_high_score(store),
            ..Self::default()
        }
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn high(&self) -> u64 {
        self.high
    }

    pub fn reset(&mut self) {
        self.current = 0;
        self.celebrated = false;
    }

    /// Record the running score, persisting the high score when it moves.
    ///
    /// Returns true the first time this session beats the stored best.
    pub fn record(&mut self, score: u64, store: &mut impl KeyValueStore) -> bool {
        self.current = self.current.max(score);
        if self.current <= self.high {
            return false;
        }
        self.high = self.current;
        persistence::save_high_score(store, self.high);
        !std::mem::replace(&mut self.celebrated, true)
    }
}

/// Submit a final score, retrying transient failures per `policy`.
///
/// Input is validated before anything is sent.
pub async fn submit_final_score(
    service: &impl ScoreService,
    delay: &impl Delay,
    policy: RetryPolicy,
    submission: &ScoreSubmission,
) -> Result<SubmitReceipt, ClientError> {
    validate::wallet_address(&submission.wallet_address)?;
    let receipt = policy
        .run(delay, |_| service.submit_score(submission))
        .await?;
    log::info!(
        "Score {} submitted, best on record {}",
        submission.score,
        receipt.score
    );
    Ok(receipt)
}

/// Whether a failed submission is worth keeping for a later retry
pub fn should_queue(err: &ClientError) -> bool {
    matches!(
        err,
        ClientError::ExternalService { .. } | ClientError::RateLimitExceeded
    )
}

/// Append a score to the persisted pending queue
pub fn queue_pending(store: &mut impl KeyValueStore, submission: &ScoreSubmission, now_ms: f64) {
    let mut pending = persistence::load_pending(store);
    pending.push(PendingScore {
        wallet_address: submission.wallet_address.clone(),
        score: submission.score,
        queued_at: now_ms,
    });
    log::warn!(
        "Queued score {} for later ({} pending)",
        submission.score,
        pending.len()
    );
    persistence::save_pending(store, &pending);
}

/// Resubmit queued scores in order.
///
/// Stops at the first retryable failure and returns what is still pending;
/// permanently rejected entries are dropped.
pub async fn flush_pending(
    service: &impl ScoreService,
    delay: &impl Delay,
    policy: RetryPolicy,
    pending: Vec<PendingScore>,
) -> Vec<PendingScore> {
    let mut remaining = pending.into_iter();
    while let Some(entry) = remaining.next() {
        let submission = ScoreSubmission {
            wallet_address: entry.wallet_address.clone(),
            score: entry.score,
        };
        match submit_final_score(service, delay, policy, &submission).await {
            Ok(_) => {}
            Err(err) if should_queue(&err) => {
                log::warn!("Pending flush paused: {err}");
                return std::iter::once(entry).chain(remaining).collect();
            }
            Err(err) => log::warn!("Dropping pending score {}: {err}", entry.score),
        }
    }
    log::info!("Pending score queue flushed");
    Vec::new()
}

/// Top of the remote leaderboard, or the local table if the service fails
pub async fn leaderboard_view(service: &impl ScoreService, local: &HighScores) -> LeaderboardView {
    match service.fetch_leaderboard(PageQuery::default()).await {
        Ok(page) => LeaderboardView::from_page(&page),
        Err(err) => {
            log::warn!("Leaderboard unavailable, showing local scores: {err}");
            LeaderboardView::from_local(local)
        }
    }
}
