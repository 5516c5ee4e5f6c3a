//! Game loop driver
//!
//! `Game` owns the simulation and everything a frame touches: input, storage,
//! HUD, renderer and sound. The host calls `step` once per display refresh and
//! schedules another call only while it returns true. Async work (score
//! submission, leaderboard, wallet) happens outside; the host hands results
//! back through the `on_*` methods.

use crate::audio::{SoundEffect, SoundSink};
use crate::error::ClientError;
use crate::highscores::HighScores;
use crate::leaderboard::{LeaderboardView, ScoreSubmission, SubmitReceipt};
use crate::persistence::{self, PendingScore};
use crate::platform::{InputState, KeyValueStore};
use crate::renderer::FrameRenderer;
use crate::session::{self, ScoreSession};
use crate::settings::Settings;
use crate::short_address;
use crate::sim::{self, GameEvent, GamePhase, GameState};
use crate::ui::{BannerKind, Overlay, UiSurface};
use crate::validate;
use crate::wallet::PrizePool;

/// Name recorded in the local table when no wallet is connected
const ANONYMOUS: &str = "Player";

pub struct Game<U, S, R, A> {
    pub state: GameState,
    pub settings: Settings,
    pub session: ScoreSession,
    pub local_scores: HighScores,
    pub input: InputState,
    wallet_address: Option<String>,
    /// Final score waiting for the host to submit
    outgoing: Option<ScoreSubmission>,
    ui: U,
    store: S,
    renderer: R,
    sound: A,
}

impl<U, S, R, A> Game<U, S, R, A>
where
    U: UiSurface,
    S: KeyValueStore,
    R: FrameRenderer,
    A: SoundSink,
{
    pub fn new(ui: U, store: S, renderer: R, mut sound: A) -> Self {
        let settings = Settings::load(&store);
        sound.set_muted(settings.muted);
        let mut game = Self {
            state: GameState::idle(0),
            session: ScoreSession::load(&store),
            local_scores: HighScores::load(&store),
            input: InputState::new(),
            wallet_address: None,
            outgoing: None,
            settings,
            ui,
            store,
            renderer,
            sound,
        };
        let lives = game.stored_lives();
        game.ui.show_score(0, game.session.high());
        game.ui.show_lives(lives);
        game.ui.show_wave(1);
        game.ui.show_overlay(Overlay::Start, true);
        game
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Lives available for the next session
    pub fn stored_lives(&self) -> u32 {
        persistence::load_lives(&self.store).unwrap_or(self.settings.starting_lives)
    }

    pub fn wallet_address(&self) -> Option<&str> {
        self.wallet_address.as_deref()
    }

    pub fn connect_wallet(&mut self, address: &str) -> Result<(), ClientError> {
        validate::wallet_address(address)?;
        log::info!("Wallet connected: {}", short_address(address));
        self.wallet_address = Some(address.to_string());
        self.ui
            .show_banner(&format!("Connected {}", short_address(address)), BannerKind::Success);
        Ok(())
    }

    /// Begin a fresh run. Returns false (and says why) when no lives are left.
    pub fn start_session(&mut self, seed: u64) -> bool {
        if matches!(self.state.phase, GamePhase::Playing | GamePhase::LifeLost) {
            log::warn!("Session already running");
            return false;
        }

        let lives = self.stored_lives();
        if lives == 0 {
            self.ui
                .show_banner("No lives left - buy more lives to play", BannerKind::Error);
            return false;
        }

        self.state = GameState::new(seed, lives, &self.settings);
        self.session.reset();
        self.input.clear();
        self.outgoing = None;
        persistence::save_lives(&mut self.store, lives);
        log::info!("Session started (seed {seed}, {lives} lives)");

        self.ui.show_overlay(Overlay::Start, false);
        self.ui.show_overlay(Overlay::GameOver, false);
        self.ui.show_overlay(Overlay::LifeLost, false);
        self.ui.show_score(0, self.session.high());
        self.ui.show_lives(lives);
        self.ui.show_wave(self.state.wave_number());
        true
    }

    /// Run one frame. Returns whether the host should schedule another.
    pub fn step(&mut self, now_ms: f64) -> bool {
        if self.input.take_mute_toggle() {
            self.toggle_mute();
        }
        if !self.state.is_playing() {
            return false;
        }

        let input = self.input.take_frame();
        sim::update(&mut self.state, &input, now_ms);
        self.renderer.render(&self.state);
        sim::check_defense_line(&mut self.state);
        sim::replace_cleared_wave(&mut self.state);
        self.handle_events(now_ms);

        self.state.is_playing()
    }

    /// Continue after the life-lost prompt. Returns whether the loop should resume.
    pub fn acknowledge_life_lost(&mut self) -> bool {
        if self.state.phase != GamePhase::LifeLost {
            return false;
        }
        sim::acknowledge_life_lost(&mut self.state);
        self.input.clear();
        self.ui.show_overlay(Overlay::LifeLost, false);
        self.ui.show_wave(self.state.wave_number());
        true
    }

    pub fn toggle_mute(&mut self) {
        self.settings.toggle_mute();
        self.sound.set_muted(self.settings.muted);
        self.settings.save(&mut self.store);
    }

    fn handle_events(&mut self, now_ms: f64) {
        for event in self.state.drain_events() {
            if let Some(effect) = SoundEffect::for_event(&event) {
                self.sound.play(effect);
            }
            match event {
                GameEvent::ShotFired => {}
                GameEvent::EnemyDestroyed { .. } => {
                    if self.session.record(self.state.score, &mut self.store) {
                        self.sound.play(SoundEffect::HighScore);
                    }
                    self.ui.show_score(self.state.score, self.session.high());
                }
                GameEvent::WaveCleared { next_wave } => self.ui.show_wave(next_wave),
                GameEvent::LifeLost { lives_remaining } => {
                    persistence::save_lives(&mut self.store, lives_remaining);
                    self.ui.show_lives(lives_remaining);
                    if self.state.phase == GamePhase::LifeLost {
                        self.ui.show_overlay(Overlay::LifeLost, true);
                    }
                }
                GameEvent::GameOver { final_score } => self.finish(final_score, now_ms),
            }
        }
    }

    fn finish(&mut self, final_score: u64, now_ms: f64) {
        persistence::save_lives(&mut self.store, 0);
        self.input.clear();
        self.ui.show_lives(0);
        self.ui.show_final_score(final_score);
        self.ui.show_overlay(Overlay::GameOver, true);

        let name = self
            .wallet_address
            .as_deref()
            .map(short_address)
            .unwrap_or_else(|| ANONYMOUS.to_string());
        let wave = self.state.wave_number();
        if let Some(rank) = self.local_scores.add_score(&name, final_score, wave, now_ms) {
            log::info!("Local high score #{rank}: {final_score}");
            self.local_scores.save(&mut self.store);
        }

        match &self.wallet_address {
            Some(wallet) => {
                self.outgoing = Some(ScoreSubmission {
                    wallet_address: wallet.clone(),
                    score: final_score,
                });
            }
            None => log::info!("No wallet connected - score kept locally"),
        }
    }

    /// Final score the host should submit, if one is waiting
    pub fn take_submission(&mut self) -> Option<ScoreSubmission> {
        self.outgoing.take()
    }

    /// Report how a submission went; failures worth retrying are queued
    pub fn on_submission_result(
        &mut self,
        submission: &ScoreSubmission,
        result: Result<SubmitReceipt, ClientError>,
        now_ms: f64,
    ) {
        match result {
            Ok(receipt) => self.ui.show_banner(
                &format!("Score submitted! Best: {}", receipt.score),
                BannerKind::Success,
            ),
            Err(err) if session::should_queue(&err) => {
                session::queue_pending(&mut self.store, submission, now_ms);
                self.ui.show_banner(
                    "Score saved locally - will retry when the leaderboard is back",
                    BannerKind::Error,
                );
            }
            Err(err) => {
                log::error!("Score rejected: {err}");
                self.show_error(&err);
            }
        }
    }

    /// Surface a failed async action
    pub fn show_error(&mut self, err: &ClientError) {
        self.ui.show_banner(&err.to_string(), BannerKind::Error);
    }

    pub fn pending_scores(&self) -> Vec<PendingScore> {
        persistence::load_pending(&self.store)
    }

    /// Store what is left of the queue after a flush
    pub fn on_pending_flushed(&mut self, remaining: &[PendingScore]) {
        persistence::save_pending(&mut self.store, remaining);
    }

    pub fn local_leaderboard(&self) -> LeaderboardView {
        LeaderboardView::from_local(&self.local_scores)
    }

    pub fn show_leaderboard(&mut self, view: &LeaderboardView) {
        self.ui.show_leaderboard(view);
        self.ui.show_overlay(Overlay::Leaderboard, true);
    }

    pub fn hide_leaderboard(&mut self) {
        self.ui.show_overlay(Overlay::Leaderboard, false);
    }

    pub fn on_prize_pool(&mut self, pool: &PrizePool) {
        let chain = &self.settings.chain;
        let places = pool.places.map(|amount| chain.format_amount(amount));
        self.ui.show_prize_pool(&chain.format_amount(pool.total), &places);
    }

    /// Lives bought or claimed outside the loop
    pub fn on_lives_changed(&mut self, lives: u32) {
        if matches!(self.state.phase, GamePhase::Playing | GamePhase::LifeLost) {
            self.state.lives = lives;
        }
        persistence::save_lives(&mut self.store, lives);
        self.ui.show_lives(lives);
        self.ui.show_banner(&format!("You now have {lives} lives"), BannerKind::Success);
    }
}
