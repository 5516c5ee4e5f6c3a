//! Driver-level scenarios: full frames through `Game` with in-memory
//! storage, a recording HUD and the in-process score backend.

use futures::executor::block_on;
use glam::Vec2;

use hefe_invaders::audio::Silence;
use hefe_invaders::consts::DEFENSE_LINE_Y;
use hefe_invaders::leaderboard::{LeaderboardView, MemoryLeaderboard, PageQuery, ScoreService};
use hefe_invaders::persistence;
use hefe_invaders::platform::{MemoryStore, NoDelay};
use hefe_invaders::renderer::NullRenderer;
use hefe_invaders::retry::RetryPolicy;
use hefe_invaders::session;
use hefe_invaders::sim::{GamePhase, Projectile};
use hefe_invaders::ui::{BannerKind, Overlay, UiSurface};
use hefe_invaders::wallet::{self, ChainConfig, LedgerWallet, PrizePool};
use hefe_invaders::{Game, LifeLossPolicy, Settings};

const WALLET: &str = "0x18cd0B25309Df2e9c207f4417C5eaa7A7eaA19B8";

#[derive(Default)]
struct Hud {
    score: u64,
    high: u64,
    lives: u32,
    wave: u32,
    game_over_visible: bool,
    final_score: Option<u64>,
    banners: Vec<(String, BannerKind)>,
    prize_pool: Option<(String, [String; 3])>,
}

impl UiSurface for Hud {
    fn show_score(&mut self, current: u64, high: u64) {
        self.score = current;
        self.high = high;
    }
    fn show_lives(&mut self, lives: u32) {
        self.lives = lives;
    }
    fn show_wave(&mut self, wave: u32) {
        self.wave = wave;
    }
    fn show_overlay(&mut self, overlay: Overlay, visible: bool) {
        if overlay == Overlay::GameOver {
            self.game_over_visible = visible;
        }
    }
    fn show_final_score(&mut self, score: u64) {
        self.final_score = Some(score);
    }
    fn show_leaderboard(&mut self, _view: &LeaderboardView) {}
    fn show_prize_pool(&mut self, total: &str, places: &[String; 3]) {
        self.prize_pool = Some((total.to_string(), places.clone()));
    }
    fn show_banner(&mut self, message: &str, kind: BannerKind) {
        self.banners.push((message.to_string(), kind));
    }
}

type TestGame = Game<Hud, MemoryStore, NullRenderer, Silence>;

fn new_game(store: MemoryStore) -> TestGame {
    Game::new(Hud::default(), store, NullRenderer::default(), Silence)
}

fn store_with_lives(lives: u32) -> MemoryStore {
    let mut store = MemoryStore::new();
    persistence::save_lives(&mut store, lives);
    store
}

/// Put a projectile just under every live enemy so the next frame hits it
fn aim_at_every_enemy(game: &mut TestGame) {
    let shots: Vec<Projectile> = game
        .state
        .wave
        .enemies
        .iter()
        .filter(|e| e.alive)
        .map(|e| {
            let mut p = Projectile::new(Vec2::new(e.pos.x + e.size.x / 2.0, e.pos.y + 8.0));
            p.pos.x -= p.size.x / 2.0;
            p
        })
        .collect();
    game.state.player.projectiles = shots;
}

fn breach(game: &mut TestGame) {
    for e in &mut game.state.wave.enemies {
        e.pos.y = DEFENSE_LINE_Y;
    }
}

#[test]
fn clearing_a_wave_advances_and_scores() {
    let mut game = new_game(store_with_lives(3));
    assert!(game.start_session(11));
    assert_eq!(game.state.wave.enemies.len(), 36);

    let expected: u64 = game.state.wave.enemies.iter().map(|e| e.points()).sum();
    aim_at_every_enemy(&mut game);
    assert!(game.step(16.0));

    assert_eq!(game.state.score, expected);
    assert_eq!(game.state.wave_number(), 2);
    assert_eq!(game.state.wave.enemies.len(), 39);
    assert_eq!(game.state.wave.y_offset, 0.0);
    assert!(game.state.player.projectiles.is_empty());

    let hud = game.ui();
    assert_eq!(hud.wave, 2);
    assert_eq!(hud.score, expected);
    assert_eq!(hud.high, expected);
    assert_eq!(persistence::load_high_score(game.store()), expected);
}

#[test]
fn game_over_submits_and_leaderboard_shows_score() {
    let board = MemoryLeaderboard::new();
    let mut game = new_game(store_with_lives(1));
    game.connect_wallet(WALLET).unwrap();
    assert!(game.start_session(5));

    aim_at_every_enemy(&mut game);
    game.step(16.0);
    let score = game.state.score;
    assert!(score > 0);

    breach(&mut game);
    assert!(!game.step(32.0));
    assert_eq!(game.phase(), GamePhase::GameOver);
    assert!(game.ui().game_over_visible);
    assert_eq!(game.ui().final_score, Some(score));

    // Score is frozen once the run is over
    assert!(!game.step(48.0));
    assert_eq!(game.state.score, score);

    let submission = game.take_submission().expect("final score queued for submission");
    let result = block_on(session::submit_final_score(
        &board,
        &NoDelay::new(),
        RetryPolicy::default(),
        &submission,
    ));
    game.on_submission_result(&submission, result, 100.0);
    assert!(game.pending_scores().is_empty());

    let page = block_on(board.fetch_leaderboard(PageQuery::default())).unwrap();
    assert_eq!(page.scores[0].score, score);
    assert_eq!(page.scores[0].wallet_address, "0x18cd...19B8");
}

#[test]
fn outage_queues_score_until_flush() {
    let board = MemoryLeaderboard::new();
    let mut game = new_game(store_with_lives(1));
    game.connect_wallet(WALLET).unwrap();
    game.start_session(9);
    game.state.score = 2500;
    breach(&mut game);
    game.step(16.0);

    let submission = game.take_submission().unwrap();
    board.fail_next(3);
    let delay = NoDelay::new();
    let result = block_on(session::submit_final_score(
        &board,
        &delay,
        RetryPolicy::default(),
        &submission,
    ));
    assert!(result.is_err());
    assert_eq!(delay.total_requested_ms(), 2000);

    game.on_submission_result(&submission, result, 100.0);
    assert_eq!(game.pending_scores().len(), 1);
    assert!(matches!(game.ui().banners.last(), Some((_, BannerKind::Error))));

    // Service is back
    let remaining = block_on(session::flush_pending(
        &board,
        &NoDelay::new(),
        RetryPolicy::once(),
        game.pending_scores(),
    ));
    game.on_pending_flushed(&remaining);
    assert!(game.pending_scores().is_empty());
    assert_eq!(board.stored_score(WALLET), Some(2500));
}

#[test]
fn continue_immediately_keeps_playing_after_breach() {
    let mut store = store_with_lives(2);
    Settings {
        life_loss_policy: LifeLossPolicy::ContinueImmediately,
        ..Settings::default()
    }
    .save(&mut store);

    let mut game = new_game(store);
    game.start_session(3);
    game.state.wave.enemies.truncate(1);
    breach(&mut game);

    assert!(game.step(16.0));
    assert_eq!(game.phase(), GamePhase::Playing);
    assert_eq!(game.state.lives, 1);
    // Wave emptied by the breach replays at the same number
    assert_eq!(game.state.wave_number(), 1);
    assert_eq!(game.state.wave.enemies.len(), 36);
    assert_eq!(game.ui().lives, 1);
}

#[test]
fn buying_lives_unlocks_a_new_session() {
    let chain = ChainConfig::default();
    let ledger = LedgerWallet::new(WALLET);
    ledger.credit(WALLET, 1_000_000);

    let mut store = store_with_lives(0);
    let lives = block_on(wallet::purchase_lives(&ledger, &chain, WALLET, 0, &mut store)).unwrap();
    assert_eq!(lives, 5);

    let mut game = new_game(store);
    assert!(game.start_session(1));
    assert_eq!(game.state.lives, 5);
}

#[test]
fn purchase_grows_the_prize_pool_on_the_hud() {
    const BUYER: &str = "0xB97EF9Ef8734C71904D8002F8b6Bc66Dd9c48a6E";
    let chain = ChainConfig::default();
    let ledger = LedgerWallet::new(BUYER);
    ledger.credit(BUYER, 1_000_000);

    let mut store = store_with_lives(2);
    let lives = block_on(wallet::purchase_lives(&ledger, &chain, BUYER, 2, &mut store)).unwrap();
    assert_eq!(lives, 7);

    let mut game = new_game(store);
    game.on_lives_changed(lives);
    let pool = block_on(PrizePool::fetch(&ledger, &chain)).unwrap();
    game.on_prize_pool(&pool);

    assert_eq!(game.ui().lives, 7);
    let (total, places) = game.ui().prize_pool.clone().unwrap();
    assert_eq!(total, "0.175");
    assert_eq!(places, ["0.0875", "0.0525", "0.035"].map(String::from));
}
