//! Hefe Invaders entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use hefe_invaders::audio::AudioManager;
    use hefe_invaders::leaderboard::{HttpScoreService, ScoreSubmission};
    use hefe_invaders::platform::{Key, LocalStore, TimeoutDelay, now_ms};
    use hefe_invaders::renderer::RenderState;
    use hefe_invaders::sim::GamePhase;
    use hefe_invaders::ui::DomSurface;
    use hefe_invaders::wallet::{self, InjectedWallet, PrizePool, WalletProvider};
    use hefe_invaders::{ClientError, Settings, session};

    type BrowserGame = hefe_invaders::Game<DomSurface, LocalStore, RenderState, AudioManager>;
    type Shared = Rc<RefCell<BrowserGame>>;

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("Hefe Invaders starting...");

        match init().await {
            Ok(game) => {
                flush_pending(game.clone());
                refresh_prize_pool(game.clone());
                log::info!("Hefe Invaders ready");
            }
            Err(e) => log::error!("{e}"),
        }
    }

    async fn init() -> Result<Shared, ClientError> {
        let terminal = |what: &str| ClientError::TerminalSession(what.to_string());

        let window = web_sys::window().ok_or_else(|| terminal("no window"))?;
        let document = window.document().ok_or_else(|| terminal("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or_else(|| terminal("missing element #gameCanvas"))?
            .dyn_into()
            .map_err(|_| terminal("#gameCanvas is not a canvas"))?;
        let ui = DomSurface::new(document.clone())?;

        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| ClientError::TerminalSession(e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| ClientError::TerminalSession(e.to_string()))?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let renderer = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| ClientError::TerminalSession(e.to_string()))?;

        let store = LocalStore::new();
        let audio = AudioManager::new(&Settings::load(&store));
        let game: Shared = Rc::new(RefCell::new(BrowserGame::new(ui, store, renderer, audio)));

        setup_keyboard(game.clone());
        setup_buttons(&document, game.clone());
        setup_blur(game.clone());

        Ok(game)
    }

    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        let Some(el) = document.get_element_by_id(id) else {
            log::warn!("No #{id} button on the page");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn start(game: &Shared) {
        let seed = now_ms() as u64;
        if game.borrow_mut().start_session(seed) {
            request_animation_frame(game.clone());
        }
    }

    fn setup_buttons(document: &Document, game: Shared) {
        for id in ["startButton", "restartButton"] {
            let game = game.clone();
            on_click(document, id, move || start(&game));
        }

        {
            let game = game.clone();
            on_click(document, "leaderboardButton", move || {
                let game = game.clone();
                spawn_local(async move {
                    let (service, local) = {
                        let g = game.borrow();
                        (HttpScoreService::new(&g.settings.api_base), g.local_scores.clone())
                    };
                    let view = session::leaderboard_view(&service, &local).await;
                    game.borrow_mut().show_leaderboard(&view);
                    refresh_prize_pool(game);
                });
            });
        }

        {
            let game = game.clone();
            on_click(document, "closeLeaderboard", move || {
                game.borrow_mut().hide_leaderboard();
            });
        }

        {
            let game = game.clone();
            on_click(document, "connectWallet", move || {
                let game = game.clone();
                spawn_local(async move {
                    let chain = game.borrow().settings.chain.clone();
                    let result = async {
                        let accounts = InjectedWallet.request_accounts().await?;
                        let account = accounts
                            .into_iter()
                            .next()
                            .ok_or_else(|| ClientError::external("wallet", "no account authorised"))?;
                        InjectedWallet.switch_network(&chain).await?;
                        game.borrow_mut().connect_wallet(&account)
                    }
                    .await;
                    match result {
                        Ok(()) => flush_pending(game.clone()),
                        Err(e) => {
                            log::warn!("Wallet connect failed: {e}");
                            game.borrow_mut().show_error(&e);
                        }
                    }
                });
            });
        }

        on_click(document, "buyLives", move || {
            let game = game.clone();
            spawn_local(async move {
                let (account, chain, lives) = {
                    let g = game.borrow();
                    (
                        g.wallet_address().map(str::to_string),
                        g.settings.chain.clone(),
                        g.stored_lives(),
                    )
                };
                let Some(account) = account else {
                    game.borrow_mut()
                        .show_error(&ClientError::external("wallet", "connect a wallet first"));
                    return;
                };
                let mut store = LocalStore::new();
                match wallet::purchase_lives(&InjectedWallet, &chain, &account, lives, &mut store).await {
                    Ok(lives) => {
                        game.borrow_mut().on_lives_changed(lives);
                        refresh_prize_pool(game.clone());
                    }
                    Err(e) => {
                        log::warn!("Purchase failed: {e}");
                        game.borrow_mut().show_error(&e);
                    }
                }
            });
        });
    }

    fn setup_keyboard(game: Shared) {
        let window = match web_sys::window() {
            Some(w) => w,
            None => return,
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::from_code(&event.code()) else {
                    return;
                };
                // Keep Space and arrows from scrolling the page
                event.prevent_default();

                let mut g = game.borrow_mut();
                if key == Key::Fire && g.phase() == GamePhase::LifeLost {
                    if g.acknowledge_life_lost() {
                        drop(g);
                        request_animation_frame(game.clone());
                    }
                    return;
                }
                g.input.key_down(key);
                if key == Key::Mute && g.phase() != GamePhase::Playing {
                    // The loop is not running to pick it up
                    g.step(now_ms());
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if let Some(key) = Key::from_code(&event.code()) {
                game.borrow_mut().input.key_up(key);
            }
        });
        let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Drop held keys when the window loses focus so the ship doesn't drift
    fn setup_blur(game: Shared) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().input.clear();
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn submit(game: Shared, submission: ScoreSubmission) {
        spawn_local(async move {
            let (service, policy) = {
                let g = game.borrow();
                (HttpScoreService::new(&g.settings.api_base), g.settings.submit_retry)
            };
            let result =
                session::submit_final_score(&service, &TimeoutDelay, policy, &submission).await;
            game.borrow_mut()
                .on_submission_result(&submission, result, now_ms());
        });
    }

    /// Read the merchant balance and show the pool; needs an injected wallet
    fn refresh_prize_pool(game: Shared) {
        spawn_local(async move {
            let chain = game.borrow().settings.chain.clone();
            match PrizePool::fetch(&InjectedWallet, &chain).await {
                Ok(pool) => game.borrow_mut().on_prize_pool(&pool),
                Err(e) => log::debug!("Prize pool unavailable: {e}"),
            }
        });
    }

    fn flush_pending(game: Shared) {
        let pending = game.borrow().pending_scores();
        if pending.is_empty() {
            return;
        }
        log::info!("Resubmitting {} pending scores", pending.len());
        spawn_local(async move {
            let (service, policy) = {
                let g = game.borrow();
                (HttpScoreService::new(&g.settings.api_base), g.settings.submit_retry)
            };
            let remaining = session::flush_pending(&service, &TimeoutDelay, policy, pending).await;
            game.borrow_mut().on_pending_flushed(&remaining);
        });
    }

    fn request_animation_frame(game: Shared) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Shared) {
        let (keep_running, submission) = {
            let mut g = game.borrow_mut();
            let keep_running = g.step(now_ms());
            (keep_running, g.take_submission())
        };

        if let Some(submission) = submission {
            submit(game.clone(), submission);
        }
        if keep_running {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use hefe_invaders::audio::Silence;
    use hefe_invaders::consts::PLAYFIELD_WIDTH;
    use hefe_invaders::platform::{Key, MemoryStore};
    use hefe_invaders::renderer::NullRenderer;
    use hefe_invaders::ui::LogSurface;

    env_logger::init();
    log::info!("Hefe Invaders (headless) starting...");

    let mut game = hefe_invaders::Game::new(
        LogSurface,
        MemoryStore::new(),
        NullRenderer::default(),
        Silence,
    );
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);
    if !game.start_session(seed) {
        return;
    }

    // Autopilot: chase the lowest live enemy and hold fire
    game.input.key_down(Key::Fire);
    let mut now = 0.0;
    for _ in 0..20_000 {
        let target = game
            .state
            .wave
            .enemies
            .iter()
            .filter(|e| e.alive)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|e| e.pos.x + e.size.x / 2.0)
            .unwrap_or(PLAYFIELD_WIDTH / 2.0);
        let ship = game.state.player.center_x();
        let (toward, away) = if target < ship {
            (Key::Left, Key::Right)
        } else {
            (Key::Right, Key::Left)
        };
        game.input.key_up(away);
        if (target - ship).abs() > game.state.player.speed {
            game.input.key_down(toward);
        } else {
            game.input.key_up(toward);
        }

        now += 1000.0 / 60.0;
        if !game.step(now) {
            if !game.acknowledge_life_lost() {
                break;
            }
            game.input.key_down(Key::Fire);
        }
    }

    log::info!(
        "Run over: score {} on wave {} after {} frames",
        game.state.score,
        game.state.wave_number(),
        game.state.frame
    );
    let view = game.local_leaderboard();
    game.show_leaderboard(&view);
}
