//! HUD and overlay surface
//!
//! The driver pushes display state through `UiSurface`; it never reads it
//! back. The browser implementation writes into DOM elements, the headless
//! one just logs.

#[cfg(target_arch = "wasm32")]
pub mod dom;

use crate::leaderboard::LeaderboardView;

#[cfg(target_arch = "wasm32")]
pub use dom::DomSurface;

/// Full-screen panels layered over the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Start,
    LifeLost,
    GameOver,
    Leaderboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Success,
    Error,
}

impl BannerKind {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Info => "pending",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

pub trait UiSurface {
    fn show_score(&mut self, current: u64, high: u64);
    fn show_lives(&mut self, lives: u32);
    fn show_wave(&mut self, wave: u32);
    fn show_overlay(&mut self, overlay: Overlay, visible: bool);
    fn show_final_score(&mut self, score: u64);
    fn show_leaderboard(&mut self, view: &LeaderboardView);
    /// Prize pool total and the payouts for places 1-3, already formatted
    fn show_prize_pool(&mut self, total: &str, places: &[String; 3]);
    /// Transient status line (purchase progress, submission failures)
    fn show_banner(&mut self, message: &str, kind: BannerKind);
}

/// Surface for headless runs; everything goes to the log
#[derive(Debug, Default)]
pub struct LogSurface;

impl UiSurface for LogSurface {
    fn show_score(&mut self, current: u64, high: u64) {
        log::debug!("score {current} (high {high})");
    }

    fn show_lives(&mut self, lives: u32) {
        log::debug!("lives {lives}");
    }

    fn show_wave(&mut self, wave: u32) {
        log::info!("wave {wave}");
    }

    fn show_overlay(&mut self, overlay: Overlay, visible: bool) {
        log::debug!("{overlay:?} overlay visible={visible}");
    }

    fn show_final_score(&mut self, score: u64) {
        log::info!("final score {score}");
    }

    fn show_leaderboard(&mut self, view: &LeaderboardView) {
        if view.is_empty() {
            log::info!("{}", crate::leaderboard::view::EMPTY_PLACEHOLDER);
        }
        for row in &view.rows {
            log::info!("{} {} {}", row.rank_label, row.name, row.score);
        }
    }

    fn show_prize_pool(&mut self, total: &str, places: &[String; 3]) {
        let [first, second, third] = places;
        log::info!("prize pool {total} ({first} / {second} / {third})");
    }

    fn show_banner(&mut self, message: &str, kind: BannerKind) {
        match kind {
            BannerKind::Error => log::warn!("{message}"),
            _ => log::info!("{message}"),
        }
    }
}
