//! DOM-backed HUD

use web_sys::{Document, Element};

use super::{BannerKind, Overlay, UiSurface};
use crate::error::ClientError;
use crate::leaderboard::LeaderboardView;
use crate::leaderboard::view::EMPTY_PLACEHOLDER;

/// HUD elements, looked up once when the page loads
pub struct DomSurface {
    document: Document,
    current_score: Element,
    high_score: Element,
    lives: Element,
    wave: Element,
    start_screen: Element,
    game_over_screen: Element,
    final_score: Element,
    leaderboard_scores: Element,
    leaderboard_modal: Element,
    /// Optional: pages without a prompt resume on the next key press
    life_lost_screen: Option<Element>,
    status: Option<Element>,
    prize_total: Option<Element>,
    prize_places: [Option<Element>; 3],
}

fn required(document: &Document, id: &str) -> Result<Element, ClientError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| ClientError::TerminalSession(format!("missing element #{id}")))
}

fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

fn set_hidden(el: &Element, hidden: bool) {
    let _ = el.class_list().toggle_with_force("hidden", hidden);
}

impl DomSurface {
    pub fn new(document: Document) -> Result<Self, ClientError> {
        Ok(Self {
            current_score: required(&document, "currentScore")?,
            high_score: required(&document, "highScore")?,
            lives: required(&document, "livesCount")?,
            wave: required(&document, "waveNumber")?,
            start_screen: required(&document, "startScreen")?,
            game_over_screen: required(&document, "gameOverScreen")?,
            final_score: required(&document, "finalScore")?,
            leaderboard_scores: required(&document, "leaderboardScores")?,
            leaderboard_modal: required(&document, "leaderboardModal")?,
            life_lost_screen: document.get_element_by_id("lifeLostScreen"),
            status: document.get_element_by_id("transactionStatus"),
            prize_total: document.get_element_by_id("totalPrizePool"),
            prize_places: ["firstPlacePrize", "secondPlacePrize", "thirdPlacePrize"]
                .map(|id| document.get_element_by_id(id)),
            document,
        })
    }

    fn overlay_element(&self, overlay: Overlay) -> Option<&Element> {
        match overlay {
            Overlay::Start => Some(&self.start_screen),
            Overlay::LifeLost => self.life_lost_screen.as_ref(),
            Overlay::GameOver => Some(&self.game_over_screen),
            Overlay::Leaderboard => Some(&self.leaderboard_modal),
        }
    }

    fn leaderboard_row(&self, rank: &str, name: &str, score: u64) -> Option<Element> {
        let row = self.document.create_element("div").ok()?;
        row.set_class_name("leaderboard-row");
        for (class, text) in [("rank", rank), ("player", name)] {
            let cell = self.document.create_element("span").ok()?;
            cell.set_class_name(class);
            set_text(&cell, text);
            row.append_child(&cell).ok()?;
        }
        let cell = self.document.create_element("span").ok()?;
        cell.set_class_name("score");
        set_text(&cell, &score.to_string());
        row.append_child(&cell).ok()?;
        Some(row)
    }
}

impl UiSurface for DomSurface {
    fn show_score(&mut self, current: u64, high: u64) {
        set_text(&self.current_score, &current.to_string());
        set_text(&self.high_score, &high.to_string());
    }

    fn show_lives(&mut self, lives: u32) {
        set_text(&self.lives, &lives.to_string());
    }

    fn show_wave(&mut self, wave: u32) {
        set_text(&self.wave, &wave.to_string());
    }

    fn show_overlay(&mut self, overlay: Overlay, visible: bool) {
        if let Some(el) = self.overlay_element(overlay) {
            set_hidden(el, !visible);
        }
    }

    fn show_final_score(&mut self, score: u64) {
        set_text(&self.final_score, &score.to_string());
    }

    fn show_leaderboard(&mut self, view: &LeaderboardView) {
        set_text(&self.leaderboard_scores, "");
        if view.is_empty() {
            set_text(&self.leaderboard_scores, EMPTY_PLACEHOLDER);
            return;
        }
        for row in &view.rows {
            if let Some(el) = self.leaderboard_row(&row.rank_label, &row.name, row.score) {
                let _ = self.leaderboard_scores.append_child(&el);
            }
        }
        let _ = self
            .leaderboard_scores
            .class_list()
            .toggle_with_force("offline", view.offline);
    }

    fn show_prize_pool(&mut self, total: &str, places: &[String; 3]) {
        if let Some(el) = &self.prize_total {
            set_text(el, total);
        }
        for (el, amount) in self.prize_places.iter().zip(places) {
            if let Some(el) = el {
                set_text(el, amount);
            }
        }
    }

    fn show_banner(&mut self, message: &str, kind: BannerKind) {
        let Some(status) = &self.status else {
            log::info!("{message}");
            return;
        };
        set_text(status, message);
        status.set_class_name(&format!("status {}", kind.css_class()));
    }
}
