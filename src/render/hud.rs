//! HUD and screen overlays
//!
//! Resource readout during play, plus the full-screen states: splash,
//! controls, level complete and death. All immediate-mode text and
//! primitives in screen space.

use macroquad::prelude::{
    draw_circle, draw_rectangle, draw_text, measure_text, screen_height, screen_width, Color,
    WHITE,
};

use crate::input::Action;
use crate::leaderboard::ScoreRecord;
use crate::render::sprites;
use crate::sim::Session;

const PANEL: Color = Color::new(0.0, 0.0, 0.0, 0.55);
const LOW_HP: Color = Color::new(1.0, 0.15, 0.15, 1.0);
const DIM: Color = Color::new(0.8, 0.78, 0.7, 1.0);

fn center_text(text: &str, y: f32, size: u16, color: Color) {
    let dims = measure_text(text, None, size, 1.0);
    draw_text(
        text,
        (screen_width() - dims.width) / 2.0,
        y,
        size as f32,
        color,
    );
}

/// In-game readout: health, bombs, ropes, gold, level and time.
pub fn draw_hud(session: &Session, fps: Option<i32>) {
    draw_rectangle(8.0, 8.0, 380.0, 34.0, PANEL);
    let player = &session.player;

    // Hearts
    for i in 0..player.max_hp {
        let color = if i < player.hp {
            if player.hp <= 1 {
                LOW_HP
            } else {
                Color::new(0.95, 0.3, 0.35, 1.0)
            }
        } else {
            Color::new(0.3, 0.25, 0.25, 1.0)
        };
        draw_circle(24.0 + i as f32 * 18.0, 24.0, 7.0, color);
    }

    draw_text(&format!("B {}", player.bombs), 110.0, 31.0, 22.0, WHITE);
    draw_text(&format!("R {}", player.ropes), 165.0, 31.0, 22.0, WHITE);
    draw_text(&format!("$ {}", player.gold), 220.0, 31.0, 22.0, sprites::GOLD);
    draw_text(&session.level_label(), 310.0, 31.0, 22.0, WHITE);
    draw_text(&session.time_label(), 348.0, 31.0, 22.0, DIM);

    if let Some(fps) = fps {
        draw_text(
            &format!("{fps} fps"),
            screen_width() - 80.0,
            24.0,
            20.0,
            DIM,
        );
    }
}

/// Title card shown while the sound bank warms up
pub fn draw_splash(elapsed: f32) {
    let h = screen_height();
    center_text("G R O T T O", h * 0.4, 64, sprites::GOLD);
    center_text("a cave runs deep", h * 0.4 + 40.0, 24, DIM);
    if elapsed % 1.0 < 0.6 {
        center_text("press ENTER", h * 0.7, 24, WHITE);
    }
}

/// Key binding list
pub fn draw_controls() {
    let h = screen_height();
    center_text("CONTROLS", h * 0.18, 42, sprites::GOLD);
    let mut y = h * 0.28;
    for action in Action::ALL {
        let line = format!("{:<12} {}", action.key_hint(), action.label());
        center_text(&line, y, 24, WHITE);
        y += 32.0;
    }
    center_text("press ENTER to descend", y + 24.0, 26, sprites::GOLD);
}

pub fn draw_level_complete(session: &Session) {
    let h = screen_height();
    draw_rectangle(0.0, 0.0, screen_width(), h, PANEL);
    center_text(
        &format!("{} COMPLETED!", session.level_label()),
        h * 0.35,
        48,
        sprites::GOLD,
    );
    center_text(&format!("time  {}", session.time_label()), h * 0.45, 28, WHITE);
    center_text(
        &format!("loot  ${}", session.player.gold),
        h * 0.45 + 34.0,
        28,
        WHITE,
    );
    center_text("press ENTER to continue", h * 0.7, 26, DIM);
}

pub fn draw_death(session: &Session, scores: &[ScoreRecord]) {
    let h = screen_height();
    draw_rectangle(0.0, 0.0, screen_width(), h, PANEL);
    center_text("YOU DIED", h * 0.28, 56, LOW_HP);
    center_text(
        &format!("reached {}   with ${}", session.level_label(), session.player.gold),
        h * 0.38,
        26,
        WHITE,
    );

    if !scores.is_empty() {
        center_text("- best runs -", h * 0.48, 24, sprites::GOLD);
        let mut y = h * 0.48 + 34.0;
        for record in scores {
            center_text(
                &format!("{:<14} ${:<6} {}", record.name, record.gold, record.level),
                y,
                24,
                DIM,
            );
            y += 30.0;
        }
    }

    center_text("press ENTER to try again", h * 0.78, 26, WHITE);
}
