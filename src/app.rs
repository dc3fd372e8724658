//! Application state and screen flow
//!
//! Fixed set of screens: splash, controls, playing, level complete, death.
//! The app owns the session, the camera, the input poller and the sound
//! bank, advances exactly one simulation frame per rendered frame, and
//! drains the session's sound queue into the bank.

use macroquad::prelude::{clear_background, get_fps, Color};

use crate::audio::SoundBank;
use crate::input::InputState;
use crate::leaderboard::{MockLeaderboard, ScoreRecord, ScoreService, TOP_N};
use crate::render::{self, hud, Camera};
use crate::settings::Settings;
use crate::sim::{Phase, Session};

/// Elapsed time is clamped to this before use, so a stalled tab or a
/// debugger pause cannot feed a huge step into screen timers.
pub const MAX_FRAME_STEP: f32 = 0.05;

/// How long the corpse lies there before the death screen fades in
const DEATH_DELAY: f32 = 0.8;

const MENU_BG: Color = Color::new(0.05, 0.035, 0.02, 1.0);

/// The active screen (fixed set, one state each)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen {
    Splash,
    Controls,
    Playing,
    LevelComplete,
    /// Corpse-on-screen delay before the death screen
    Dying { timer: f32 },
    Dead,
}

pub struct App {
    pub screen: Screen,
    pub session: Session,
    pub camera: Camera,
    pub input: InputState,
    pub settings: Settings,
    pub sounds: SoundBank,
    pub leaderboard: MockLeaderboard,
    /// Top rows shown on the death screen
    top_scores: Vec<ScoreRecord>,
    /// Seconds spent on the current screen
    screen_time: f32,
}

impl App {
    pub fn new(settings: Settings, sounds: SoundBank, seed: u64) -> Self {
        Self {
            screen: Screen::Splash,
            session: Session::new(seed),
            camera: Camera::default(),
            input: InputState::new(),
            settings,
            sounds,
            leaderboard: MockLeaderboard::new(),
            top_scores: Vec::new(),
            screen_time: 0.0,
        }
    }

    /// Advance the app one frame. `dt` drives screen timers only; the
    /// simulation itself steps once per call.
    pub fn update(&mut self, dt: f32) {
        let dt = dt.min(MAX_FRAME_STEP);
        self.screen_time += dt;
        let input = self.input.poll();

        match self.screen {
            Screen::Splash => {
                if input.enter_pressed || input.jump_pressed {
                    self.switch_to(Screen::Controls);
                }
            }
            Screen::Controls => {
                if input.enter_pressed || input.jump_pressed {
                    self.start_playing();
                }
            }
            Screen::Playing => {
                self.session.advance(&input);
                for event in self.session.sounds.drain() {
                    self.sounds.play(event);
                }
                self.camera.follow(self.session.player.body.center());

                match self.session.phase {
                    Phase::LevelComplete => {
                        self.sounds.stop_music();
                        self.switch_to(Screen::LevelComplete);
                    }
                    Phase::Dead => {
                        self.sounds.stop_music();
                        self.submit_score();
                        self.switch_to(Screen::Dying { timer: DEATH_DELAY });
                    }
                    Phase::Playing => {}
                }
            }
            Screen::LevelComplete => {
                if input.enter_pressed {
                    self.session.next_level();
                    self.start_playing();
                }
            }
            Screen::Dying { timer } => {
                let timer = timer - dt;
                if timer <= 0.0 {
                    self.switch_to(Screen::Dead);
                } else {
                    self.screen = Screen::Dying { timer };
                }
            }
            Screen::Dead => {
                if input.enter_pressed {
                    self.session.restart();
                    self.start_playing();
                }
            }
        }
    }

    /// Draw the current screen. Read-only over the session.
    pub fn draw(&self) {
        match self.screen {
            Screen::Splash => {
                clear_background(MENU_BG);
                hud::draw_splash(self.screen_time);
            }
            Screen::Controls => {
                clear_background(MENU_BG);
                hud::draw_controls();
            }
            Screen::Playing | Screen::Dying { .. } => {
                render::draw_session(&self.session, self.camera.pos);
                hud::draw_hud(&self.session, self.fps_readout());
            }
            Screen::LevelComplete => {
                render::draw_session(&self.session, self.camera.pos);
                hud::draw_level_complete(&self.session);
            }
            Screen::Dead => {
                render::draw_session(&self.session, self.camera.pos);
                hud::draw_death(&self.session, &self.top_scores);
            }
        }
    }

    fn start_playing(&mut self) {
        self.camera.snap_to(self.session.player.body.center());
        self.sounds.start_music();
        self.switch_to(Screen::Playing);
    }

    fn switch_to(&mut self, screen: Screen) {
        self.screen = screen;
        self.screen_time = 0.0;
    }

    fn fps_readout(&self) -> Option<i32> {
        self.settings.show_fps.then(get_fps)
    }

    /// Push the finished run at the leaderboard and cache the top rows
    /// for the death screen. Failures only cost the readout.
    fn submit_score(&mut self) {
        let record = ScoreRecord {
            name: self.settings.player_name.clone(),
            gold: self.session.player.gold,
            level: self.session.level_label(),
        };
        if let Err(err) = self.leaderboard.submit(record) {
            tracing::warn!(%err, "score submission failed");
        }
        self.top_scores = match self.leaderboard.top(TOP_N) {
            Ok(rows) => rows,
            Err(err) => {
                tracing::warn!(%err, "leaderboard fetch failed");
                Vec::new()
            }
        };
    }
}
