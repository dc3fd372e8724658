//! GROTTO entry point
//!
//! Boots logging, loads settings, pre-renders the sound bank and runs the
//! frame loop. The frame clock is clamped before it reaches the app so a
//! suspended tab cannot destabilize anything.

use macroquad::prelude::{get_frame_time, next_frame, Conf};

use grotto::app::{App, MAX_FRAME_STEP};
use grotto::audio::SoundBank;
use grotto::settings::{Settings, SETTINGS_FILE};
use grotto::VERSION;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("GROTTO v{VERSION}"),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("grotto=info")),
        )
        .init();

    let settings = Settings::load_or_default(SETTINGS_FILE);
    let sounds = SoundBank::load(settings.effective_sfx(), settings.effective_music()).await;

    // Wall-clock seed; runs are not meant to be reproducible
    let seed = (macroquad::miniquad::date::now() * 1000.0) as u64;
    tracing::info!(version = VERSION, seed, "starting");

    let mut app = App::new(settings, sounds, seed);
    loop {
        let dt = get_frame_time().min(MAX_FRAME_STEP);
        app.update(dt);
        app.draw();
        next_frame().await;
    }
}
