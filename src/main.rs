//! Application entry point — BhashaLink.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Sweep speech files left over from earlier sessions.
//! 4. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 5. Build the translator ([`NllbTranslator`]) and speech backend
//!    ([`GoogleTts`]) from config.
//! 6. Spawn the pipeline orchestrator on the tokio runtime.
//! 7. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use bhashalink::{
    app::{install_fallback_fonts, BhashaLinkApp},
    config::{AppConfig, AppPaths},
    pipeline::{new_shared_state, PipelineCommand, PipelineOrchestrator},
    translate::{NllbTranslator, Translator},
    tts::{remove_stale, GoogleTts, SpeechSynthesizer},
};
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let vp = egui::ViewportBuilder::default()
        .with_title("BhashaLink")
        .with_inner_size([width, height])
        .with_min_inner_size([480.0, 400.0]);

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("BhashaLink starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Speech directory
    let speech_dir = AppPaths::new().speech_dir;
    match remove_stale(&speech_dir) {
        Ok(0) => {}
        Ok(n) => log::info!("Removed {n} stale speech file(s) from {}", speech_dir.display()),
        Err(e) => log::warn!("Could not sweep {}: {e}", speech_dir.display()),
    }

    // 4. Tokio runtime (2 worker threads — translation + speech)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(|e| eframe::Error::AppCreation(Box::new(e)))?;

    // 5. Backends
    let nllb = NllbTranslator::from_config(&config.translation);
    log::info!(
        "Loading NLLB-200 translation model {} via {}",
        config.translation.model,
        nllb.endpoint()
    );
    if config.translation.resolved_api_key().is_none() {
        log::warn!("No API key configured and HF_TOKEN is unset; requests may be rate limited");
    }
    let translator: Arc<dyn Translator> = Arc::new(nllb);

    let google = GoogleTts::from_config(&config.tts);
    log::info!("Speech synthesis via {}", google.endpoint());
    let tts: Arc<dyn SpeechSynthesizer> = Arc::new(google);

    // 6. Pipeline
    let state = new_shared_state(config.clone());
    let (command_tx, command_rx) = mpsc::channel::<PipelineCommand>(16);

    let orchestrator =
        PipelineOrchestrator::new(Arc::clone(&state), translator, tts, speech_dir);
    rt.spawn(orchestrator.run(command_rx));

    // 7. Build the egui app and run it (blocks until the window is closed)
    let app = BhashaLinkApp::new(command_tx, state, config.clone());
    let options = native_options(&config);
    let font_paths = config.ui.font_paths.clone();

    let result = eframe::run_native(
        "BhashaLink",
        options,
        Box::new(move |cc| {
            install_fallback_fonts(&cc.egui_ctx, &font_paths);
            Ok(Box::new(app))
        }),
    );

    rt.shutdown_timeout(std::time::Duration::from_secs(1));
    result
}
