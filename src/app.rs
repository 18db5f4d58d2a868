//! BhashaLink main window — egui/eframe application.
//!
//! # Architecture
//!
//! [`BhashaLinkApp`] is the top-level [`eframe::App`]. It owns the form
//! inputs and two links to the background pipeline:
//!
//! * `command_tx` — sends [`PipelineCommand`] to the orchestrator.
//! * `state`      — the [`SharedState`] the orchestrator writes; the UI
//!   snapshots it at the start of every frame.
//!
//! # Layout
//!
//! | Row | Content |
//! |-----|---------|
//! | 1 | Title |
//! | 2 | Text input |
//! | 3 | Source / target dropdowns, swap button |
//! | 4 | Original text, translated text |
//! | 5 | Translated speech: play / stop, file path |
//! | 6 | "Translate & Speak", "Clear", status line |

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::audio::{AudioPlayer, PlaybackHandle};
use crate::config::AppConfig;
use crate::lang::{find_by_label, menu_labels, DEFAULT_SOURCE, DEFAULT_TARGET};
use crate::pipeline::{PipelineCommand, PipelineState, SharedState, TranslationRequest};

const TITLE: &str = "BhashaLink: Multilingual Translation + TTS (NLLB-200)";

// ---------------------------------------------------------------------------
// Fonts
// ---------------------------------------------------------------------------

/// Append every readable font in `paths` as a fallback for both families.
///
/// egui's bundled fonts cover Latin only; without a fallback, Indic output
/// renders as empty boxes. Returns how many fonts were installed.
pub fn install_fallback_fonts(ctx: &egui::Context, paths: &[String]) -> usize {
    let mut fonts = egui::FontDefinitions::default();
    let mut installed = 0;

    for path in paths {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(_) => continue,
        };
        let name = format!("fallback-{installed}");
        fonts
            .font_data
            .insert(name.clone(), Arc::new(egui::FontData::from_owned(bytes)));
        for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
            fonts.families.entry(family).or_default().push(name.clone());
        }
        log::debug!("ui: fallback font loaded from {path}");
        installed += 1;
    }

    if installed == 0 {
        log::warn!("ui: no Indic fallback font found; non-Latin text may not render");
    }
    ctx.set_fonts(fonts);
    installed
}

// ---------------------------------------------------------------------------
// Frame snapshot
// ---------------------------------------------------------------------------

/// Copy of the shared state taken once per frame so the lock is never held
/// while drawing.
struct Snapshot {
    pipeline: PipelineState,
    original: String,
    translated: String,
    audio_path: Option<PathBuf>,
    error_message: Option<String>,
    result_generation: u64,
}

// ---------------------------------------------------------------------------
// BhashaLinkApp
// ---------------------------------------------------------------------------

/// eframe application — the single BhashaLink screen.
pub struct BhashaLinkApp {
    // ── Form ─────────────────────────────────────────────────────────────
    input: String,
    source_label: String,
    target_label: String,
    labels: Vec<String>,

    // ── Playback ─────────────────────────────────────────────────────────
    player: AudioPlayer,
    playback: Option<PlaybackHandle>,
    autoplay: bool,
    /// Result generation already seen, to detect fresh audio for autoplay.
    seen_generation: u64,
    /// Last playback error, shown under the speech row.
    playback_error: Option<String>,

    // ── UI state ─────────────────────────────────────────────────────────
    show_details: bool,

    // ── Pipeline ─────────────────────────────────────────────────────────
    command_tx: mpsc::Sender<PipelineCommand>,
    state: SharedState,

    config: AppConfig,
}

impl BhashaLinkApp {
    /// Create a new [`BhashaLinkApp`].
    ///
    /// Dropdown defaults come from `config.ui`; labels that do not name a
    /// catalog language fall back to English → Hindi.
    pub fn new(
        command_tx: mpsc::Sender<PipelineCommand>,
        state: SharedState,
        config: AppConfig,
    ) -> Self {
        let source_label = find_by_label(&config.ui.default_source)
            .unwrap_or(DEFAULT_SOURCE)
            .menu_label();
        let target_label = find_by_label(&config.ui.default_target)
            .unwrap_or(DEFAULT_TARGET)
            .menu_label();

        Self {
            input: String::new(),
            source_label,
            target_label,
            labels: menu_labels(),
            player: AudioPlayer::new().with_volume(config.ui.volume),
            playback: None,
            autoplay: config.ui.autoplay,
            seen_generation: 0,
            playback_error: None,
            show_details: false,
            command_tx,
            state,
            config,
        }
    }

    // ── State access ─────────────────────────────────────────────────────

    fn snapshot(&self) -> Snapshot {
        let st = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Snapshot {
            pipeline: st.pipeline,
            original: st.original.clone().unwrap_or_default(),
            translated: st.translated.clone().unwrap_or_default(),
            audio_path: st.audio_path.clone(),
            error_message: st.error_message.clone(),
            result_generation: st.result_generation,
        }
    }

    fn set_pipeline(&self, pipeline: PipelineState, error: Option<String>) {
        let mut st = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        st.pipeline = pipeline;
        st.error_message = error;
    }

    // ── Actions ──────────────────────────────────────────────────────────

    /// Submit the form. The state flips to `Translating` here so the button
    /// is disabled on the very next frame.
    fn submit(&mut self) {
        self.stop_playback();
        let request = TranslationRequest::new(
            self.input.clone(),
            self.source_label.clone(),
            self.target_label.clone(),
        );

        self.set_pipeline(PipelineState::Translating, None);
        if let Err(e) = self
            .command_tx
            .try_send(PipelineCommand::Translate(request))
        {
            log::error!("ui: could not queue translation: {e}");
            self.set_pipeline(
                PipelineState::Error,
                Some("The translation worker is not running".into()),
            );
        }
    }

    fn clear(&mut self) {
        self.stop_playback();
        self.input.clear();
        self.playback_error = None;
        if let Err(e) = self.command_tx.try_send(PipelineCommand::Clear) {
            log::error!("ui: could not queue clear: {e}");
        }
    }

    fn swap_languages(&mut self) {
        std::mem::swap(&mut self.source_label, &mut self.target_label);
    }

    fn play(&mut self, path: &std::path::Path) {
        self.stop_playback();
        match self.player.play(path) {
            Ok(handle) => {
                self.playback = Some(handle);
                self.playback_error = None;
            }
            Err(e) => {
                log::warn!("ui: playback failed: {e}");
                self.playback_error = Some(e.to_string());
            }
        }
    }

    fn stop_playback(&mut self) {
        if let Some(handle) = self.playback.take() {
            handle.stop();
        }
    }

    fn is_playing(&self) -> bool {
        self.playback.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Autoplay newly produced audio once per result.
    fn check_new_result(&mut self, snap: &Snapshot) {
        if snap.result_generation == self.seen_generation {
            return;
        }
        self.seen_generation = snap.result_generation;
        self.playback_error = None;
        if self.autoplay {
            if let Some(path) = snap.audio_path.clone() {
                self.play(&path);
            }
        }
    }

    // ── Section renderers ────────────────────────────────────────────────

    fn draw_input(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Enter text").strong());
        ui.add(
            egui::TextEdit::multiline(&mut self.input)
                .hint_text("Type your sentence here...")
                .desired_rows(2)
                .desired_width(f32::INFINITY),
        );
    }

    fn draw_language_row(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            egui::ComboBox::from_label("Source Language")
                .selected_text(self.source_label.as_str())
                .show_ui(ui, |ui| {
                    for label in &self.labels {
                        ui.selectable_value(&mut self.source_label, label.clone(), label);
                    }
                });

            if ui
                .button("Swap")
                .on_hover_text("Swap source and target")
                .clicked()
            {
                self.swap_languages();
            }

            egui::ComboBox::from_label("Target Language")
                .selected_text(self.target_label.as_str())
                .show_ui(ui, |ui| {
                    for label in &self.labels {
                        ui.selectable_value(&mut self.target_label, label.clone(), label);
                    }
                });
        });
    }

    fn draw_outputs(&self, ui: &mut egui::Ui, ctx: &egui::Context, snap: &Snapshot) {
        ui.columns(2, |cols| {
            cols[0].label(egui::RichText::new("Original Text").strong());
            cols[0].add(
                egui::TextEdit::multiline(&mut snap.original.as_str())
                    .desired_rows(3)
                    .desired_width(f32::INFINITY),
            );

            cols[1].horizontal(|ui| {
                ui.label(egui::RichText::new("Translated Text").strong());
                if !snap.translated.is_empty() && ui.small_button("Copy").clicked() {
                    ctx.copy_text(snap.translated.clone());
                }
            });
            cols[1].add(
                egui::TextEdit::multiline(&mut snap.translated.as_str())
                    .desired_rows(3)
                    .desired_width(f32::INFINITY),
            );
        });
    }

    fn draw_speech(&mut self, ui: &mut egui::Ui, snap: &Snapshot) {
        ui.label(egui::RichText::new("Translated Speech").strong());
        ui.horizontal(|ui| {
            match &snap.audio_path {
                Some(path) => {
                    if self.is_playing() {
                        if ui.button("Stop").clicked() {
                            self.stop_playback();
                        }
                    } else if ui.button("Play").clicked() {
                        self.play(path);
                    }
                    ui.label(
                        egui::RichText::new(path.display().to_string())
                            .color(egui::Color32::GRAY)
                            .size(11.0),
                    );
                }
                None => {
                    ui.add_enabled(false, egui::Button::new("Play"));
                    ui.label(
                        egui::RichText::new("No audio")
                            .color(egui::Color32::GRAY)
                            .size(11.0),
                    );
                }
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.checkbox(&mut self.autoplay, "Autoplay");
            });
        });

        if let Some(err) = &self.playback_error {
            ui.label(
                egui::RichText::new(err.as_str())
                    .color(egui::Color32::from_rgb(255, 136, 68))
                    .size(11.0),
            );
        }
    }

    fn draw_actions(&mut self, ui: &mut egui::Ui, snap: &Snapshot) {
        let busy = snap.pipeline.is_busy();

        ui.horizontal(|ui| {
            let translate = ui.add_enabled(
                !busy,
                egui::Button::new(egui::RichText::new("Translate & Speak").size(15.0)),
            );
            if translate.clicked() {
                self.submit();
            }
            if ui.add_enabled(!busy, egui::Button::new("Clear")).clicked() {
                self.clear();
            }

            if busy {
                ui.add(egui::Spinner::new());
            }
            ui.label(
                egui::RichText::new(snap.pipeline.label()).color(state_color(snap.pipeline)),
            );
        });

        if snap.pipeline == PipelineState::Error {
            let msg = snap.error_message.as_deref().unwrap_or("Unknown error");
            ui.label(
                egui::RichText::new(msg)
                    .color(state_color(PipelineState::Error))
                    .size(12.0),
            );
        }
    }

    fn draw_details(&self, ui: &mut egui::Ui) {
        let dim = egui::Color32::from_rgb(140, 140, 140);
        let gen = &self.config.translation.generation;
        ui.label(
            egui::RichText::new(format!("Model: {}", self.config.translation.model))
                .color(dim)
                .size(11.0),
        );
        ui.label(
            egui::RichText::new(format!(
                "Beam search: {} beams, max length {}",
                gen.num_beams, gen.max_length
            ))
            .color(dim)
            .size(11.0),
        );
        ui.label(
            egui::RichText::new(format!("Speech: {}", self.config.tts.host()))
                .color(dim)
                .size(11.0),
        );
    }
}

/// Accent colour for each pipeline state.
fn state_color(state: PipelineState) -> egui::Color32 {
    match state {
        PipelineState::Idle => egui::Color32::from_rgb(120, 120, 120),
        PipelineState::Translating | PipelineState::Synthesizing => {
            egui::Color32::from_rgb(68, 136, 255)
        }
        PipelineState::Result => egui::Color32::from_rgb(80, 200, 120),
        PipelineState::Error => egui::Color32::from_rgb(255, 136, 68),
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for BhashaLinkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let snap = self.snapshot();
        self.check_new_result(&snap);

        // The orchestrator writes from another thread; poll while it works.
        if snap.pipeline.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else if self.is_playing() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(TITLE);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("=").on_hover_text("Details").clicked() {
                        self.show_details = !self.show_details;
                    }
                });
            });
            if self.show_details {
                self.draw_details(ui);
            }
            ui.separator();

            self.draw_input(ui);
            ui.add_space(6.0);
            self.draw_language_row(ui);
            ui.add_space(6.0);
            self.draw_outputs(ui, ctx, &snap);
            ui.add_space(6.0);
            self.draw_speech(ui, &snap);
            ui.separator();
            self.draw_actions(ui, &snap);
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.stop_playback();
        log::info!("BhashaLink window closing");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
