use std::path::PathBuf;

use log::{error, info, warn};
use macroquad::prelude::*;

mod reporting;
mod ui;

use emberfx::effects;
use emberfx::renderer::{self, MacroquadSurface};
use emberfx::timing::ManualClock;
use emberfx::{ConfigPatch, EffectOptions, EngineConfig, EngineError, ParticleSystem, RecordingSurface};
use reporting::SoakRecorder;
use ui::UiState;

const DEFAULT_EFFECT: &str = "burst";
/// Simulated frame length for headless runs.
const HEADLESS_FRAME_MS: f64 = 1000.0 / 60.0;
/// Headless runs trigger the next effect every this many frames.
const HEADLESS_TRIGGER_EVERY: u64 = 12;
const HEADLESS_SEED: u64 = 7;

fn window_conf() -> Conf {
    Conf {
        window_title: "emberfx".to_string(),
        window_width: emberfx::config::DEFAULT_WIDTH as i32,
        window_height: emberfx::config::DEFAULT_HEIGHT as i32,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    config: Option<PathBuf>,
    effect: Option<String>,
    headless_frames: Option<u64>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| args.next().ok_or_else(|| format!("{flag} needs a value"));
        match arg.as_str() {
            "--config" => options.config = Some(PathBuf::from(value("--config")?)),
            "--effect" => options.effect = Some(value("--effect")?),
            "--headless" => {
                let raw = value("--headless")?;
                let frames = raw
                    .parse()
                    .map_err(|_| format!("--headless expects a frame count, got {raw:?}"))?;
                options.headless_frames = Some(frames);
            }
            other => return Err(format!("unknown argument {other:?}")),
        }
    }
    Ok(options)
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig, EngineError> {
    let mut config = EngineConfig::default();
    if let Some(path) = path {
        let patch = ConfigPatch::load(path)?;
        config.apply(&patch)?;
        info!("loaded config from {}", path.display());
    }
    Ok(config)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("emberfx: {e}");
            eprintln!("usage: emberfx [--config <file.json>] [--effect <name>] [--headless <frames>]");
            std::process::exit(2);
        }
    };
    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            error!("config: {e}");
            std::process::exit(1);
        }
    };

    if let Some(frames) = cli.headless_frames {
        match run_headless(config, frames) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("headless run failed: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let effect = cli.effect.unwrap_or_else(|| DEFAULT_EFFECT.to_string());
    macroquad::Window::from_config(window_conf(), run_interactive(config, effect));
}

async fn run_interactive(config: EngineConfig, effect: String) {
    let mut system = match ParticleSystem::new(MacroquadSurface::new(), config) {
        Ok(system) => system,
        Err(e) => {
            error!("cannot start: {e}");
            return;
        }
    };
    system.register_effects(effects::builtin());
    if !system.set_current_effect(&effect) {
        system.set_current_effect(DEFAULT_EFFECT);
    }
    system.enable_click_trigger();
    system.start();

    let mut ui_state = UiState::default();

    loop {
        if let Some((w, h)) = system.context().sync_window_size() {
            if let Err(e) = system.update_config(&ConfigPatch::size(w, h)) {
                warn!("ignoring window resize: {e}");
            }
        }

        if let Some(event) = renderer::poll_pointer(ui::wants_pointer()) {
            system.handle_pointer(event);
        }

        if is_key_pressed(KeyCode::Space) {
            if system.is_running() {
                system.stop();
            } else {
                system.start();
            }
        }
        if is_key_pressed(KeyCode::C) {
            system.clear();
        }
        if is_key_pressed(KeyCode::Tab) {
            select_next_effect(&mut system);
        }

        // macroquad does not keep the previous frame, so a stopped engine
        // repaints its frozen state.
        if !system.pump() {
            system.redraw();
        }

        ui::draw_ui(&mut system, &mut ui_state);

        next_frame().await;
    }
}

fn select_next_effect<S: emberfx::Surface>(system: &mut ParticleSystem<S>) {
    let next = {
        let names = system.effect_names();
        let current = system.current_effect_name();
        let index = current
            .and_then(|c| names.iter().position(|n| *n == c))
            .map_or(0, |i| (i + 1) % names.len().max(1));
        names.get(index).map(|n| n.to_string())
    };
    if let Some(name) = next {
        system.set_current_effect(&name);
    }
}

/// Drive the engine without a window and summarise what it drew.
fn run_headless(config: EngineConfig, frames: u64) -> Result<String, EngineError> {
    let clock = ManualClock::new();
    let mut config = config;
    if config.seed.is_none() {
        config.seed = Some(HEADLESS_SEED);
    }
    let surface = RecordingSurface::new(config.width, config.height);
    let mut system = ParticleSystem::with_clock(surface, config, Box::new(clock.clone()))?;
    system.register_effects(effects::builtin());
    let names: Vec<String> = system.effect_names().into_iter().map(str::to_string).collect();

    let mut recorder = SoakRecorder::new();
    let options = EffectOptions::new();
    system.start();
    for frame in 0..frames {
        if frame % HEADLESS_TRIGGER_EVERY == 0 && !names.is_empty() {
            let turn = (frame / HEADLESS_TRIGGER_EVERY) as usize;
            let name = &names[turn % names.len()];
            let (w, h) = (system.config().width, system.config().height);
            // Walk the trigger point around the surface.
            let x = w * (0.2 + 0.6 * ((turn * 37) % 100) as f32 / 100.0);
            let y = h * (0.2 + 0.6 * ((turn * 61) % 100) as f32 / 100.0);
            let spawned = system.trigger(name, x, y, &options);
            recorder.record_trigger(name, spawned);
        }

        clock.advance(HEADLESS_FRAME_MS);
        system.pump();
        recorder.record_frame(system.particle_count(), system.canvas().commands());
    }
    system.stop();

    let report = recorder.finish(system.particle_count());
    info!(
        "headless run: {} frames, {} triggers, {} particles left",
        report.frames, report.triggers, report.final_particles
    );
    Ok(serde_json::to_string_pretty(&report)?)
}
