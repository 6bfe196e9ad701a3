//! The particle engine: live particles, the effect registry and the frame loop.
//!
//! All state is owned by one `ParticleSystem` and touched from a single
//! thread: the host's frame callback (`pump`/`step`) and the synchronous
//! calls it makes between frames. There is no locking; wrap the engine in a
//! lock yourself if it must be shared across threads.

use std::collections::HashMap;

use log::{debug, info, trace, warn};
use macroquad::prelude::{vec2, Color};

use crate::config::{self, Background, ConfigPatch, EngineConfig};
use crate::effect::{Effect, EffectOptions};
use crate::error::EngineError;
use crate::input::{ClickBinding, PointerEvent};
use crate::lifecycle;
use crate::particle::{Particle, ParticleId};
use crate::random::{self, EffectRng};
use crate::stats::FrameStats;
use crate::surface::Surface;
use crate::timing::{Clock, FrameTiming, SystemClock};

const HUD_TEXT: Color = Color::new(0.7, 0.75, 0.8, 1.0);
const HUD_SHADOW: Color = Color::new(0.0, 0.0, 0.0, 0.5);

/// Identifies the one pending frame callback while the loop runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

pub struct ParticleSystem<S: Surface> {
    surface: S,
    config: EngineConfig,
    particles: Vec<Particle>,
    effects: HashMap<String, Box<dyn Effect>>,
    selected: Option<String>,
    next_particle_id: u64,
    rng: EffectRng,
    running: bool,
    scheduled: Option<FrameHandle>,
    next_handle: u64,
    clock: Box<dyn Clock>,
    timing: FrameTiming,
    stats: FrameStats,
    click: Option<ClickBinding>,
}

impl<S: Surface> ParticleSystem<S> {
    /// Bind an engine to `surface`. Fails if the surface cannot provide a 2D
    /// context or the config is invalid.
    pub fn new(surface: S, settings: EngineConfig) -> Result<Self, EngineError> {
        Self::with_clock(surface, settings, Box::new(SystemClock::new()))
    }

    pub fn with_clock(
        mut surface: S,
        settings: EngineConfig,
        clock: Box<dyn Clock>,
    ) -> Result<Self, EngineError> {
        surface.acquire()?;
        settings.validate()?;

        surface.resize(settings.width, settings.height);
        let mut timing = FrameTiming::default();
        timing.reset(clock.now_ms());
        info!(
            "particle system ready ({}x{}, time scale {})",
            settings.width, settings.height, settings.time_scale
        );

        Ok(Self {
            surface,
            rng: random::seeded(settings.seed),
            config: settings,
            particles: Vec::new(),
            effects: HashMap::new(),
            selected: None,
            next_particle_id: 0,
            running: false,
            scheduled: None,
            next_handle: 0,
            clock,
            timing,
            stats: FrameStats::new(config::FRAME_HISTORY),
            click: None,
        })
    }

    // Registry

    /// Insert `effect` under its name, replacing any previous registration.
    pub fn register_effect(&mut self, effect: Box<dyn Effect>) {
        let name = effect.name().to_string();
        if self.effects.insert(name.clone(), effect).is_some() {
            debug!("effect {name:?} re-registered; previous definition replaced");
        } else {
            debug!("effect {name:?} registered");
        }
    }

    /// Register in order; later duplicates win.
    pub fn register_effects(&mut self, effects: impl IntoIterator<Item = Box<dyn Effect>>) {
        for effect in effects {
            self.register_effect(effect);
        }
    }

    /// Registered names, sorted.
    pub fn effect_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.effects.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn effect(&self, name: &str) -> Option<&dyn Effect> {
        self.effects.get(name).map(|e| e.as_ref())
    }

    /// Select `name` for `trigger_current`. Unknown names are ignored.
    pub fn set_current_effect(&mut self, name: &str) -> bool {
        if !self.effects.contains_key(name) {
            warn!("cannot select unknown effect {name:?}");
            return false;
        }
        debug!("current effect set to {name:?}");
        self.selected = Some(name.to_string());
        true
    }

    pub fn current_effect_name(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    // Spawning

    /// Spawn the particles of effect `name` at `(x, y)`. Returns how many
    /// were created; an unknown name creates none.
    pub fn trigger(&mut self, name: &str, x: f32, y: f32, options: &EffectOptions) -> usize {
        let Some(effect) = self.effects.get(name) else {
            warn!("trigger ignored: no effect named {name:?}");
            return 0;
        };

        let spawned = effect.create(x, y, options, &mut self.rng);
        let count = spawned.len();
        self.particles.reserve(count);
        for mut particle in spawned {
            particle.id = Some(ParticleId(self.next_particle_id));
            self.next_particle_id += 1;
            particle.owner = name.to_string();
            self.particles.push(particle);
        }
        self.stats.note_spawned(count);
        trace!("{name}: spawned {count} at ({x:.0}, {y:.0})");
        count
    }

    /// `trigger` with the selected effect; no-op when nothing is selected.
    pub fn trigger_current(&mut self, x: f32, y: f32, options: &EffectOptions) -> usize {
        match self.selected.clone() {
            Some(name) => self.trigger(&name, x, y, options),
            None => {
                debug!("trigger_current ignored: no effect selected");
                0
            }
        }
    }

    /// Drop every particle and clear the surface now, running or not.
    pub fn clear(&mut self) {
        let dropped = self.particles.len();
        self.particles.clear();
        self.surface.clear(self.config.background);
        info!("cleared {dropped} particles");
    }

    // Pointer binding

    pub fn enable_click_trigger(&mut self) {
        if self.click.is_some() {
            return;
        }
        self.click = Some(self.click_bounds());
        debug!("click trigger enabled");
    }

    pub fn disable_click_trigger(&mut self) {
        if self.click.take().is_some() {
            debug!("click trigger disabled");
        }
    }

    pub fn click_trigger_enabled(&self) -> bool {
        self.click.is_some()
    }

    /// Route host pointer input. A click inside the surface triggers the
    /// current effect at the surface-relative position.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> usize {
        let Some(binding) = self.click else {
            return 0;
        };
        match event {
            PointerEvent::Click(screen) => match binding.translate(screen) {
                Some(local) => self.trigger_current(local.x, local.y, &EffectOptions::default()),
                None => 0,
            },
        }
    }

    fn click_bounds(&self) -> ClickBinding {
        ClickBinding::new(
            self.surface.origin(),
            vec2(self.surface.width(), self.surface.height()),
        )
    }

    // Frame loop

    /// `stopped -> running`; schedules the first frame. No-op while running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.timing.reset(self.clock.now_ms());
        self.scheduled = Some(self.schedule());
        info!("frame loop started");
    }

    /// `running -> stopped`; cancels the pending frame. No-op while stopped.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.scheduled = None;
        info!("frame loop stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The pending frame callback, if any.
    pub fn loop_handle(&self) -> Option<FrameHandle> {
        self.scheduled
    }

    /// Host hook, called once per display refresh. Runs the pending frame if
    /// one is scheduled and reschedules while the loop is still running.
    pub fn pump(&mut self) -> bool {
        let Some(handle) = self.scheduled.take() else {
            return false;
        };
        trace!("frame callback {handle:?}");
        self.step();
        if self.running {
            self.scheduled = Some(self.schedule());
        }
        true
    }

    fn schedule(&mut self) -> FrameHandle {
        self.next_handle += 1;
        FrameHandle(self.next_handle)
    }

    /// Run exactly one frame: clear, update every particle, draw the
    /// survivors, then the optional overlay.
    pub fn step(&mut self) {
        let now = self.clock.now_ms();
        self.timing.begin_frame(now);

        self.surface.clear(self.config.background);
        self.update_particles();
        self.draw_particles();
        self.draw_overlay();

        let end = self.clock.now_ms();
        self.timing.end_frame(end);
        self.stats
            .record(self.timing.last_frame_duration_ms(), self.particles.len());
        trace!("frame {}: {} particles", self.timing.total_frames(), self.particles.len());
    }

    /// Repaint the current particles without advancing them or counting a
    /// frame. For hosts whose surface does not retain the previous frame.
    pub fn redraw(&mut self) {
        self.surface.clear(self.config.background);
        self.draw_particles();
        self.draw_overlay();
    }

    fn update_particles(&mut self) {
        let frame_delta = self.config.frame_delta();
        let effects = &self.effects;
        let live = std::mem::take(&mut self.particles);
        self.particles = live
            .into_iter()
            .filter_map(|particle| match effects.get(&particle.owner) {
                Some(effect) => effect.update(particle, frame_delta),
                None => lifecycle::orphan_update(particle, frame_delta),
            })
            .collect();
    }

    fn draw_particles(&mut self) {
        let surface: &mut dyn Surface = &mut self.surface;
        for particle in &self.particles {
            if let Some(effect) = self.effects.get(&particle.owner) {
                effect.draw(surface, particle);
            }
        }
    }

    fn draw_overlay(&mut self) {
        let mut lines = Vec::with_capacity(2);
        if self.config.show_fps {
            lines.push(format!("FPS: {}", self.timing.fps()));
        }
        if self.config.show_particle_count {
            lines.push(format!("Particles: {}", self.particles.len()));
        }

        let mut y = config::HUD_MARGIN + config::HUD_LINE_HEIGHT;
        for line in &lines {
            let x = config::HUD_MARGIN;
            self.surface
                .text(line, vec2(x + 1.0, y + 1.0), config::HUD_FONT_SIZE, HUD_SHADOW);
            self.surface.text(line, vec2(x, y), config::HUD_FONT_SIZE, HUD_TEXT);
            y += config::HUD_LINE_HEIGHT;
        }
    }

    // Configuration & accessors

    /// Merge `patch` into the config. Width/height changes resize the
    /// surface immediately; a new time scale applies from the next frame.
    pub fn update_config(&mut self, patch: &ConfigPatch) -> Result<(), EngineError> {
        let resized = self.config.apply(patch)?;
        if resized {
            self.surface.resize(self.config.width, self.config.height);
            if let Some(binding) = self.click.as_mut() {
                binding.update_bounds(
                    self.surface.origin(),
                    vec2(self.surface.width(), self.surface.height()),
                );
            }
            info!("surface resized to {}x{}", self.config.width, self.config.height);
        }
        if let Some(seed) = patch.seed {
            self.rng = random::seeded(Some(seed));
        }
        Ok(())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn background(&self) -> Background {
        self.config.background
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// The drawing context effects render onto.
    pub fn context(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn canvas(&self) -> &S {
        &self.surface
    }

    pub fn fps(&self) -> u32 {
        self.timing.fps()
    }

    pub fn frame_count(&self) -> u64 {
        self.timing.total_frames()
    }

    pub fn frame_stats(&self) -> &FrameStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectConfig;
    use crate::surface::{DrawCommand, RecordingSurface};
    use crate::timing::ManualClock;
    use macroquad::prelude::{Vec2, WHITE};

    /// Lives exactly `max_progress` updates: +1 progress per call.
    struct Ping {
        config: EffectConfig,
        count: usize,
        max_progress: f32,
    }

    impl Ping {
        fn named(name: &str) -> Self {
            Self {
                config: EffectConfig::new(name, "test effect", &[WHITE]),
                count: 1,
                max_progress: 10.0,
            }
        }

        fn boxed(name: &str) -> Box<dyn Effect> {
            Box::new(Self::named(name))
        }
    }

    #[derive(Debug, PartialEq)]
    struct Velocity(Vec2);

    impl Effect for Ping {
        fn config(&self) -> &EffectConfig {
            &self.config
        }

        fn create(&self, x: f32, y: f32, _options: &EffectOptions, _rng: &mut EffectRng) -> Vec<Particle> {
            (0..self.count)
                .map(|i| {
                    Particle::new(x, y, self.max_progress)
                        .with_extra(Velocity(vec2(i as f32, 2.0)))
                })
                .collect()
        }

        fn update(&self, mut particle: Particle, _frame_delta: f32) -> Option<Particle> {
            particle.progress += 1.0;
            (particle.progress < particle.max_progress).then_some(particle)
        }

        fn draw(&self, surface: &mut dyn Surface, particle: &Particle) {
            surface.circle(vec2(particle.x, particle.progress), 1.0, WHITE);
        }
    }

    fn engine() -> ParticleSystem<RecordingSurface> {
        engine_with(EngineConfig::default(), ManualClock::new())
    }

    fn engine_with(config: EngineConfig, clock: ManualClock) -> ParticleSystem<RecordingSurface> {
        ParticleSystem::with_clock(RecordingSurface::new(1.0, 1.0), config, Box::new(clock)).unwrap()
    }

    fn circles(engine: &ParticleSystem<RecordingSurface>) -> Vec<Vec2> {
        engine
            .canvas()
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Circle { center, .. } => Some(*center),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn ping_dies_after_ten_frames() {
        let mut engine = engine();
        engine.register_effect(Ping::boxed("ping"));
        engine.trigger("ping", 5.0, 5.0, &EffectOptions::new());
        assert_eq!(engine.particle_count(), 1);

        for _ in 0..9 {
            engine.step();
            assert_eq!(engine.particle_count(), 1);
        }
        engine.step();
        assert_eq!(engine.particle_count(), 0);
    }

    #[test]
    fn construction_sizes_surface_and_update_config_resizes() {
        let config = EngineConfig {
            width: 100.0,
            height: 50.0,
            ..Default::default()
        };
        let mut engine = engine_with(config, ManualClock::new());
        assert_eq!(engine.canvas().width(), 100.0);
        assert_eq!(engine.canvas().height(), 50.0);

        engine.update_config(&ConfigPatch::default().width(200.0)).unwrap();
        assert_eq!(engine.canvas().width(), 200.0);
        assert_eq!(engine.canvas().height(), 50.0);
        assert_eq!(engine.config().width, 200.0);
    }

    #[test]
    fn selecting_unknown_effect_keeps_previous_selection() {
        let mut engine = engine();
        engine.register_effects([Ping::boxed("a"), Ping::boxed("b")]);
        assert!(engine.set_current_effect("a"));
        assert_eq!(engine.current_effect_name(), Some("a"));

        assert!(!engine.set_current_effect("missing"));
        assert_eq!(engine.current_effect_name(), Some("a"));
    }

    #[test]
    fn trigger_stamps_unique_ids_and_owner_but_keeps_payload() {
        let mut engine = engine();
        let mut effect = Ping::named("thatEffect");
        effect.count = 4;
        engine.register_effect(Box::new(effect));

        assert_eq!(engine.trigger("thatEffect", 1.0, 2.0, &EffectOptions::new()), 4);
        let mut ids = Vec::new();
        for (i, p) in engine.particles().iter().enumerate() {
            assert_eq!(p.owner, "thatEffect");
            assert_eq!(p.extra::<Velocity>(), Some(&Velocity(vec2(i as f32, 2.0))));
            ids.push(p.id.expect("engine stamps ids"));
        }
        engine.trigger("thatEffect", 1.0, 2.0, &EffectOptions::new());
        ids.extend(engine.particles()[4..].iter().filter_map(|p| p.id));
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn registering_same_name_twice_keeps_one_entry() {
        let mut engine = engine();
        engine.register_effect(Ping::boxed("ping"));
        let mut replacement = Ping::named("ping");
        replacement.count = 3;
        engine.register_effect(Box::new(replacement));
        engine.register_effect(Ping::boxed("pong"));

        assert_eq!(engine.effect_names(), vec!["ping", "pong"]);
        assert_eq!(engine.trigger("ping", 0.0, 0.0, &EffectOptions::new()), 3);
        assert!(engine.effect("pong").is_some());
        assert!(engine.effect("pang").is_none());
    }

    #[test]
    fn triggering_unknown_effect_is_a_no_op() {
        let mut engine = engine();
        engine.register_effect(Ping::boxed("ping"));
        engine.trigger("ping", 0.0, 0.0, &EffectOptions::new());

        assert_eq!(engine.trigger("doesNotExist", 0.0, 0.0, &EffectOptions::new()), 0);
        assert_eq!(engine.particle_count(), 1);
    }

    #[test]
    fn trigger_current_without_selection_does_nothing() {
        let mut engine = engine();
        engine.register_effect(Ping::boxed("ping"));
        assert_eq!(engine.trigger_current(0.0, 0.0, &EffectOptions::new()), 0);

        engine.set_current_effect("ping");
        assert_eq!(engine.trigger_current(0.0, 0.0, &EffectOptions::new()), 1);
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut engine = engine();
        assert!(!engine.pump());

        engine.start();
        let handle = engine.loop_handle();
        assert!(handle.is_some());
        engine.start();
        assert_eq!(engine.loop_handle(), handle);

        assert!(engine.pump());
        assert_eq!(engine.frame_count(), 1);
        assert!(engine.loop_handle().is_some());
        assert_ne!(engine.loop_handle(), handle);

        engine.stop();
        engine.stop();
        assert!(!engine.is_running());
        assert!(engine.loop_handle().is_none());
        assert!(!engine.pump());
        assert_eq!(engine.frame_count(), 1);
    }

    #[test]
    fn restarted_loop_runs_one_frame_per_pump() {
        let mut engine = engine();
        engine.start();
        engine.stop();
        engine.start();
        engine.start();
        for _ in 0..5 {
            assert!(engine.pump());
        }
        assert_eq!(engine.frame_count(), 5);
    }

    #[test]
    fn clear_empties_particles_and_shows_background() {
        let background = Background::Solid(Color::new(0.1, 0.2, 0.3, 1.0));
        let config = EngineConfig {
            background,
            ..Default::default()
        };
        let mut engine = engine_with(config, ManualClock::new());
        engine.register_effect(Ping::boxed("ping"));
        for _ in 0..3 {
            engine.trigger("ping", 0.0, 0.0, &EffectOptions::new());
        }
        engine.step();
        assert!(engine.canvas().primitive_count() > 0);

        engine.clear();
        assert_eq!(engine.particle_count(), 0);
        assert_eq!(engine.canvas().primitive_count(), 0);
        assert_eq!(engine.canvas().last_clear(), Some(background));

        engine.clear();
        assert_eq!(engine.particle_count(), 0);
    }

    #[test]
    fn drawn_particles_reflect_this_frames_update() {
        let mut engine = engine();
        engine.register_effect(Ping::boxed("ping"));
        engine.trigger("ping", 7.0, 0.0, &EffectOptions::new());

        engine.step();
        assert_eq!(circles(&engine), vec![vec2(7.0, 1.0)]);
        engine.step();
        assert_eq!(circles(&engine), vec![vec2(7.0, 2.0)]);

        // Spawned between frames: updated once before its first draw.
        engine.trigger("ping", 9.0, 0.0, &EffectOptions::new());
        assert_eq!(circles(&engine).len(), 1);
        engine.step();
        let mut drawn = circles(&engine);
        drawn.sort_by(|a, b| a.x.total_cmp(&b.x));
        assert_eq!(drawn, vec![vec2(7.0, 3.0), vec2(9.0, 1.0)]);
    }

    #[test]
    fn orphaned_particles_fade_out_and_are_not_drawn() {
        let config = EngineConfig {
            time_scale: 2.0,
            ..Default::default()
        };
        let mut engine = engine_with(config, ManualClock::new());
        engine.register_effect(Ping::boxed("ping"));
        engine.trigger("ping", 0.0, 0.0, &EffectOptions::new());
        // Re-register under another name so "ping" particles lose their owner.
        engine.effects.clear();
        engine.register_effect(Ping::boxed("other"));

        engine.step();
        assert_eq!(engine.particle_count(), 1);
        assert!(circles(&engine).is_empty());

        // Orphans age by the frame delta (0.5) and die at max_progress (10).
        let mut frames = 1;
        while engine.particle_count() > 0 {
            engine.step();
            frames += 1;
            assert!(frames <= 21);
        }
        assert_eq!(frames, 20);
    }

    #[test]
    fn time_scale_change_applies_next_frame() {
        let mut engine = engine();
        engine.register_effect(Ping::boxed("ping"));
        engine.trigger("ping", 0.0, 0.0, &EffectOptions::new());
        engine.effects.clear();

        engine.step();
        let before = engine.particles()[0].progress;
        engine.update_config(&ConfigPatch::default().time_scale(1.0)).unwrap();
        engine.step();
        let after = engine.particles()[0].progress;
        assert!((before - 0.4).abs() < 1e-6);
        assert!((after - 1.4).abs() < 1e-6);
    }

    #[test]
    fn overlay_draws_requested_diagnostics() {
        let clock = ManualClock::new();
        let config = EngineConfig {
            show_fps: true,
            show_particle_count: true,
            ..Default::default()
        };
        let mut engine = engine_with(config, clock.clone());
        engine.register_effect(Ping::boxed("ping"));
        engine.trigger("ping", 0.0, 0.0, &EffectOptions::new());
        engine.start();
        for _ in 0..31 {
            clock.advance(1000.0 / 30.0 + 0.01);
            engine.pump();
        }

        let texts: Vec<&str> = engine.canvas().texts().collect();
        assert!(texts.contains(&"FPS: 30"));
        assert!(texts.contains(&"Particles: 0"));
        assert_eq!(engine.fps(), 30);
    }

    #[test]
    fn click_trigger_binds_once_and_translates_coordinates() {
        let surface = RecordingSurface::new(1.0, 1.0).with_origin(vec2(50.0, 20.0));
        let config = EngineConfig {
            width: 100.0,
            height: 100.0,
            ..Default::default()
        };
        let mut engine =
            ParticleSystem::with_clock(surface, config, Box::new(ManualClock::new())).unwrap();
        engine.register_effect(Ping::boxed("ping"));
        engine.set_current_effect("ping");

        let click = PointerEvent::Click(vec2(60.0, 30.0));
        assert_eq!(engine.handle_pointer(click), 0);

        engine.enable_click_trigger();
        engine.enable_click_trigger();
        assert_eq!(engine.handle_pointer(click), 1);
        assert_eq!(engine.particles()[0].x, 10.0);
        assert_eq!(engine.particles()[0].y, 10.0);
        assert_eq!(engine.handle_pointer(PointerEvent::Click(vec2(10.0, 10.0))), 0);

        engine.disable_click_trigger();
        engine.disable_click_trigger();
        assert!(!engine.click_trigger_enabled());
        assert_eq!(engine.handle_pointer(click), 0);
        assert_eq!(engine.particle_count(), 1);
    }

    #[test]
    fn construction_fails_without_a_context() {
        let result = ParticleSystem::new(RecordingSurface::detached(), EngineConfig::default());
        assert!(matches!(result, Err(EngineError::SurfaceUnavailable(_))));
    }

    #[test]
    fn construction_rejects_invalid_config() {
        let config = EngineConfig {
            time_scale: 0.0,
            ..Default::default()
        };
        let result = ParticleSystem::new(RecordingSurface::new(1.0, 1.0), config);
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn redraw_repaints_without_advancing() {
        let mut engine = engine();
        engine.register_effect(Ping::boxed("ping"));
        engine.trigger("ping", 3.0, 0.0, &EffectOptions::new());
        engine.step();

        engine.redraw();
        engine.redraw();
        assert_eq!(circles(&engine), vec![vec2(3.0, 1.0)]);
        assert_eq!(engine.particles()[0].progress, 1.0);
        assert_eq!(engine.frame_count(), 1);
    }
}
