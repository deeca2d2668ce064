//=========================================================================
// Cadence Engine
//
// Outer tick driver: gates every frame behind the `playing` flag and
// forwards `update(delta)` to a scene scheduler.
//
// Architecture:
// ```text
//     EngineBuilder  ──build(scheduler)──>  Engine<M>  ──run_while()──>  [Loop]
//         │                                   │
//         ├─ with_tps()                       ├─ update(delta)  (gated)
//         ├─ paused()                         └─ M: SceneScheduler
//         └─ with_config()                        ├─ SceneSlots
//                                                 └─ SceneManager<K>
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

//=== Internal Dependencies ===============================================

use crate::core::scene::{SceneKey, SceneManager, SceneScheduler};

//=== Module Declarations =================================================

mod config;

pub use config::{ConfigError, EngineConfig};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (fixed updates per second)
/// - **Playing**: true
///
/// # Examples
///
/// ```
/// use cadence_engine::EngineBuilder;
/// use cadence_engine::core::scene::SceneSlots;
///
/// let engine = EngineBuilder::new()
///     .with_tps(120.0)
///     .build(SceneSlots::new());
///
/// assert!(engine.is_playing());
/// assert_eq!(engine.tps(), 120.0);
/// ```
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    tps: f64,
    start_playing: bool,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            start_playing: true,
        }
    }

    /// Sets the fixed ticks per second used by [`Engine::run_while`].
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Builds an engine that starts with `playing == false`.
    pub fn paused(mut self) -> Self {
        self.start_playing = false;
        self
    }

    /// Takes TPS and the initial playing flag from a loaded configuration.
    ///
    /// # Panics
    ///
    /// Panics if the configuration's `tps <= 0.0`; use
    /// [`EngineConfig::validate`] first for untrusted input.
    pub fn with_config(self, config: &EngineConfig) -> Self {
        let builder = self.with_tps(config.tps);
        Self {
            start_playing: config.start_playing,
            ..builder
        }
    }

    /// Builds the engine around `scheduler`.
    pub fn build<M: SceneScheduler>(self, scheduler: M) -> Engine<M> {
        info!(
            "Building engine (TPS: {}, playing: {})",
            self.tps, self.start_playing
        );

        Engine {
            scheduler,
            playing: self.start_playing,
            tps: self.tps,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Cadence Engine runtime.
///
/// Owns one scene scheduler and drives it while `playing` is set. Time is
/// whatever the caller passes to [`Engine::update`]; [`Engine::run_while`]
/// supplies a fixed timestep on the calling thread.
///
/// # Examples
///
/// ```
/// use cadence_engine::core::scene::{BasicScene, SceneManager, SceneOptions};
/// use cadence_engine::{Engine, EngineConfig};
///
/// let mut engine = Engine::<SceneManager<&'static str>>::from_config(&EngineConfig::default());
/// engine
///     .scheduler_mut()
///     .define_scene::<BasicScene>("main", SceneOptions::new());
/// engine.scheduler_mut().start(&"main");
///
/// engine.tick();
/// assert!(engine.scheduler().current_scene_id().is_some());
/// engine.destroy();
/// ```
pub struct Engine<M: SceneScheduler> {
    scheduler: M,
    playing: bool,
    tps: f64,
}

impl<K: SceneKey> Engine<SceneManager<K>> {
    /// Builds an engine with a [`SceneManager`] configured from `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        EngineBuilder::new()
            .with_config(config)
            .build(SceneManager::new(config.scene_manager.clone()))
    }
}

impl<M: SceneScheduler> Engine<M> {
    //--- Accessors --------------------------------------------------------

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Pauses or resumes the engine. While paused, no scheduler work runs
    /// at all, transitions included.
    pub fn set_playing(&mut self, playing: bool) {
        if self.playing != playing {
            debug!("Engine playing: {}", playing);
        }
        self.playing = playing;
    }

    pub fn tps(&self) -> f64 {
        self.tps
    }

    /// Duration of one fixed step.
    pub fn timestep(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tps)
    }

    pub fn scheduler(&self) -> &M {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut M {
        &mut self.scheduler
    }

    //--- Update Loop ------------------------------------------------------

    /// Runs one frame: switches scenes if needed, then updates them.
    ///
    /// Does nothing while not playing.
    pub fn update(&mut self, delta: f64) {
        if self.playing {
            self.scheduler.update(delta);
        }
    }

    /// Runs one fixed step of `1 / tps` seconds.
    pub fn tick(&mut self) {
        self.update(1.0 / self.tps);
    }

    /// Ticks at the configured rate on the calling thread until
    /// `keep_running` returns `false`.
    ///
    /// The predicate is checked before every tick and receives the engine,
    /// so it can inspect scenes or toggle `playing`. Returns the number of
    /// ticks run.
    pub fn run_while<F>(&mut self, mut keep_running: F) -> u64
    where
        F: FnMut(&mut Self) -> bool,
    {
        let frame_duration = self.timestep();
        let delta = frame_duration.as_secs_f64();
        let mut ticks = 0;

        info!("Entering run loop (TPS: {})", self.tps);

        while keep_running(self) {
            let frame_start = Instant::now();

            self.update(delta);
            ticks += 1;

            //--- Maintain deterministic pacing ----------------------------
            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                thread::sleep(frame_duration - elapsed);
            }
        }

        info!("Run loop exited after {} ticks", ticks);
        ticks
    }

    /// Destroys the scheduler and every scene it holds.
    pub fn destroy(&mut self) {
        info!("Destroying engine");
        self.scheduler.destroy();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
