//=========================================================================
// Scene Manager
//=========================================================================
//
// Named scene scheduler with deferred creation and destruction.
//
// Architecture:
//   SceneManager<K>
//     ├─ definitions: HashMap<K, SceneDefinition>   reusable recipes
//     ├─ running:     Vec<RunningScene>             updated every tick
//     ├─ to_create:   SceneQueue<RunningScene>      activated at tick end
//     ├─ to_destroy:  SceneQueue<SceneId>           destroyed at tick end
//     └─ preload:     PreloadCollector              async completions
//
// Flow (per tick):
//   1. drain preload completions
//   2. update running scenes (update / update_pause)
//   3. advance transitions, settle completed ones
//   4. flush destruction queue
//   5. flush creation queue (preload or initialize)
//
// Both queues are strict FIFO: entries are handled exactly once, in the
// order they were requested.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use super::definition::{RunningScene, SceneDefinition};
use super::preload::PreloadCollector;
use super::scene_queue::SceneQueue;
use super::{
    Scene, SceneArg, SceneId, SceneKey, SceneOptions, SceneScheduler, ScenePose, ScreenSize,
    StartRequest, Tween,
};
use crate::core::error::SceneError;
use crate::core::object::IdAllocator;

//=== SceneManagerMode ====================================================

/// What happens to the other scenes when a transition completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneManagerMode {
    /// Every other scene is destroyed once a transition completes.
    #[default]
    Single,

    /// Running scenes are left alone; the caller decides what to stop.
    User,
}

//=== SceneManagerConfig ==================================================

/// Settings of a [`SceneManager`], usually loaded as part of
/// [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneManagerConfig {
    pub mode: SceneManagerMode,

    /// Distance covered by the move-in transitions.
    pub screen_width: f32,
    pub screen_height: f32,

    /// Transition duration in seconds when neither the definition nor the
    /// start request sets one.
    pub default_transition_time: f64,

    /// Upper bound on preload completions handled in a single tick.
    pub max_preload_events_per_tick: usize,
}

impl SceneManagerConfig {
    pub fn screen(&self) -> ScreenSize {
        ScreenSize {
            width: self.screen_width,
            height: self.screen_height,
        }
    }
}

impl Default for SceneManagerConfig {
    fn default() -> Self {
        Self {
            mode: SceneManagerMode::Single,
            screen_width: 800.0,
            screen_height: 600.0,
            default_transition_time: 1.0,
            max_preload_events_per_tick: 64,
        }
    }
}

//=== SceneManager ========================================================

/// Scheduler running named, reusable scene definitions.
///
/// Starting a definition builds a fresh scene right away but activates it
/// at the end of the next [`SceneScheduler::update`]; the returned
/// [`SceneId`] gives access to the instance in between.
///
/// ```
/// use cadence_engine::core::scene::{BasicScene, SceneManager, SceneOptions, SceneScheduler};
///
/// let mut manager = SceneManager::<&'static str>::default();
/// manager.define_scene::<BasicScene>("title", SceneOptions::new());
///
/// let id = manager.start(&"title").unwrap();
/// assert!(!manager.scene(id).unwrap().is_playing());
///
/// manager.update(1.0 / 60.0);
/// assert!(manager.scene(id).unwrap().is_playing());
/// assert_eq!(manager.current_scene_id(), Some(id));
/// ```
pub struct SceneManager<K: SceneKey> {
    config: SceneManagerConfig,
    ids: IdAllocator,
    definitions: HashMap<K, SceneDefinition<K>>,
    running: Vec<RunningScene<K>>,
    to_create: SceneQueue<RunningScene<K>>,
    to_destroy: SceneQueue<SceneId>,
    /// Most recently activated (or directly assigned) record.
    current: Option<SceneId>,
    next_scene_id: u64,
    preload: PreloadCollector,
    levels: Vec<K>,
    current_level: Option<usize>,
}

impl<K: SceneKey> SceneManager<K> {
    //--- Construction -----------------------------------------------------

    pub fn new(config: SceneManagerConfig) -> Self {
        let preload = PreloadCollector::new(config.max_preload_events_per_tick);
        Self {
            config,
            ids: IdAllocator::new(),
            definitions: HashMap::new(),
            running: Vec::new(),
            to_create: SceneQueue::new(),
            to_destroy: SceneQueue::new(),
            current: None,
            next_scene_id: 0,
            preload,
            levels: Vec::new(),
            current_level: None,
        }
    }

    pub fn config(&self) -> &SceneManagerConfig {
        &self.config
    }

    pub fn mode(&self) -> SceneManagerMode {
        self.config.mode
    }

    /// Identity allocator lent to scenes during initialization.
    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    //--- Definitions ------------------------------------------------------

    /// Registers a scene definition.
    ///
    /// Ignored with a warning if `name` is already defined.
    pub fn define<F>(&mut self, name: K, factory: F, options: SceneOptions)
    where
        F: Fn(&[SceneArg]) -> Box<dyn Scene> + 'static,
    {
        if self.definitions.contains_key(&name) {
            warn!("Scene {:?} is already defined, ignoring new definition", name);
            return;
        }

        debug!("Defined scene {:?}", name);
        let definition = SceneDefinition::new(name.clone(), Box::new(factory), options);
        self.definitions.insert(name, definition);
    }

    /// Registers a definition building `S::default()`; stored args are
    /// ignored.
    pub fn define_scene<S: Scene + Default>(&mut self, name: K, options: SceneOptions) {
        self.define(name, |_| Box::new(S::default()), options);
    }

    pub fn is_defined(&self, name: &K) -> bool {
        self.definitions.contains_key(name)
    }

    /// Replaces the constructor arguments stored with a definition.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownScene`] if `name` is not defined.
    pub fn set_scene_args(&mut self, name: &K, args: Vec<SceneArg>) -> Result<(), SceneError> {
        let definition = self
            .definitions
            .get_mut(name)
            .ok_or_else(|| SceneError::UnknownScene(format!("{:?}", name)))?;
        definition.options.args = args;
        Ok(())
    }

    //--- Starting and Stopping --------------------------------------------

    /// Starts a defined scene, destroying every other scene.
    ///
    /// Returns `None` with a warning if `name` is not defined.
    pub fn start(&mut self, name: &K) -> Option<SceneId> {
        self.start_with(name, StartRequest::default())
    }

    /// Starts a defined scene with per-call overrides.
    ///
    /// Returns `None` with a warning if `name` is not defined.
    pub fn start_with(&mut self, name: &K, request: StartRequest) -> Option<SceneId> {
        match self.try_start_with(name, request) {
            Ok(id) => Some(id),
            Err(err) => {
                warn!("Cannot start scene: {}", err);
                None
            }
        }
    }

    /// Starts a defined scene with per-call overrides.
    ///
    /// The scene is constructed immediately from the definition's stored
    /// args and queued for creation. With `destroy_others`, every running
    /// scene is queued for destruction and pending creations are
    /// destroyed on the spot.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownScene`] if `name` is not defined. Nothing is
    /// changed in that case.
    pub fn try_start_with(
        &mut self,
        name: &K,
        request: StartRequest,
    ) -> Result<SceneId, SceneError> {
        let definition = self
            .definitions
            .get(name)
            .ok_or_else(|| SceneError::UnknownScene(format!("{:?}", name)))?;

        let scene = definition.instantiate();
        let transition = request.transition.or(definition.options.transition);
        let transition_time = request
            .transition_time
            .or(definition.options.transition_time)
            .unwrap_or(self.config.default_transition_time);
        let callback = request
            .on_transition_complete
            .or_else(|| definition.options.on_transition_complete.clone());
        debug!("Instantiated scene {:?}", definition.name);

        if request.destroy_others {
            self.destroy_all_but_running();
        }

        let id = self.allocate_scene_id();
        let mut record = RunningScene::new(id, Some(name.clone()), scene);

        if let Some(transition) = transition {
            let tween = Tween::new(transition, transition_time, self.config.screen());
            record.scene_mut().core_mut().set_pose(tween.pose());
            record.transition = Some(transition);
            record.tween = Some(tween);
        }
        record.on_transition_complete = callback;

        info!("Scene {:?} queued for creation as {}", name, id);
        self.to_create.push(record);
        Ok(id)
    }

    /// Queues the first running scene named `name` for destruction.
    pub fn stop(&mut self, name: &K) -> Option<SceneId> {
        let id = self
            .running
            .iter()
            .find(|record| record.name.as_ref() == Some(name))
            .map(|record| record.id)?;

        if self.to_destroy.push_unique(id) {
            debug!("Scene {:?} ({}) queued for destruction", name, id);
        }
        Some(id)
    }

    /// Hands a scene over directly, destroying every other scene.
    ///
    /// The scene becomes the current scene immediately and is activated on
    /// the next tick.
    pub fn set_current_scene<S: Scene>(&mut self, scene: S) -> SceneId {
        self.destroy_all_but_running();

        let id = self.allocate_scene_id();
        self.to_create.push(RunningScene::new(id, None, Box::new(scene)));
        self.current = Some(id);
        info!("Anonymous scene {} set as current", id);
        id
    }

    /// Destroys every scene except the current one.
    pub fn destroy_previous_scenes(&mut self) {
        if let Some(current) = self.current {
            self.destroy_all_but_running_except(current);
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Running or pending scene with the given id.
    pub fn scene(&self, id: SceneId) -> Option<&dyn Scene> {
        self.record(id).map(RunningScene::scene)
    }

    pub fn scene_mut(&mut self, id: SceneId) -> Option<&mut dyn Scene> {
        if let Some(pos) = self.running.iter().position(|record| record.id == id) {
            return Some(self.running[pos].scene_mut());
        }
        self.to_create
            .iter_mut()
            .find(|record| record.id == id)
            .map(RunningScene::scene_mut)
    }

    /// Definition name of a running or pending scene. `None` for unknown
    /// ids and for scenes set with [`SceneManager::set_current_scene`].
    pub fn scene_name(&self, id: SceneId) -> Option<&K> {
        self.record(id).and_then(|record| record.name.as_ref())
    }

    pub fn current_scene_id(&self) -> Option<SceneId> {
        self.current
    }

    /// Whether the scene is waiting for its preload signal.
    pub fn is_preloading(&self, id: SceneId) -> bool {
        self.record(id).is_some_and(|record| record.preloading)
    }

    /// Whether the scene still has a transition running or waiting to run.
    pub fn is_transitioning(&self, id: SceneId) -> bool {
        self.record(id).is_some_and(|record| record.transition.is_some())
    }

    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    /// Scenes waiting to be activated.
    pub fn pending_count(&self) -> usize {
        self.to_create.len()
    }

    /// Ids of the running scenes, in activation order.
    pub fn running_ids(&self) -> impl Iterator<Item = SceneId> + '_ {
        self.running.iter().map(|record| record.id)
    }

    //--- Level Progression ------------------------------------------------

    /// Sets the ordered definition names used by the level methods.
    pub fn set_level_names(&mut self, names: Vec<K>) {
        self.levels = names;
        self.current_level = None;
    }

    pub fn current_level(&self) -> Option<usize> {
        self.current_level
    }

    /// Starts the first level.
    pub fn start_level_progression(&mut self) -> Option<SceneId> {
        if self.levels.is_empty() {
            warn!("No level names set, cannot start level progression");
            return None;
        }
        let first = self.levels[0].clone();
        self.current_level = Some(0);
        self.start(&first)
    }

    /// Starts the level at `level`. Returns `false` if out of range or if
    /// the level's scene is not defined.
    pub fn goto_level(&mut self, level: usize) -> bool {
        let Some(name) = self.levels.get(level).cloned() else {
            return false;
        };
        self.current_level = Some(level);
        self.start(&name).is_some()
    }

    /// Starts the next level; stops at the last one.
    pub fn next_level(&mut self) -> bool {
        let next = self.current_level.map_or(0, |level| level + 1);
        self.goto_level(next)
    }

    /// Starts the previous level; stops at the first one.
    pub fn previous_level(&mut self) -> bool {
        match self.current_level {
            Some(level) if level > 0 => self.goto_level(level - 1),
            _ => false,
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn allocate_scene_id(&mut self) -> SceneId {
        let id = SceneId::new(self.next_scene_id);
        self.next_scene_id += 1;
        id
    }

    fn record(&self, id: SceneId) -> Option<&RunningScene<K>> {
        self.running
            .iter()
            .chain(self.to_create.iter())
            .find(|record| record.id == id)
    }

    fn forget_current(&mut self, id: SceneId) {
        if self.current == Some(id) {
            self.current = None;
        }
    }

    /// Destroys pending creations now and queues every running scene.
    fn destroy_all_but_running(&mut self) {
        for record in self.to_create.take() {
            self.forget_current(record.id);
            record.destroy();
        }

        for record in &self.running {
            self.to_destroy.push_unique(record.id);
        }
    }

    /// Same as `destroy_all_but_running`, sparing the record `keep`.
    fn destroy_all_but_running_except(&mut self, keep: SceneId) {
        for record in self.to_create.take() {
            if record.id == keep {
                self.to_create.push(record);
            } else {
                self.forget_current(record.id);
                record.destroy();
            }
        }

        for record in &self.running {
            if record.id != keep {
                self.to_destroy.push_unique(record.id);
            }
        }
        self.to_destroy.discard(|id| *id == keep);
    }

    //--- Update Steps -----------------------------------------------------

    fn complete_preloads(&mut self) {
        for event in self.preload.collect() {
            if self.to_destroy.contains(&event.scene) {
                debug!("Ignoring preload completion for stopped scene {}", event.scene);
                continue;
            }

            let Some(record) = self
                .running
                .iter_mut()
                .find(|record| record.id == event.scene && record.preloading)
            else {
                debug!("Ignoring preload completion for {}", event.scene);
                continue;
            };

            record.preloading = false;
            record.scene.on_preload_complete(&self.ids, event);
            if let Some(tween) = record.tween.as_mut() {
                tween.start();
            }
            info!("Scene {} finished preloading", event.scene);
        }
    }

    fn advance_transitions(&mut self, delta: f64) {
        let mut completed = Vec::new();

        for record in &mut self.running {
            if self.to_destroy.contains(&record.id) {
                continue;
            }
            let Some(tween) = record.tween.as_mut() else {
                continue;
            };
            if !tween.is_started() {
                continue;
            }

            let done = tween.advance(delta);
            let pose = tween.pose();
            record.scene.core_mut().set_pose(pose);
            if done {
                completed.push(record.id);
            }
        }

        // Newest first: in Single mode it queues the older ones, which are
        // then skipped.
        for id in completed.into_iter().rev() {
            if self.to_destroy.contains(&id) {
                continue;
            }
            self.finish_transition(id);
        }
    }

    fn finish_transition(&mut self, id: SceneId) {
        if self.config.mode == SceneManagerMode::Single {
            self.destroy_all_but_running_except(id);
        }

        let Some(record) = self.running.iter_mut().find(|record| record.id == id) else {
            return;
        };
        record.scene.core_mut().set_pose(ScenePose::IDENTITY);
        let callback = record.clear_transition();
        debug!("Transition of scene {} complete", id);

        if let Some(callback) = callback {
            callback();
        }
    }

    fn collect_scenes(&mut self) {
        for id in self.to_destroy.take() {
            let Some(pos) = self.running.iter().position(|record| record.id == id) else {
                continue;
            };

            let record = self.running.remove(pos);
            self.forget_current(id);
            debug!("Destroying scene {}", id);
            record.destroy();
        }
    }

    fn create_scenes(&mut self) {
        if self.to_create.is_empty() {
            return;
        }

        debug!("Creating {} scene(s)", self.to_create.len());
        for mut record in self.to_create.take() {
            self.current = Some(record.id);

            let signal = self.preload.signal_for(record.id);
            if record.scene.preload(signal) {
                record.preloading = true;
                record.scene.set_playing(false);
                debug!("Scene {} is preloading", record.id);
            } else {
                record.scene.initialize(&self.ids);
                record.scene.set_playing(true);
                if let Some(tween) = record.tween.as_mut() {
                    tween.start();
                }
                debug!("Scene {} initialized", record.id);
            }

            self.running.push(record);
        }
    }
}

impl<K: SceneKey> Default for SceneManager<K> {
    fn default() -> Self {
        Self::new(SceneManagerConfig::default())
    }
}

impl<K: SceneKey> SceneScheduler for SceneManager<K> {
    fn update(&mut self, delta: f64) {
        self.complete_preloads();

        for record in &mut self.running {
            record.scene.drive(delta);
        }

        self.advance_transitions(delta);
        self.collect_scenes();
        self.create_scenes();
    }

    /// Destroys every pending and running scene exactly once.
    fn destroy(&mut self) {
        info!(
            "Destroying scene manager ({} running, {} pending)",
            self.running.len(),
            self.to_create.len()
        );

        self.destroy_all_but_running();
        self.collect_scenes();
        self.current = None;
    }

    fn current_scene(&self) -> Option<&dyn Scene> {
        self.scene(self.current?)
    }

    fn current_scene_mut(&mut self) -> Option<&mut dyn Scene> {
        let id = self.current?;
        self.scene_mut(id)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
