//=========================================================================
// Scene System
//=========================================================================
//
// Scenes group the game objects of one level or screen and expose the
// lifecycle hooks the schedulers drive.
//
// Architecture:
//   SceneScheduler (trait)
//     ├─ SceneSlots        single slot: active / next / future
//     └─ SceneManager<K>   named definitions, creation/destruction queues
//
//   Scene (trait, user type)
//     └─ SceneCore
//          ├─ objects: ObjectRegistry
//          ├─ playing: bool
//          └─ pose: ScenePose
//
// Flow:
//   scheduler.update() → settle queued changes → Scene::update()
//                                              → ObjectRegistry::update()
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use crate::core::error::SceneError;
use crate::core::object::{IdAllocator, ObjectHandle, ObjectKind, ObjectRegistry};

//=== Module Declarations =================================================

mod definition;
mod preload;
mod scene_manager;
mod scene_queue;
mod scene_slots;
mod transition;

//=== Public API ==========================================================

pub use definition::{
    SceneArg, SceneFactory, SceneId, SceneKey, SceneOptions, StartRequest, TransitionCallback,
};
pub use preload::{PreloadError, PreloadEvent, PreloadSignal};
pub use scene_manager::{SceneManager, SceneManagerConfig, SceneManagerMode};
pub use scene_slots::SceneSlots;
pub use transition::{ScenePose, SceneTransition, ScreenSize, Tween};

//=== SceneCore ===========================================================

/// State every scene carries: its objects, its playing flag and the pose
/// written by transitions.
#[derive(Default)]
pub struct SceneCore {
    objects: ObjectRegistry,
    playing: bool,
    pose: ScenePose,
}

impl SceneCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objects(&self) -> &ObjectRegistry {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectRegistry {
        &mut self.objects
    }

    pub fn pose(&self) -> ScenePose {
        self.pose
    }

    pub fn set_pose(&mut self, pose: ScenePose) {
        self.pose = pose;
    }
}

//=== AsAny ===============================================================

/// Upcast to [`Any`], used to recover concrete scene types.
///
/// Implemented automatically for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=== Scene Trait =========================================================

/// Lifecycle and object management of a scene.
///
/// Only the core accessors are required; everything else has a default
/// built on [`SceneCore`]. Objects must be created in
/// [`Scene::initialize`], never in the constructor: the scene is only
/// registered with its scheduler after construction.
///
/// ```
/// use cadence_engine::core::object::IdAllocator;
/// use cadence_engine::core::scene::{Scene, SceneCore};
///
/// #[derive(Default)]
/// struct Title {
///     core: SceneCore,
/// }
///
/// impl Scene for Title {
///     fn core(&self) -> &SceneCore { &self.core }
///     fn core_mut(&mut self) -> &mut SceneCore { &mut self.core }
///
///     fn initialize(&mut self, _ids: &IdAllocator) {
///         // create and add objects here
///     }
/// }
/// ```
pub trait Scene: AsAny {
    fn core(&self) -> &SceneCore;

    fn core_mut(&mut self) -> &mut SceneCore;

    //--- Lifecycle --------------------------------------------------------

    /// Starts asynchronous loading.
    ///
    /// Return `true` to hold the scene back until `signal` is completed;
    /// the scheduler will then call [`Scene::on_preload_complete`] instead
    /// of [`Scene::initialize`].
    fn preload(&mut self, _signal: PreloadSignal) -> bool {
        false
    }

    /// Called at the tick following a completed preload.
    fn on_preload_complete(&mut self, ids: &IdAllocator, _event: PreloadEvent) {
        self.initialize(ids);
        self.set_playing(true);
    }

    /// Populates the scene. `ids` issues identities for new objects.
    fn initialize(&mut self, _ids: &IdAllocator) {}

    /// Per-tick update while playing. Forwards to the object registry.
    fn update(&mut self, delta: f64) {
        self.core_mut().objects.update(delta);
    }

    /// Per-tick hook used instead of `update` while not playing.
    fn update_pause(&mut self, _delta: f64) {}

    /// Destroys every object in the scene.
    fn destroy(&mut self) {
        let core = self.core_mut();
        core.playing = false;
        core.objects.destroy();
    }

    fn is_playing(&self) -> bool {
        self.core().playing
    }

    fn set_playing(&mut self, playing: bool) {
        self.core_mut().playing = playing;
    }

    fn pose(&self) -> ScenePose {
        self.core().pose
    }

    //--- Objects ----------------------------------------------------------

    fn objects(&self) -> &ObjectRegistry {
        &self.core().objects
    }

    /// See [`ObjectRegistry::add`].
    fn add(&mut self, object: ObjectHandle) -> Result<ObjectHandle, SceneError> {
        self.core_mut().objects.add(object)
    }

    /// See [`ObjectRegistry::remove`].
    fn remove(&self, object: &ObjectHandle) {
        self.core().objects.remove(object);
    }

    /// See [`ObjectRegistry::remove_immediately`].
    fn remove_immediately(&mut self, object: &ObjectHandle) {
        self.core_mut().objects.remove_immediately(object);
    }

    fn object_by_name(&self, name: &str) -> Option<ObjectHandle> {
        self.core().objects.object_by_name(name)
    }

    fn objects_by_name<'a>(&'a self, name: &'a str) -> Box<dyn Iterator<Item = ObjectHandle> + 'a> {
        Box::new(self.core().objects.objects_by_name(name))
    }

    fn first_object_by_kind(&self, kind: ObjectKind) -> Option<ObjectHandle> {
        self.core().objects.first_object_by_kind(kind)
    }

    fn objects_by_kind(&self, kind: ObjectKind) -> Box<dyn Iterator<Item = ObjectHandle> + '_> {
        Box::new(self.core().objects.objects_by_kind(kind))
    }

    /// See [`ObjectRegistry::kill_all`].
    fn kill_all_objects(&self, except: &[ObjectHandle]) {
        self.core().objects.kill_all(except);
    }

    fn all_objects(&self) -> Box<dyn Iterator<Item = ObjectHandle> + '_> {
        Box::new(self.core().objects.all())
    }
}

impl<'a> dyn Scene + 'a {
    /// Returns the scene as `T` if that is its concrete type.
    pub fn downcast_ref<T: Scene>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Returns the scene as `T` if that is its concrete type.
    pub fn downcast_mut<T: Scene>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Runs `update` or `update_pause` depending on the playing flag.
    pub(crate) fn drive(&mut self, delta: f64) {
        if self.is_playing() {
            self.update(delta);
        } else {
            self.update_pause(delta);
        }
    }
}

//=== BasicScene ==========================================================

/// Scene without custom behavior, useful as a container of objects
/// populated from outside.
#[derive(Default)]
pub struct BasicScene {
    core: SceneCore,
}

impl BasicScene {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scene for BasicScene {
    fn core(&self) -> &SceneCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SceneCore {
        &mut self.core
    }
}

//=== SceneScheduler Trait ================================================

/// Decides which scenes run each tick. Driven by [`crate::Engine`].
pub trait SceneScheduler {
    /// Settles queued scene changes and updates the running scenes.
    fn update(&mut self, delta: f64);

    /// Destroys every scene the scheduler holds.
    fn destroy(&mut self);

    fn current_scene(&self) -> Option<&dyn Scene>;

    fn current_scene_mut(&mut self) -> Option<&mut dyn Scene>;
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::object::{GameObject, IdAllocator};
    use crate::core::testing::{ProbeObject, ProbeScene};

    #[test]
    fn new_scene_is_not_playing() {
        let scene = BasicScene::new();
        assert!(!scene.is_playing());
        assert_eq!(scene.pose(), ScenePose::IDENTITY);
    }

    #[test]
    fn update_ignores_playing_flag() {
        let ids = IdAllocator::new();
        let mut scene = BasicScene::new();
        let probe = ProbeObject::shared(&ids);
        probe.borrow_mut().core_mut().update_enabled = true;
        scene.add(probe.clone()).unwrap();

        scene.update(2.0);

        assert_eq!(probe.borrow().updates, vec![2.0]);
    }

    #[test]
    fn drive_uses_update_pause_when_not_playing() {
        let (scene, calls) = ProbeScene::new("paused");
        let mut scene: Box<dyn Scene> = Box::new(scene);

        scene.drive(1.0);
        scene.set_playing(true);
        scene.drive(2.0);

        assert_eq!(calls.borrow().pause_updates, vec![1.0]);
        assert_eq!(calls.borrow().updates, vec![2.0]);
    }

    #[test]
    fn object_passthroughs_reach_registry() {
        let ids = IdAllocator::new();
        let mut scene = BasicScene::new();
        let a: ObjectHandle = ProbeObject::shared(&ids);
        let b: ObjectHandle = ProbeObject::shared(&ids);
        a.borrow_mut().core_mut().name = "hero".into();
        scene.add(a.clone()).unwrap();
        scene.add(b.clone()).unwrap();

        assert!(scene.add(a.clone()).is_err());
        assert!(scene.object_by_name("hero").is_some());
        assert_eq!(scene.objects_by_name("hero").count(), 1);
        assert_eq!(scene.objects_by_kind(ObjectKind::CLASSIC).count(), 2);
        assert!(scene.first_object_by_kind(ObjectKind::CLASSIC).is_some());
        assert_eq!(scene.all_objects().count(), 2);

        scene.kill_all_objects(&[a.clone()]);
        scene.update(1.0);
        assert_eq!(scene.objects().len(), 1);

        scene.remove(&a);
        scene.update(1.0);
        assert!(scene.objects().is_empty());
    }

    #[test]
    fn remove_immediately_through_scene() {
        let ids = IdAllocator::new();
        let mut scene = BasicScene::new();
        let probe = ProbeObject::shared(&ids);
        let handle: ObjectHandle = probe.clone();
        scene.add(handle.clone()).unwrap();

        scene.remove_immediately(&handle);

        assert!(scene.objects().is_empty());
        assert_eq!(probe.borrow().destroy_calls, 1);
    }

    #[test]
    fn destroy_clears_objects_and_playing() {
        let ids = IdAllocator::new();
        let mut scene = BasicScene::new();
        let probe = ProbeObject::shared(&ids);
        scene.add(probe.clone()).unwrap();
        scene.set_playing(true);

        scene.destroy();

        assert!(!scene.is_playing());
        assert!(scene.objects().is_empty());
        assert_eq!(probe.borrow().destroy_calls, 1);
    }

    #[test]
    fn default_preload_completion_initializes_and_plays() {
        let ids = IdAllocator::new();
        let (mut scene, calls) = ProbeScene::new("loader");

        scene.on_preload_complete(
            &ids,
            PreloadEvent {
                scene: SceneId::new(0),
            },
        );

        assert_eq!(calls.borrow().initialize, 1);
        assert!(scene.is_playing());
    }

    #[test]
    fn downcast_recovers_concrete_type() {
        let (scene, _) = ProbeScene::new("typed");
        let mut boxed: Box<dyn Scene> = Box::new(scene);

        assert_eq!(boxed.downcast_ref::<ProbeScene>().unwrap().label(), "typed");
        assert!(boxed.downcast_ref::<BasicScene>().is_none());
        assert!(boxed.downcast_mut::<ProbeScene>().is_some());
    }
}
