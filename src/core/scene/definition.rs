//=========================================================================
// Scene Definitions and Running Records
//=========================================================================
//
// A definition is a reusable recipe (name, factory, stored arguments,
// transition defaults). Every start of a definition produces a fresh
// running record owning a live scene instance.
//
//   SceneDefinition ──instantiate()──> RunningScene ──destroy()──> dropped
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::{self, Debug};
use std::hash::Hash;
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use super::transition::{SceneTransition, Tween};
use super::Scene;

//=== Scene Key Trait =====================================================

/// Marker trait for scene definition names.
///
/// Implemented for `&'static str` and `String`; games usually implement it
/// for their own enum.
pub trait SceneKey: Clone + Eq + Hash + Debug + 'static {}

impl SceneKey for &'static str {}
impl SceneKey for String {}

//=== SceneId =============================================================

/// Identity of one running record, allocated by the scene manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SceneId(u64);

impl SceneId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//=== Factories and Options ===============================================

/// Constructor argument stored with a definition.
pub type SceneArg = toml::Value;

/// Builds a scene instance from the definition's stored arguments.
pub type SceneFactory = Box<dyn Fn(&[SceneArg]) -> Box<dyn Scene>>;

/// One-shot callback fired when a scene's transition finishes.
pub type TransitionCallback = Rc<dyn Fn()>;

/// Optional settings of a definition.
#[derive(Clone, Default)]
pub struct SceneOptions {
    pub args: Vec<SceneArg>,
    pub transition: Option<SceneTransition>,
    pub transition_time: Option<f64>,
    pub on_transition_complete: Option<TransitionCallback>,
}

impl SceneOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_args(mut self, args: Vec<SceneArg>) -> Self {
        self.args = args;
        self
    }

    pub fn with_transition(mut self, transition: SceneTransition, time: f64) -> Self {
        self.transition = Some(transition);
        self.transition_time = Some(time);
        self
    }

    pub fn on_transition_complete(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_transition_complete = Some(Rc::new(callback));
        self
    }
}

impl Debug for SceneOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneOptions")
            .field("args", &self.args)
            .field("transition", &self.transition)
            .field("transition_time", &self.transition_time)
            .field("on_transition_complete", &self.on_transition_complete.is_some())
            .finish()
    }
}

//=== StartRequest ========================================================

/// Per-call overrides for [`SceneManager::start_with`](super::SceneManager::start_with).
///
/// Fields left `None` fall back to the definition's options.
#[derive(Clone)]
pub struct StartRequest {
    pub destroy_others: bool,
    pub transition: Option<SceneTransition>,
    pub transition_time: Option<f64>,
    pub on_transition_complete: Option<TransitionCallback>,
}

impl StartRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the currently running scenes alive.
    pub fn keep_others(mut self) -> Self {
        self.destroy_others = false;
        self
    }

    pub fn with_transition(mut self, transition: SceneTransition, time: f64) -> Self {
        self.transition = Some(transition);
        self.transition_time = Some(time);
        self
    }

    pub fn on_transition_complete(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_transition_complete = Some(Rc::new(callback));
        self
    }
}

impl Default for StartRequest {
    fn default() -> Self {
        Self {
            destroy_others: true,
            transition: None,
            transition_time: None,
            on_transition_complete: None,
        }
    }
}

//=== SceneDefinition =====================================================

/// Named recipe registered with the scene manager.
pub(crate) struct SceneDefinition<K: SceneKey> {
    pub(crate) name: K,
    factory: SceneFactory,
    pub(crate) options: SceneOptions,
}

impl<K: SceneKey> SceneDefinition<K> {
    pub(crate) fn new(name: K, factory: SceneFactory, options: SceneOptions) -> Self {
        Self {
            name,
            factory,
            options,
        }
    }

    pub(crate) fn instantiate(&self) -> Box<dyn Scene> {
        (self.factory)(&self.options.args)
    }
}

//=== RunningScene ========================================================

/// Scheduler-owned record binding a definition to a live scene.
pub(crate) struct RunningScene<K: SceneKey> {
    pub(crate) id: SceneId,
    /// `None` for scenes handed over directly with `set_current_scene`.
    pub(crate) name: Option<K>,
    pub(crate) scene: Box<dyn Scene>,
    pub(crate) preloading: bool,
    pub(crate) transition: Option<SceneTransition>,
    pub(crate) on_transition_complete: Option<TransitionCallback>,
    pub(crate) tween: Option<Tween>,
}

impl<K: SceneKey> RunningScene<K> {
    pub(crate) fn new(id: SceneId, name: Option<K>, scene: Box<dyn Scene>) -> Self {
        Self {
            id,
            name,
            scene,
            preloading: false,
            transition: None,
            on_transition_complete: None,
            tween: None,
        }
    }

    pub(crate) fn scene(&self) -> &dyn Scene {
        &*self.scene
    }

    pub(crate) fn scene_mut(&mut self) -> &mut dyn Scene {
        &mut *self.scene
    }

    /// Clears the transition fields; the callback is handed back.
    pub(crate) fn clear_transition(&mut self) -> Option<TransitionCallback> {
        self.transition = None;
        self.tween = None;
        self.on_transition_complete.take()
    }

    /// Stops and destroys the scene. Consumes the record: it can never be
    /// queued again.
    pub(crate) fn destroy(mut self) {
        self.clear_transition();
        self.scene.set_playing(false);
        self.scene.destroy();
    }
}
