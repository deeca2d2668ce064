//=========================================================================
// Test Support
//=========================================================================
//
// Probe objects and scenes that record every lifecycle call, shared by
// the unit tests of the object, scene and engine modules.
//
//=========================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::object::{
    handle, GameObject, IdAllocator, ObjectCore, ObjectKind, ObjectParams, ParamValue,
};
use crate::core::scene::{PreloadEvent, PreloadSignal, Scene, SceneCore};

//=== ProbeObject =========================================================

pub(crate) const COIN: ObjectKind = ObjectKind::new("coin");

pub(crate) struct ProbeObject {
    core: ObjectCore,
    kind: ObjectKind,
    pub initialize_calls: usize,
    pub destroy_calls: usize,
    pub updates: Vec<f64>,
    pub score: Option<i64>,
    pub label: Option<String>,
}

impl ProbeObject {
    pub fn new(ids: &IdAllocator) -> Self {
        Self::from_core(ObjectCore::new(ids))
    }

    pub fn with_params(ids: &IdAllocator, params: ObjectParams) -> Self {
        Self::from_core(ObjectCore::with_params(ids, params))
    }

    pub fn shared(ids: &IdAllocator) -> Rc<RefCell<ProbeObject>> {
        Rc::new(RefCell::new(Self::new(ids)))
    }

    pub fn shared_with_kind(ids: &IdAllocator, kind: ObjectKind) -> Rc<RefCell<ProbeObject>> {
        let mut object = Self::new(ids);
        object.kind = kind;
        Rc::new(RefCell::new(object))
    }

    fn from_core(core: ObjectCore) -> Self {
        Self {
            core,
            kind: ObjectKind::CLASSIC,
            initialize_calls: 0,
            destroy_calls: 0,
            updates: Vec::new(),
            score: None,
            label: None,
        }
    }
}

impl GameObject for ProbeObject {
    fn core(&self) -> &ObjectCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ObjectCore {
        &mut self.core
    }

    fn kind(&self) -> ObjectKind {
        self.kind
    }

    fn initialize(&mut self) {
        self.initialize_calls += 1;
        crate::core::object::apply_params(self);
    }

    fn apply_param(&mut self, key: &str, value: &ParamValue) -> bool {
        match (key, value) {
            ("score", ParamValue::Integer(score)) => self.score = Some(*score),
            ("label", ParamValue::String(label)) => self.label = Some(label.clone()),
            _ => return false,
        }
        true
    }

    fn update(&mut self, delta: f64) {
        self.updates.push(delta);
    }

    fn destroy(&mut self) {
        self.destroy_calls += 1;
        self.core.clear_initialized();
    }
}

//=== ProbeScene ==========================================================

/// Lifecycle calls observed on one or more probe scenes.
#[derive(Debug, Default)]
pub(crate) struct SceneCalls {
    pub initialize: usize,
    pub destroy: usize,
    pub preload_completions: usize,
    pub updates: Vec<f64>,
    pub pause_updates: Vec<f64>,
}

pub(crate) type CallLog = Rc<RefCell<SceneCalls>>;

pub(crate) struct ProbeScene {
    core: SceneCore,
    label: String,
    calls: CallLog,
    defer_preload: bool,
    signal: Option<PreloadSignal>,
    spawn_count: usize,
}

impl ProbeScene {
    pub fn new(label: &str) -> (Self, CallLog) {
        let calls = CallLog::default();
        (Self::with_calls(label, calls.clone()), calls)
    }

    /// Scene sharing an existing log, for use inside scene factories.
    pub fn with_calls(label: &str, calls: CallLog) -> Self {
        Self {
            core: SceneCore::new(),
            label: label.to_string(),
            calls,
            defer_preload: false,
            signal: None,
            spawn_count: 0,
        }
    }

    /// Makes `preload` hold the scene back until its signal is completed.
    pub fn deferring_preload(mut self) -> Self {
        self.defer_preload = true;
        self
    }

    pub fn set_spawn_count(&mut self, count: usize) {
        self.spawn_count = count;
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn take_signal(&mut self) -> Option<PreloadSignal> {
        self.signal.take()
    }
}

impl Scene for ProbeScene {
    fn core(&self) -> &SceneCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SceneCore {
        &mut self.core
    }

    fn preload(&mut self, signal: PreloadSignal) -> bool {
        if self.defer_preload {
            self.signal = Some(signal);
        }
        self.defer_preload
    }

    fn on_preload_complete(&mut self, ids: &IdAllocator, _event: PreloadEvent) {
        self.calls.borrow_mut().preload_completions += 1;
        self.initialize(ids);
        self.set_playing(true);
    }

    fn initialize(&mut self, ids: &IdAllocator) {
        self.calls.borrow_mut().initialize += 1;
        for _ in 0..self.spawn_count {
            let mut object = ProbeObject::new(ids);
            object.core_mut().update_enabled = true;
            self.add(handle(object)).expect("fresh object");
        }
    }

    fn update(&mut self, delta: f64) {
        self.calls.borrow_mut().updates.push(delta);
        self.core.objects_mut().update(delta);
    }

    fn update_pause(&mut self, delta: f64) {
        self.calls.borrow_mut().pause_updates.push(delta);
    }

    fn destroy(&mut self) {
        self.calls.borrow_mut().destroy += 1;
        self.set_playing(false);
        self.core.objects_mut().destroy();
    }
}

/// Label of a probe scene returned by a scheduler getter.
pub(crate) fn label_of(scene: Option<&dyn Scene>) -> Option<&str> {
    scene
        .and_then(|scene| scene.downcast_ref::<ProbeScene>())
        .map(ProbeScene::label)
}
