//=========================================================================
// Scene Slots
//=========================================================================
//
// Single-slot scheduler: one active scene plus an optional future scene
// prepared ahead of a transition.
//
// Architecture:
//   SceneSlots
//     ├─ active          running scene
//     ├─ next            assignment waiting for the tick boundary
//     ├─ future          initialized scene running next to `active`
//     └─ pending_future  future assignment waiting for the tick boundary
//
// Flow (per tick):
//   1. next → active         (old active and live future destroyed)
//   2. pending_future → future
//   3. active.update(), future.update()
//
// Assignments never swap scenes mid-tick; getters report the pending
// assignment so callers can configure a scene before it is promoted.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::{Scene, SceneScheduler};
use crate::core::object::IdAllocator;

//=== SceneSlots ==========================================================

/// Scheduler holding at most one active and one future scene.
///
/// Scenes are promoted at the start of the next [`SceneSlots::update`].
/// Preloading is not supported in this mode: promoted scenes are
/// initialized and marked playing right away.
///
/// ```
/// use cadence_engine::core::scene::{BasicScene, SceneScheduler, SceneSlots};
///
/// let mut slots = SceneSlots::new();
/// slots.set_scene(BasicScene::new());
/// assert!(slots.scene().is_some());
///
/// slots.update(1.0 / 60.0);
/// assert!(slots.scene().unwrap().is_playing());
/// ```
#[derive(Default)]
pub struct SceneSlots {
    ids: IdAllocator,
    active: Option<Box<dyn Scene>>,
    next: Option<Box<dyn Scene>>,
    /// Set when `next` is a committed future scene, already initialized.
    next_from_future: bool,
    future: Option<Box<dyn Scene>>,
    pending_future: Option<Box<dyn Scene>>,
}

impl SceneSlots {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self::default()
    }

    /// Identity allocator lent to scenes during initialization.
    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    //--- Assignment -------------------------------------------------------

    /// Schedules `scene` to become the active scene on the next tick.
    ///
    /// A previous assignment that was not promoted yet is destroyed.
    pub fn set_scene<S: Scene>(&mut self, scene: S) {
        if let Some(mut replaced) = self.next.take() {
            debug!("Replacing pending scene before promotion");
            replaced.destroy();
        }
        self.next = Some(Box::new(scene));
        self.next_from_future = false;
    }

    /// Schedules `scene` to become the future scene on the next tick.
    ///
    /// A previous future assignment that was not promoted yet is destroyed.
    pub fn set_future_scene<S: Scene>(&mut self, scene: S) {
        if let Some(mut replaced) = self.pending_future.take() {
            debug!("Replacing pending future scene before promotion");
            replaced.destroy();
        }
        self.pending_future = Some(Box::new(scene));
    }

    /// Schedules the live future scene to become the active scene.
    ///
    /// The scene keeps its state and is not initialized again. Returns
    /// `false` if no future scene is live.
    pub fn commit_future(&mut self) -> bool {
        let Some(future) = self.future.take() else {
            return false;
        };

        if let Some(mut replaced) = self.next.replace(future) {
            replaced.destroy();
        }
        self.next_from_future = true;
        debug!("Future scene committed, promotion at next tick");
        true
    }

    //--- Getters ----------------------------------------------------------

    /// Scene callers should treat as current: the live future scene, else
    /// the pending assignment, else the active scene.
    pub fn scene(&self) -> Option<&dyn Scene> {
        self.future
            .as_deref()
            .or(self.next.as_deref())
            .or(self.active.as_deref())
    }

    /// Mutable access to the scene reported by [`SceneSlots::scene`].
    pub fn scene_mut(&mut self) -> Option<&mut dyn Scene> {
        let slot = if self.future.is_some() {
            &mut self.future
        } else if self.next.is_some() {
            &mut self.next
        } else {
            &mut self.active
        };
        slot.as_mut().map(as_scene_mut)
    }

    /// The live future scene, else the pending future assignment.
    pub fn future_scene(&self) -> Option<&dyn Scene> {
        self.future.as_deref().or(self.pending_future.as_deref())
    }

    pub fn future_scene_mut(&mut self) -> Option<&mut dyn Scene> {
        let slot = if self.future.is_some() {
            &mut self.future
        } else {
            &mut self.pending_future
        };
        slot.as_mut().map(as_scene_mut)
    }

    /// The scene currently receiving updates as the primary scene.
    pub fn active_scene(&self) -> Option<&dyn Scene> {
        self.active.as_deref()
    }

    //--- Update Loop ------------------------------------------------------

    fn promote_next(&mut self) {
        let Some(mut next) = self.next.take() else {
            return;
        };

        if let Some(mut active) = self.active.take() {
            active.destroy();
        }
        if let Some(mut future) = self.future.take() {
            future.destroy();
        }

        if std::mem::take(&mut self.next_from_future) {
            info!("Committed future scene is now active");
        } else {
            next.initialize(&self.ids);
            info!("Scene promoted to active");
        }

        next.set_playing(true);
        self.active = Some(next);
    }

    fn promote_future(&mut self) {
        let Some(mut future) = self.pending_future.take() else {
            return;
        };

        if let Some(mut replaced) = self.future.take() {
            replaced.destroy();
        }

        future.initialize(&self.ids);
        future.set_playing(true);
        self.future = Some(future);
        info!("Future scene promoted");
    }
}

fn as_scene_mut(slot: &mut Box<dyn Scene>) -> &mut dyn Scene {
    &mut **slot
}

impl SceneScheduler for SceneSlots {
    fn update(&mut self, delta: f64) {
        self.promote_next();
        self.promote_future();

        if let Some(active) = self.active.as_mut() {
            active.drive(delta);
        }
        if let Some(future) = self.future.as_mut() {
            future.drive(delta);
        }
    }

    fn destroy(&mut self) {
        debug!("Destroying scene slots");

        for slot in [
            &mut self.future,
            &mut self.next,
            &mut self.active,
            &mut self.pending_future,
        ] {
            if let Some(mut scene) = slot.take() {
                scene.destroy();
            }
        }
        self.next_from_future = false;
    }

    fn current_scene(&self) -> Option<&dyn Scene> {
        self.scene()
    }

    fn current_scene_mut(&mut self) -> Option<&mut dyn Scene> {
        self.scene_mut()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
