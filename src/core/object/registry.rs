//=========================================================================
// Object Registry
//=========================================================================
//
// Holds the game objects belonging to one scene.
//
// Architecture:
//   ObjectRegistry
//     └─ objects: BTreeMap<ObjectId, ObjectHandle>   (id order = creation order)
//
// Flow:
//   update() → snapshot members → kill sweep / GameObject::update()
//
// Removal is cooperative: `remove` only raises the kill flag, and the
// object leaves on the next sweep. `remove_immediately` is the escape
// hatch that detaches and destroys on the spot.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::rc::Rc;

use log::debug;

//=== Internal Dependencies ===============================================

use super::{ObjectHandle, ObjectId, ObjectKind};
use crate::core::error::SceneError;

//=== ObjectRegistry ======================================================

/// Unique membership set of one scene's game objects.
#[derive(Default)]
pub struct ObjectRegistry {
    objects: BTreeMap<ObjectId, ObjectHandle>,
}

impl ObjectRegistry {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self::default()
    }

    //--- Membership -------------------------------------------------------

    /// Adds an object, initializing it first if needed.
    ///
    /// Returns the same handle so calls can be chained.
    ///
    /// # Errors
    ///
    /// [`SceneError::DuplicateObject`] if an object with the same identity
    /// is already registered. The registry is unchanged in that case.
    pub fn add(&mut self, object: ObjectHandle) -> Result<ObjectHandle, SceneError> {
        let (id, initialized) = {
            let object = object.borrow();
            (object.core().id(), object.core().initialized())
        };

        if self.objects.contains_key(&id) {
            return Err(SceneError::DuplicateObject {
                id,
                name: object.borrow().core().name.clone(),
            });
        }

        if !initialized {
            object.borrow_mut().initialize();
        }

        self.objects.insert(id, Rc::clone(&object));
        Ok(object)
    }

    /// Requests removal on the next sweep by raising the kill flag.
    pub fn remove(&self, object: &ObjectHandle) {
        object.borrow_mut().core_mut().kill = true;
    }

    /// Detaches and destroys the object right away.
    ///
    /// `None` is ignored. The object's `destroy` runs on every call, even if
    /// it was already detached by an earlier one; membership removal itself
    /// is idempotent.
    pub fn remove_immediately<'a>(&mut self, object: impl Into<Option<&'a ObjectHandle>>) {
        let Some(object) = object.into() else {
            return;
        };

        let id = {
            let mut object = object.borrow_mut();
            object.core_mut().kill = true;
            object.core().id()
        };

        self.objects.remove(&id);
        object.borrow_mut().destroy();
    }

    /// Raises the kill flag on every member except the given ones.
    pub fn kill_all(&self, except: &[ObjectHandle]) {
        let spared: Vec<ObjectId> = except.iter().map(|o| o.borrow().core().id()).collect();

        for (id, object) in &self.objects {
            if !spared.contains(id) {
                object.borrow_mut().core_mut().kill = true;
            }
        }
    }

    /// Destroys every member, leaving the registry empty.
    pub fn destroy(&mut self) {
        debug!("Destroying registry with {} objects", self.objects.len());

        for object in self.snapshot() {
            self.remove_immediately(&object);
        }
    }

    //--- Update Loop ------------------------------------------------------

    /// Runs one sweep over the members.
    ///
    /// Killed objects are removed and destroyed; the others are updated if
    /// their `update_enabled` flag is set. Members are taken from a snapshot
    /// made before the sweep, so each is visited at most once.
    pub fn update(&mut self, delta: f64) {
        for object in self.snapshot() {
            let (id, kill, update_enabled) = {
                let object = object.borrow();
                let core = object.core();
                (core.id(), core.kill, core.update_enabled)
            };

            if !self.objects.contains_key(&id) {
                continue;
            }

            if kill {
                self.remove_immediately(&object);
            } else if update_enabled {
                object.borrow_mut().update(delta);
            }
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: ObjectId) -> Option<ObjectHandle> {
        self.objects.get(&id).cloned()
    }

    pub fn contains(&self, object: &ObjectHandle) -> bool {
        self.objects.contains_key(&object.borrow().core().id())
    }

    /// First member carrying `name`, in creation order.
    pub fn object_by_name(&self, name: &str) -> Option<ObjectHandle> {
        self.objects_by_name(name).next()
    }

    /// Every member carrying `name`.
    pub fn objects_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = ObjectHandle> + 'a {
        self.objects
            .values()
            .filter(move |o| o.borrow().core().name == name)
            .cloned()
    }

    /// First member of the given kind, in creation order.
    pub fn first_object_by_kind(&self, kind: ObjectKind) -> Option<ObjectHandle> {
        self.objects_by_kind(kind).next()
    }

    /// Every member of the given kind.
    pub fn objects_by_kind(&self, kind: ObjectKind) -> impl Iterator<Item = ObjectHandle> + '_ {
        self.objects
            .values()
            .filter(move |o| o.borrow().kind() == kind)
            .cloned()
    }

    /// Every member, in creation order.
    pub fn all(&self) -> impl Iterator<Item = ObjectHandle> + '_ {
        self.objects.values().cloned()
    }

    //--- Internal Helpers -------------------------------------------------

    fn snapshot(&self) -> Vec<ObjectHandle> {
        self.objects.values().cloned().collect()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
