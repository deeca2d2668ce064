//=========================================================================
// Core Systems
//=========================================================================
//
// Scene and game object lifecycle.
//
// Architecture:
//   object:  GameObject trait, ObjectCore, IdAllocator, ObjectRegistry
//   scene:   Scene trait, SceneSlots, SceneManager, transitions, preload
//   error:   SceneError
//
//=========================================================================

//=== Module Declarations =================================================

pub mod error;
pub mod object;
pub mod scene;

#[cfg(test)]
pub(crate) mod testing;

//=== Public API ==========================================================

pub use error::SceneError;
pub use object::{GameObject, IdAllocator, ObjectHandle, ObjectId, ObjectKind, ObjectRegistry};
pub use scene::{Scene, SceneKey, SceneManager, SceneScheduler, SceneSlots};
