//=========================================================================
// Core Errors
//=========================================================================
//
// Failures surfaced by the object registry and the scene schedulers.
//
// Absence is never an error here: lookups return `None` or an empty
// iterator, and removing a missing object is a silent no-op.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::object::ObjectId;

//=== SceneError ==========================================================

/// Errors reported by scene and registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// The object is already a member of the registry.
    ///
    /// The registry is left untouched when this is returned.
    #[error("{name} (id {id}) is already added to the scene")]
    DuplicateObject { id: ObjectId, name: String },

    /// No scene definition exists under the requested name.
    #[error("no scene is defined under the name {0}")]
    UnknownScene(String),
}
