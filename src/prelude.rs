//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use cadence_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder, EngineConfig};

// Errors
pub use crate::core::error::SceneError;

// Game objects
pub use crate::core::object::{
    GameObject, IdAllocator, ObjectCore, ObjectHandle, ObjectKind, ObjectParams,
};

// Scene system
pub use crate::core::scene::{
    BasicScene, PreloadSignal, Scene, SceneArg, SceneCore, SceneId, SceneKey, SceneManager,
    SceneManagerMode, SceneOptions, SceneScheduler, SceneSlots, SceneTransition, StartRequest,
};
