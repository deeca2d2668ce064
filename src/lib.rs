//=========================================================================
// Cadence Engine - Library Root
//
// This crate defines the public API surface of the Cadence Engine.
//
// Responsibilities:
// - Expose the tick driver (`Engine`, `EngineBuilder`, `EngineConfig`)
// - Expose the scene and game object lifecycle (`core`)
// - Keep scene changes deferred to tick boundaries so no update sweep
//   ever observes its own structural mutation
//
// Typical usage:
// ```no_run
// use cadence_engine::prelude::*;
//
// fn main() {
//     let mut engine = Engine::<SceneManager<&'static str>>::from_config(&EngineConfig::default());
//     engine.scheduler_mut().define_scene::<BasicScene>("main", SceneOptions::new());
//     engine.scheduler_mut().start(&"main");
//     let mut frames = 0;
//     engine.run_while(|_| {
//         frames += 1;
//         frames <= 600
//     });
//     engine.destroy();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the object registry, the scene trait and both scene
// schedulers. `prelude` re-exports the types most games need.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `engine` defines the outer tick driver and its configuration.
//
mod engine;

//--- Public Exports ------------------------------------------------------

pub use engine::{ConfigError, Engine, EngineBuilder, EngineConfig};
