//=========================================================================
// Level Flow Demo
//
// Runs a title screen that preloads on a worker thread, then walks
// through two levels with move-in transitions. Coins collect themselves
// over time and each level advances once its coins are gone.
//
// Run with:
//   RUST_LOG=debug cargo run --example level_flow
//
//=========================================================================

use std::thread;
use std::time::Duration;

use cadence_engine::core::object::{apply_params, handle, ParamValue};
use cadence_engine::prelude::*;
use log::{info, LevelFilter};

//=== Scene Names =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Stage {
    Title,
    Meadow,
    Caves,
}

impl SceneKey for Stage {}

//=== Coin ================================================================

const COIN: ObjectKind = ObjectKind::new("coin");

struct Coin {
    core: ObjectCore,
    lifetime: f64,
}

impl Coin {
    fn new(ids: &IdAllocator, lifetime: f64) -> Self {
        let mut params = ObjectParams::new();
        params.insert("update_enabled".into(), ParamValue::Boolean(true));
        Self {
            core: ObjectCore::with_params(ids, params),
            lifetime,
        }
    }
}

impl GameObject for Coin {
    fn core(&self) -> &ObjectCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ObjectCore {
        &mut self.core
    }

    fn kind(&self) -> ObjectKind {
        COIN
    }

    fn initialize(&mut self) {
        apply_params(self);
        self.core.name = format!("coin_{}", self.core.id());
    }

    fn update(&mut self, delta: f64) {
        self.lifetime -= delta;
        if self.lifetime <= 0.0 {
            info!("{} collected", self.core.name);
            self.core.kill = true;
        }
    }
}

//=== Scenes ==============================================================

struct Title {
    core: SceneCore,
}

impl Scene for Title {
    fn core(&self) -> &SceneCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SceneCore {
        &mut self.core
    }

    fn preload(&mut self, signal: PreloadSignal) -> bool {
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            if let Err(err) = signal.complete() {
                log::warn!("{}", err);
            }
        });
        true
    }

    fn initialize(&mut self, _ids: &IdAllocator) {
        info!("Title ready");
    }
}

struct Level {
    core: SceneCore,
    coins: usize,
}

impl Level {
    fn coins_left(&self) -> usize {
        self.objects_by_kind(COIN).count()
    }
}

impl Scene for Level {
    fn core(&self) -> &SceneCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SceneCore {
        &mut self.core
    }

    fn initialize(&mut self, ids: &IdAllocator) {
        for i in 0..self.coins {
            let coin = handle(Coin::new(ids, 0.25 * (i + 1) as f64));
            if let Err(err) = self.add(coin) {
                log::error!("{}", err);
            }
        }
        info!("Level ready with {} coins", self.coins);
    }
}

fn level_factory(args: &[SceneArg]) -> Box<dyn Scene> {
    let coins = args
        .first()
        .and_then(ParamValue::as_integer)
        .unwrap_or(1)
        .max(0) as usize;
    Box::new(Level {
        core: SceneCore::new(),
        coins,
    })
}

//=== Main ================================================================

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .init();

    let config = EngineConfig::from_toml_str(
        r#"
            tps = 60.0

            [scene_manager]
            mode = "single"
            default_transition_time = 0.5
        "#,
    )
    .unwrap_or_else(|err| {
        log::error!("{}, falling back to defaults", err);
        EngineConfig::default()
    });

    let mut engine = Engine::<SceneManager<Stage>>::from_config(&config);
    let manager = engine.scheduler_mut();

    manager.define(
        Stage::Title,
        |_| {
            Box::new(Title {
                core: SceneCore::new(),
            })
        },
        SceneOptions::new().with_transition(SceneTransition::FadeIn, 0.25),
    );
    manager.define(
        Stage::Meadow,
        level_factory,
        SceneOptions::new()
            .with_args(vec![SceneArg::Integer(3)])
            .with_transition(SceneTransition::MoveInRight, 0.5),
    );
    manager.define(
        Stage::Caves,
        level_factory,
        SceneOptions::new()
            .with_args(vec![SceneArg::Integer(5)])
            .with_transition(SceneTransition::MoveInDown, 0.5),
    );
    manager.set_level_names(vec![Stage::Meadow, Stage::Caves]);
    manager.start(&Stage::Title);

    let mut title_ticks = 0;
    let ticks = engine.run_while(|engine| {
        let manager = engine.scheduler_mut();
        let Some(id) = manager.current_scene_id() else {
            return true;
        };
        if manager.pending_count() > 0 || manager.is_preloading(id) || manager.is_transitioning(id)
        {
            return true;
        }

        match manager.scene_name(id).copied() {
            Some(Stage::Title) => {
                title_ticks += 1;
                if title_ticks > 30 {
                    manager.start_level_progression();
                }
                true
            }
            Some(_) => {
                let cleared = manager
                    .scene(id)
                    .and_then(|scene| scene.downcast_ref::<Level>())
                    .is_some_and(|level| level.coins_left() == 0);
                !cleared || manager.next_level()
            }
            None => false,
        }
    });

    info!("Finished after {} ticks", ticks);
    engine.destroy();
}
