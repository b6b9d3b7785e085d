//! Cellblock Simulation Core
//!
//! ECS-симуляция охранника тюремного блока на Bevy 0.16 (headless).
//!
//! Поток данных за один FixedUpdate tick (60Hz):
//! 1. Locomotion: NavAgent'ы двигают Transform'ы
//! 2. Perception: VisionSensor'ы сканируют (своя cadence, 0.2s)
//! 3. Behavior: state machine guard'а читает sensor и отдаёт команды
//! 4. Scene: сообщения, двери, exit zone

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod components;
pub mod guard;
pub mod logger;
pub mod movement;
pub mod perception;
pub mod scene;

// Re-export базовых типов для удобства
pub use components::*;
pub use guard::{GuardConfig, GuardPlugin, GuardSetup, GuardSetupError, GuardStateKind, GuardStateMachine, GuardTargets, Waypoint};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter};
pub use movement::MovementPlugin;
pub use perception::{PerceptionPlugin, SensorConfig, VisionSensor};
pub use scene::{CameraFraming, Door, DoorChanged, Escaped, MessageBoard, ScenePlugin};

/// Шаг симуляции (60Hz)
pub const FIXED_STEP: Duration = Duration::from_nanos(16_666_667);

/// Фазы tick'а (выполняются строго по порядку)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Locomotion,
    Perception,
    Behavior,
    Scene,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Seed из create_headless_app не перетираем
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_duration(FIXED_STEP))
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Locomotion,
                    SimulationSet::Perception,
                    SimulationSet::Behavior,
                    SimulationSet::Scene,
                )
                    .chain(),
            )
            .add_plugins((MovementPlugin, PerceptionPlugin, GuardPlugin, ScenePlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Каждый `app.update()` продвигает время ровно на один FIXED_STEP,
/// так что один update = один FixedUpdate tick.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(TimeUpdateStrategy::ManualDuration(FIXED_STEP))
        .insert_resource(Time::<Fixed>::from_duration(FIXED_STEP));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
