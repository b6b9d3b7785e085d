//! ECS Components для entity тюремного блока
//!
//! Организация по доменам:
//! - movement: навигационный агент (NavAgent)
//! - animation: текущий clip и длины (AnimationPlayer)
//! - body: collision footprint (Footprint)
//! - world: detection layers, препятствия, markers, exit zone
//! - prisoner: цель guard'а (Prisoner)

pub mod animation;
pub mod body;
pub mod movement;
pub mod prisoner;
pub mod world;

// Re-exports для удобного импорта
pub use animation::*;
pub use body::*;
pub use movement::*;
pub use prisoner::*;
pub use world::*;
