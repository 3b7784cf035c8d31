//! Self-contained stand-ins for the engine's physics and navigation services
pub mod ballistic;
pub mod collision_world;
pub mod nav_mesh;

pub use ballistic::{BallisticPredictor, MAX_ARC_STEPS};
pub use collision_world::{CollisionWorld, StaticActor, SweepHit};
pub use nav_mesh::{NavCell, NavMesh};
