#[macro_use]
pub mod logging;

pub mod blinker;
pub mod climb;
pub mod config;
pub mod error;
pub mod host;
pub mod input_context;
pub mod locomotion_controller;
pub mod pose;
pub mod scheduler;
pub mod teleport;
pub mod time;
pub mod vr_config;
pub mod world;

pub use blinker::{Blinker, BlinkerParams, RadiusCurve};
pub use climb::{ClimbPhase, HandClimbState, HandRegistry};
pub use config::{ArchSegmentAsset, CurveKey, LocomotionConfig};
pub use error::{ConfigError, ConfigResult};
pub use host::{LocomotionHost, simulated::SimulatedHost};
pub use input_context::{ActionMapper, Hand, InputContext, LocomotionAction};
pub use locomotion_controller::LocomotionController;
pub use pose::Pose;
pub use scheduler::DeferredTask;
pub use teleport::{TeleportPath, TeleportResolution, TeleportTargetResolver};
pub use time::Time;
pub use vr_config::{Handedness, TeleportButton};
pub use world::{BallisticPredictor, CollisionWorld, NavCell, NavMesh, StaticActor};
