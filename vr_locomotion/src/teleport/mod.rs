// VR teleport movement
//
// The right hand aims a ballistic arc; where it lands is snapped onto the
// walkable surface and shown with a marker. Committing fades the screen out,
// moves the body, and fades back in.

pub mod arc_renderer;
pub mod spline;
pub mod teleport_system;
pub mod teleport_ui;
pub mod trajectory;

pub use arc_renderer::TeleportPathRenderer;
pub use spline::{SplinePoint, TeleportSpline};
pub use teleport_system::{TeleportConfig, TeleportResolution, TeleportTargetResolver};
pub use teleport_ui::{DestinationMarker, TeleportUI};
pub use trajectory::{
    CollisionChannels, NavMeshProjector, PredictHit, PredictParams, PredictResult,
    ProjectilePathPredictor, TeleportPath,
};
