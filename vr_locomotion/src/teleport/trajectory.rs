use bitflags::bitflags;
use cgmath::{InnerSpace, Vector3};

use crate::host::ActorId;

bitflags! {
    /// Trace channels a collider responds to
    pub struct CollisionChannels: u32 {
        const WORLD_STATIC = 0b0001;
        const VISIBILITY   = 0b0010;
        const CAMERA       = 0b0100;
    }
}

/// Sampled teleport arc, in world space, in launch order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TeleportPath {
    pub points: Vec<Vector3<f32>>,
}

impl TeleportPath {
    pub fn new(points: Vec<Vector3<f32>>) -> Self {
        TeleportPath { points }
    }

    pub fn empty() -> Self {
        TeleportPath::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<Vector3<f32>> {
        self.points.last().copied()
    }

    /// Total length of the polyline
    pub fn arc_length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).magnitude())
            .sum()
    }

    /// Point at normalized position `t` (0.0 to 1.0), interpolated by sample index
    pub fn point_at_normalized(&self, t: f32) -> Option<Vector3<f32>> {
        if self.points.is_empty() {
            return None;
        }

        let last = self.points.len() - 1;
        let scaled = t.clamp(0.0, 1.0) * last as f32;
        let index = (scaled as usize).min(last);

        if index == last {
            return Some(self.points[last]);
        }

        let t_local = scaled - index as f32;
        let p1 = self.points[index];
        let p2 = self.points[index + 1];

        Some(p1 + (p2 - p1) * t_local)
    }
}

/// Inputs to a ballistic path prediction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PredictParams {
    pub start: Vector3<f32>,
    pub launch_velocity: Vector3<f32>,
    /// Thickness of the swept projectile
    pub radius: f32,
    pub max_sim_time: f32,
    pub channel: CollisionChannels,
    /// Test against per-triangle (complex) collision rather than simple bounds
    pub trace_complex: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PredictHit {
    /// Projectile center at the moment of impact
    pub location: Vector3<f32>,
    pub normal: Vector3<f32>,
    pub actor: Option<ActorId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PredictResult {
    /// Sampled positions from launch up to the impact (or the horizon)
    pub path: Vec<Vector3<f32>>,
    pub hit: Option<PredictHit>,
}

/// Physics service that simulates a thrown projectile
pub trait ProjectilePathPredictor {
    fn predict(&self, params: &PredictParams) -> PredictResult;
}

/// Navigation service that snaps points onto walkable surfaces
pub trait NavMeshProjector {
    /// Nearest walkable point whose offset from `point` lies inside `±extent` on every axis
    fn project_point(&self, point: Vector3<f32>, extent: Vector3<f32>) -> Option<Vector3<f32>>;
}
