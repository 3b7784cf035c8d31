use std::sync::Arc;

use cgmath::{Vector3, vec3};

use crate::teleport::{PredictHit, PredictParams, PredictResult, ProjectilePathPredictor};

use super::CollisionWorld;

/// Upper bound on samples per prediction, whatever the horizon
pub const MAX_ARC_STEPS: usize = 10_000;

/// Projectile path prediction against a [`CollisionWorld`]
///
/// Positions follow `p(t) = p0 + v0·t + ½·g·t²`, sampled `frequency` times per
/// second. Each step is swept as a sphere of the query radius; the first
/// contact ends the path.
pub struct BallisticPredictor {
    world: Arc<CollisionWorld>,
    gravity: f32,
    frequency: f32,
}

impl BallisticPredictor {
    pub fn new(world: Arc<CollisionWorld>, gravity: f32, frequency: f32) -> Self {
        BallisticPredictor {
            world,
            gravity,
            frequency: frequency.max(1.0),
        }
    }

    fn position_at(&self, params: &PredictParams, t: f32) -> Vector3<f32> {
        let acceleration = vec3(0.0, -self.gravity, 0.0);
        params.start + params.launch_velocity * t + acceleration * (0.5 * t * t)
    }
}

impl ProjectilePathPredictor for BallisticPredictor {
    fn predict(&self, params: &PredictParams) -> PredictResult {
        let max_time = params.max_sim_time.max(0.0);
        let steps = (max_time * self.frequency)
            .ceil()
            .min(MAX_ARC_STEPS as f32) as usize;
        let step_time = 1.0 / self.frequency;

        let mut path = Vec::with_capacity(steps + 1);
        path.push(params.start);
        let mut previous = params.start;

        for step in 1..=steps {
            let t = (step as f32 * step_time).min(max_time);
            let position = self.position_at(params, t);

            if let Some(hit) = self.world.sweep_sphere(
                previous,
                position,
                params.radius,
                params.channel,
                params.trace_complex,
            ) {
                path.push(hit.location);
                return PredictResult {
                    path,
                    hit: Some(PredictHit {
                        location: hit.location,
                        normal: hit.normal,
                        actor: Some(hit.actor),
                    }),
                };
            }

            path.push(position);
            previous = position;
        }

        PredictResult { path, hit: None }
    }
}
