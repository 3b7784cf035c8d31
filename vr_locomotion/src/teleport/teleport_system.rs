use cgmath::{Vector3, vec3};

use crate::{
    config::LocomotionConfig,
    pose::Pose,
    teleport_log,
};

use super::{
    CollisionChannels, NavMeshProjector, PredictParams, ProjectilePathPredictor, TeleportPath,
};

/// Tunables for finding a teleport destination
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TeleportConfig {
    pub speed: f32,
    pub radius: f32,
    pub sim_time: f32,
    pub nav_extent: Vector3<f32>,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        TeleportConfig {
            speed: 800.0,
            radius: 10.0,
            sim_time: 1.0,
            nav_extent: vec3(100.0, 100.0, 100.0),
        }
    }
}

impl From<&LocomotionConfig> for TeleportConfig {
    fn from(config: &LocomotionConfig) -> Self {
        TeleportConfig {
            speed: config.projectile_speed,
            radius: config.projectile_radius,
            sim_time: config.simulation_time,
            nav_extent: config.nav_extent,
        }
    }
}

/// Outcome of one teleport-target query
///
/// `landing_point` is present exactly when the arc hit something and that hit
/// projected onto a walkable surface. `path` is empty when the arc hit nothing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TeleportResolution {
    pub path: TeleportPath,
    pub hit_location: Option<Vector3<f32>>,
    pub landing_point: Option<Pose>,
}

impl TeleportResolution {
    pub fn invalid() -> Self {
        TeleportResolution::default()
    }

    pub fn is_valid(&self) -> bool {
        self.landing_point.is_some()
    }
}

/// Turns a hand pose into a validated teleport destination
pub struct TeleportTargetResolver {
    config: TeleportConfig,
    predictor: Box<dyn ProjectilePathPredictor>,
    projector: Box<dyn NavMeshProjector>,
}

impl TeleportTargetResolver {
    pub fn new(
        config: TeleportConfig,
        predictor: Box<dyn ProjectilePathPredictor>,
        projector: Box<dyn NavMeshProjector>,
    ) -> Self {
        TeleportTargetResolver {
            config,
            predictor,
            projector,
        }
    }

    pub fn config(&self) -> &TeleportConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: TeleportConfig) {
        self.config = config;
    }

    /// Predict an arc from `origin` along `aim_direction` and validate its landing spot
    ///
    /// The aim direction is scaled by the configured speed as-is; a degenerate
    /// direction still produces a query and the predictor decides what it means.
    pub fn resolve(&self, origin: &Pose, aim_direction: Vector3<f32>) -> TeleportResolution {
        let params = PredictParams {
            start: origin.position,
            launch_velocity: aim_direction * self.config.speed,
            radius: self.config.radius,
            max_sim_time: self.config.sim_time,
            channel: CollisionChannels::VISIBILITY,
            trace_complex: true,
        };

        let prediction = self.predictor.predict(&params);
        let Some(hit) = prediction.hit else {
            teleport_log!(TRACE, "teleport arc hit nothing within {}s", self.config.sim_time);
            return TeleportResolution::invalid();
        };

        let path = TeleportPath::new(prediction.path);

        let Some(landing) = self
            .projector
            .project_point(hit.location, self.config.nav_extent)
        else {
            teleport_log!(
                TRACE,
                "no walkable surface within {:?} of {:?}",
                self.config.nav_extent,
                hit.location
            );
            return TeleportResolution {
                path,
                hit_location: Some(hit.location),
                landing_point: None,
            };
        };

        TeleportResolution {
            path,
            hit_location: Some(hit.location),
            landing_point: Some(Pose::from_position(landing)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::teleport::{PredictHit, PredictResult};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Returns a canned result and records every query
    struct ScriptedPredictor {
        result: PredictResult,
        queries: Rc<RefCell<Vec<PredictParams>>>,
    }

    impl ProjectilePathPredictor for ScriptedPredictor {
        fn predict(&self, params: &PredictParams) -> PredictResult {
            self.queries.borrow_mut().push(*params);
            self.result.clone()
        }
    }

    /// Walkable plane at `height`, bounded to |x|,|z| <= half_size
    struct FlatNav {
        height: f32,
        half_size: f32,
    }

    impl NavMeshProjector for FlatNav {
        fn project_point(&self, point: Vector3<f32>, extent: Vector3<f32>) -> Option<Vector3<f32>> {
            let snapped = vec3(
                point.x.clamp(-self.half_size, self.half_size),
                self.height,
                point.z.clamp(-self.half_size, self.half_size),
            );
            let offset = snapped - point;
            (offset.x.abs() <= extent.x && offset.y.abs() <= extent.y && offset.z.abs() <= extent.z)
                .then_some(snapped)
        }
    }

    fn arc_to(hit: Option<Vector3<f32>>) -> PredictResult {
        let mut path = vec![vec3(0.0, 150.0, 0.0), vec3(0.0, 140.0, -50.0)];
        if let Some(location) = hit {
            path.push(location);
        }
        PredictResult {
            path,
            hit: hit.map(|location| PredictHit {
                location,
                normal: vec3(0.0, 1.0, 0.0),
                actor: Some(1),
            }),
        }
    }

    fn resolver(
        result: PredictResult,
        nav: FlatNav,
    ) -> (TeleportTargetResolver, Rc<RefCell<Vec<PredictParams>>>) {
        let queries = Rc::new(RefCell::new(Vec::new()));
        let predictor = ScriptedPredictor {
            result,
            queries: queries.clone(),
        };
        (
            TeleportTargetResolver::new(TeleportConfig::default(), Box::new(predictor), Box::new(nav)),
            queries,
        )
    }

    fn origin() -> Pose {
        Pose::from_position(vec3(0.0, 150.0, 0.0))
    }

    #[test]
    fn test_miss_is_invalid_with_no_path() {
        let (resolver, _) = resolver(arc_to(None), FlatNav { height: 0.0, half_size: 1000.0 });

        let resolution = resolver.resolve(&origin(), vec3(0.0, 0.0, -1.0));

        assert!(!resolution.is_valid());
        assert!(resolution.path.is_empty());
        assert!(resolution.landing_point.is_none());
    }

    #[test]
    fn test_hit_without_walkable_surface_is_invalid_but_keeps_path() {
        // Hit far above the floor: outside the 100 unit vertical extent
        let (resolver, _) = resolver(
            arc_to(Some(vec3(0.0, 400.0, -200.0))),
            FlatNav { height: 0.0, half_size: 1000.0 },
        );

        let resolution = resolver.resolve(&origin(), vec3(0.0, 0.0, -1.0));

        assert!(!resolution.is_valid());
        assert_eq!(resolution.path.len(), 3);
        assert_eq!(resolution.hit_location, Some(vec3(0.0, 400.0, -200.0)));
    }

    #[test]
    fn test_valid_landing_is_projected_point() {
        let hit = vec3(20.0, 10.0, -300.0);
        let (resolver, _) = resolver(arc_to(Some(hit)), FlatNav { height: 0.0, half_size: 1000.0 });

        let resolution = resolver.resolve(&origin(), vec3(0.0, 0.0, -1.0));

        assert!(resolution.is_valid());
        let landing = resolution.landing_point.unwrap().position;
        assert_eq!(landing, vec3(20.0, 0.0, -300.0));
        assert_ne!(landing, hit);

        let extent = resolver.config().nav_extent;
        let offset = landing - hit;
        assert!(offset.x.abs() <= extent.x && offset.y.abs() <= extent.y && offset.z.abs() <= extent.z);
        assert_eq!(resolution.path.last(), Some(hit));
    }

    #[test]
    fn test_extent_is_a_box_not_a_radius() {
        // 90 units off in both x and y: farther than 100 as a radius, inside the box
        let hit = vec3(590.0, 90.0, 0.0);
        let (resolver, _) = resolver(arc_to(Some(hit)), FlatNav { height: 0.0, half_size: 500.0 });

        let resolution = resolver.resolve(&origin(), vec3(1.0, 0.0, 0.0));

        assert_eq!(
            resolution.landing_point.map(|p| p.position),
            Some(vec3(500.0, 0.0, 0.0))
        );
    }

    #[test]
    fn test_query_uses_configured_speed_and_visibility_channel() {
        let (resolver, queries) = resolver(arc_to(None), FlatNav { height: 0.0, half_size: 1.0 });

        resolver.resolve(&origin(), vec3(0.0, 0.5, -1.0));

        let queries = queries.borrow();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].start, vec3(0.0, 150.0, 0.0));
        assert_eq!(queries[0].launch_velocity, vec3(0.0, 400.0, -800.0));
        assert_eq!(queries[0].radius, 10.0);
        assert_eq!(queries[0].channel, CollisionChannels::VISIBILITY);
        assert!(queries[0].trace_complex);
    }

    #[test]
    fn test_degenerate_aim_still_queries() {
        let (resolver, queries) = resolver(arc_to(None), FlatNav { height: 0.0, half_size: 1.0 });

        let resolution = resolver.resolve(&origin(), vec3(0.0, 0.0, 0.0));

        assert!(!resolution.is_valid());
        assert_eq!(queries.borrow().len(), 1);
        assert_eq!(queries.borrow()[0].launch_velocity, vec3(0.0, 0.0, 0.0));
    }
}
