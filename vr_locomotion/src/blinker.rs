use cgmath::{InnerSpace, Vector2, Vector3};

use crate::{
    blinker_log,
    config::{CurveKey, LocomotionConfig},
    host::ScreenServices,
    pose::Pose,
};

/// Normalized screen center; used whenever there is no direction of travel to lead
pub const SCREEN_CENTER: Vector2<f32> = Vector2::new(0.5, 0.5);

/// Speeds below this count as standing still
const MIN_SPEED: f32 = 1e-4;

/// Vignette parameters for one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlinkerParams {
    pub radius: f32,
    /// Clear spot of the vignette, in normalized (0..1) screen coordinates
    pub center: Vector2<f32>,
}

/// Piecewise-linear speed -> radius mapping, clamped at both ends
#[derive(Clone, Debug, PartialEq)]
pub struct RadiusCurve {
    keys: Vec<CurveKey>,
}

impl RadiusCurve {
    /// Keys must be sorted by speed; an empty key list yields no curve
    pub fn new(keys: Vec<CurveKey>) -> Option<Self> {
        if keys.is_empty() {
            None
        } else {
            Some(RadiusCurve { keys })
        }
    }

    pub fn evaluate(&self, speed: f32) -> f32 {
        let first = self.keys[0];
        let last = self.keys[self.keys.len() - 1];

        if speed <= first.speed {
            return first.radius;
        }
        if speed >= last.speed {
            return last.radius;
        }

        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if speed <= b.speed {
                let span = b.speed - a.speed;
                if span <= f32::EPSILON {
                    return b.radius;
                }
                let t = (speed - a.speed) / span;
                return a.radius + (b.radius - a.radius) * t;
            }
        }

        last.radius
    }
}

/// Screen-space spot the vignette should stay clear around
///
/// A point `distance` units from the camera along the direction of travel is
/// projected to the screen. When moving away from where the camera faces the
/// point is taken behind the motion instead, which lands it in front of the camera.
pub fn blinker_center(
    velocity: Vector3<f32>,
    camera: &Pose,
    distance: f32,
    screen: &dyn ScreenServices,
) -> Vector2<f32> {
    if velocity.magnitude2() < MIN_SPEED * MIN_SPEED {
        return SCREEN_CENTER;
    }

    let direction = velocity.normalize();
    let stationary_point = if camera.forward().dot(direction) > 0.0 {
        camera.position + direction * distance
    } else {
        camera.position - direction * distance
    };

    let Some(screen_location) = screen.project_world_to_screen(stationary_point) else {
        return SCREEN_CENTER;
    };

    match screen.viewport_size() {
        Some((width, height)) if width > 0 && height > 0 => Vector2::new(
            screen_location.x / width as f32,
            screen_location.y / height as f32,
        ),
        _ => SCREEN_CENTER,
    }
}

/// Velocity-driven comfort vignette
#[derive(Clone, Debug)]
pub struct Blinker {
    curve: Option<RadiusCurve>,
    speed_scale: f32,
    projection_distance: f32,
    current: Option<BlinkerParams>,
}

impl Blinker {
    pub fn new(curve: Option<RadiusCurve>, speed_scale: f32, projection_distance: f32) -> Self {
        Blinker {
            curve,
            speed_scale,
            projection_distance,
            current: None,
        }
    }

    pub fn from_config(config: &LocomotionConfig) -> Self {
        Blinker::new(
            config.blinker_curve.clone().and_then(RadiusCurve::new),
            config.blinker_speed_scale,
            config.blinker_projection_distance,
        )
    }

    /// Recompute the vignette; `None` when no curve is configured
    pub fn update(
        &mut self,
        velocity: Vector3<f32>,
        camera: &Pose,
        screen: &dyn ScreenServices,
    ) -> Option<BlinkerParams> {
        let curve = self.curve.as_ref()?;

        let radius = curve.evaluate(velocity.magnitude() * self.speed_scale);
        let center = blinker_center(velocity, camera, self.projection_distance, screen);
        let params = BlinkerParams { radius, center };

        blinker_log!(TRACE, "blinker radius {} center {:?}", radius, center);
        self.current = Some(params);
        Some(params)
    }

    pub fn current(&self) -> Option<BlinkerParams> {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FadeRequest;
    use cgmath::vec3;
    use std::cell::RefCell;

    /// Projects by dropping depth and records every query
    struct FlatScreen {
        viewport: Option<(u32, u32)>,
        queries: RefCell<Vec<Vector3<f32>>>,
    }

    impl FlatScreen {
        fn new(viewport: Option<(u32, u32)>) -> Self {
            FlatScreen {
                viewport,
                queries: RefCell::new(Vec::new()),
            }
        }
    }

    impl ScreenServices for FlatScreen {
        fn project_world_to_screen(&self, world: Vector3<f32>) -> Option<Vector2<f32>> {
            self.queries.borrow_mut().push(world);
            Some(Vector2::new(960.0 + world.x, 540.0 - world.y))
        }

        fn viewport_size(&self) -> Option<(u32, u32)> {
            self.viewport
        }

        fn has_camera_fader(&self) -> bool {
            false
        }

        fn start_camera_fade(&mut self, _request: FadeRequest) {}
    }

    fn keys() -> Vec<CurveKey> {
        vec![
            CurveKey { speed: 0.0, radius: 1.0 },
            CurveKey { speed: 2.0, radius: 0.6 },
            CurveKey { speed: 6.0, radius: 0.2 },
        ]
    }

    #[test]
    fn test_curve_interpolates_and_clamps() {
        let curve = RadiusCurve::new(keys()).unwrap();

        assert_eq!(curve.evaluate(-5.0), 1.0);
        assert_eq!(curve.evaluate(0.0), 1.0);
        assert!((curve.evaluate(1.0) - 0.8).abs() < 1e-6);
        assert!((curve.evaluate(4.0) - 0.4).abs() < 1e-6);
        assert_eq!(curve.evaluate(100.0), 0.2);
    }

    #[test]
    fn test_empty_curve_is_none() {
        assert!(RadiusCurve::new(Vec::new()).is_none());
    }

    #[test]
    fn test_still_body_centers_exactly() {
        let screen = FlatScreen::new(Some((1920, 1080)));
        let center = blinker_center(vec3(0.0, 0.0, 0.0), &Pose::default(), 1000.0, &screen);

        assert_eq!(center, Vector2::new(0.5, 0.5));
        assert!(screen.queries.borrow().is_empty());

        let center = blinker_center(vec3(1e-6, 0.0, 0.0), &Pose::default(), 1000.0, &screen);
        assert_eq!(center, SCREEN_CENTER);
    }

    #[test]
    fn test_forward_motion_projects_ahead() {
        let screen = FlatScreen::new(Some((1920, 1080)));
        let camera = Pose::from_position(vec3(0.0, 170.0, 0.0));

        blinker_center(vec3(0.0, 0.0, -300.0), &camera, 1000.0, &screen);

        assert_eq!(screen.queries.borrow()[0], vec3(0.0, 170.0, -1000.0));
    }

    #[test]
    fn test_backward_motion_projects_from_behind_branch() {
        let screen = FlatScreen::new(Some((1920, 1080)));
        let camera = Pose::from_position(vec3(0.0, 170.0, 0.0));

        // Camera faces -Z, body moves +Z
        blinker_center(vec3(0.0, 0.0, 300.0), &camera, 1000.0, &screen);

        assert_eq!(screen.queries.borrow()[0], vec3(0.0, 170.0, -1000.0));
    }

    #[test]
    fn test_center_is_normalized_by_viewport() {
        let screen = FlatScreen::new(Some((1920, 1080)));
        let camera = Pose::from_position(vec3(0.0, 0.0, 0.0));

        // Strafing right: the projected point sits 1000 px right of center
        let center = blinker_center(vec3(1.0, 0.0, -1.0), &camera, 1000.0, &screen);
        let expected_x = (960.0 + 1000.0 / 2f32.sqrt()) / 1920.0;

        assert!((center.x - expected_x).abs() < 1e-4);
        assert!((center.y - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_missing_viewport_falls_back_to_center() {
        let screen = FlatScreen::new(None);
        let center = blinker_center(vec3(0.0, 0.0, -10.0), &Pose::default(), 1000.0, &screen);
        assert_eq!(center, SCREEN_CENTER);
    }

    #[test]
    fn test_update_without_curve_is_skipped() {
        let screen = FlatScreen::new(Some((100, 100)));
        let mut blinker = Blinker::new(None, 0.01, 1000.0);

        assert!(blinker.update(vec3(0.0, 0.0, -500.0), &Pose::default(), &screen).is_none());
        assert!(blinker.current().is_none());
    }

    #[test]
    fn test_update_scales_speed_before_curve() {
        let screen = FlatScreen::new(Some((1920, 1080)));
        let mut blinker = Blinker::new(RadiusCurve::new(keys()), 0.01, 1000.0);

        // 400 units/s -> 4.0 on the curve
        let params = blinker
            .update(vec3(0.0, 0.0, -400.0), &Pose::default(), &screen)
            .unwrap();

        assert!((params.radius - 0.4).abs() < 1e-6);
        assert_eq!(blinker.current(), Some(params));
    }
}
