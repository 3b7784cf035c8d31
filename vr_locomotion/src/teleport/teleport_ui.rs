use cgmath::{Vector3, vec3};

use crate::{host::SegmentHost, pose::Pose};

use super::{TeleportPath, TeleportPathRenderer, TeleportResolution};

/// Landing indicator shown where a teleport would put the player
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DestinationMarker {
    pub visible: bool,
    pub position: Vector3<f32>,
}

impl Default for DestinationMarker {
    fn default() -> Self {
        DestinationMarker {
            visible: false,
            position: vec3(0.0, 0.0, 0.0),
        }
    }
}

impl DestinationMarker {
    /// Where a teleport would go right now
    pub fn destination(&self) -> Option<Vector3<f32>> {
        self.visible.then_some(self.position)
    }
}

pub struct TeleportUI;

impl TeleportUI {
    /// Update marker and arc from the latest resolution
    ///
    /// A valid resolution shows the marker at the landing point and draws the
    /// arc in the aiming hand's frame; anything else hides both.
    pub fn apply(
        resolution: &TeleportResolution,
        hand: &Pose,
        marker: &mut DestinationMarker,
        renderer: &mut TeleportPathRenderer,
        host: &mut dyn SegmentHost,
    ) {
        match resolution.landing_point {
            Some(landing) => {
                marker.visible = true;
                marker.position = landing.position;
                renderer.render(&resolution.path, hand, host);
            }
            None => Self::clear(marker, renderer, host),
        }
    }

    pub fn clear(
        marker: &mut DestinationMarker,
        renderer: &mut TeleportPathRenderer,
        host: &mut dyn SegmentHost,
    ) {
        marker.visible = false;
        renderer.render(&TeleportPath::empty(), &Pose::default(), host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ArchSegmentAsset, host::SegmentHandle};

    #[derive(Default)]
    struct CountingSegments {
        next: u32,
        visible: std::collections::HashSet<SegmentHandle>,
    }

    impl SegmentHost for CountingSegments {
        fn spawn_segment(&mut self, _asset: Option<&ArchSegmentAsset>) -> SegmentHandle {
            self.next += 1;
            SegmentHandle(self.next)
        }

        fn set_segment_visible(&mut self, segment: SegmentHandle, visible: bool) {
            if visible {
                self.visible.insert(segment);
            } else {
                self.visible.remove(&segment);
            }
        }

        fn set_segment_start_and_end(
            &mut self,
            _segment: SegmentHandle,
            _start: Vector3<f32>,
            _start_tangent: Vector3<f32>,
            _end: Vector3<f32>,
            _end_tangent: Vector3<f32>,
        ) {
        }
    }

    fn valid_resolution() -> TeleportResolution {
        TeleportResolution {
            path: TeleportPath::new(vec![
                vec3(0.0, 100.0, 0.0),
                vec3(0.0, 80.0, -100.0),
                vec3(0.0, 10.0, -200.0),
            ]),
            hit_location: Some(vec3(0.0, 10.0, -200.0)),
            landing_point: Some(Pose::from_position(vec3(0.0, 0.0, -200.0))),
        }
    }

    #[test]
    fn test_valid_resolution_shows_marker_and_arc() {
        let mut host = CountingSegments::default();
        let mut renderer = TeleportPathRenderer::new(None);
        let mut marker = DestinationMarker::default();

        TeleportUI::apply(&valid_resolution(), &Pose::default(), &mut marker, &mut renderer, &mut host);

        assert_eq!(marker.destination(), Some(vec3(0.0, 0.0, -200.0)));
        assert_eq!(host.visible.len(), 2);
    }

    #[test]
    fn test_invalid_resolution_hides_marker_and_arc() {
        let mut host = CountingSegments::default();
        let mut renderer = TeleportPathRenderer::new(None);
        let mut marker = DestinationMarker::default();

        TeleportUI::apply(&valid_resolution(), &Pose::default(), &mut marker, &mut renderer, &mut host);

        let mut invalid = valid_resolution();
        invalid.landing_point = None;
        TeleportUI::apply(&invalid, &Pose::default(), &mut marker, &mut renderer, &mut host);

        assert!(!marker.visible);
        assert!(marker.destination().is_none());
        assert!(host.visible.is_empty());
        assert_eq!(renderer.pool_size(), 2);
    }
}
