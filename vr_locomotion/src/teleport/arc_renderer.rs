use crate::{
    config::ArchSegmentAsset,
    host::{SegmentHandle, SegmentHost},
    pose::Pose,
};

use super::{TeleportPath, TeleportSpline};

/// Draws the teleport arc as a chain of curved arch segments
///
/// Segments are engine objects; they are created on demand, kept for the
/// lifetime of the renderer, and hidden when the current path doesn't need them.
pub struct TeleportPathRenderer {
    asset: Option<ArchSegmentAsset>,
    spline: TeleportSpline,
    segments: Vec<SegmentHandle>,
}

impl TeleportPathRenderer {
    pub fn new(asset: Option<ArchSegmentAsset>) -> Self {
        TeleportPathRenderer {
            asset,
            spline: TeleportSpline::new(),
            segments: Vec::new(),
        }
    }

    /// Show `path` as `path.len() - 1` segments, in the local frame of `hand`
    ///
    /// An empty path hides everything.
    pub fn render(&mut self, path: &TeleportPath, hand: &Pose, host: &mut dyn SegmentHost) {
        for segment in &self.segments {
            host.set_segment_visible(*segment, false);
        }

        self.spline.rebuild(&path.points, hand);

        for i in 0..self.spline.len().saturating_sub(1) {
            let segment = match self.segments.get(i).copied() {
                Some(segment) => segment,
                None => {
                    let segment = host.spawn_segment(self.asset.as_ref());
                    self.segments.push(segment);
                    segment
                }
            };

            host.set_segment_visible(segment, true);

            if let (Some((start, start_tangent)), Some((end, end_tangent))) = (
                self.spline.location_and_tangent_at(i),
                self.spline.location_and_tangent_at(i + 1),
            ) {
                host.set_segment_start_and_end(segment, start, start_tangent, end, end_tangent);
            }
        }
    }

    pub fn pool_size(&self) -> usize {
        self.segments.len()
    }

    pub fn spline(&self) -> &TeleportSpline {
        &self.spline
    }
}
