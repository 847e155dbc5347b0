//! Tracking data crossing the AR session boundary
//!
//! Plain data standing in for the AR runtime: per-tick frames carrying
//! updated planes and hit-test candidates, plus anchors minted from poses.
//! The session feed delivers frames strictly in arrival order.

use glam::{Quat, Vec3};

use crate::scene::SceneNodeId;

/// A tracked position and orientation in the physical environment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Orientation class of a detected plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaneKind {
    /// Flat surface facing up (floor, table) — the only kind auto-placement
    /// accepts.
    HorizontalUp,
    /// Flat surface facing down (ceiling).
    HorizontalDown,
    Vertical,
}

/// A detected flat physical surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub kind: PlaneKind,
    pub center: Pose,
}

/// What a hit-test candidate intersected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitKind {
    /// A tracked surface — valid for placement.
    Surface,
    /// Depth-only estimate, excluded by the validity predicate.
    DepthPoint,
    /// Isolated feature point, excluded by the validity predicate.
    FeaturePoint,
}

/// One candidate intersection returned by a hit-test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitResult {
    pub kind: HitKind,
    pub pose: Pose,
}

impl HitResult {
    /// Whether this hit may anchor a placement. Depth-only and point-only
    /// hits are excluded.
    pub fn is_valid(&self) -> bool {
        matches!(self.kind, HitKind::Surface)
    }
}

/// Why tracking quality is degraded this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingFailure {
    ExcessiveMotion,
    InsufficientLight,
    InsufficientFeatures,
}

/// A tracked pose that scene content can attach to, stable as the device
/// moves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub pose: Pose,
}

/// One tick of the session feed.
///
/// Carries the planes detected or updated this tick, the hit-test
/// candidates available against this frame, and the tracking quality
/// signal. The harness frame returns its candidates for any screen point;
/// real coordinate resolution lives on the other side of the boundary.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub updated_planes: Vec<Plane>,
    pub hit_candidates: Vec<HitResult>,
    pub tracking_failure: Option<TrackingFailure>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hit-test candidates for a screen point, in depth order.
    pub fn hit_test(&self, _x: f32, _y: f32) -> &[HitResult] {
        &self.hit_candidates
    }

    /// Mint an anchor at `pose`, or `None` while tracking is degraded.
    /// Callers absorb the `None` and retry on a later frame.
    pub fn create_anchor(&self, pose: Pose) -> Option<Anchor> {
        if self.tracking_failure.is_some() {
            return None;
        }
        Some(Anchor { pose })
    }
}

/// A confirmed single tap, with the scene node it landed on (if any) as
/// reported by the gesture layer's collision query.
#[derive(Clone, Copy, Debug)]
pub struct TapEvent {
    pub x: f32,
    pub y: f32,
    pub hit_node: Option<SceneNodeId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_validity_predicate() {
        let surface = HitResult {
            kind: HitKind::Surface,
            pose: Pose::identity(),
        };
        let depth = HitResult {
            kind: HitKind::DepthPoint,
            pose: Pose::identity(),
        };
        let point = HitResult {
            kind: HitKind::FeaturePoint,
            pose: Pose::identity(),
        };

        assert!(surface.is_valid());
        assert!(!depth.is_valid());
        assert!(!point.is_valid());
    }

    #[test]
    fn test_anchor_creation_succeeds_while_tracking() {
        let frame = Frame::new();
        let pose = Pose::from_position(Vec3::new(1.0, 0.0, -2.0));
        let anchor = frame.create_anchor(pose).unwrap();
        assert_eq!(anchor.pose, pose);
    }

    #[test]
    fn test_anchor_creation_fails_when_tracking_degraded() {
        let frame = Frame {
            tracking_failure: Some(TrackingFailure::ExcessiveMotion),
            ..Frame::new()
        };
        assert!(frame.create_anchor(Pose::identity()).is_none());
    }
}
