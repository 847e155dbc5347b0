//! AR session boundary: tracking data, anchor placement, session loop

pub mod tracking;
pub mod placement;
pub mod driver;

pub use tracking::{Anchor, Frame, HitKind, HitResult, Plane, PlaneKind, Pose, TapEvent, TrackingFailure};
pub use placement::{Placement, PlacementConfig, PlacementCoordinator};
pub use driver::{DriverConfig, DriverState, SessionDriver};
