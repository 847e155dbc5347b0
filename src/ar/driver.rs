//! Session loop driver: plane auto-placement, tap placement, scene reset
//!
//! A two-state machine over one condition: has anything been placed this
//! session. While `Empty`, each session update scans for the first
//! upward-facing horizontal plane and auto-places on it; afterwards only
//! taps add objects. Missing planes, invalid hits, and anchor failures are
//! absorbed silently — the retry budget is unbounded, tied to the session
//! lifetime.

use std::path::Path;

use crate::ar::placement::{Placement, PlacementConfig, PlacementCoordinator};
use crate::ar::tracking::{Frame, PlaneKind, TapEvent};
use crate::scene::{InstancePool, ModelRenderer, SceneGraph};

/// Whether anything has been placed yet this session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Empty,
    Populated,
}

/// Session-level options.
#[derive(Clone, Copy, Debug)]
pub struct DriverConfig {
    /// Auto-place one object on the first qualifying plane.
    pub auto_place: bool,
    pub placement: PlacementConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            auto_place: true,
            placement: PlacementConfig::default(),
        }
    }
}

/// Consumes the session update feed and drives placements.
pub struct SessionDriver {
    config: DriverConfig,
    coordinator: PlacementCoordinator,
    state: DriverState,
    placements: Vec<Placement>,
}

impl SessionDriver {
    pub fn new(config: DriverConfig) -> Self {
        Self {
            coordinator: PlacementCoordinator::new(config.placement),
            config,
            state: DriverState::Empty,
            placements: Vec::new(),
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Process one session update.
    ///
    /// While `Empty` (and auto-placement is on), takes the first
    /// upward-facing horizontal plane, anchors at its center pose, and
    /// places `asset` there. At most one placement per update. Returns the
    /// placement if one was created; `None` covers both "nothing qualified
    /// yet" and "already populated".
    pub fn on_session_update<R: ModelRenderer>(
        &mut self,
        graph: &mut SceneGraph,
        renderer: &mut R,
        pool: &mut InstancePool,
        frame: &Frame,
        asset: &Path,
    ) -> Option<Placement> {
        if !self.config.auto_place || self.state == DriverState::Populated {
            return None;
        }

        let plane = frame
            .updated_planes
            .iter()
            .find(|p| p.kind == PlaneKind::HorizontalUp)?;

        // Anchor creation can fail under degraded tracking; absorbed, the
        // next update retries
        let anchor = frame.create_anchor(plane.center)?;

        let placement = self
            .coordinator
            .place(graph, renderer, pool, anchor, asset);
        self.state = DriverState::Populated;
        self.placements.push(placement);
        log::info!("auto-placed on detected plane");

        Some(placement)
    }

    /// Process a confirmed tap.
    ///
    /// A tap landing on an existing node is ignored. Otherwise the first
    /// valid hit-test candidate anchors a new placement — allowed in any
    /// state; repeated taps keep adding objects.
    pub fn on_tap<R: ModelRenderer>(
        &mut self,
        graph: &mut SceneGraph,
        renderer: &mut R,
        pool: &mut InstancePool,
        frame: &Frame,
        tap: &TapEvent,
        asset: &Path,
    ) -> Option<Placement> {
        if tap.hit_node.is_some() {
            return None;
        }

        let hit = frame.hit_test(tap.x, tap.y).iter().find(|h| h.is_valid())?;
        let anchor = frame.create_anchor(hit.pose)?;

        let placement = self
            .coordinator
            .place(graph, renderer, pool, anchor, asset);
        self.state = DriverState::Populated;
        self.placements.push(placement);
        log::info!("placed from tap");

        Some(placement)
    }

    /// Clear all placed objects and the instance pool, back to `Empty`.
    pub fn reset(&mut self, graph: &mut SceneGraph, pool: &mut InstancePool) {
        for placement in self.placements.drain(..) {
            graph.remove_subtree(placement.container);
        }
        pool.clear();
        self.state = DriverState::Empty;
        log::debug!("session driver reset");
    }
}
