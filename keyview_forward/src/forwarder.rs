// Copyright 2025 the Keyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Forwarders: per-target policies that claim gestures and remap coordinates.
//!
//! ## Overview
//!
//! A [`Forwarder`] pairs a target view handle with a [`ForwardPolicy`].
//! Both policies share one precondition, checked by [`Forwarder::wants_gesture`]:
//!
//! 1. The target is visible.
//! 2. The touch lies inside the target's live global region.
//! 3. The sample is the first of its gesture.
//!
//! Only then does the policy make the final decision:
//!
//! - [`ForwardPolicy::TopPadding`] accepts touches above `region.y0 + padding`
//!   while the target's parent is visible. The parent controls whether the
//!   keyboard frame is shown, so the target's own flag is not enough.
//! - [`ForwardPolicy::CaptureCancel`] accepts any touch inside the region.
//!
//! An accepted gesture yields a [`GestureGeometry`], the snapshot the router
//! keeps for translating every later sample of that gesture.

use kurbo::{Point, Rect};

use crate::types::{ForwarderKind, TouchPhase, ViewTree};

/// Policy deciding whether a forwarder claims a gesture.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ForwardPolicy {
    /// Claim touches in the band of height `padding` at the top of the target.
    TopPadding {
        /// Band height in global units.
        padding: f64,
    },
    /// Claim any touch inside the target.
    CaptureCancel,
}

/// Geometry captured when a forwarder accepts a gesture.
///
/// Held by the router for the whole gesture so that layout or configuration
/// changes mid-gesture do not alter how samples are translated.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GestureGeometry {
    /// The target's global region at gesture start.
    pub region: Rect,
    /// Global y below which samples are in the top band, for top-padding captures.
    pub band_bottom: Option<f64>,
}

impl GestureGeometry {
    /// Translate a global point into the target's local space.
    ///
    /// Samples still inside the top band are clamped so their local y never
    /// exceeds `region.height() - 1`, or 0 for targets shorter than one unit.
    pub fn translate(&self, global: Point) -> Point {
        let mut local = global - self.region.origin().to_vec2();
        if let Some(bottom) = self.band_bottom
            && global.y < bottom
        {
            local.y = local.y.min((self.region.height() - 1.0).max(0.0));
        }
        local
    }
}

/// A target view plus the policy used to claim gestures for it.
#[derive(Clone, Debug)]
pub struct Forwarder<V> {
    target: V,
    policy: ForwardPolicy,
}

impl<V> Forwarder<V> {
    /// Forward touches in the top band of `target`. The band starts empty.
    pub fn top_padding(target: V) -> Self {
        Self {
            target,
            policy: ForwardPolicy::TopPadding { padding: 0.0 },
        }
    }

    /// Forward touches anywhere inside `target`.
    pub fn capture_cancel(target: V) -> Self {
        Self {
            target,
            policy: ForwardPolicy::CaptureCancel,
        }
    }

    /// The view this forwarder delivers to.
    pub fn target(&self) -> &V {
        &self.target
    }

    /// The active policy.
    pub fn policy(&self) -> ForwardPolicy {
        self.policy
    }

    /// The policy variant.
    pub fn kind(&self) -> ForwarderKind {
        match self.policy {
            ForwardPolicy::TopPadding { .. } => ForwarderKind::TopPadding,
            ForwardPolicy::CaptureCancel => ForwarderKind::CaptureCancel,
        }
    }

    /// Update the band height. Ignored by policies without a band.
    pub fn set_top_padding(&mut self, padding: f64) {
        if let ForwardPolicy::TopPadding { padding: p } = &mut self.policy {
            *p = padding;
        }
    }

    /// Decide whether this forwarder claims a gesture touching `point` (global).
    ///
    /// Returns the geometry to use for the rest of the gesture when accepted.
    pub fn wants_gesture(
        &self,
        host: &impl ViewTree<V>,
        point: Point,
        phase: TouchPhase,
    ) -> Option<GestureGeometry> {
        let region = self.claimable_region(host, point, phase)?;
        match self.policy {
            ForwardPolicy::TopPadding { padding } => {
                let band_bottom = region.y0 + padding;
                let frame_visible = host
                    .parent_of(&self.target)
                    .is_some_and(|parent| host.is_visible(&parent));
                (frame_visible && point.y < band_bottom).then_some(GestureGeometry {
                    region,
                    band_bottom: Some(band_bottom),
                })
            }
            ForwardPolicy::CaptureCancel => region.contains(point).then_some(GestureGeometry {
                region,
                band_bottom: None,
            }),
        }
    }

    // Shared precondition for every policy: visible target, touch inside its
    // live region, and the first sample of the gesture.
    fn claimable_region(
        &self,
        host: &impl ViewTree<V>,
        point: Point,
        phase: TouchPhase,
    ) -> Option<Rect> {
        if !host.is_visible(&self.target) {
            return None;
        }
        let region = host.global_rect(&self.target);
        if !region.contains(point) || !phase.starts_gesture() {
            return None;
        }
        Some(region)
    }
}
