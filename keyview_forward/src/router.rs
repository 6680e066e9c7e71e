// Copyright 2025 the Keyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch router implementation.
//!
//! ## Overview
//!
//! Latches one forwarder per gesture and remaps the gesture's samples into the
//! forwarder target's local space.
//!
//! ## Gesture lifecycle
//!
//! - On `Down`, [`TouchRouter::route_start`] asks each forwarder in priority
//!   order whether it wants the gesture. The first to accept is latched along
//!   with the geometry it computed; if none accept, the latch is cleared.
//! - Every later sample goes through [`TouchRouter::route_continue`], which
//!   never re-evaluates the capture decision. Samples land wherever the
//!   latched geometry maps them, even far outside the target.
//! - An `Up` or `Cancel` sample always releases the latch.
//!
//! ## Priority
//!
//! The top-padding forwarder is always consulted before the capture canceler.
//! Their regions overlap at the top of the keyboard and the first accept wins.

use kurbo::Point;
use log::{debug, trace, warn};
use smallvec::SmallVec;

use crate::forwarder::{Forwarder, GestureGeometry};
use crate::hover::{HostFlags, HoverDisposition, filter_hover};
use crate::types::{ForwarderKind, RouteOutcome, TouchSample, ViewTree};

#[derive(Copy, Clone, Debug)]
struct Latch {
    slot: usize,
    geometry: GestureGeometry,
}

/// Routes touch samples arriving at a keyboard container to the forwarder
/// that claimed the current gesture.
///
/// ## Usage
///
/// - Construct with [`TouchRouter::new`] once the container and keyboard views
///   exist. Handles are copied; the host owns the views.
/// - Call [`TouchRouter::set_top_padding`] whenever layout changes the band.
/// - Feed every sample through [`TouchRouter::route`], or drive
///   [`TouchRouter::route_start`] / [`TouchRouter::route_continue`] directly
///   from the host's intercept and touch callbacks.
#[derive(Clone, Debug)]
pub struct TouchRouter<V> {
    container: V,
    forwarders: SmallVec<[Forwarder<V>; 2]>,
    active: Option<Latch>,
}

impl<V: Copy> TouchRouter<V> {
    /// Create a router for `container` forwarding to `keyboard`.
    ///
    /// Registers the top-padding forwarder first and the capture canceler second.
    pub fn new(container: V, keyboard: V) -> Self {
        let mut forwarders = SmallVec::new();
        forwarders.push(Forwarder::top_padding(keyboard));
        forwarders.push(Forwarder::capture_cancel(keyboard));
        Self {
            container,
            forwarders,
            active: None,
        }
    }

    /// The container view whose samples this router receives.
    pub fn container(&self) -> V {
        self.container
    }

    /// Registered forwarders in priority order.
    pub fn forwarders(&self) -> &[Forwarder<V>] {
        &self.forwarders
    }

    /// The forwarder that owns the current gesture, if any.
    pub fn active(&self) -> Option<ForwarderKind> {
        self.active.map(|latch| self.forwarders[latch.slot].kind())
    }

    /// Set the height of the band at the top of the keyboard.
    ///
    /// Only gestures starting after this call see the new value. Negative or
    /// non-finite values are treated as zero.
    pub fn set_top_padding(&mut self, padding: f64) {
        let padding = if padding.is_finite() && padding >= 0.0 {
            padding
        } else {
            warn!("ignoring invalid keyboard top padding {padding}; using 0");
            0.0
        };
        for forwarder in &mut self.forwarders {
            forwarder.set_top_padding(padding);
        }
    }

    /// Drop any latched forwarder without waiting for the gesture to end.
    pub fn reset(&mut self) {
        if let Some(latch) = self.active.take() {
            debug!("reset: released {:?}", self.forwarders[latch.slot].kind());
        }
    }

    /// Decide whether the gesture starting with `sample` should be intercepted.
    ///
    /// Returns `true` and latches the first accepting forwarder, or returns
    /// `false` with no forwarder latched.
    pub fn route_start(&mut self, host: &impl ViewTree<V>, sample: &TouchSample) -> bool {
        self.active = None;
        let Some(point) = self.global_point(host, sample) else {
            return false;
        };
        for (slot, forwarder) in self.forwarders.iter().enumerate() {
            if let Some(geometry) = forwarder.wants_gesture(host, point, sample.phase) {
                debug!(
                    "latched {:?} at ({}, {})",
                    forwarder.kind(),
                    point.x,
                    point.y
                );
                self.active = Some(Latch { slot, geometry });
                return true;
            }
        }
        false
    }

    /// Forward a sample of the latched gesture.
    ///
    /// Rewrites `sample` into the latched target's local space and returns
    /// `true`. Without a latch, leaves `sample` untouched and returns `false`.
    /// An `Up` or `Cancel` always releases the latch, even when the sample
    /// cannot be forwarded.
    pub fn route_continue(&mut self, host: &impl ViewTree<V>, sample: &mut TouchSample) -> bool {
        let Some(latch) = self.active else {
            return false;
        };
        let kind = self.forwarders[latch.slot].kind();
        if sample.phase.ends_gesture() {
            debug!("released {kind:?}");
            self.active = None;
        }
        let Some(point) = self.global_point(host, sample) else {
            return false;
        };
        let local = latch.geometry.translate(point);
        trace!(
            "forwarding {:?} to {kind:?} at ({}, {})",
            sample.phase, local.x, local.y
        );
        sample.set_location(local);
        true
    }

    /// Route one sample, starting a new capture on `Down`.
    ///
    /// A `Down` that gets latched is forwarded immediately, so the target
    /// sees the whole gesture.
    pub fn route(&mut self, host: &impl ViewTree<V>, sample: &mut TouchSample) -> RouteOutcome {
        if sample.phase.starts_gesture() {
            self.route_start(host, sample);
        }
        let Some(kind) = self.active() else {
            return RouteOutcome::Default;
        };
        if self.route_continue(host, sample) {
            RouteOutcome::Forwarded(kind)
        } else {
            RouteOutcome::Default
        }
    }

    /// Decide whether a hover event reaching the container should be dispatched.
    pub fn filter_hover(&self, flags: HostFlags) -> HoverDisposition {
        filter_hover(flags)
    }

    // Container-local action pointer to global coordinates, using the
    // container's current on-screen origin.
    fn global_point(&self, host: &impl ViewTree<V>, sample: &TouchSample) -> Option<Point> {
        let Some(local) = sample.position() else {
            warn!(
                "action index {} out of range for {} pointers",
                sample.action_index,
                sample.pointers.len()
            );
            return None;
        };
        let origin = host.global_rect(&self.container).origin();
        Some(local + origin.to_vec2())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TouchPhase;
    use alloc::vec;
    use alloc::vec::Vec;
    use kurbo::Rect;

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    enum View {
        Container,
        Frame,
        Keyboard,
    }

    // Container spans (0, 100)..(400, 400) on screen; the keyboard sits in
    // its lower part at (0, 150)..(400, 400).
    struct Host {
        container: Rect,
        keyboard: Rect,
        keyboard_visible: bool,
        frame_visible: bool,
    }

    impl Default for Host {
        fn default() -> Self {
            Self {
                container: Rect::new(0.0, 100.0, 400.0, 400.0),
                keyboard: Rect::new(0.0, 150.0, 400.0, 400.0),
                keyboard_visible: true,
                frame_visible: true,
            }
        }
    }

    impl ViewTree<View> for Host {
        fn is_visible(&self, view: &View) -> bool {
            match view {
                View::Container => true,
                View::Frame => self.frame_visible,
                View::Keyboard => self.keyboard_visible,
            }
        }

        fn global_rect(&self, view: &View) -> Rect {
            match view {
                View::Container => self.container,
                View::Frame | View::Keyboard => self.keyboard,
            }
        }

        fn parent_of(&self, view: &View) -> Option<View> {
            match view {
                View::Keyboard => Some(View::Frame),
                View::Frame => Some(View::Container),
                View::Container => None,
            }
        }
    }

    fn router(padding: f64) -> TouchRouter<View> {
        let mut router = TouchRouter::new(View::Container, View::Keyboard);
        router.set_top_padding(padding);
        router
    }

    // Samples are container-local; the container's origin is at y = 100.
    fn sample(phase: TouchPhase, x: f64, global_y: f64) -> TouchSample {
        TouchSample::new(phase, Point::new(x, global_y - 100.0))
    }

    #[test]
    fn registers_padding_forwarder_before_canceler() {
        let router = router(0.0);
        let kinds: Vec<ForwarderKind> = router.forwarders().iter().map(|f| f.kind()).collect();
        assert_eq!(
            kinds,
            vec![ForwarderKind::TopPadding, ForwarderKind::CaptureCancel]
        );
    }

    #[test]
    fn down_in_band_latches_top_padding() {
        let host = Host::default();
        let mut router = router(20.0);
        assert!(router.route_start(&host, &sample(TouchPhase::Down, 10.0, 152.0)));
        assert_eq!(router.active(), Some(ForwarderKind::TopPadding));
    }

    #[test]
    fn down_below_band_latches_canceler() {
        let host = Host::default();
        let mut router = router(20.0);
        assert!(router.route_start(&host, &sample(TouchPhase::Down, 10.0, 170.0)));
        assert_eq!(router.active(), Some(ForwarderKind::CaptureCancel));
    }

    #[test]
    fn down_outside_keyboard_clears_latch() {
        let host = Host::default();
        let mut router = router(20.0);
        assert!(router.route_start(&host, &sample(TouchPhase::Down, 10.0, 160.0)));
        assert!(!router.route_start(&host, &sample(TouchPhase::Down, 10.0, 120.0)));
        assert_eq!(router.active(), None);
    }

    #[test]
    fn hidden_frame_falls_through_to_canceler() {
        let host = Host {
            frame_visible: false,
            ..Host::default()
        };
        let mut router = router(20.0);
        assert!(router.route_start(&host, &sample(TouchPhase::Down, 10.0, 152.0)));
        assert_eq!(router.active(), Some(ForwarderKind::CaptureCancel));
    }

    #[test]
    fn hidden_keyboard_is_never_latched() {
        let host = Host {
            keyboard_visible: false,
            ..Host::default()
        };
        let mut router = router(20.0);
        assert!(!router.route_start(&host, &sample(TouchPhase::Down, 10.0, 152.0)));
        assert_eq!(router.active(), None);
    }

    #[test]
    fn non_down_samples_never_latch() {
        let host = Host::default();
        let mut router = router(20.0);
        assert!(!router.route_start(&host, &sample(TouchPhase::Move, 10.0, 152.0)));
        assert_eq!(router.active(), None);
    }

    #[test]
    fn latched_gesture_is_not_reevaluated() {
        let host = Host::default();
        let mut router = router(20.0);
        let mut down = sample(TouchPhase::Down, 10.0, 152.0);
        assert_eq!(
            router.route(&host, &mut down),
            RouteOutcome::Forwarded(ForwarderKind::TopPadding)
        );
        assert_eq!(down.position(), Some(Point::new(10.0, 2.0)));

        // Far outside both the band and the keyboard.
        let mut far = sample(TouchPhase::Move, 500.0, 900.0);
        assert!(router.route_continue(&host, &mut far));
        assert_eq!(far.position(), Some(Point::new(500.0, 750.0)));
        assert_eq!(router.active(), Some(ForwarderKind::TopPadding));
    }

    #[test]
    fn unlatched_samples_pass_through_untouched() {
        let host = Host::default();
        let mut router = router(20.0);
        let mut down = sample(TouchPhase::Down, 10.0, 120.0);
        assert_eq!(router.route(&host, &mut down), RouteOutcome::Default);
        let mut moved = sample(TouchPhase::Move, 30.0, 130.0);
        let before = moved.clone();
        assert!(!router.route_continue(&host, &mut moved));
        assert_eq!(moved, before);
    }

    #[test]
    fn up_and_cancel_release_the_latch() {
        let host = Host::default();
        for end in [TouchPhase::Up, TouchPhase::Cancel] {
            let mut router = router(20.0);
            let mut down = sample(TouchPhase::Down, 10.0, 300.0);
            assert!(router.route(&host, &mut down).is_forwarded());
            let mut last = sample(end, 10.0, 310.0);
            assert_eq!(
                router.route(&host, &mut last),
                RouteOutcome::Forwarded(ForwarderKind::CaptureCancel)
            );
            assert_eq!(last.position(), Some(Point::new(10.0, 160.0)));
            assert_eq!(router.active(), None);
            let mut stray = sample(TouchPhase::Move, 10.0, 310.0);
            assert_eq!(router.route(&host, &mut stray), RouteOutcome::Default);
        }
    }

    #[test]
    fn band_touch_clamps_to_last_row() {
        // A short keyboard with a band taller than itself.
        let host = Host {
            keyboard: Rect::new(0.0, 150.0, 400.0, 160.0),
            ..Host::default()
        };
        let mut router = router(30.0);
        let mut down = sample(TouchPhase::Down, 10.0, 159.5);
        assert!(router.route(&host, &mut down).is_forwarded());
        assert_eq!(down.position(), Some(Point::new(10.0, 9.0)));

        // Still in the band but below the keyboard: clamped too.
        let mut moved = sample(TouchPhase::Move, 10.0, 179.0);
        assert!(router.route_continue(&host, &mut moved));
        assert_eq!(moved.position(), Some(Point::new(10.0, 9.0)));
    }

    #[test]
    fn padding_change_applies_to_next_gesture_only() {
        let host = Host {
            keyboard: Rect::new(0.0, 150.0, 400.0, 160.0),
            ..Host::default()
        };
        let mut router = router(30.0);
        let mut down = sample(TouchPhase::Down, 10.0, 151.0);
        assert!(router.route(&host, &mut down).is_forwarded());

        router.set_top_padding(0.0);
        let mut moved = sample(TouchPhase::Move, 10.0, 175.0);
        assert!(router.route_continue(&host, &mut moved));
        assert_eq!(
            moved.position(),
            Some(Point::new(10.0, 9.0)),
            "band from gesture start still applies"
        );
        let mut up = sample(TouchPhase::Up, 10.0, 175.0);
        assert!(router.route_continue(&host, &mut up));

        assert!(router.route_start(&host, &sample(TouchPhase::Down, 10.0, 151.0)));
        assert_eq!(router.active(), Some(ForwarderKind::CaptureCancel));
    }

    #[test]
    fn region_is_recomputed_per_gesture() {
        let mut host = Host::default();
        let mut router = router(20.0);
        assert!(router.route_start(&host, &sample(TouchPhase::Down, 10.0, 160.0)));
        assert_eq!(router.active(), Some(ForwarderKind::TopPadding));

        host.keyboard = Rect::new(0.0, 250.0, 400.0, 400.0);
        assert!(!router.route_start(&host, &sample(TouchPhase::Down, 10.0, 160.0)));
        assert!(router.route_start(&host, &sample(TouchPhase::Down, 10.0, 260.0)));
        assert_eq!(router.active(), Some(ForwarderKind::TopPadding));
    }

    #[test]
    fn invalid_padding_is_treated_as_zero() {
        let host = Host::default();
        for bad in [-5.0, f64::NAN, f64::INFINITY] {
            let mut router = router(bad);
            assert!(router.route_start(&host, &sample(TouchPhase::Down, 10.0, 151.0)));
            assert_eq!(router.active(), Some(ForwarderKind::CaptureCancel));
        }
    }

    #[test]
    fn reset_drops_the_latch() {
        let host = Host::default();
        let mut router = router(20.0);
        assert!(router.route_start(&host, &sample(TouchPhase::Down, 10.0, 300.0)));
        router.reset();
        assert_eq!(router.active(), None);
        let mut moved = sample(TouchPhase::Move, 10.0, 300.0);
        assert!(!router.route_continue(&host, &mut moved));
    }

    #[test]
    fn multi_pointer_samples_follow_action_pointer() {
        let host = Host::default();
        let mut router = router(20.0);
        let mut down = sample(TouchPhase::Down, 10.0, 300.0);
        assert!(router.route(&host, &mut down).is_forwarded());

        let mut second = TouchSample::with_pointers(
            TouchPhase::PointerDown,
            1,
            [Point::new(10.0, 200.0), Point::new(60.0, 210.0)],
        );
        assert!(router.route(&host, &mut second).is_forwarded());
        assert_eq!(second.position(), Some(Point::new(60.0, 160.0)));
        assert_eq!(second.pointer(0), Some(Point::new(10.0, 150.0)));
    }

    #[test]
    fn thin_keyboard_band_touch_never_goes_negative() {
        let host = Host {
            container: Rect::new(0.0, 0.0, 400.0, 400.0),
            keyboard: Rect::new(0.0, 50.0, 100.0, 50.5),
            ..Host::default()
        };
        let mut router = router(4.0);
        let mut down = TouchSample::new(TouchPhase::Down, Point::new(10.0, 50.2));
        assert_eq!(
            router.route(&host, &mut down),
            RouteOutcome::Forwarded(ForwarderKind::TopPadding)
        );
        assert_eq!(down.position(), Some(Point::new(10.0, 0.0)));
    }

    #[test]
    fn unforwardable_up_still_releases_the_latch() {
        let host = Host::default();
        let mut router = router(20.0);
        let mut down = sample(TouchPhase::Down, 10.0, 300.0);
        assert!(router.route(&host, &mut down).is_forwarded());

        let mut up = TouchSample::with_pointers(TouchPhase::Up, 2, [Point::new(10.0, 200.0)]);
        let before = up.clone();
        assert!(!router.route_continue(&host, &mut up));
        assert_eq!(up, before);
        assert_eq!(router.active(), None);

        let mut stray = sample(TouchPhase::Move, 10.0, 310.0);
        assert_eq!(router.route(&host, &mut stray), RouteOutcome::Default);
    }

    #[test]
    fn hover_filter_delegates_to_host_flags() {
        let router = router(0.0);
        assert_eq!(
            router.filter_hover(HostFlags::TOUCH_EXPLORATION | HostFlags::MORE_KEYS_PANEL_SHOWN),
            HoverDisposition::Discard
        );
        assert_eq!(router.filter_hover(HostFlags::empty()), HoverDisposition::Dispatch);
    }
}
