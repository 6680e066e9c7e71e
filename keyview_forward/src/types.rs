// Copyright 2025 the Keyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: touch samples, phases, routing outcomes, and the host view lookup.

use kurbo::{Point, Rect, Vec2};
use smallvec::SmallVec;

/// Phase of a touch sample within a gesture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// First pointer touched down. Starts a gesture.
    Down,
    /// An additional pointer touched down during a gesture.
    PointerDown,
    /// One or more pointers moved.
    Move,
    /// A non-primary pointer was lifted; the gesture continues.
    PointerUp,
    /// The last pointer was lifted. Ends a gesture.
    Up,
    /// The host aborted the gesture. Ends a gesture.
    Cancel,
    /// Any other sample the host delivers mid-gesture.
    Other,
}

impl TouchPhase {
    /// Returns `true` for the sample that starts a gesture.
    pub const fn starts_gesture(self) -> bool {
        matches!(self, Self::Down)
    }

    /// Returns `true` for samples after which no further samples belong to the gesture.
    pub const fn ends_gesture(self) -> bool {
        matches!(self, Self::Up | Self::Cancel)
    }
}

/// A single touch sample as delivered by the host.
///
/// Positions are in the receiving view's local space. The router rewrites them
/// in place when it forwards a sample, so downstream handlers only ever see
/// the target's local coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchSample {
    /// Phase of this sample.
    pub phase: TouchPhase,
    /// Index of the pointer that triggered this sample.
    pub action_index: usize,
    /// Positions of every pointer currently down, indexed by pointer index.
    pub pointers: SmallVec<[Point; 2]>,
}

impl TouchSample {
    /// Create a single-pointer sample.
    pub fn new(phase: TouchPhase, position: Point) -> Self {
        let mut pointers = SmallVec::new();
        pointers.push(position);
        Self {
            phase,
            action_index: 0,
            pointers,
        }
    }

    /// Create a multi-pointer sample whose action pointer is `action_index`.
    pub fn with_pointers(
        phase: TouchPhase,
        action_index: usize,
        pointers: impl IntoIterator<Item = Point>,
    ) -> Self {
        Self {
            phase,
            action_index,
            pointers: pointers.into_iter().collect(),
        }
    }

    /// Position of the action pointer, or `None` if the index is out of range.
    pub fn position(&self) -> Option<Point> {
        self.pointers.get(self.action_index).copied()
    }

    /// Position of the pointer at `index`.
    pub fn pointer(&self, index: usize) -> Option<Point> {
        self.pointers.get(index).copied()
    }

    /// Shift every pointer by `delta`.
    pub fn offset(&mut self, delta: Vec2) {
        for p in &mut self.pointers {
            *p += delta;
        }
    }

    /// Move the sample so the action pointer lands on `location`.
    ///
    /// Other pointers keep their offset relative to the action pointer.
    /// Does nothing if the action index is out of range.
    pub fn set_location(&mut self, location: Point) {
        if let Some(current) = self.position() {
            self.offset(location - current);
        }
    }
}

/// Which forwarder claimed a gesture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ForwarderKind {
    /// Touches in the band at the top of the keyboard.
    TopPadding,
    /// Touches anywhere on the keyboard, used to dismiss an overlay it owns.
    CaptureCancel,
}

/// Result of routing one sample through [`TouchRouter::route`](crate::router::TouchRouter::route).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RouteOutcome {
    /// The sample was rewritten into the target's local space and consumed.
    Forwarded(ForwarderKind),
    /// No forwarder owns the gesture; the host should apply default handling.
    Default,
}

impl RouteOutcome {
    /// Returns `true` if the sample was consumed by a forwarder.
    pub const fn is_forwarded(self) -> bool {
        matches!(self, Self::Forwarded(_))
    }
}

/// Live view queries supplied by the host UI framework.
///
/// All queries reflect the current layout; implementations must not cache
/// across layout passes on the router's behalf.
pub trait ViewTree<V> {
    /// Whether `view` itself is visible.
    fn is_visible(&self, view: &V) -> bool;

    /// The visible region of `view` in global (screen) coordinates.
    ///
    /// Return an empty rectangle when the view is not on screen.
    fn global_rect(&self, view: &V) -> Rect;

    /// The parent of `view`, if any.
    fn parent_of(&self, view: &V) -> Option<V>;
}
