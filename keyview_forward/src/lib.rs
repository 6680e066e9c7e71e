// Copyright 2025 the Keyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyview Forward: touch forwarding between overlapping keyboard views.
//!
//! ## Overview
//!
//! A keyboard container sits on top of the keyboard view and sees every touch
//! first. Two kinds of touches must not reach the container's default
//! dispatch:
//!
//! - Touches in a thin band at the top of the keyboard, which the keyboard
//!   should handle as if they landed on its first row.
//! - Touches on the keyboard while it shows a transient overlay, which the
//!   keyboard uses to dismiss that overlay.
//!
//! [`TouchRouter`](crate::router::TouchRouter) decides once per gesture, on
//! `Down`, which [`Forwarder`](crate::forwarder::Forwarder) (if any) owns the
//! gesture, then rewrites every sample of that gesture into the target's
//! local coordinates until `Up` or `Cancel`.
//!
//! ## Host integration
//!
//! The router does not know about any particular UI toolkit. Implement
//! [`ViewTree`](crate::types::ViewTree) over your view handles to answer live
//! visibility, global region, and parent queries.
//!
//! ```
//! use keyview_forward::router::TouchRouter;
//! use keyview_forward::types::{ForwarderKind, RouteOutcome, TouchPhase, TouchSample, ViewTree};
//! use kurbo::{Point, Rect};
//!
//! #[derive(Copy, Clone, Debug, PartialEq)]
//! enum View { Container, Frame, Keyboard }
//!
//! struct Screen;
//! impl ViewTree<View> for Screen {
//!     fn is_visible(&self, _: &View) -> bool { true }
//!     fn global_rect(&self, view: &View) -> Rect {
//!         match view {
//!             View::Container => Rect::new(0.0, 0.0, 320.0, 240.0),
//!             _ => Rect::new(0.0, 40.0, 320.0, 240.0),
//!         }
//!     }
//!     fn parent_of(&self, view: &View) -> Option<View> {
//!         match view {
//!             View::Keyboard => Some(View::Frame),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut router = TouchRouter::new(View::Container, View::Keyboard);
//! router.set_top_padding(8.0);
//!
//! // Down inside the band at the top of the keyboard.
//! let mut down = TouchSample::new(TouchPhase::Down, Point::new(20.0, 44.0));
//! assert_eq!(
//!     router.route(&Screen, &mut down),
//!     RouteOutcome::Forwarded(ForwarderKind::TopPadding)
//! );
//! assert_eq!(down.position(), Some(Point::new(20.0, 4.0)));
//!
//! // Later samples follow the same forwarder wherever they land.
//! let mut up = TouchSample::new(TouchPhase::Up, Point::new(300.0, 10.0));
//! assert!(router.route(&Screen, &mut up).is_forwarded());
//! assert_eq!(router.active(), None);
//! ```
//!
//! ## Hover
//!
//! [`hover`] filters hover events while accessibility touch exploration and a
//! more-keys panel are both active.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: `no_std` builds relying on `libm` for floating-point math.
//!
//! This crate is `no_std`.

#![no_std]

#[cfg(test)]
extern crate alloc;

pub mod forwarder;
pub mod hover;
pub mod router;
pub mod types;
