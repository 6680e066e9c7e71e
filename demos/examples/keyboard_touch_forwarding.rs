// Copyright 2025 the Keyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch forwarding over a simulated keyboard screen.
//!
//! This example shows how to:
//! - expose a host view hierarchy through `ViewTree`,
//! - route a few gestures through `TouchRouter`,
//! - filter hover events and validate settings fragment names.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p keyview_demos --example keyboard_touch_forwarding`

use std::collections::HashMap;

use keyview_forward::hover::HostFlags;
use keyview_forward::router::TouchRouter;
use keyview_forward::types::{TouchPhase, TouchSample, ViewTree};
use keyview_fragments::is_valid_fragment;
use kurbo::{Point, Rect};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum ViewId {
    Container,
    KeyboardFrame,
    Keyboard,
}

#[derive(Clone, Debug)]
struct ViewState {
    rect: Rect,
    visible: bool,
    parent: Option<ViewId>,
}

/// A flat stand-in for a toolkit's view hierarchy.
#[derive(Debug, Default)]
struct Screen {
    views: HashMap<ViewId, ViewState>,
}

impl Screen {
    fn add(&mut self, id: ViewId, rect: Rect, parent: Option<ViewId>) {
        self.views.insert(
            id,
            ViewState {
                rect,
                visible: true,
                parent,
            },
        );
    }
}

impl ViewTree<ViewId> for Screen {
    fn is_visible(&self, view: &ViewId) -> bool {
        self.views.get(view).is_some_and(|v| v.visible)
    }

    fn global_rect(&self, view: &ViewId) -> Rect {
        self.views.get(view).map_or(Rect::ZERO, |v| v.rect)
    }

    fn parent_of(&self, view: &ViewId) -> Option<ViewId> {
        self.views.get(view).and_then(|v| v.parent)
    }
}

fn main() {
    env_logger::init();

    // A 1080-wide screen with the input view in its bottom 700 pixels; the
    // keyboard starts 60 pixels below the top of the input view.
    let mut screen = Screen::default();
    screen.add(ViewId::Container, Rect::new(0.0, 1220.0, 1080.0, 1920.0), None);
    screen.add(
        ViewId::KeyboardFrame,
        Rect::new(0.0, 1280.0, 1080.0, 1920.0),
        Some(ViewId::Container),
    );
    screen.add(
        ViewId::Keyboard,
        Rect::new(0.0, 1280.0, 1080.0, 1920.0),
        Some(ViewId::KeyboardFrame),
    );

    let mut router = TouchRouter::new(ViewId::Container, ViewId::Keyboard);
    router.set_top_padding(24.0);

    // Container-local gestures: a tap on the band, a swipe starting on the
    // keys, and a tap above the keyboard.
    let gestures: [&[(TouchPhase, f64, f64)]; 3] = [
        &[(TouchPhase::Down, 540.0, 70.0), (TouchPhase::Up, 542.0, 71.0)],
        &[
            (TouchPhase::Down, 100.0, 300.0),
            (TouchPhase::Move, 400.0, 320.0),
            (TouchPhase::Move, 900.0, 900.0),
            (TouchPhase::Up, 950.0, 950.0),
        ],
        &[(TouchPhase::Down, 540.0, 20.0), (TouchPhase::Up, 540.0, 20.0)],
    ];

    for (n, gesture) in gestures.iter().enumerate() {
        println!("gesture {n}:");
        for &(phase, x, y) in gesture.iter() {
            let mut sample = TouchSample::new(phase, Point::new(x, y));
            let outcome = router.route(&screen, &mut sample);
            println!(
                "  {phase:?} at ({x}, {y}) -> {outcome:?}, delivered at {:?}",
                sample.position()
            );
        }
    }

    let flags = HostFlags::TOUCH_EXPLORATION | HostFlags::MORE_KEYS_PANEL_SHOWN;
    println!("hover with {flags:?}: {:?}", router.filter_hover(flags));

    for name in [
        "com.superpenguin.foreigninputandoutput.method.settings.PreferencesSettingsFragment",
        "com.example.UntrustedFragment",
    ] {
        println!("fragment {name}: allowed = {}", is_valid_fragment(name));
    }
}
