// Copyright 2025 the Keyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover filtering for accessibility touch exploration.
//!
//! With touch exploration on, the platform delivers hover events straight to a
//! visible more-keys panel. Copies that also reach the keyboard container must
//! be dropped, or the keyboard underneath would announce keys the user is not
//! touching.
//!
//! ```
//! use keyview_forward::hover::{HostFlags, HoverDisposition, filter_hover};
//!
//! let flags = HostFlags::TOUCH_EXPLORATION | HostFlags::MORE_KEYS_PANEL_SHOWN;
//! assert_eq!(filter_hover(flags), HoverDisposition::Discard);
//! assert_eq!(filter_hover(HostFlags::TOUCH_EXPLORATION), HoverDisposition::Dispatch);
//! ```

bitflags::bitflags! {
    /// Host state consulted when filtering hover events.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct HostFlags: u8 {
        /// Accessibility touch exploration is enabled.
        const TOUCH_EXPLORATION     = 0b0000_0001;
        /// The keyboard is showing a more-keys panel.
        const MORE_KEYS_PANEL_SHOWN = 0b0000_0010;
    }
}

/// What the container should do with a hover event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HoverDisposition {
    /// Dispatch to children as usual.
    Dispatch,
    /// Swallow the event.
    Discard,
}

/// Decide whether a hover event reaching the container should be dispatched.
pub fn filter_hover(flags: HostFlags) -> HoverDisposition {
    if flags.contains(HostFlags::TOUCH_EXPLORATION | HostFlags::MORE_KEYS_PANEL_SHOWN) {
        HoverDisposition::Discard
    } else {
        HoverDisposition::Dispatch
    }
}
