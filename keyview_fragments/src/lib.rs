// Copyright 2025 the Keyview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyview Fragments: the settings-screen allow-list.
//!
//! A settings host that instantiates screens by name must refuse names it does
//! not ship, or any caller able to start the host could make it load an
//! arbitrary class. [`is_valid_fragment`] answers that question against a
//! fixed set of fully-qualified identifiers.
//!
//! ```
//! use keyview_fragments::is_valid_fragment;
//!
//! assert!(is_valid_fragment(
//!     "com.superpenguin.foreigninputandoutput.method.userdictionary.UserDictionaryList"
//! ));
//! assert!(!is_valid_fragment("UserDictionaryList"));
//! assert!(!is_valid_fragment(""));
//! ```
//!
//! Matching is exact and case-sensitive. The set is built once per process on
//! first use and never changes afterwards.

use std::sync::LazyLock;

use hashbrown::HashSet;
use log::debug;

/// Fully-qualified names of every fragment the settings host may instantiate.
pub const SETTINGS_FRAGMENTS: [&str; 7] = [
    "com.superpenguin.foreigninputandoutput.dictionarypack.DictionarySettingsFragment",
    "com.superpenguin.foreigninputandoutput.method.settings.PreferencesSettingsFragment",
    "com.superpenguin.foreigninputandoutput.method.settings.CustomInputStyleSettingsFragment",
    "com.superpenguin.foreigninputandoutput.method.userdictionary.UserDictionaryAddWordFragment",
    "com.superpenguin.foreigninputandoutput.method.userdictionary.UserDictionaryList",
    "com.superpenguin.foreigninputandoutput.method.userdictionary.UserDictionaryLocalePicker",
    "com.superpenguin.foreigninputandoutput.method.userdictionary.UserDictionarySettings",
];

static ALLOWED: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| SETTINGS_FRAGMENTS.iter().copied().collect());

/// Returns `true` if `name` is a fragment the settings host may instantiate.
pub fn is_valid_fragment(name: &str) -> bool {
    let allowed = ALLOWED.contains(name);
    if !allowed {
        debug!("rejected fragment {name:?}");
    }
    allowed
}

/// Iterate over the allowed fragment names, in no particular order.
pub fn allowed_fragments() -> impl Iterator<Item = &'static str> {
    ALLOWED.iter().copied()
}
