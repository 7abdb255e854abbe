// options.rs
//! Shared deck options.
//!
//! Every leaf is optional. Host overrides are applied first, then the core
//! defaults, then each extension's defaults in load order; a leaf keeps the
//! first value written to it.

use std::{fmt, time::Duration};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::DeckError,
    input::key::{KeyBinding, KeyCode},
};

/// Fill `slot` from `default` unless it is already set.
fn fill<T: PartialEq + fmt::Debug>(slot: &mut Option<T>, default: Option<T>, group: &str, key: &str) {
    match (slot.as_ref(), default) {
        (_, None) => {}
        (None, Some(d)) => *slot = Some(d),
        (Some(current), Some(d)) => {
            if *current != d {
                debug!(group, key, ?current, ignored = ?d, "option already set, keeping first value");
            }
        }
    }
}

/// Declares a group of optional string leaves with `&str` accessors that
/// read an unset leaf as "".
macro_rules! string_group {
    ($(#[$meta:meta])* $name:ident { $($field:ident),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct $name {
            $(
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $field: Option<String>,
            )*
        }

        impl $name {
            $(
                pub fn $field(&self) -> &str {
                    self.$field.as_deref().unwrap_or_default()
                }
            )*

            fn fill_from(&mut self, defaults: Self, group: &str) {
                $( fill(&mut self.$field, defaults.$field, group, stringify!($field)); )*
            }
        }
    };
}

string_group! {
    /// Class names toggled on the container, slides and links.
    Classes {
        after,
        before,
        child_current,
        current,
        loading,
        next,
        on_prefix,
        previous,
        goto,
        menu,
        nav_disabled,
        scale,
        scale_slide_wrapper,
    }
}

string_group! {
    /// Selectors locating the container and extension widgets.
    Selectors {
        container,
        goto_datalist,
        goto_form,
        goto_input,
        hash_link,
        next_link,
        previous_link,
        status_current,
        status_total,
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Keys {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<KeyBinding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<KeyBinding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goto: Option<KeyBinding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu: Option<KeyBinding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<KeyBinding>,
}

impl Keys {
    fn fill_from(&mut self, d: Self) {
        fill(&mut self.next, d.next, "keys", "next");
        fill(&mut self.previous, d.previous, "keys", "previous");
        fill(&mut self.goto, d.goto, "keys", "goto");
        fill(&mut self.menu, d.menu, "keys", "menu");
        fill(&mut self.scale, d.scale, "keys", "scale");
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Touch {
    /// Milliseconds between two touch ends that count as a double tap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doubletap_window: Option<u64>,
}

impl Touch {
    pub fn doubletap_window(&self) -> Duration {
        Duration::from_millis(self.doubletap_window.unwrap_or_default())
    }

    fn fill_from(&mut self, d: Self) {
        fill(&mut self.doubletap_window, d.doubletap_window, "touch", "doubletap_window");
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    pub classes: Classes,
    pub selectors: Selectors,
    pub keys: Keys,
    pub touch: Touch,

    /// Prefix for ids handed to slides that have none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prevent_fragment_scroll: Option<bool>,
    /// Fixed height (px) to scale slides against instead of the container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_height: Option<f64>,
    /// Resize debounce in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_debounce: Option<u64>,
    /// When false only top-level slides are numbered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count_nested: Option<bool>,
}

static CORE_DEFAULTS: Lazy<Options> = Lazy::new(|| Options {
    classes: Classes {
        after: Some("deck-after".into()),
        before: Some("deck-before".into()),
        child_current: Some("deck-child-current".into()),
        current: Some("deck-current".into()),
        loading: Some("deck-loading".into()),
        next: Some("deck-next".into()),
        on_prefix: Some("on-slide-".into()),
        previous: Some("deck-previous".into()),
        ..Classes::default()
    },
    selectors: Selectors {
        container: Some(".deck-container".into()),
        ..Selectors::default()
    },
    keys: Keys {
        next: Some(KeyBinding::from(
            &[
                KeyCode::Enter,
                KeyCode::Space,
                KeyCode::PageDown,
                KeyCode::ArrowRight,
                KeyCode::ArrowDown,
            ][..],
        )),
        previous: Some(KeyBinding::from(
            &[
                KeyCode::Backspace,
                KeyCode::PageUp,
                KeyCode::ArrowLeft,
                KeyCode::ArrowUp,
            ][..],
        )),
        ..Keys::default()
    },
    ..Options::default()
});

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options the core deck installs before any extension.
    pub fn core_defaults() -> Self {
        CORE_DEFAULTS.clone()
    }

    pub fn from_json(s: &str) -> Result<Self, DeckError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_value(v: serde_json::Value) -> Result<Self, DeckError> {
        Ok(serde_json::from_value(v)?)
    }

    /// Merge `defaults` into `self`, keeping every leaf already set.
    pub fn extend_defaults(&mut self, defaults: Options) {
        self.classes.fill_from(defaults.classes, "classes");
        self.selectors.fill_from(defaults.selectors, "selectors");
        self.keys.fill_from(defaults.keys);
        self.touch.fill_from(defaults.touch);
        fill(&mut self.hash_prefix, defaults.hash_prefix, "", "hash_prefix");
        fill(
            &mut self.prevent_fragment_scroll,
            defaults.prevent_fragment_scroll,
            "",
            "prevent_fragment_scroll",
        );
        fill(&mut self.base_height, defaults.base_height, "", "base_height");
        fill(&mut self.scale_debounce, defaults.scale_debounce, "", "scale_debounce");
        fill(&mut self.count_nested, defaults.count_nested, "", "count_nested");
    }

    // ---- scalar accessors -----------------------------------------------

    pub fn hash_prefix(&self) -> &str {
        self.hash_prefix.as_deref().unwrap_or_default()
    }

    pub fn prevent_fragment_scroll(&self) -> bool {
        self.prevent_fragment_scroll.unwrap_or_default()
    }

    /// A zero or negative base height counts as unset.
    pub fn base_height(&self) -> Option<f64> {
        self.base_height.filter(|h| *h > 0.0)
    }

    pub fn scale_debounce(&self) -> Duration {
        Duration::from_millis(self.scale_debounce.unwrap_or_default())
    }

    pub fn count_nested(&self) -> bool {
        self.count_nested.unwrap_or(true)
    }

    /// The five classes the core uses to mark slide states.
    pub fn state_classes(&self) -> [&str; 5] {
        [
            self.classes.before(),
            self.classes.previous(),
            self.classes.current(),
            self.classes.next(),
            self.classes.after(),
        ]
    }
}
