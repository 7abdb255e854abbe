// src/input/key.rs
//! Key codes as reported by the host (`KeyboardEvent.which`) and the
//! bindings options use to match them.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Codes the deck binds by default. Hosts may bind any other raw code.
#[repr(u16)]
#[non_exhaustive]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    IntoPrimitive,
    TryFromPrimitive,
    Serialize_repr,
    Deserialize_repr,
)]
pub enum KeyCode {
    Backspace = 8,
    Enter = 13,
    Space = 32,
    PageUp = 33,
    PageDown = 34,
    ArrowLeft = 37,
    ArrowUp = 38,
    ArrowRight = 39,
    ArrowDown = 40,
    G = 71,
    M = 77,
    S = 83,
}

impl KeyCode {
    #[inline]
    pub fn code(self) -> u16 {
        self.into()
    }
}

/// Pretty name for a raw code, used in log lines.
pub fn describe(code: u16) -> String {
    match KeyCode::try_from(code) {
        Ok(k) => format!("{k:?}({code})"),
        Err(_) => code.to_string(),
    }
}

/// A single key code or a list of alternatives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyBinding {
    One(u16),
    Many(Vec<u16>),
}

impl KeyBinding {
    pub fn matches(&self, code: u16) -> bool {
        match self {
            Self::One(c) => *c == code,
            Self::Many(cs) => cs.contains(&code),
        }
    }
}

/// Unset bindings never match.
#[inline]
pub fn pressed(binding: Option<&KeyBinding>, code: u16) -> bool {
    binding.is_some_and(|b| b.matches(code))
}

impl From<KeyCode> for KeyBinding {
    fn from(k: KeyCode) -> Self {
        Self::One(k.code())
    }
}

impl From<&[KeyCode]> for KeyBinding {
    fn from(ks: &[KeyCode]) -> Self {
        Self::Many(ks.iter().map(|k| k.code()).collect())
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One(c) => write!(f, "{}", describe(*c)),
            Self::Many(cs) => {
                let names: Vec<String> = cs.iter().map(|c| describe(*c)).collect();
                write!(f, "[{}]", names.join(", "))
            }
        }
    }
}
