use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// The two lifecycle topics the deck broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Topic {
    Init,
    Change,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckEvent {
    /// Fired once, after the slide list and its classification are final.
    Init,
    /// Fired after the current-slide pointer moved from `from` to `to`.
    Change { from: usize, to: usize },
}

impl DeckEvent {
    pub fn topic(&self) -> Topic {
        match self {
            Self::Init => Topic::Init,
            Self::Change { .. } => Topic::Change,
        }
    }
}
