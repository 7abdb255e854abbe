// commands.rs
use std::{collections::HashMap, sync::Arc};

use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use tracing::warn;

use crate::{deck::Deck, error::DeckError};

pub type CommandFn = dyn Fn(&mut Deck, &[Value]) -> Result<(), DeckError> + Send + Sync;

/// Names of the commands the bundled extensions register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum BuiltinCommand {
    ShowGoTo,
    HideGoTo,
    ToggleGoTo,
    ShowMenu,
    HideMenu,
    ToggleMenu,
    EnableScale,
    DisableScale,
    ToggleScale,
}

/// A named command closed over nothing but the deck it is handed.
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub run: Arc<CommandFn>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Command {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Deck, &[Value]) -> Result<(), DeckError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            run: Arc::new(f),
        }
    }
}

#[derive(Clone, Default)]
pub struct CommandRegistry {
    regs: HashMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `cmd` under its name. An existing command of the same name is
    /// replaced (last writer wins) and returned.
    pub fn register(&mut self, cmd: Command) -> Option<Command> {
        let prev = self.regs.insert(cmd.name.clone(), cmd);
        if let Some(p) = &prev {
            warn!(command = %p.name, "command re-registered, previous definition replaced");
        }
        prev
    }

    pub fn get(&self, name: &str) -> Result<Command, DeckError> {
        self.regs
            .get(name)
            .cloned()
            .ok_or_else(|| DeckError::CommandNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.regs.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut v: Vec<&str> = self.regs.keys().map(String::as_str).collect();
        v.sort_unstable();
        v
    }
}
