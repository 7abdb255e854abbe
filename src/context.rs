// context.rs
use std::{
    any::{Any, TypeId},
    collections::HashMap,
};

use serde::{Deserialize, Serialize};

// ======================
// Host environment
// ======================

/// Browser capabilities the extensions adapt to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Features {
    pub hashchange: bool,
    pub history: bool,
    pub csstransforms: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            hashchange: true,
            history: true,
            csstransforms: true,
        }
    }
}

/// Address bar state: the page URL including its fragment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    href: String,
}

impl Location {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    /// URL without its fragment.
    pub fn base(&self) -> &str {
        self.href.split('#').next().unwrap_or_default()
    }

    /// Fragment including the leading `#`, or "" when there is none.
    pub fn hash(&self) -> &str {
        self.href.find('#').map(|i| &self.href[i..]).unwrap_or_default()
    }

    /// Replace the current history entry.
    pub fn replace(&mut self, href: impl Into<String>) {
        self.href = href.into();
    }
}

// ======================================
// Type-safe extension state
// ======================================

/// A type-indexed store for extension-private state.
/// Insert once; fetch anywhere by concrete type.
#[derive(Default)]
pub struct Extensions(HashMap<TypeId, Box<dyn Any + Send>>);

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provide<T>(&mut self, value: T) -> &mut Self
    where
        T: Send + 'static,
    {
        self.0.insert(TypeId::of::<T>(), Box::new(value));
        self
    }

    pub fn get<T>(&self) -> Option<&T>
    where
        T: Send + 'static,
    {
        self.0.get(&TypeId::of::<T>())?.downcast_ref::<T>()
    }

    pub fn get_mut<T>(&mut self) -> Option<&mut T>
    where
        T: Send + 'static,
    {
        self.0.get_mut(&TypeId::of::<T>())?.downcast_mut::<T>()
    }

    /// Fetch `T`, inserting `T::default()` first if missing.
    pub fn entry<T>(&mut self) -> &mut T
    where
        T: Default + Send + 'static,
    {
        self.0
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(T::default()))
            .downcast_mut::<T>()
            .expect("extension slot holds the type it is keyed by")
    }
}

impl std::fmt::Debug for Extensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extensions")
            .field("len", &self.0.len())
            .finish()
    }
}
