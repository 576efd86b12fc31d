//! Light/dark value pairs
//!
//! Per-type helpers (colors, images, alpha values) register a closure that
//! picks one half of a pair; the registry itself never sees the pair.

use serde::{Deserialize, Serialize};

/// A value with a light and a dark variant
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Themed<T> {
    pub light: T,
    pub dark: T,
}

impl<T> Themed<T> {
    pub const fn new(light: T, dark: T) -> Self {
        Self { light, dark }
    }

    /// The variant for the given appearance
    pub fn resolve(&self, is_light: bool) -> &T {
        if is_light {
            &self.light
        } else {
            &self.dark
        }
    }

    pub fn map<U, F>(self, mut f: F) -> Themed<U>
    where
        F: FnMut(T) -> U,
    {
        Themed {
            light: f(self.light),
            dark: f(self.dark),
        }
    }

    pub fn as_ref(&self) -> Themed<&T> {
        Themed {
            light: &self.light,
            dark: &self.dark,
        }
    }
}

impl<T: Clone> Themed<T> {
    /// The same value in both appearances
    pub fn uniform(value: T) -> Self {
        Self {
            light: value.clone(),
            dark: value,
        }
    }
}

impl<T> From<(T, T)> for Themed<T> {
    fn from((light, dark): (T, T)) -> Self {
        Self { light, dark }
    }
}
