//! Template filters
//!
//! Filters are plain functions collected into a [`FilterRegistry`]. The global
//! registry is built once on first use and is read-only afterwards; a renderer
//! can also be handed its own registry.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use vitrine_validation::{capitalize_proper_noun, format_id};

pub type FilterFn = fn(&str) -> String;

static GLOBAL: Lazy<FilterRegistry> = Lazy::new(FilterRegistry::with_defaults);

#[derive(Debug, Clone, Default)]
pub struct FilterRegistry {
    filters: BTreeMap<&'static str, FilterFn>,
}

impl FilterRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// `id_img` and `nome_proprio`
    pub fn with_defaults() -> Self {
        Self::empty()
            .register("id_img", id_img)
            .register("nome_proprio", capitalize_proper_noun)
    }

    /// Process-wide registry shared by every renderer
    pub fn global() -> &'static FilterRegistry {
        &GLOBAL
    }

    /// Add a filter while building a registry; a later name replaces an earlier one
    pub fn register(mut self, name: &'static str, filter: FilterFn) -> Self {
        self.filters.insert(name, filter);
        self
    }

    pub fn get(&self, name: &str) -> Option<FilterFn> {
        self.filters.get(name).copied()
    }

    /// Run a filter by name, `None` when it is not registered
    pub fn apply(&self, name: &str, value: &str) -> Option<String> {
        self.get(name).map(|filter| filter(value))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.filters.keys().copied()
    }
}

/// Image filename stem for a product id rendered in a template.
/// Blank or non-numeric input renders as nothing.
pub fn id_img(value: &str) -> String {
    format_id(value.trim().parse::<i64>().ok())
}
