//! Ordered provider sequence
//!
//! A `ProviderSet` is fixed for the duration of a run. Every derivation
//! (`exclude*`, `suffix_after`) returns a new set and leaves the original
//! untouched, preserving relative order. Providers are identified by
//! `LyricsProvider::name`; a set never holds two providers with the same
//! name.

use super::{LyricsProvider, ProviderContext, Source};
use lyricfetch_common::{Error, Result};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone, Default)]
pub struct ProviderSet {
    providers: Vec<Arc<dyn LyricsProvider>>,
}

impl ProviderSet {
    /// Build a set from providers in the given order
    ///
    /// A provider whose name is already present is dropped with a warning.
    pub fn new(providers: impl IntoIterator<Item = Arc<dyn LyricsProvider>>) -> Self {
        let mut set = Self::default();
        for provider in providers {
            if set.contains(provider.name()) {
                warn!(provider = provider.name(), "Duplicate provider ignored");
                continue;
            }
            set.providers.push(provider);
        }
        set
    }

    /// Every built-in provider in canonical order
    pub fn builtin(ctx: &ProviderContext) -> Self {
        Self::new(Source::all().map(|source| source.build(ctx)))
    }

    /// Built-in providers named in `names`, in the order given
    ///
    /// Unknown names are skipped with a warning so a stale configuration
    /// never stops a run.
    pub fn from_names<S: AsRef<str>>(names: &[S], ctx: &ProviderContext) -> Self {
        Self::new(names.iter().filter_map(|name| {
            let name: &str = name.as_ref();
            let source = Source::from_name(name);
            if source.is_none() {
                warn!(provider = %name, "Unknown provider name ignored");
            }
            source.map(|source| source.build(ctx))
        }))
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn LyricsProvider>> {
        self.providers.iter()
    }

    /// Provider names in order
    pub fn names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.providers.iter().position(|p| p.name() == name)
    }

    /// Remove `name`
    ///
    /// # Errors
    /// `Error::NotFound` when no provider has that name.
    pub fn exclude(&self, name: &str) -> Result<Self> {
        if !self.contains(name) {
            return Err(Error::NotFound(format!("provider '{}'", name)));
        }
        Ok(self.exclude_if_present(name))
    }

    /// Remove `name` if present; an absent name yields an identical set
    pub fn exclude_if_present(&self, name: &str) -> Self {
        self.retain(|provider| provider.name() != name)
    }

    /// Remove every provider in `names`
    ///
    /// The result only depends on the membership of `names`, never on its
    /// order.
    ///
    /// # Errors
    /// `Error::NotFound` naming the first absent entry; nothing is removed
    /// in that case.
    pub fn exclude_all<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let names: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
        if let Some(missing) = names.iter().find(|name| !self.contains(name)) {
            return Err(Error::NotFound(format!("provider '{}'", missing)));
        }
        Ok(self.retain(|provider| !names.contains(&provider.name())))
    }

    /// Providers strictly after `name`, in order
    ///
    /// The pivot itself is not included, so the pivot at the last position
    /// yields an empty set. Used to resume a scan past a provider that has
    /// already been tried.
    ///
    /// # Errors
    /// `Error::NotFound` when no provider has that name.
    pub fn suffix_after(&self, name: &str) -> Result<Self> {
        let index = self
            .position(name)
            .ok_or_else(|| Error::NotFound(format!("provider '{}'", name)))?;
        Ok(Self {
            providers: self.providers[index + 1..].to_vec(),
        })
    }

    fn retain(&self, keep: impl Fn(&Arc<dyn LyricsProvider>) -> bool) -> Self {
        Self {
            providers: self.providers.iter().filter(|p| keep(p)).cloned().collect(),
        }
    }
}

impl fmt::Debug for ProviderSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
