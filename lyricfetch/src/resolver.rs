//! Single-song resolution
//!
//! An `ItemResolver` asks the providers of its `ProviderSet` for a song's
//! lyrics using one of two strategies:
//!
//! - **Race**: every provider runs concurrently; the first non-empty
//!   answer wins and the remaining lookups are cancelled at once. Used for
//!   a single interactively requested song.
//! - **Fallback**: providers run one after another in set order until one
//!   answers. Used by the batch scheduler, so that the number of concurrent
//!   requests equals the number of workers no matter how many providers
//!   are configured.
//!
//! # Outcome invariants
//! - `runtimes` holds an entry only for providers whose lookup completed
//!   (with an answer, without one, or with an error). A racer cancelled
//!   before completing never appears.
//! - When `source` is set, `song.lyrics` is non-empty, came from that
//!   provider, and `runtimes` has an entry for it.
//!
//! # Example
//! ```rust,ignore
//! let resolver = ItemResolver::new(providers, false);
//! if let Some(outcome) = resolver.resolve(song, Strategy::Race).await {
//!     println!("{:?} answered", outcome.source);
//! }
//! ```

use crate::providers::{LyricsProvider, ProviderSet};
use lyricfetch_common::Song;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// How an `ItemResolver` queries its providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// All providers concurrently, first answer wins
    Race,
    /// Providers in order, stop at the first answer
    Fallback,
}

/// Result of resolving one song
#[derive(Debug, Clone)]
pub struct Outcome {
    /// The song, with `lyrics` filled in when found
    pub song: Song,
    /// Name of the provider that answered
    pub source: Option<&'static str>,
    /// Duration of every completed provider lookup
    pub runtimes: HashMap<&'static str, Duration>,
}

impl Outcome {
    pub fn found(&self) -> bool {
        self.source.is_some()
    }
}

pub struct ItemResolver {
    providers: ProviderSet,
    overwrite: bool,
}

impl ItemResolver {
    /// # Arguments
    /// * `providers` - Providers to query, in fallback order
    /// * `overwrite` - Resolve songs that already carry lyrics
    pub fn new(providers: ProviderSet, overwrite: bool) -> Self {
        Self {
            providers,
            overwrite,
        }
    }

    pub fn providers(&self) -> &ProviderSet {
        &self.providers
    }

    /// Resolve `song` with the given strategy
    ///
    /// # Returns
    /// `None` without querying any provider when the song already has
    /// lyrics and overwriting is off. A skipped song is not a failure.
    pub async fn resolve(&self, song: Song, strategy: Strategy) -> Option<Outcome> {
        if song.has_lyrics() && !self.overwrite {
            debug!(song = %song, "Song already has lyrics, skipping");
            return None;
        }

        let outcome = match strategy {
            Strategy::Race => self.race(song).await,
            Strategy::Fallback => self.fallback(song).await,
        };

        match outcome.source {
            Some(source) => info!(song = %outcome.song, source, "Lyrics found"),
            None => info!(song = %outcome.song, "Lyrics not found"),
        }
        Some(outcome)
    }

    async fn race(&self, mut song: Song) -> Outcome {
        let shared = Arc::new(song.clone());
        let cancel = CancellationToken::new();
        let mut tasks = JoinSet::new();

        for provider in self.providers.iter() {
            let provider = Arc::clone(provider);
            let song = Arc::clone(&shared);
            let cancel = cancel.clone();
            tasks.spawn(async move {
                let name = provider.name();
                tokio::select! {
                    _ = cancel.cancelled() => None,
                    (lyrics, elapsed) = timed_fetch(provider.as_ref(), &song) => Some((name, lyrics, elapsed)),
                }
            });
        }

        let mut runtimes = HashMap::new();
        let mut source = None;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some((name, lyrics, elapsed))) => {
                    runtimes.insert(name, elapsed);
                    if let Some(lyrics) = lyrics {
                        song.lyrics = lyrics;
                        source = Some(name);
                        cancel.cancel();
                        // Racers that finished before the winner was taken keep their runtime
                        while let Some(joined) = tasks.try_join_next() {
                            if let Ok(Some((name, _, elapsed))) = joined {
                                runtimes.insert(name, elapsed);
                            }
                        }
                        tasks.abort_all();
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) if e.is_cancelled() => {}
                Err(e) => error!(song = %song, error = %e, "Provider task panicked"),
            }
        }

        Outcome {
            song,
            source,
            runtimes,
        }
    }

    async fn fallback(&self, mut song: Song) -> Outcome {
        let mut runtimes = HashMap::new();
        let mut source = None;

        for provider in self.providers.iter() {
            let (lyrics, elapsed) = timed_fetch(provider.as_ref(), &song).await;
            runtimes.insert(provider.name(), elapsed);
            if let Some(lyrics) = lyrics {
                song.lyrics = lyrics;
                source = Some(provider.name());
                break;
            }
        }

        Outcome {
            song,
            source,
            runtimes,
        }
    }
}

/// Query one provider and measure how long it took
///
/// Provider errors and blank answers both become `None`.
async fn timed_fetch(provider: &dyn LyricsProvider, song: &Song) -> (Option<String>, Duration) {
    let start = Instant::now();
    let result = provider.fetch(song).await;
    let elapsed = start.elapsed();

    let lyrics = match result {
        Ok(Some(lyrics)) if !lyrics.trim().is_empty() => Some(lyrics),
        Ok(_) => None,
        Err(e) => {
            debug!(provider = provider.name(), song = %song, error = %e, "Provider lookup failed");
            None
        }
    };
    (lyrics, elapsed)
}
