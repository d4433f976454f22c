//! # lyricfetch
//!
//! Finds lyrics for music files (or "Artist - Title" names) by asking a
//! list of lyrics websites and keeping the first answer.
//!
//! # Architecture
//! - `providers`: the `LyricsProvider` trait, the built-in site adapters
//!   and the ordered `ProviderSet`
//! - `resolver`: resolves one song, racing every provider or falling back
//!   through them in order
//! - `scheduler`: resolves many songs with a bounded number of workers
//! - `stats`: per-provider success counts and timings
//! - `sink`: delivers outcomes (tag writing, console output, debug logs)
//! - `tags` / `input`: audio file tags and song collection

pub mod error;
pub mod input;
pub mod providers;
pub mod resolver;
pub mod scheduler;
pub mod sink;
pub mod stats;
pub mod tags;

pub use error::{FetchError, FetchResult};
pub use providers::{LyricsProvider, ProviderContext, ProviderSet};
pub use resolver::{ItemResolver, Outcome, Strategy};
pub use scheduler::{BatchReport, BatchScheduler};
pub use sink::{ResultSink, StandardSink};
pub use stats::Stats;

use lyricfetch_common::{Config, Song};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Provider set selected by `config.sources` minus `config.exclude`
///
/// Unknown names on either list are ignored with a warning.
pub fn configured_providers(config: &Config, ctx: &ProviderContext) -> ProviderSet {
    let providers = if config.sources.is_empty() {
        ProviderSet::builtin(ctx)
    } else {
        ProviderSet::from_names(&config.sources, ctx)
    };

    config.exclude.iter().fold(providers, |providers, name| {
        let name = name.trim().to_lowercase();
        if !providers.contains(&name) {
            warn!(provider = %name, "Excluded provider is not in use");
        }
        providers.exclude_if_present(&name)
    })
}

/// Resolve `songs` and deliver every outcome to `sink`
///
/// A single song is raced against every provider. Anything larger runs as
/// a batch of `config.jobcount` workers.
///
/// # Returns
/// The batch report, or `None` for a single song.
///
/// # Errors
/// `FetchError::Interrupted` when `cancel` fires first; configuration
/// errors before anything is resolved.
pub async fn run(
    songs: Vec<Song>,
    config: &Config,
    providers: ProviderSet,
    sink: &mut dyn ResultSink,
    cancel: CancellationToken,
) -> FetchResult<Option<BatchReport>> {
    config.validate()?;
    let resolver = ItemResolver::new(providers, config.overwrite);

    if songs.len() == 1 {
        let Some(song) = songs.into_iter().next() else {
            return Ok(None);
        };
        let outcome = tokio::select! {
            _ = cancel.cancelled() => {
                return Err(FetchError::Interrupted(Box::default()));
            }
            outcome = resolver.resolve(song, Strategy::Race) => outcome,
        };
        match outcome {
            Some(outcome) => {
                sink.deliver(&outcome)?;
            }
            None => info!("Song already has lyrics, use --overwrite to replace them"),
        }
        return Ok(None);
    }

    let mut scheduler = BatchScheduler::new(resolver, config.jobcount)?;
    if config.debug {
        scheduler = scheduler.with_debug_log(config.debug_dir.clone());
    }
    scheduler.run(songs, sink, cancel).await.map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_providers() {
        let ctx = ProviderContext::new("").unwrap();

        let config = Config::default();
        assert_eq!(configured_providers(&config, &ctx).len(), 7);

        let config = Config {
            sources: vec!["lrclib".into(), "bogus".into(), "azlyrics".into(), "letras".into()],
            exclude: vec!["AZLyrics".into(), "darklyrics".into()],
            ..Config::default()
        };
        assert_eq!(
            configured_providers(&config, &ctx).names(),
            vec!["lrclib", "letras"]
        );
    }
}
