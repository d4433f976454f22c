//! Lyrics providers
//!
//! Every provider implements `LyricsProvider`: given a song, return its
//! lyrics or nothing. Providers are unreliable by nature (sites move, block
//! bots, or simply lack a song), so every `ProviderError` is treated by the
//! resolver as "no lyrics here" and never aborts a lookup.
//!
//! # Registry
//! Built-in providers are named by the `Source` enum and resolved by table
//! lookup, never by reflection. The table order is the canonical fallback
//! order.
//!
//! | Source        | Name            | Code | Site                 |
//! |---------------|-----------------|------|----------------------|
//! | AzLyrics      | `azlyrics`      | AZL  | AZLyrics.com         |
//! | Darklyrics    | `darklyrics`    | DAR  | Darklyrics.com       |
//! | MetalArchives | `metalarchives` | ARC  | Metal-archives.com   |
//! | SongLyrics    | `songlyrics`    | SON  | SongLyrics.com       |
//! | Letras        | `letras`        | LET  | Letras.com           |
//! | Lrclib        | `lrclib`        | LRC  | Lrclib.net           |
//! | LyricsOvh     | `lyricsovh`     | OVH  | Lyrics.ovh           |

pub mod azlyrics;
pub mod darklyrics;
pub mod html;
pub mod http;
pub mod lastfm;
pub mod letras;
pub mod lrclib;
pub mod lyricsovh;
pub mod metalarchives;
pub mod set;
pub mod songlyrics;

pub use http::HttpClient;
pub use lastfm::LastFm;
pub use set::ProviderSet;

use async_trait::async_trait;
use lyricfetch_common::Song;
use std::sync::Arc;
use thiserror::Error;

/// A single lyrics source
///
/// # Example
/// ```rust,ignore
/// use lyricfetch::providers::{LyricsProvider, ProviderError};
///
/// struct Fixed;
///
/// #[async_trait::async_trait]
/// impl LyricsProvider for Fixed {
///     fn name(&self) -> &'static str { "fixed" }
///
///     async fn fetch(&self, _song: &Song) -> Result<Option<String>, ProviderError> {
///         Ok(Some("la la la".to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// Stable provider name, used for lookups, statistics and logging
    fn name(&self) -> &'static str;

    /// Look up lyrics for `song`
    ///
    /// # Returns
    /// `Ok(Some(lyrics))` when found, `Ok(None)` when the source has no
    /// lyrics for this song.
    ///
    /// # Errors
    /// Transient failures only (network, HTTP status, unexpected page
    /// layout). Callers treat them exactly like `Ok(None)`.
    async fn fetch(&self, song: &Song) -> Result<Option<String>, ProviderError>;
}

/// Transient provider failure
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection, timeout or TLS failure
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("HTTP status {0}")]
    Status(u16),

    /// Response did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Provider indexes by album and none could be determined
    #[error("Album name unknown")]
    MissingAlbum,
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            ProviderError::Status(status.as_u16())
        } else if err.is_decode() {
            ProviderError::Parse(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

/// Built-in provider identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    AzLyrics,
    Darklyrics,
    MetalArchives,
    SongLyrics,
    Letras,
    Lrclib,
    LyricsOvh,
}

/// (source, name, code, full site name) in canonical order
const SOURCE_TABLE: [(Source, &str, &str, &str); 7] = [
    (Source::AzLyrics, "azlyrics", "AZL", "AZLyrics.com"),
    (Source::Darklyrics, "darklyrics", "DAR", "Darklyrics.com"),
    (Source::MetalArchives, "metalarchives", "ARC", "Metal-archives.com"),
    (Source::SongLyrics, "songlyrics", "SON", "SongLyrics.com"),
    (Source::Letras, "letras", "LET", "Letras.com"),
    (Source::Lrclib, "lrclib", "LRC", "Lrclib.net"),
    (Source::LyricsOvh, "lyricsovh", "OVH", "Lyrics.ovh"),
];

impl Source {
    /// Every built-in source in canonical order
    pub fn all() -> impl Iterator<Item = Source> {
        SOURCE_TABLE.iter().map(|entry| entry.0)
    }

    // Table rows are in declaration order
    fn entry(self) -> &'static (Source, &'static str, &'static str, &'static str) {
        &SOURCE_TABLE[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.entry().1
    }

    pub fn code(self) -> &'static str {
        self.entry().2
    }

    pub fn full_name(self) -> &'static str {
        self.entry().3
    }

    /// Resolve a source by its declared name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Source> {
        let name = name.trim();
        SOURCE_TABLE
            .iter()
            .find(|entry| entry.1.eq_ignore_ascii_case(name))
            .map(|entry| entry.0)
    }

    /// Instantiate the provider behind this source
    pub fn build(self, ctx: &ProviderContext) -> Arc<dyn LyricsProvider> {
        let http = ctx.http.clone();
        match self {
            Source::AzLyrics => Arc::new(azlyrics::AzLyrics::new(http)),
            Source::Darklyrics => Arc::new(darklyrics::Darklyrics::new(http, ctx.lastfm.clone())),
            Source::MetalArchives => Arc::new(metalarchives::MetalArchives::new(http)),
            Source::SongLyrics => Arc::new(songlyrics::SongLyrics::new(http)),
            Source::Letras => Arc::new(letras::Letras::new(http)),
            Source::Lrclib => Arc::new(lrclib::Lrclib::new(http)),
            Source::LyricsOvh => Arc::new(lyricsovh::LyricsOvh::new(http)),
        }
    }
}

/// Short code (`full == false`) or full site name for a provider name
///
/// Returns `None` for names outside the built-in registry.
pub fn id_source(name: &str, full: bool) -> Option<&'static str> {
    Source::from_name(name).map(|source| {
        if full {
            source.full_name()
        } else {
            source.code()
        }
    })
}

/// Shared resources handed to built-in providers
#[derive(Clone)]
pub struct ProviderContext {
    pub http: HttpClient,
    pub lastfm: Option<LastFm>,
}

impl ProviderContext {
    /// Build the shared HTTP client and, when a key is configured, Last.fm
    pub fn new(lastfm_key: &str) -> Result<Self, ProviderError> {
        let http = HttpClient::new()?;
        let lastfm = LastFm::new(http.clone(), lastfm_key);
        Ok(Self { http, lastfm })
    }
}
