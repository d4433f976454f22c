//! Lrclib.net
//!
//! Public JSON API keyed by artist, track and (optionally) album. A 404
//! means the database has no such track.

use super::{HttpClient, LyricsProvider, ProviderError};
use async_trait::async_trait;
use lyricfetch_common::Song;
use serde::Deserialize;

const API_URL: &str = "https://lrclib.net/api/get";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Track {
    #[serde(default)]
    plain_lyrics: Option<String>,
    #[serde(default)]
    instrumental: bool,
}

pub struct Lrclib {
    http: HttpClient,
}

impl Lrclib {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn url(song: &Song) -> String {
        let mut url = format!(
            "{}?artist_name={}&track_name={}",
            API_URL,
            urlencoding::encode(&song.artist),
            urlencoding::encode(&song.title)
        );
        if !song.album().is_empty() {
            url.push_str("&album_name=");
            url.push_str(&urlencoding::encode(song.album()));
        }
        url
    }

    fn lyrics(track: Track) -> Option<String> {
        if track.instrumental {
            return None;
        }
        track
            .plain_lyrics
            .map(|lyrics| lyrics.trim().to_string())
            .filter(|lyrics| !lyrics.is_empty())
    }
}

#[async_trait]
impl LyricsProvider for Lrclib {
    fn name(&self) -> &'static str {
        "lrclib"
    }

    async fn fetch(&self, song: &Song) -> Result<Option<String>, ProviderError> {
        match self.http.get_json::<Track>(&Self::url(song)).await {
            Ok(track) => Ok(Self::lyrics(track)),
            Err(ProviderError::Status(404)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
