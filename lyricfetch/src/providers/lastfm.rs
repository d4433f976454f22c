//! Last.fm client
//!
//! Only used to discover the album a track belongs to, for providers that
//! index lyrics by album.

use super::{HttpClient, ProviderError};
use lyricfetch_common::Song;
use serde_json::Value;
use tracing::{debug, error, warn};

/// Last.fm API base URL
const LASTFM_API_URL: &str = "http://ws.audioscrobbler.com/2.0/";

#[derive(Clone)]
pub struct LastFm {
    http: HttpClient,
    key: String,
}

impl LastFm {
    /// Create a client; `None` when no API key is configured
    pub fn new(http: HttpClient, key: &str) -> Option<Self> {
        if key.trim().is_empty() {
            return None;
        }
        Some(Self {
            http,
            key: key.trim().to_string(),
        })
    }

    fn track_info_url(&self, song: &Song) -> String {
        format!(
            "{}?method=track.getInfo&api_key={}&format=json&artist={}&track={}",
            LASTFM_API_URL,
            urlencoding::encode(&self.key),
            urlencoding::encode(&song.artist),
            urlencoding::encode(&song.title),
        )
    }

    /// Look up the album title for `song`
    ///
    /// # Returns
    /// `Ok(None)` when Last.fm answers with an error or without album data.
    pub async fn album_for(&self, song: &Song) -> Result<Option<String>, ProviderError> {
        let response: Value = self.http.get_json(&self.track_info_url(song)).await?;
        let album = parse_album(&response);
        match &album {
            Some(album) => debug!(song = %song, album = %album, "Found album from lastfm"),
            None => warn!(song = %song, "Could not fetch album name"),
        }
        Ok(album)
    }
}

/// Extract `track.album.title` from a `track.getInfo` response
fn parse_album(response: &Value) -> Option<String> {
    if let Some(code) = response.get("error") {
        let message = response.get("message").and_then(Value::as_str).unwrap_or("");
        error!(code = %code, message, "Error in lastfm query");
        return None;
    }

    response
        .pointer("/track/album/title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
}
