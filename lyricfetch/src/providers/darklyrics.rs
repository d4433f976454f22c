//! Darklyrics.com
//!
//! Lyrics are published per album: `/lyrics/<artist>/<album>.html`, with one
//! `<h3>` header per track followed by its text. The provider therefore needs
//! an album name; when the song has none it asks Last.fm for one.

use super::html::{normalize, strip_tags, URL_ESCAPES};
use super::{HttpClient, LastFm, LyricsProvider, ProviderError};
use async_trait::async_trait;
use lyricfetch_common::Song;
use tracing::debug;

pub struct Darklyrics {
    http: HttpClient,
    lastfm: Option<LastFm>,
}

impl Darklyrics {
    pub fn new(http: HttpClient, lastfm: Option<LastFm>) -> Self {
        Self { http, lastfm }
    }

    async fn album(&self, song: &Song) -> Result<String, ProviderError> {
        if let Some(album) = song.album.as_ref().filter(|a| !a.is_empty()) {
            return Ok(album.clone());
        }

        let Some(lastfm) = &self.lastfm else {
            return Err(ProviderError::MissingAlbum);
        };

        match lastfm.album_for(song).await {
            Ok(Some(album)) => Ok(album),
            Ok(None) => Err(ProviderError::MissingAlbum),
            Err(e) => {
                debug!(song = %song, error = %e, "Album lookup failed");
                Err(ProviderError::MissingAlbum)
            }
        }
    }

    fn url(artist: &str, album: &str) -> String {
        format!(
            "http://www.darklyrics.com/lyrics/{}/{}.html",
            normalize(&artist.to_lowercase(), URL_ESCAPES, ""),
            normalize(&album.to_lowercase(), URL_ESCAPES, "")
        )
    }

    /// Collect the text following every track header that mentions `title`
    fn parse(page: &str, title: &str) -> Option<String> {
        let title = title.to_lowercase();
        let mut text = String::new();

        for section in page.split("<h3>").skip(1) {
            let Some((header, body)) = section.split_once("</h3>") else {
                continue;
            };
            if !strip_tags(header).to_lowercase().contains(&title) {
                continue;
            }
            let body = body.split("<div").next().unwrap_or(body);
            text.push_str(&strip_tags(body));
            text.push('\n');
        }

        let text = text.trim().to_string();
        (!text.is_empty()).then_some(text)
    }
}

#[async_trait]
impl LyricsProvider for Darklyrics {
    fn name(&self) -> &'static str {
        "darklyrics"
    }

    async fn fetch(&self, song: &Song) -> Result<Option<String>, ProviderError> {
        let album = self.album(song).await?;
        let page = self.http.get_text(&Self::url(&song.artist, &album)).await?;
        Ok(Self::parse(&page, &song.title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<div class="lyrics">
<h3><a name="1">1. Liberty</a></h3><br />
First verse<br />
Second verse<br />
<h3><a name="2">2. The Mountain</a></h3><br />
Climbing up<br />
<div class="note">thanks to someone</div>
</div>"#;

    #[test]
    fn test_url() {
        assert_eq!(
            Darklyrics::url("Dream Theater", "The Astonishing"),
            "http://www.darklyrics.com/lyrics/dreamtheater/theastonishing.html"
        );
    }

    #[test]
    fn test_parse_picks_matching_track() {
        assert_eq!(
            Darklyrics::parse(PAGE, "the mountain").as_deref(),
            Some("Climbing up")
        );
        assert_eq!(
            Darklyrics::parse(PAGE, "Liberty").as_deref(),
            Some("First verse\nSecond verse")
        );
    }

    #[test]
    fn test_parse_no_match() {
        assert_eq!(Darklyrics::parse(PAGE, "Unknown Song"), None);
    }

    #[tokio::test]
    async fn test_missing_album_without_lastfm() {
        let provider = Darklyrics::new(HttpClient::new().unwrap(), None);
        let result = provider.fetch(&Song::new("Opeth", "Ghost of Perdition")).await;
        assert!(matches!(result, Err(ProviderError::MissingAlbum)));
    }
}
