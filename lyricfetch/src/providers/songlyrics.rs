//! SongLyrics.com

use super::html::{collapse, strip_tags, translate, URL_ESCAPE};
use super::{HttpClient, LyricsProvider, ProviderError};
use async_trait::async_trait;
use lyricfetch_common::Song;
use once_cell::sync::Lazy;
use regex::Regex;

static LYRICS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<p id="songLyricsDiv"[^>]*>(.*?)</p>"#).expect("valid regex")
});

/// Placeholder text the site serves instead of a 404
const NOT_AVAILABLE: &str = "we do not have the lyrics for";

pub struct SongLyrics {
    http: HttpClient,
}

impl SongLyrics {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn slug(s: &str) -> String {
        let slug = translate(&s.to_lowercase(), &[(URL_ESCAPE, ""), (" ", "-")]);
        collapse(&slug, '-')
    }

    fn url(song: &Song) -> String {
        format!(
            "http://www.songlyrics.com/{}/{}-lyrics",
            Self::slug(&song.artist),
            Self::slug(&song.title)
        )
    }

    fn parse(page: &str) -> Option<String> {
        let caps = LYRICS_RE.captures(page)?;
        let text = strip_tags(&caps[1]);
        if text.is_empty() || text.to_lowercase().starts_with(NOT_AVAILABLE) {
            return None;
        }
        Some(text)
    }
}

#[async_trait]
impl LyricsProvider for SongLyrics {
    fn name(&self) -> &'static str {
        "songlyrics"
    }

    async fn fetch(&self, song: &Song) -> Result<Option<String>, ProviderError> {
        let page = self.http.get_text(&Self::url(song)).await?;
        Ok(Self::parse(&page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url() {
        assert_eq!(
            SongLyrics::url(&Song::new("The Beatles", "Hey - Jude!")),
            "http://www.songlyrics.com/the-beatles/hey-jude-lyrics"
        );
    }

    #[test]
    fn test_parse() {
        let page = r#"<div><p id="songLyricsDiv"  class="songLyricsV14 iComment-text">Hey Jude, don't make it bad<br />
Take a sad song and make it better</p></div>"#;
        assert_eq!(
            SongLyrics::parse(page).as_deref(),
            Some("Hey Jude, don't make it bad\nTake a sad song and make it better")
        );
    }

    #[test]
    fn test_parse_placeholder() {
        let page = r#"<p id="songLyricsDiv" class="x">We do not have the lyrics for Hey Jude yet.</p>"#;
        assert_eq!(SongLyrics::parse(page), None);
        assert_eq!(SongLyrics::parse("<html></html>"), None);
    }
}
