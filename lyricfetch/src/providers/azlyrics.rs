//! AZLyrics.com
//!
//! Pages live at `/lyrics/<artist>/<title>.html` with every URL-hostile
//! character and space removed. The lyrics are the body of the unclassed
//! `<div>` that follows the site's usage-notice comment.

use super::html::{normalize, strip_tags, URL_ESCAPES};
use super::{HttpClient, LyricsProvider, ProviderError};
use async_trait::async_trait;
use lyricfetch_common::Song;
use once_cell::sync::Lazy;
use regex::Regex;

static LYRICS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!--\s*Usage of azlyrics\.com content.*?-->(.*?)</div>").expect("valid regex")
});

pub struct AzLyrics {
    http: HttpClient,
}

impl AzLyrics {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn url(song: &Song) -> String {
        let artist = song.artist.to_lowercase();
        let artist = artist.strip_prefix("a ").unwrap_or(&artist);
        let artist = normalize(artist, URL_ESCAPES, "");
        let title = normalize(&song.title.to_lowercase(), URL_ESCAPES, "");
        format!("https://www.azlyrics.com/lyrics/{}/{}.html", artist, title)
    }

    fn parse(page: &str) -> Option<String> {
        let caps = LYRICS_RE.captures(page)?;
        let text = strip_tags(&caps[1]);
        (!text.is_empty()).then_some(text)
    }
}

#[async_trait]
impl LyricsProvider for AzLyrics {
    fn name(&self) -> &'static str {
        "azlyrics"
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
        let song = Song::new("A Perfect Circle", "Judith");
        assert_eq!(
            AzLyrics::url(&song),
            "https://www.azlyrics.com/lyrics/perfectcircle/judith.html"
        );

        let song = Song::new("Guns N' Roses", "Sweet Child O' Mine");
        assert_eq!(
            AzLyrics::url(&song),
            "https://www.azlyrics.com/lyrics/gunsnroses/sweetchildomine.html"
        );
    }

    #[test]
    fn test_parse() {
        let page = r#"<div class="ringtone"></div><b>"Judith"</b><br>
<div>
<!-- Usage of azlyrics.com content by any third-party lyrics provider is prohibited. -->
You're such an inspiration for the ways<br>
That I'll never ever choose to be<br>
</div>
<br><br>"#;
        assert_eq!(
            AzLyrics::parse(page).as_deref(),
            Some("You're such an inspiration for the ways\nThat I'll never ever choose to be")
        );
    }

    #[test]
    fn test_parse_missing_block() {
        assert_eq!(AzLyrics::parse("<html><body>Not found</body></html>"), None);
    }
}
