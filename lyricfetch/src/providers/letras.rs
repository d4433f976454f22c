//! Letras.com
//!
//! Unknown songs redirect to the site's homepage or to a different song, so
//! the page title is compared against the requested one before the
//! `<article>` paragraphs are taken.

use super::html::{alnum_key, strip_tags, translate, URL_ESCAPE};
use super::{HttpClient, LyricsProvider, ProviderError};
use async_trait::async_trait;
use lyricfetch_common::Song;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<div class="cnt-head_title"[^>]*>.*?<h1[^>]*>(.*?)</h1>"#)
        .expect("valid regex")
});
static ARTICLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<article[^>]*>(.*?)</article>").expect("valid regex"));
static PARAGRAPH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<p[^>]*>(.*?)</p>").expect("valid regex"));

pub struct Letras {
    http: HttpClient,
}

impl Letras {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn slug(s: &str) -> String {
        translate(&s.to_lowercase(), &[("&", "a"), (URL_ESCAPE, ""), (" ", "-")])
    }

    fn url(song: &Song) -> String {
        format!(
            "https://www.letras.com/{}/{}/",
            Self::slug(&song.artist),
            Self::slug(&song.title)
        )
    }

    fn parse(page: &str, title: &str) -> Option<String> {
        let found_title = TITLE_RE.captures(page)?;
        if alnum_key(&strip_tags(&found_title[1])) != alnum_key(title) {
            debug!(expected = %title, "Letras returned a different song");
            return None;
        }

        let article = ARTICLE_RE.captures(page)?;
        let text = PARAGRAPH_RE
            .captures_iter(&article[1])
            .map(|p| strip_tags(&p[1]))
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");
        (!text.is_empty()).then_some(text)
    }
}

#[async_trait]
impl LyricsProvider for Letras {
    fn name(&self) -> &'static str {
        "letras"
    }

    async fn fetch(&self, song: &Song) -> Result<Option<String>, ProviderError> {
        let page = self.http.get_text(&Self::url(song)).await?;
        Ok(Self::parse(&page, &song.title))
    }
}
