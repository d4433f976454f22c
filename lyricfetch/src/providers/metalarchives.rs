//! Metal-archives.com
//!
//! Two requests per song: an advanced song search (JSON, band match exact)
//! yields rows whose HTML cells carry `lyricsLink_<id>` anchors, then each
//! id is fetched from the lyrics endpoint until one has actual text.

use super::html::strip_tags;
use super::{HttpClient, LyricsProvider, ProviderError};
use async_trait::async_trait;
use lyricfetch_common::Song;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

const SEARCH_URL: &str = "https://www.metal-archives.com/search/ajax-advanced/searching/songs/";
const LYRICS_URL: &str = "https://www.metal-archives.com/release/ajax-view-lyrics/id/";

static LYRICS_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"lyricsLink_(\d+)").expect("valid regex"));

/// Search endpoint payload (DataTables format)
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "aaData", default)]
    rows: Vec<Vec<Value>>,
}

pub struct MetalArchives {
    http: HttpClient,
}

impl MetalArchives {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn search_url(song: &Song) -> String {
        format!(
            "{}?songTitle={}&bandName={}&ExactBandMatch=1",
            SEARCH_URL,
            urlencoding::encode(&song.title),
            urlencoding::encode(&song.artist)
        )
    }

    /// Lyrics ids referenced by the search rows, first occurrence wins
    fn lyrics_ids(response: &SearchResponse) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        let cells = response.rows.iter().flatten().filter_map(Value::as_str);
        for cell in cells {
            for caps in LYRICS_LINK_RE.captures_iter(cell) {
                let id = caps[1].to_string();
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    fn parse_lyrics(page: &str) -> Option<String> {
        let text = strip_tags(page);
        if text.is_empty() || text.to_lowercase().contains("lyrics not available") {
            return None;
        }
        Some(text)
    }
}

#[async_trait]
impl LyricsProvider for MetalArchives {
    fn name(&self) -> &'static str {
        "metalarchives"
    }

    async fn fetch(&self, song: &Song) -> Result<Option<String>, ProviderError> {
        let response: SearchResponse = self.http.get_json(&Self::search_url(song)).await?;
        let ids = Self::lyrics_ids(&response);
        debug!(song = %song, candidates = ids.len(), "Metal-archives search");

        for id in ids {
            let page = self.http.get_text(&format!("{}{}", LYRICS_URL, id)).await?;
            if let Some(lyrics) = Self::parse_lyrics(&page) {
                return Ok(Some(lyrics));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url() {
        let url = MetalArchives::search_url(&Song::new("Iron Maiden", "Fear of the Dark"));
        assert!(url.starts_with(SEARCH_URL));
        assert!(url.contains("songTitle=Fear%20of%20the%20Dark"));
        assert!(url.contains("bandName=Iron%20Maiden"));
        assert!(url.ends_with("ExactBandMatch=1"));
    }

    #[test]
    fn test_lyrics_ids_keep_order_and_dedupe() {
        let response: SearchResponse = serde_json::from_str(
            r#"{
                "iTotalRecords": 3,
                "aaData": [
                    ["<a href=\"/bands/Iron_Maiden\">Iron Maiden</a>", "Fear of the Dark", "<a id=\"lyricsLink_1234\">Show lyrics</a>"],
                    ["<a href=\"/bands/Iron_Maiden\">Iron Maiden</a>", "Live", "<a id=\"lyricsLink_987\">Show lyrics</a>"],
                    ["Iron Maiden", "Compilation", "<a id=\"lyricsLink_1234\">Show lyrics</a>"]
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(MetalArchives::lyrics_ids(&response), vec!["1234", "987"]);
    }

    #[test]
    fn test_empty_search() {
        let response: SearchResponse = serde_json::from_str(r#"{"iTotalRecords": 0}"#).unwrap();
        assert!(MetalArchives::lyrics_ids(&response).is_empty());
    }

    #[test]
    fn test_parse_lyrics() {
        assert_eq!(
            MetalArchives::parse_lyrics("\n  I am a man who walks alone<br />\nAnd when I'm walking<br />\n").as_deref(),
            Some("I am a man who walks alone\nAnd when I'm walking")
        );
        assert_eq!(MetalArchives::parse_lyrics("<em>(lyrics not available)</em>"), None);
        assert_eq!(MetalArchives::parse_lyrics("   "), None);
    }
}
