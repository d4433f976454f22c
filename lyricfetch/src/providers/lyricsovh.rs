//! Lyrics.ovh

use super::{HttpClient, LyricsProvider, ProviderError};
use async_trait::async_trait;
use lyricfetch_common::Song;
use serde::Deserialize;

const API_URL: &str = "https://api.lyrics.ovh/v1";

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    lyrics: String,
}

pub struct LyricsOvh {
    http: HttpClient,
}

impl LyricsOvh {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn url(song: &Song) -> String {
        format!(
            "{}/{}/{}",
            API_URL,
            urlencoding::encode(&song.artist),
            urlencoding::encode(&song.title)
        )
    }

    fn lyrics(response: Response) -> Option<String> {
        // The API prefixes some answers with a "Paroles de la chanson" line
        let text = response.lyrics.replace("\r\n", "\n");
        let text = match text.split_once('\n') {
            Some((first, rest)) if first.starts_with("Paroles de la chanson") => rest,
            _ => text.as_str(),
        };
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

#[async_trait]
impl LyricsProvider for LyricsOvh {
    fn name(&self) -> &'static str {
        "lyricsovh"
    }

    async fn fetch(&self, song: &Song) -> Result<Option<String>, ProviderError> {
        match self.http.get_json::<Response>(&Self::url(song)).await {
            Ok(response) => Ok(Self::lyrics(response)),
            Err(ProviderError::Status(404)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url() {
        assert_eq!(
            LyricsOvh::url(&Song::new("AC/DC", "Back in Black")),
            "https://api.lyrics.ovh/v1/AC%2FDC/Back%20in%20Black"
        );
    }

    #[test]
    fn test_lyrics() {
        let response: Response = serde_json::from_str(
            r#"{"lyrics": "Paroles de la chanson Back in Black par AC/DC\r\nBack in black\r\nI hit the sack"}"#,
        )
        .unwrap();
        assert_eq!(
            LyricsOvh::lyrics(response).as_deref(),
            Some("Back in black\nI hit the sack")
        );

        let response: Response = serde_json::from_str(r#"{"lyrics": "Plain\nText"}"#).unwrap();
        assert_eq!(LyricsOvh::lyrics(response).as_deref(), Some("Plain\nText"));
    }

    #[test]
    fn test_empty_answer() {
        let response: Response = serde_json::from_str(r#"{"error": "No lyrics found"}"#).unwrap();
        assert_eq!(LyricsOvh::lyrics(response), None);
    }
}
