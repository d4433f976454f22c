//! Song model
//!
//! A `Song` is the unit of work for every lookup: an identity key (artist,
//! title, optional album), an optional path to the audio file it came from,
//! and the lyrics once some provider has found them.
//!
//! # Equality
//! Two songs are equal by path when both carry one. Otherwise they are
//! compared case-insensitively on artist, title and album, with a missing
//! album treated as an empty one. Both branches are symmetric.

use crate::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Song identity plus the lyrics slot that lookups fill in
#[derive(Debug, Clone, Default)]
pub struct Song {
    /// Artist name (album artist when read from tags)
    pub artist: String,
    /// Track title
    pub title: String,
    /// Album title, used by album-indexed providers
    pub album: Option<String>,
    /// Lyrics text, empty until found
    pub lyrics: String,
    /// Audio file this song was read from
    pub path: Option<PathBuf>,
}

impl Song {
    /// Create a song from artist and title
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        let album = album.into();
        self.album = if album.is_empty() { None } else { Some(album) };
        self
    }

    pub fn with_lyrics(mut self, lyrics: impl Into<String>) -> Self {
        self.lyrics = lyrics.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Parse user input formatted as `"artist - title"`
    ///
    /// Only the first separator splits; later ones stay in the second part.
    ///
    /// # Arguments
    /// * `name` - Raw user input
    /// * `separator` - Separator between the two parts (usually `-`)
    /// * `reverse` - Input is `"title - artist"` instead
    ///
    /// # Errors
    /// Returns `Error::InvalidInput` when either part is missing or empty.
    pub fn parse(name: &str, separator: &str, reverse: bool) -> Result<Self> {
        let Some((first, rest)) = name.split_once(separator) else {
            return Err(Error::InvalidInput(format!(
                "expected 'artist {} title', got '{}'",
                separator, name
            )));
        };

        let (first, rest) = (first.trim().to_string(), rest.trim().to_string());
        let (artist, title) = if reverse { (rest, first) } else { (first, rest) };

        if artist.is_empty() || title.is_empty() {
            return Err(Error::InvalidInput(format!(
                "artist and title must not be empty: '{}'",
                name
            )));
        }

        Ok(Self::new(artist, title))
    }

    /// Whether the lyrics slot is filled
    pub fn has_lyrics(&self) -> bool {
        !self.lyrics.is_empty()
    }

    pub fn album(&self) -> &str {
        self.album.as_deref().unwrap_or("")
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl PartialEq for Song {
    fn eq(&self, other: &Self) -> bool {
        match (&self.path, &other.path) {
            (Some(a), Some(b)) => a == b,
            _ => {
                self.artist.to_lowercase() == other.artist.to_lowercase()
                    && self.title.to_lowercase() == other.title.to_lowercase()
                    && self.album().to_lowercase() == other.album().to_lowercase()
            }
        }
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "{}", path.display())
        } else if !self.artist.is_empty() && !self.title.is_empty() {
            write!(f, "{} - {}", title_case(&self.artist), title_case(&self.title))
        } else {
            Ok(())
        }
    }
}

/// Capitalise the first letter of every word, lowercase the rest
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
