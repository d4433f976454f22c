//! Audio file tag access
//!
//! Reads song identity from file tags and stores found lyrics back, using
//! lofty for every supported container (MP3, FLAC, Ogg, Opus, MP4).

use crate::error::{FetchError, FetchResult};
use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};
use lyricfetch_common::{Error, Song};
use std::path::Path;
use tracing::debug;

/// Build a `Song` from the tags of the audio file at `path`
///
/// The album artist is preferred over the track artist. Lyrics already
/// embedded in the file are loaded so the resolver can skip the song.
///
/// # Errors
/// - `Error::NotFound` if the path does not exist
/// - `Error::InvalidInput` for directories or files lacking artist/title
/// - `FetchError::Tags` when the file cannot be parsed
pub fn read_song(path: &Path) -> FetchResult<Song> {
    if !path.exists() {
        return Err(Error::NotFound(format!("file {}", path.display())).into());
    }
    if path.is_dir() {
        return Err(Error::InvalidInput(format!("{} is a directory", path.display())).into());
    }

    let tagged_file = Probe::open(path)?.read()?;
    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag())
        .ok_or_else(|| Error::InvalidInput(format!("{} has no tags", path.display())))?;

    let artist = tag
        .get_string(&ItemKey::AlbumArtist)
        .map(str::to_string)
        .or_else(|| tag.artist().map(|a| a.to_string()))
        .filter(|a| !a.trim().is_empty());
    let title = tag.title().map(|t| t.to_string()).filter(|t| !t.trim().is_empty());

    let (Some(artist), Some(title)) = (artist, title) else {
        return Err(Error::InvalidInput(format!("{} lacks artist or title tags", path.display())).into());
    };

    let song = Song::new(artist.trim(), title.trim())
        .with_album(tag.album().map(|a| a.trim().to_string()).unwrap_or_default())
        .with_lyrics(tag.get_string(&ItemKey::Lyrics).unwrap_or_default())
        .with_path(path);

    debug!(file = %path.display(), song = %song, has_lyrics = song.has_lyrics(), "Read tags");
    Ok(song)
}

/// Store `lyrics` in the primary tag of the file at `path`
///
/// The primary tag is created when the file has none.
pub fn write_lyrics(path: &Path, lyrics: &str) -> FetchResult<()> {
    let mut tagged_file = Probe::open(path)?.read()?;

    if tagged_file.primary_tag_mut().is_none() {
        let tag_type = tagged_file.primary_tag_type();
        tagged_file.insert_tag(Tag::new(tag_type));
    }
    let tag = tagged_file
        .primary_tag_mut()
        .ok_or_else(|| FetchError::Tags(format!("cannot create a tag in {}", path.display())))?;

    tag.insert_text(ItemKey::Lyrics, lyrics.to_string());
    tag.save_to_path(path, WriteOptions::default())?;

    debug!(file = %path.display(), "Lyrics written");
    Ok(())
}
