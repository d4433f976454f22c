//! Song collection
//!
//! Turns the user's request (files, a directory, a list file, or
//! "Artist - Title" names) into the list of songs to resolve. Files whose
//! tags cannot be read are logged and skipped; duplicate songs are dropped.

use crate::tags;
use lyricfetch_common::{Error, Song};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Extensions treated as audio files when scanning a directory
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "ogg", "opus", "m4a"];

/// Directory entries never descended into
const IGNORED_DIRS: &[&str] = &[".git", ".svn", "node_modules"];

/// Where the songs of a run come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Audio files given one by one
    Files(Vec<PathBuf>),
    /// Every audio file below a directory
    Recursive(PathBuf),
    /// A text file listing one audio file per line
    ListFile(PathBuf),
    /// "Artist - Title" strings
    ByName(Vec<String>),
}

/// Build the deduplicated song list for `input`
///
/// # Errors
/// - `Error::NotFound` / `Error::InvalidInput` for a missing or non-directory
///   scan root, or an unreadable list file
/// - `Error::InvalidInput("No songs specified")` when nothing usable remains
pub fn collect_songs(input: &Input) -> lyricfetch_common::Result<Vec<Song>> {
    let songs = match input {
        Input::Files(paths) => songs_from_paths(paths),
        Input::Recursive(dir) => songs_from_paths(&scan_dir(dir)?),
        Input::ListFile(list) => songs_from_paths(&read_list_file(list)?),
        Input::ByName(names) => names
            .iter()
            .filter_map(|name| match Song::parse(name, "-", false) {
                Ok(song) => Some(song),
                Err(e) => {
                    warn!(name = %name, error = %e, "Skipping malformed song name");
                    None
                }
            })
            .collect(),
    };

    let songs = dedup(songs);
    if songs.is_empty() {
        return Err(Error::InvalidInput("No songs specified".to_string()));
    }
    debug!(count = songs.len(), "Songs collected");
    Ok(songs)
}

/// Audio files below `root`, sorted by path
pub fn scan_dir(root: &Path) -> lyricfetch_common::Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(Error::NotFound(format!("directory {}", root.display())));
    }
    if !root.is_dir() {
        return Err(Error::InvalidInput(format!("{} is not a directory", root.display())));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_ignored(e));

    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && is_audio_file(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => warn!(error = %e, "Error accessing entry"),
        }
    }

    files.sort();
    debug!(root = %root.display(), files = files.len(), "Directory scanned");
    Ok(files)
}

/// Paths listed in `list`, one per line; blank lines are skipped
pub fn read_list_file(list: &Path) -> lyricfetch_common::Result<Vec<PathBuf>> {
    let content = fs::read_to_string(list)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}

/// Drop songs equal to an earlier one, keeping the first
pub fn dedup(songs: Vec<Song>) -> Vec<Song> {
    let mut paths: HashSet<PathBuf> = HashSet::new();
    // Names of kept songs, split by whether the kept song has a path
    let mut named: HashSet<SongKey> = HashSet::new();
    let mut pathed: HashSet<SongKey> = HashSet::new();
    let mut unique: Vec<Song> = Vec::with_capacity(songs.len());

    for song in songs {
        let key = song_key(&song);
        let duplicate = match song.path() {
            Some(path) => paths.contains(path) || named.contains(&key),
            None => named.contains(&key) || pathed.contains(&key),
        };
        if duplicate {
            debug!(song = %song, "Duplicate song dropped");
            continue;
        }

        match song.path() {
            Some(path) => {
                paths.insert(path.to_path_buf());
                pathed.insert(key);
            }
            None => {
                named.insert(key);
            }
        }
        unique.push(song);
    }
    unique
}

/// Lowercased artist, title and album
type SongKey = (String, String, String);

fn song_key(song: &Song) -> SongKey {
    (
        song.artist.to_lowercase(),
        song.title.to_lowercase(),
        song.album().to_lowercase(),
    )
}

pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| AUDIO_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

fn is_ignored(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| IGNORED_DIRS.contains(&name))
            .unwrap_or(false)
}

fn songs_from_paths(paths: &[PathBuf]) -> Vec<Song> {
    paths
        .iter()
        .filter_map(|path| match tags::read_song(path) {
            Ok(song) => Some(song),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Skipping file");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_audio_file() {
        assert!(is_audio_file(Path::new("a/b/song.mp3")));
        assert!(is_audio_file(Path::new("song.FLAC")));
        assert!(!is_audio_file(Path::new("cover.jpg")));
        assert!(!is_audio_file(Path::new("README")));
    }

    #[test]
    fn test_scan_dir_finds_nested_audio() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("artist").join("album");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(nested.join("01.mp3"), b"").unwrap();
        fs::write(nested.join("02.opus"), b"").unwrap();
        fs::write(nested.join("cover.jpg"), b"").unwrap();
        fs::write(dir.path().join(".git").join("hidden.mp3"), b"").unwrap();

        let files = scan_dir(dir.path()).unwrap();
        assert_eq!(files, vec![nested.join("01.mp3"), nested.join("02.opus")]);
    }

    #[test]
    fn test_scan_dir_errors() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            scan_dir(&dir.path().join("missing")),
            Err(Error::NotFound(_))
        ));

        let file = dir.path().join("file.mp3");
        fs::write(&file, b"").unwrap();
        assert!(matches!(scan_dir(&file), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_read_list_file_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let list = dir.path().join("list.txt");
        fs::write(&list, "/music/a.mp3\n\n  /music/b.flac  \n").unwrap();
        assert_eq!(
            read_list_file(&list).unwrap(),
            vec![PathBuf::from("/music/a.mp3"), PathBuf::from("/music/b.flac")]
        );
    }

    #[test]
    fn test_by_name_dedups_and_skips_malformed() {
        let input = Input::ByName(vec![
            "Opeth - Deliverance".to_string(),
            "opeth - deliverance".to_string(),
            "garbage".to_string(),
            "Opeth - Windowpane".to_string(),
        ]);
        let songs = collect_songs(&input).unwrap();
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].title, "Deliverance");
        assert_eq!(songs[1].title, "Windowpane");
    }

    #[test]
    fn test_nothing_usable() {
        let result = collect_songs(&Input::ByName(vec!["garbage".to_string()]));
        match result {
            Err(Error::InvalidInput(msg)) => assert_eq!(msg, "No songs specified"),
            other => panic!("unexpected result: {:?}", other),
        }

        let dir = TempDir::new().unwrap();
        assert!(collect_songs(&Input::Recursive(dir.path().to_path_buf())).is_err());
    }

    #[test]
    fn test_dedup_matches_song_equality() {
        let named = Song::new("Opeth", "Deliverance").with_album("Deliverance");
        let tagged = Song::new("OPETH", "deliverance")
            .with_album("deliverance")
            .with_path("/music/a.mp3");
        let same_file = Song::new("Other", "Name").with_path("/music/a.mp3");
        let other_file = Song::new("Opeth", "Deliverance")
            .with_album("Deliverance")
            .with_path("/music/b.mp3");
        let no_album = Song::new("Opeth", "Deliverance");

        // A named song equals a tagged one with the same names
        let songs = dedup(vec![named.clone(), tagged.clone(), no_album.clone()]);
        assert_eq!(songs.len(), 2);
        assert!(songs[0].path().is_none());
        assert!(songs[1].album().is_empty());

        // Two files are distinct unless their paths match
        let songs = dedup(vec![tagged.clone(), other_file.clone(), same_file]);
        assert_eq!(songs.len(), 2);

        // Order of arrival does not change the answer
        let songs = dedup(vec![tagged, other_file, named]);
        assert_eq!(songs.len(), 2);
    }

    #[test]
    fn test_dedup_large_batch() {
        let mut songs: Vec<Song> = (0..20_000)
            .map(|i| Song::new(format!("Artist {}", i), format!("Title {}", i)))
            .collect();
        songs.extend((0..100).map(|i| Song::new(format!("artist {}", i), format!("TITLE {}", i))));

        let start = std::time::Instant::now();
        let unique = dedup(songs);
        assert_eq!(unique.len(), 20_000);
        assert!(start.elapsed() < std::time::Duration::from_secs(2));
    }
}
