//! Outcome delivery
//!
//! A `ResultSink` receives every resolved `Outcome` exactly once, as soon
//! as it is available. The standard sink stores lyrics into the audio file
//! they belong to (or prints them for songs requested by name) and tells
//! the user what happened.

use crate::error::FetchResult;
use crate::providers::id_source;
use crate::resolver::Outcome;
use crate::tags;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tracing::warn;

/// Separator printed after lyrics shown on screen
const RULE: &str =
    "-----------------------------------------------------------------------------";

/// Destination of resolved outcomes
pub trait ResultSink: Send {
    /// Handle one outcome
    ///
    /// # Returns
    /// Whether the song ends up with lyrics.
    fn deliver(&mut self, outcome: &Outcome) -> FetchResult<bool>;
}

/// Writes lyrics to file tags and reports to `out`
pub struct StandardSink<W> {
    out: W,
}

impl StandardSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> StandardSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> ResultSink for StandardSink<W> {
    fn deliver(&mut self, outcome: &Outcome) -> FetchResult<bool> {
        let song = &outcome.song;
        let Some(source) = outcome.source else {
            writeln!(self.out, "Lyrics for {} not found", song)?;
            return Ok(false);
        };

        match song.path() {
            Some(path) => {
                if let Err(e) = tags::write_lyrics(path, &song.lyrics) {
                    warn!(song = %song, error = %e, "Could not save lyrics");
                    writeln!(self.out, "Lyrics for {} not found", song)?;
                    return Ok(false);
                }
                let code = id_source(source, false).unwrap_or(source);
                writeln!(self.out, "[{}] Lyrics added for {}", code, song)?;
            }
            None => {
                let full = id_source(source, true).unwrap_or(source);
                writeln!(self.out, "FROM {}\n\n{}\n{}", full, song.lyrics, RULE)?;
            }
        }
        Ok(true)
    }
}

/// `found` / `notfound` log files of a batch run
///
/// Lines are flushed as they are written; the files close when the log is
/// dropped.
pub struct DebugLog {
    found: File,
    not_found: File,
}

impl DebugLog {
    /// Create (truncate) `found` and `notfound` inside `dir`
    pub fn create(dir: &Path) -> io::Result<Self> {
        Ok(Self {
            found: File::create(dir.join("found"))?,
            not_found: File::create(dir.join("notfound"))?,
        })
    }

    /// Append the outcome to the matching file
    pub fn record(&mut self, outcome: &Outcome, found: bool) -> io::Result<()> {
        if found {
            let source = outcome.source.unwrap_or_default();
            let code = id_source(source, false).unwrap_or(source);
            writeln!(self.found, "{}: {}", code, outcome.song)?;
            self.found.flush()
        } else {
            writeln!(self.not_found, "{}", outcome.song)?;
            self.not_found.flush()
        }
    }
}
