//! Test Helper Utilities
//!
//! Scripted providers and a recording sink for resolver and scheduler tests

#![allow(dead_code)]

use async_trait::async_trait;
use lyricfetch::providers::{LyricsProvider, ProviderError};
use lyricfetch::{FetchResult, Outcome, ProviderSet, ResultSink};
use lyricfetch_common::Song;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// What a `MockProvider` does once its delay has elapsed
#[derive(Debug, Clone)]
pub enum Answer {
    Lyrics(String),
    Empty,
    Error,
    Panic,
    /// Answer with lyrics only for songs with this title
    LyricsFor { title: String, lyrics: String },
    /// Panic for songs with this title, answer `lyrics` otherwise
    PanicOn { title: String, lyrics: String },
}

pub struct MockProvider {
    name: &'static str,
    delay: Duration,
    answer: Answer,
    calls: AtomicUsize,
    completed: AtomicUsize,
}

impl MockProvider {
    pub fn new(name: &'static str, delay: Duration, answer: Answer) -> Arc<Self> {
        Arc::new(Self {
            name,
            delay,
            answer,
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        })
    }

    /// Instant answer
    pub fn instant(name: &'static str, answer: Answer) -> Arc<Self> {
        Self::new(name, Duration::ZERO, answer)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Lookups that ran past their delay
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LyricsProvider for MockProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self, song: &Song) -> Result<Option<String>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            Answer::Lyrics(lyrics) => Ok(Some(lyrics.clone())),
            Answer::Empty => Ok(Some(String::new())),
            Answer::Error => Err(ProviderError::Network("connection reset".to_string())),
            Answer::Panic => panic!("provider {} exploded", self.name),
            Answer::LyricsFor { title, lyrics } => {
                Ok((song.title == *title).then(|| lyrics.clone()))
            }
            Answer::PanicOn { title, lyrics } => {
                if song.title == *title {
                    panic!("provider {} exploded on {}", self.name, title);
                }
                Ok(Some(lyrics.clone()))
            }
        }
    }
}

pub fn lyrics(text: &str) -> Answer {
    Answer::Lyrics(text.to_string())
}

/// Provider set from mocks, in order
pub fn provider_set(mocks: &[Arc<MockProvider>]) -> ProviderSet {
    ProviderSet::new(
        mocks
            .iter()
            .map(|mock| Arc::clone(mock) as Arc<dyn LyricsProvider>),
    )
}

/// `count` songs named "Artist N - Title N"
pub fn songs(count: usize) -> Vec<Song> {
    (0..count)
        .map(|i| Song::new(format!("Artist {}", i), format!("Title {}", i)))
        .collect()
}

/// Sink that keeps every delivered outcome
#[derive(Default)]
pub struct RecordingSink {
    pub outcomes: Vec<Outcome>,
}

impl ResultSink for RecordingSink {
    fn deliver(&mut self, outcome: &Outcome) -> FetchResult<bool> {
        self.outcomes.push(outcome.clone());
        Ok(outcome.found())
    }
}
