//! Batch resolution
//!
//! # Architecture
//! - Up to `jobs` songs are resolved at the same time, each by the
//!   fallback strategy (one provider request in flight per song), through
//!   `futures::stream::buffer_unordered`
//! - Every song runs in its own task, so a panicking provider only loses
//!   that one song
//! - Outcomes are consumed in completion order by a single loop, which is
//!   the only writer of the batch `Stats` and the only caller of the sink
//! - Cancelling the token stops the batch: no further songs start, songs
//!   still in flight stop at their next await point without reaching the
//!   sink, and the statistics gathered so far are returned inside
//!   `FetchError::Interrupted`
//!
//! # Example
//! ```rust,ignore
//! let scheduler = BatchScheduler::new(resolver, config.jobcount)?;
//! let report = scheduler.run(songs, &mut StandardSink::stdout(), cancel).await?;
//! println!("Total time: {}", format_hms(report.elapsed));
//! ```

use crate::error::{FetchError, FetchResult};
use crate::resolver::{ItemResolver, Outcome, Strategy};
use crate::sink::{DebugLog, ResultSink};
use crate::stats::Stats;
use futures::stream::{self, StreamExt};
use lyricfetch_common::{Error, Song};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Totals of a batch run, complete or interrupted
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub stats: Stats,
    /// Wall time of the run
    pub elapsed: Duration,
    /// Songs that went through the resolver
    pub resolved: usize,
    /// Songs delivered with lyrics
    pub found: usize,
    /// Songs skipped because they already had lyrics
    pub skipped: usize,
    /// Songs lost to an unexpected worker failure
    pub failed: usize,
}

/// What a worker hands back for one song
enum WorkerEvent {
    Resolved(Outcome),
    Skipped,
    Cancelled,
    Failed { song: String, error: String },
}

pub struct BatchScheduler {
    resolver: Arc<ItemResolver>,
    jobs: usize,
    debug_dir: Option<PathBuf>,
}

impl BatchScheduler {
    /// # Errors
    /// `Error::Config` when `jobs` is zero.
    pub fn new(resolver: ItemResolver, jobs: usize) -> FetchResult<Self> {
        if jobs == 0 {
            return Err(Error::Config("job count must be greater than zero".to_string()).into());
        }
        Ok(Self {
            resolver: Arc::new(resolver),
            jobs,
            debug_dir: None,
        })
    }

    /// Write `found` / `notfound` logs into `dir` during runs
    pub fn with_debug_log(mut self, dir: impl Into<PathBuf>) -> Self {
        self.debug_dir = Some(dir.into());
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Resolve every song, delivering each outcome to `sink`
    ///
    /// # Errors
    /// - `FetchError::Interrupted` with the partial report when `cancel`
    ///   fires before the batch completes
    /// - `FetchError::Io` when the debug logs cannot be created
    pub async fn run(
        &self,
        songs: Vec<Song>,
        sink: &mut dyn ResultSink,
        cancel: CancellationToken,
    ) -> FetchResult<BatchReport> {
        let start = Instant::now();
        let mut debug_log = match &self.debug_dir {
            Some(dir) => Some(DebugLog::create(dir)?),
            None => None,
        };

        info!(songs = songs.len(), jobs = self.jobs, "Starting batch");

        let mut events = stream::iter(songs)
            .map(|song| {
                let resolver = Arc::clone(&self.resolver);
                let cancel = cancel.child_token();
                async move {
                    let label = song.to_string();
                    // Detached on interrupt, so the task watches the token itself
                    let task = tokio::spawn(async move {
                        tokio::select! {
                            _ = cancel.cancelled() => WorkerEvent::Cancelled,
                            outcome = resolver.resolve(song, Strategy::Fallback) => match outcome {
                                Some(outcome) => WorkerEvent::Resolved(outcome),
                                None => WorkerEvent::Skipped,
                            },
                        }
                    });
                    match task.await {
                        Ok(event) => event,
                        Err(e) => WorkerEvent::Failed {
                            song: label,
                            error: e.to_string(),
                        },
                    }
                }
            })
            .buffer_unordered(self.jobs);

        let mut report = BatchReport::default();
        let mut interrupted = false;

        loop {
            let event = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    interrupted = true;
                    break;
                }
                event = events.next() => event,
            };
            let Some(event) = event else {
                break;
            };

            match event {
                WorkerEvent::Resolved(outcome) => {
                    report.resolved += 1;
                    for (provider, runtime) in &outcome.runtimes {
                        let found = outcome.source == Some(*provider);
                        report.stats.add_result(provider, found, *runtime);
                    }

                    let found = match sink.deliver(&outcome) {
                        Ok(found) => found,
                        Err(e) => {
                            warn!(song = %outcome.song, error = %e, "Could not deliver result");
                            false
                        }
                    };
                    if found {
                        report.found += 1;
                    }
                    if let Some(log) = debug_log.as_mut() {
                        if let Err(e) = log.record(&outcome, found) {
                            warn!(error = %e, "Could not write debug log");
                        }
                    }
                }
                WorkerEvent::Skipped => report.skipped += 1,
                WorkerEvent::Cancelled => {}
                WorkerEvent::Failed { song, error } => {
                    report.failed += 1;
                    error!(song = %song, error = %error, "Song resolution failed");
                }
            }
        }

        report.elapsed = start.elapsed();
        drop(debug_log);

        debug!(
            resolved = report.resolved,
            found = report.found,
            skipped = report.skipped,
            failed = report.failed,
            "Batch finished"
        );

        if interrupted {
            warn!(resolved = report.resolved, "Batch interrupted");
            return Err(FetchError::Interrupted(Box::new(report)));
        }
        Ok(report)
    }
}
