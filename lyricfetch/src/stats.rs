//! Per-provider statistics
//!
//! `Stats` accumulates success/fail counts and search durations for each
//! provider observed during a run, keyed by provider name. Providers are
//! kept in first-observed order, which is also the tie-break order of
//! `summarize`.
//!
//! Only the scheduler's consumer loop mutates a `Stats`; no locking is
//! involved.

use indexmap::IndexMap;
use std::fmt::Write as _;
use std::time::Duration;

/// Mean of `values`, zero for an empty slice
pub fn average(values: &[Duration]) -> Duration {
    if values.is_empty() {
        return Duration::ZERO;
    }
    values.iter().sum::<Duration>() / values.len() as u32
}

/// Format a duration as `H:MM:SS`
pub fn format_hms(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Accumulated results of one provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub successes: u32,
    pub fails: u32,
    /// Nonzero search durations, in observation order
    pub runtimes: Vec<Duration>,
}

impl Record {
    /// Append a runtime; zero durations are not recorded
    pub fn add_runtime(&mut self, runtime: Duration) {
        if !runtime.is_zero() {
            self.runtimes.push(runtime);
        }
    }

    /// Percentage of attempts that found lyrics, 0 without attempts
    pub fn success_rate(&self) -> f64 {
        let attempts = self.successes + self.fails;
        if attempts == 0 {
            return 0.0;
        }
        f64::from(self.successes) * 100.0 / f64::from(attempts)
    }

    pub fn average_runtime(&self) -> Duration {
        average(&self.runtimes)
    }
}

/// Result of `Stats::summarize`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    /// Provider with the most successes (first one on ties)
    pub best: Option<String>,
    /// Provider with the fewest successes (first one on ties)
    pub worst: Option<String>,
    /// Lowest nonzero average runtime
    pub fastest: Option<String>,
    /// Highest nonzero average runtime
    pub slowest: Option<String>,
    pub found: u32,
    pub not_found: u32,
    /// Sum of every recorded runtime
    pub total_time: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct Stats {
    records: IndexMap<String, Record>,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one provider search
    pub fn add_result(&mut self, provider: &str, found: bool, runtime: Duration) {
        let record = self.records.entry(provider.to_string()).or_default();
        record.add_runtime(runtime);
        if found {
            record.successes += 1;
        } else {
            record.fails += 1;
        }
    }

    pub fn record(&self, provider: &str) -> Option<&Record> {
        self.records.get(provider)
    }

    /// Records in first-observed order
    pub fn records(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.records.iter().map(|(name, record)| (name.as_str(), record))
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Average runtime of `provider`, or over every provider with `None`
    ///
    /// Unknown providers average to zero.
    pub fn average_runtime(&self, provider: Option<&str>) -> Duration {
        match provider {
            Some(name) => self.record(name).map(Record::average_runtime).unwrap_or_default(),
            None => {
                let all: Vec<Duration> = self
                    .records
                    .values()
                    .flat_map(|record| record.runtimes.iter().copied())
                    .collect();
                average(&all)
            }
        }
    }

    /// Rank providers and total the counts in one pass
    ///
    /// Providers without any recorded runtime take no part in the
    /// fastest/slowest ranking.
    pub fn summarize(&self) -> Summary {
        let mut summary = Summary::default();
        let mut best: Option<(&str, u32)> = None;
        let mut worst: Option<(&str, u32)> = None;
        let mut fastest: Option<(&str, Duration)> = None;
        let mut slowest: Option<(&str, Duration)> = None;

        for (name, record) in &self.records {
            let name = name.as_str();
            if best.map_or(true, |(_, n)| record.successes > n) {
                best = Some((name, record.successes));
            }
            if worst.map_or(true, |(_, n)| record.successes < n) {
                worst = Some((name, record.successes));
            }

            let avg = record.average_runtime();
            if !avg.is_zero() {
                if fastest.map_or(true, |(_, t)| avg < t) {
                    fastest = Some((name, avg));
                }
                if slowest.map_or(true, |(_, t)| avg > t) {
                    slowest = Some((name, avg));
                }
            }

            summary.found += record.successes;
            summary.not_found += record.fails;
            summary.total_time += record.runtimes.iter().sum::<Duration>();
        }

        summary.best = best.map(|(name, _)| name.to_string());
        summary.worst = worst.map(|(name, _)| name.to_string());
        summary.fastest = fastest.map(|(name, _)| name.to_string());
        summary.slowest = slowest.map(|(name, _)| name.to_string());
        summary
    }

    /// Render the end-of-run report
    ///
    /// # Arguments
    /// * `order` - Providers listed in the per-source block, in this order
    /// * `elapsed` - Wall time of the whole batch
    pub fn report(&self, order: &[&str], elapsed: Duration) -> String {
        let summary = self.summarize();
        let mut out = String::new();

        let _ = writeln!(out, "Total runtime: {}", format_hms(elapsed));
        let _ = writeln!(out, "    Lyrics found: {}", summary.found);
        let _ = writeln!(out, "    Lyrics not found: {}", summary.not_found);
        if let Some(best) = summary.best.as_deref().and_then(|n| self.with_record(n)) {
            let _ = writeln!(
                out,
                "    Most useful source: {} ({} lyrics found) ({:.2}% success rate)",
                best.0,
                best.1.successes,
                best.1.success_rate()
            );
        }
        if let Some(worst) = summary.worst.as_deref().and_then(|n| self.with_record(n)) {
            let _ = writeln!(
                out,
                "    Least useful source: {} ({} lyrics found) ({:.2}% success rate)",
                worst.0,
                worst.1.successes,
                worst.1.success_rate()
            );
        }
        if let Some(fastest) = summary.fastest.as_deref() {
            let _ = writeln!(
                out,
                "    Fastest website to scrape: {} (Avg: {:.2}s per search)",
                fastest,
                self.average_runtime(Some(fastest)).as_secs_f64()
            );
        }
        if let Some(slowest) = summary.slowest.as_deref() {
            let _ = writeln!(
                out,
                "    Slowest website to scrape: {} (Avg: {:.2}s per search)",
                slowest,
                self.average_runtime(Some(slowest)).as_secs_f64()
            );
        }
        let _ = writeln!(
            out,
            "    Average time per website: {:.2}s",
            self.average_runtime(None).as_secs_f64()
        );

        let _ = writeln!(out);
        let _ = writeln!(out, "----------------------------------");
        let _ = writeln!(out, "       PER WEBSITE STATS");
        let _ = writeln!(out, "----------------------------------");
        for name in order {
            let record = self.record(name).cloned().unwrap_or_default();
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", name);
            let _ = writeln!(out, "    Successes: {}", record.successes);
            let _ = writeln!(out, "    Fails: {}", record.fails);
            let _ = writeln!(out, "    Success rate: {:.2}%", record.success_rate());
            let _ = writeln!(
                out,
                "    Average runtime: {:.2}s",
                record.average_runtime().as_secs_f64()
            );
        }
        out
    }

    fn with_record<'a>(&'a self, name: &'a str) -> Option<(&'a str, &'a Record)> {
        self.record(name).map(|record| (name, record))
    }
}
