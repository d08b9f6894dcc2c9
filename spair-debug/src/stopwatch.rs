//! Wall-clock timing of named sections.

use crate::common::*;

/// Measures the time between consecutive laps.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    instant: Instant,
    records: Vec<(String, Duration)>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            instant: Instant::now(),
            records: vec![],
        }
    }

    /// The time since the last lap, without resetting.
    pub fn elapsed(&self) -> Duration {
        self.instant.elapsed()
    }

    /// Logs and returns the time since the last lap, then restarts.
    pub fn lap<S>(&mut self, name: S) -> Duration
    where
        S: Into<String>,
    {
        let name = name.into();
        let elapsed = self.instant.elapsed();
        info!("{}: {:.4}", name, elapsed.as_secs_f64());
        self.records.push((name, elapsed));
        self.instant = Instant::now();
        elapsed
    }

    pub fn records(&self) -> &[(String, Duration)] {
        &self.records
    }

    pub fn report(&self) {
        let total: Duration = self.records.iter().map(|(_, elapsed)| *elapsed).sum();
        info!("timing report, {} laps in {:?}", self.records.len(), total);
        self.records.iter().for_each(|(name, elapsed)| {
            info!("- {}\t{:?}", name, elapsed);
        });
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}
