//! Run-level timing: how long each phase of a scrape took and how it
//! ended.

use std::fmt;
use std::time::{Duration, Instant};

use log::info;

#[derive(Debug, Clone)]
pub struct PhaseMetrics {
    pub name: &'static str,
    pub duration: Duration,
    pub succeeded: bool,
    pub error: Option<String>,
}

/// Collects per-phase outcomes across one scrape run.
#[derive(Debug, Default)]
pub struct ScrapeMetrics {
    phases: Vec<PhaseMetrics>,
    posts_extracted: usize,
}

impl ScrapeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `op` as the named phase, recording its duration and outcome.
    pub fn timed<T, E: fmt::Display>(
        &mut self,
        name: &'static str,
        op: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        let start = Instant::now();
        let result = op();
        let duration = start.elapsed();
        match &result {
            Ok(_) => self.phases.push(PhaseMetrics {
                name,
                duration,
                succeeded: true,
                error: None,
            }),
            Err(e) => self.phases.push(PhaseMetrics {
                name,
                duration,
                succeeded: false,
                error: Some(e.to_string()),
            }),
        }
        result
    }

    pub fn set_posts_extracted(&mut self, count: usize) {
        self.posts_extracted = count;
    }

    pub fn phases(&self) -> &[PhaseMetrics] {
        &self.phases
    }

    pub fn total_duration(&self) -> Duration {
        self.phases.iter().map(|p| p.duration).sum()
    }

    pub fn succeeded(&self) -> bool {
        self.phases.iter().all(|p| p.succeeded)
    }

    pub fn log_summary(&self) {
        for phase in &self.phases {
            match &phase.error {
                None => info!("phase {}: {:.1?}", phase.name, phase.duration),
                Some(error) => info!(
                    "phase {}: {:.1?} (failed: {error})",
                    phase.name, phase.duration
                ),
            }
        }
        info!(
            "run finished in {:.1?}: {} posts extracted",
            self.total_duration(),
            self.posts_extracted
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_records_success() {
        let mut metrics = ScrapeMetrics::new();
        let result: Result<u32, String> = metrics.timed("login", || Ok(7));

        assert_eq!(result.unwrap(), 7);
        assert_eq!(metrics.phases().len(), 1);
        assert!(metrics.phases()[0].succeeded);
        assert!(metrics.phases()[0].error.is_none());
        assert!(metrics.succeeded());
    }

    #[test]
    fn test_timed_records_failure() {
        let mut metrics = ScrapeMetrics::new();
        let result: Result<u32, String> = metrics.timed("login", || Err("bad password".to_string()));

        assert!(result.is_err());
        assert!(!metrics.phases()[0].succeeded);
        assert_eq!(
            metrics.phases()[0].error.as_deref(),
            Some("bad password")
        );
        assert!(!metrics.succeeded());
    }

    #[test]
    fn test_total_duration_sums_phases() {
        let mut metrics = ScrapeMetrics::new();
        let _: Result<(), String> = metrics.timed("a", || Ok(()));
        let _: Result<(), String> = metrics.timed("b", || Ok(()));

        assert_eq!(metrics.phases().len(), 2);
        assert!(metrics.total_duration() >= metrics.phases()[0].duration);
    }
}
