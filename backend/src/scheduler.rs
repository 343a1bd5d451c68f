//! Daily beach prediction collection
//!
//! Runs the beach batch once a day at a fixed Korean local time. Each run
//! is bounded by a timeout and only logs its outcome; a failed run does
//! not stop the schedule.

use std::time::{Duration, Instant};

use chrono::{Duration as ChronoDuration, NaiveDateTime};
use shared::BEACHES;
use tokio::task::JoinHandle;

use crate::config::SchedulerConfig;
use crate::error::{AppError, AppResult};
use crate::services::trash::{now_kst, BeachPrediction, TrashService};

/// Time left until the next `hour:minute`, strictly in the future.
///
/// Returns `None` for an impossible time of day.
pub fn duration_until_next_run(now: NaiveDateTime, hour: u32, minute: u32) -> Option<Duration> {
    let today = now.date().and_hms_opt(hour, minute, 0)?;
    let next = if today > now {
        today
    } else {
        today + ChronoDuration::days(1)
    };
    (next - now).to_std().ok()
}

/// Periodic trigger for the beach batch
pub struct BeachCollector {
    service: TrashService,
    config: SchedulerConfig,
}

impl BeachCollector {
    pub fn new(service: TrashService, config: SchedulerConfig) -> Self {
        Self { service, config }
    }

    /// Run one collection now, bounded by the configured timeout
    pub async fn run_once(&self) -> AppResult<Vec<BeachPrediction>> {
        let started = Instant::now();
        let now = now_kst();
        tracing::info!(date = %now.date(), "=== Beach prediction collection started ===");

        let limit = Duration::from_secs(self.config.timeout_secs);
        let outcome = tokio::time::timeout(limit, self.service.predict_beaches(&BEACHES, now)).await;

        match outcome {
            Ok(Ok(predictions)) => {
                for p in &predictions {
                    tracing::info!(
                        beach = p.beach.name,
                        trash_amount = p.result.trash_amount,
                        status = %p.result.status,
                        "Collected"
                    );
                }
                tracing::info!(
                    succeeded = predictions.len(),
                    total = BEACHES.len(),
                    elapsed = ?started.elapsed(),
                    "Beach prediction collection finished"
                );
                Ok(predictions)
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Beach prediction collection failed");
                Err(e)
            }
            Err(_) => {
                tracing::error!(timeout_secs = self.config.timeout_secs, "Beach prediction collection timed out");
                Err(AppError::Internal(format!(
                    "collection exceeded {} seconds",
                    self.config.timeout_secs
                )))
            }
        }
    }

    /// Start the daily loop in the background
    pub fn spawn(self) -> AppResult<JoinHandle<()>> {
        let (hour, minute) = (self.config.hour, self.config.minute);
        if duration_until_next_run(now_kst(), hour, minute).is_none() {
            return Err(AppError::Configuration(format!(
                "invalid scheduler time {:02}:{:02}",
                hour, minute
            )));
        }

        tracing::info!("Scheduler started - daily collection at {:02}:{:02} KST", hour, minute);

        Ok(tokio::spawn(async move {
            loop {
                let wait = duration_until_next_run(now_kst(), hour, minute)
                    .unwrap_or(Duration::from_secs(24 * 60 * 60));
                tracing::info!(next_run_in = ?wait, "Next beach collection scheduled");
                tokio::time::sleep(wait).await;

                // errors are already logged by run_once
                let _ = self.run_once().await;
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_next_run_later_today() {
        let wait = duration_until_next_run(at(5, 30, 0), 6, 0).unwrap();
        assert_eq!(wait, Duration::from_secs(30 * 60));
    }

    #[test]
    fn test_next_run_tomorrow() {
        let wait = duration_until_next_run(at(6, 0, 1), 6, 0).unwrap();
        assert_eq!(wait, Duration::from_secs(24 * 3600 - 1));
    }

    #[test]
    fn test_exact_time_waits_a_full_day() {
        let wait = duration_until_next_run(at(6, 0, 0), 6, 0).unwrap();
        assert_eq!(wait, Duration::from_secs(24 * 3600));
    }

    #[test]
    fn test_invalid_time() {
        assert!(duration_until_next_run(at(6, 0, 0), 24, 0).is_none());
        assert!(duration_until_next_run(at(6, 0, 0), 6, 60).is_none());
    }
}
