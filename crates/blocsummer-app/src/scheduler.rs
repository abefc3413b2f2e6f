//! Daily trigger and the poll-and-sleep loop driving it.
//!
//! The loop wakes up every poll interval, compares local wall-clock time with
//! the next trigger and runs the job when it is due. Runs never overlap: the
//! job is awaited before the next poll.

use anyhow::{Context, Result};
use async_trait::async_trait;
use blocsummer_config::SchedulingConfig;
use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime, NaiveTime};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info};

/// Work done once per day.
#[async_trait]
pub trait DailyJob: Send + Sync {
    /// Run the job for `date`.
    async fn run(&self, date: NaiveDate) -> Result<()>;
}

/// Next trigger and last successful run of a once-a-day job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySchedule {
    at: NaiveTime,
    poll_interval: Duration,
    next_run: NaiveDateTime,
    last_success: Option<NaiveDate>,
}

impl DailySchedule {
    /// A schedule firing every day at `at`, first after `now`.
    pub fn new(at: NaiveTime, poll_interval: Duration, now: NaiveDateTime) -> Self {
        Self {
            at,
            poll_interval,
            next_run: Self::next_run_after(at, now),
            last_success: None,
        }
    }

    /// Builds the schedule from configuration.
    ///
    /// # Errors
    ///
    /// Fails when the configured time of day does not parse.
    pub fn from_config(config: &SchedulingConfig, now: NaiveDateTime) -> Result<Self> {
        let at = config
            .daily_time()
            .with_context(|| format!("Invalid daily run time {:?}", config.daily_at))?;
        Ok(Self::new(
            at,
            Duration::from_secs(config.poll_interval_seconds),
            now,
        ))
    }

    /// Today at `at` if that is still ahead of `now`, else tomorrow at `at`.
    pub fn next_run_after(at: NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date().and_time(at);
        if now < today {
            today
        } else {
            today + ChronoDuration::days(1)
        }
    }

    /// Whether the trigger has passed.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        now >= self.next_run
    }

    /// The next trigger.
    pub const fn next_run(&self) -> NaiveDateTime {
        self.next_run
    }

    /// Date of the last run that completed without error.
    pub const fn last_success(&self) -> Option<NaiveDate> {
        self.last_success
    }

    /// Sleep between due checks.
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Runs `job` for the date of `now`, then moves the trigger past the time
    /// `clock` reports once the job has finished.
    ///
    /// A failed run is logged and retried at the next trigger. Returns whether
    /// the run succeeded.
    pub async fn run_job<J, C>(&mut self, job: &J, now: NaiveDateTime, clock: C) -> bool
    where
        J: DailyJob + ?Sized,
        C: Fn() -> NaiveDateTime,
    {
        let date = now.date();
        info!("Starting daily run for {}", date);

        let succeeded = match job.run(date).await {
            Ok(()) => {
                self.last_success = Some(date);
                info!("Daily run for {} finished", date);
                true
            }
            Err(e) => {
                error!("Daily run for {} failed: {:#}", date, e);
                false
            }
        };

        // a run crossing the trigger time must not fire again on the next poll
        self.next_run = Self::next_run_after(self.at, clock());
        info!("Next run at {}", self.next_run);
        succeeded
    }

    /// Polls until `shutdown` completes, running `job` whenever it is due.
    ///
    /// `clock` supplies the current local wall-clock time.
    pub async fn run_until<J, C, S>(&mut self, job: &J, clock: C, shutdown: S)
    where
        J: DailyJob + ?Sized,
        C: Fn() -> NaiveDateTime,
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("Shutdown requested, leaving scheduler loop");
                    break;
                }
                () = tokio::time::sleep(self.poll_interval) => {}
            }

            let now = clock();
            if self.is_due(now) {
                self.run_job(job, now, &clock).await;
            } else {
                debug!("Not due yet, next run at {}", self.next_run);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::sync::Mutex;

    fn at(date: (i32, u32, u32), hm: (u32, u32)) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(date.0, date.1, date.2)
            .unwrap()
            .and_hms_opt(hm.0, hm.1, 0)
            .unwrap()
    }

    fn three_am() -> NaiveTime {
        NaiveTime::from_hms_opt(3, 0, 0).unwrap()
    }

    #[derive(Default)]
    struct RecordingJob {
        runs: Mutex<Vec<NaiveDate>>,
        fail: bool,
    }

    #[async_trait]
    impl DailyJob for RecordingJob {
        async fn run(&self, date: NaiveDate) -> Result<()> {
            self.runs.lock().unwrap().push(date);
            if self.fail {
                anyhow::bail!("site unreachable");
            }
            Ok(())
        }
    }

    #[test]
    fn test_next_run_after() {
        assert_eq!(
            DailySchedule::next_run_after(three_am(), at((2025, 7, 14), (1, 30))),
            at((2025, 7, 14), (3, 0))
        );
        assert_eq!(
            DailySchedule::next_run_after(three_am(), at((2025, 7, 14), (3, 0))),
            at((2025, 7, 15), (3, 0))
        );
        assert_eq!(
            DailySchedule::next_run_after(three_am(), at((2025, 7, 31), (18, 0))),
            at((2025, 8, 1), (3, 0))
        );
    }

    #[test]
    fn test_from_config() {
        let config = SchedulingConfig::default();
        let schedule = DailySchedule::from_config(&config, at((2025, 7, 14), (12, 0))).unwrap();
        assert_eq!(schedule.next_run(), at((2025, 7, 15), (3, 0)));
        assert_eq!(schedule.poll_interval(), Duration::from_secs(600));

        let bad = SchedulingConfig {
            daily_at: "3 Uhr".to_string(),
            ..SchedulingConfig::default()
        };
        assert!(DailySchedule::from_config(&bad, at((2025, 7, 14), (12, 0))).is_err());
    }

    #[tokio::test]
    async fn test_startup_run_before_trigger_keeps_same_day_trigger() {
        let mut schedule =
            DailySchedule::new(three_am(), Duration::from_secs(600), at((2025, 7, 14), (1, 0)));
        let job = RecordingJob::default();

        let start = at((2025, 7, 14), (1, 0));
        assert!(schedule.run_job(&job, start, || start).await);
        assert_eq!(schedule.last_success(), NaiveDate::from_ymd_opt(2025, 7, 14));
        assert_eq!(schedule.next_run(), at((2025, 7, 14), (3, 0)));
    }

    #[tokio::test]
    async fn test_failed_run_waits_for_next_day() {
        let mut schedule =
            DailySchedule::new(three_am(), Duration::from_secs(600), at((2025, 7, 14), (2, 0)));
        let job = RecordingJob {
            fail: true,
            ..RecordingJob::default()
        };

        let start = at((2025, 7, 14), (3, 5));
        assert!(!schedule.run_job(&job, start, || start).await);
        assert_eq!(schedule.last_success(), None);
        assert_eq!(schedule.next_run(), at((2025, 7, 15), (3, 0)));
    }

    #[tokio::test]
    async fn test_run_crossing_trigger_moves_to_next_day() {
        let start = at((2025, 7, 14), (2, 50));
        let mut schedule = DailySchedule::new(three_am(), Duration::from_secs(600), start);
        let job = RecordingJob::default();

        // started before the trigger, finished after it
        assert!(schedule.run_job(&job, start, || at((2025, 7, 14), (3, 10))).await);
        assert_eq!(schedule.next_run(), at((2025, 7, 15), (3, 0)));
        assert!(!schedule.is_due(at((2025, 7, 14), (3, 20))));
        assert_eq!(job.runs.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_runs_once_when_due() {
        let mut schedule =
            DailySchedule::new(three_am(), Duration::from_secs(600), at((2025, 7, 14), (2, 35)));
        let job = RecordingJob::default();

        // Each clock read is ten minutes later: polls at 02:45, 02:55, 03:05,
        // the run finishes at 03:15, then polls at 03:25, 03:35, 03:45.
        let now = Cell::new(at((2025, 7, 14), (2, 35)));
        let clock = || {
            now.set(now.get() + ChronoDuration::minutes(10));
            now.get()
        };
        let shutdown = tokio::time::sleep(Duration::from_secs(600 * 6 + 1));

        schedule.run_until(&job, clock, shutdown).await;

        assert_eq!(
            *job.runs.lock().unwrap(),
            vec![NaiveDate::from_ymd_opt(2025, 7, 14).unwrap()]
        );
        assert_eq!(schedule.next_run(), at((2025, 7, 15), (3, 0)));
        assert_eq!(now.get(), at((2025, 7, 14), (3, 45)));
    }
}
