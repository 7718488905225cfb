//! Periodic background warming
//!
//! The scheduler only starts sweeps; it never waits for one to finish, so a
//! slow collection cannot delay the next tick of another.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use super::{CacheWarmingJob, WarmingTarget};

/// A job the scheduler can start
pub trait Trigger: Send + Sync {
    fn name(&self) -> &'static str;

    /// Starts the job in the background
    fn fire(self: Arc<Self>) -> JoinHandle<()>;
}

impl<W: WarmingTarget> Trigger for CacheWarmingJob<W> {
    fn name(&self) -> &'static str {
        CacheWarmingJob::name(self)
    }

    fn fire(self: Arc<Self>) -> JoinHandle<()> {
        self.trigger()
    }
}

/// Shortest interval the loop will run at
const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Snapshot of a running scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerStatus {
    pub running: bool,
    pub ticks: u64,
}

/// Fires every registered job on a fixed interval
pub struct WarmingScheduler {
    jobs: Vec<Arc<dyn Trigger>>,
    interval: Duration,
    run_on_startup: bool,
}

impl WarmingScheduler {
    /// Intervals shorter than one second are raised to one second.
    pub fn new(jobs: Vec<Arc<dyn Trigger>>, interval: Duration) -> Self {
        if interval < MIN_INTERVAL {
            tracing::warn!(
                requested_ms = interval.as_millis() as u64,
                "Warming interval too short, using {}s",
                MIN_INTERVAL.as_secs()
            );
        }

        Self {
            jobs,
            interval: interval.max(MIN_INTERVAL),
            run_on_startup: true,
        }
    }

    pub fn with_run_on_startup(mut self, run_on_startup: bool) -> Self {
        self.run_on_startup = run_on_startup;
        self
    }

    /// Spawns the scheduling loop
    ///
    /// The loop ends when [`SchedulerHandle::stop`] is called or the handle
    /// is dropped.
    pub fn start(self) -> SchedulerHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let ticks = Arc::new(AtomicU64::new(0));
        let tick_counter = Arc::clone(&ticks);

        let task = tokio::spawn(async move {
            let mut timer = interval(self.interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // The first tick completes immediately
            if !self.run_on_startup {
                timer.tick().await;
            }

            tracing::info!(
                jobs = self.jobs.len(),
                interval_secs = self.interval.as_secs(),
                "Warming scheduler started"
            );

            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        tick_counter.fetch_add(1, Ordering::Relaxed);

                        for job in &self.jobs {
                            tracing::debug!(job = job.name(), "Triggering warming job");
                            drop(Arc::clone(job).fire());
                        }
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            tracing::info!("Warming scheduler stopped");
        });

        SchedulerHandle {
            stop_tx,
            ticks,
            task,
        }
    }
}

/// Control handle for a started [`WarmingScheduler`]
pub struct SchedulerHandle {
    stop_tx: watch::Sender<bool>,
    ticks: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Asks the loop to stop; sweeps already running are left to finish
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    pub fn status(&self) -> SchedulerStatus {
        SchedulerStatus {
            running: !self.task.is_finished(),
            ticks: self.ticks.load(Ordering::Relaxed),
        }
    }

    /// Stops the loop and waits for it to exit
    pub async fn shutdown(self) {
        self.stop();

        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Warming scheduler task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct CountingTrigger {
        fired: AtomicUsize,
    }

    impl CountingTrigger {
        fn fired(&self) -> usize {
            self.fired.load(Ordering::SeqCst)
        }
    }

    impl Trigger for CountingTrigger {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn fire(self: Arc<Self>) -> JoinHandle<()> {
            self.fired.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async {})
        }
    }

    fn jobs(counting: &Arc<CountingTrigger>) -> Vec<Arc<dyn Trigger>> {
        let job: Arc<dyn Trigger> = counting.clone();
        vec![job]
    }

    /// Never finishes; proves the scheduler does not wait for sweeps
    struct StuckTrigger;

    impl Trigger for StuckTrigger {
        fn name(&self) -> &'static str {
            "stuck"
        }

        fn fire(self: Arc<Self>) -> JoinHandle<()> {
            tokio::spawn(std::future::pending::<()>())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_on_startup_and_every_interval() {
        let counting = Arc::new(CountingTrigger::default());
        let handle = WarmingScheduler::new(jobs(&counting), Duration::from_secs(60)).start();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(counting.fired(), 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(counting.fired(), 2);
        assert_eq!(handle.status().ticks, 2);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_one_interval_without_startup_run() {
        let counting = Arc::new(CountingTrigger::default());
        let handle = WarmingScheduler::new(jobs(&counting), Duration::from_secs(60))
            .with_run_on_startup(false)
            .start();

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert_eq!(counting.fired(), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(counting.fired(), 1);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_job_does_not_block_others() {
        let counting = Arc::new(CountingTrigger::default());
        let stuck: Arc<dyn Trigger> = Arc::new(StuckTrigger);
        let jobs = vec![stuck, counting.clone() as Arc<dyn Trigger>];
        let handle = WarmingScheduler::new(jobs, Duration::from_secs(10)).start();

        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(counting.fired(), 3);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_raised_to_minimum() {
        let counting = Arc::new(CountingTrigger::default());
        let handle = WarmingScheduler::new(jobs(&counting), Duration::ZERO).start();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(counting.fired(), 2);
        assert_eq!(
            handle.status(),
            SchedulerStatus {
                running: true,
                ticks: 2
            }
        );

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_loop() {
        let counting = Arc::new(CountingTrigger::default());
        let handle = WarmingScheduler::new(jobs(&counting), Duration::from_secs(60)).start();

        tokio::time::sleep(Duration::from_secs(1)).await;
        handle.stop();
        tokio::time::sleep(Duration::from_secs(300)).await;

        assert_eq!(counting.fired(), 1);
        assert!(!handle.status().running);
    }
}
