//! Background cache warming for frequently used collections

mod job;
mod scheduler;
mod target;

pub use job::{CacheWarmingJob, WarmingOptions, WarmingReport};
pub use scheduler::{SchedulerHandle, SchedulerStatus, Trigger, WarmingScheduler};
pub use target::{ConceptSetWarmer, ConceptWarmer, WarmingTarget};
