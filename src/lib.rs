pub mod calendar;
pub mod scheduler;
pub mod storage;

pub use calendar::{DateAdapter, Event, Overlap, ZonedAdapter};
pub use scheduler::{build_view, Scheduler, SchedulerError, SchedulerView, ViewConfig};
