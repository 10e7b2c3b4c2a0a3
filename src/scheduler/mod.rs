pub mod days;
pub mod diagnostics;
pub mod error;
pub mod hour_grid;
pub mod interaction;
pub mod model;
pub mod options;
pub mod overlap;
pub mod period;
pub mod service;
pub mod view;

pub use days::build_days;
pub use diagnostics::{Diagnostic, Diagnostics, NoopDiagnostics, OverlapRule, TracingDiagnostics};
pub use error::SchedulerError;
pub use hour_grid::build_hour_grid;
pub use model::{GridHour, GridSegment, SchedulerView, ViewDay, ViewEvent, ViewHour, ViewHourSegment, ViewPeriod};
pub use options::ViewConfig;
pub use period::is_event_in_period;
pub use service::Scheduler;
pub use view::build_view;
