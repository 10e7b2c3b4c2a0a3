pub mod date_adapter;
pub mod event;
pub mod time;

pub use date_adapter::{DateAdapter, ZonedAdapter};
pub use event::{Event, Overlap, Resizable, PREVIEW_EVENT_ID};
pub use time::TimeOfDay;
