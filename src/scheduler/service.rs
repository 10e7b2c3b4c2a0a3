use chrono::{DateTime, Utc};

use crate::calendar::{DateAdapter, Event};
use super::days::build_days;
use super::diagnostics::{Diagnostics, NoopDiagnostics};
use super::error::SchedulerError;
use super::hour_grid::build_hour_grid;
use super::model::{GridHour, SchedulerView, ViewDay};
use super::options::ViewConfig;
use super::period::is_event_in_period;
use super::view::build_view;

/// Stateless entry point bundling a date adapter with a diagnostics sink.
pub struct Scheduler<A: DateAdapter> {
    adapter: A,
    diagnostics: Box<dyn Diagnostics>,
}

impl<A: DateAdapter> Scheduler<A> {
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            diagnostics: Box::new(NoopDiagnostics),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: impl Diagnostics + 'static) -> Self {
        self.diagnostics = Box::new(diagnostics);
        self
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn days(&self, view_date: DateTime<Utc>, config: &ViewConfig) -> Result<Vec<ViewDay>, SchedulerError> {
        build_days(&self.adapter, view_date, config)
    }

    pub fn hour_grid(&self, view_date: DateTime<Utc>, config: &ViewConfig) -> Result<Vec<GridHour>, SchedulerError> {
        build_hour_grid(&self.adapter, view_date, config)
    }

    pub fn is_event_in_period(&self, event: &Event, period_start: DateTime<Utc>, period_end: DateTime<Utc>) -> bool {
        is_event_in_period(&self.adapter, event, period_start, period_end)
    }

    pub fn view(
        &self,
        events: &[Event],
        view_date: DateTime<Utc>,
        config: &ViewConfig,
    ) -> Result<SchedulerView, SchedulerError> {
        build_view(&self.adapter, events, view_date, config, self.diagnostics.as_ref())
    }
}
