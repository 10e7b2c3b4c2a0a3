use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchedulerError {
    #[error("Invalid view parameters: {0}")]
    InvalidViewParameters(String),
    #[error("Invalid event {id}: {reason}")]
    InvalidEvent { id: i64, reason: String },
}
