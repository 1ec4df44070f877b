use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum HoursError {
    #[error("Invalid payload: hours must not be empty")]
    Empty,

    #[error("Invalid day_of_week {0}, expected 0 (Sunday) to 6 (Saturday)")]
    InvalidDay(u8),

    #[error("Day {0} appears more than once")]
    DuplicateDay(u8),

    #[error("Day {0} is open but has no open_time/close_time")]
    MissingTimes(u8),

    #[error("Invalid time {0:?}, expected HH:MM or HH:MM:SS")]
    InvalidTime(String),

    #[error("Hours store error: {0}")]
    Store(String),
}
