pub mod calendar;
pub mod config;
pub mod error;

pub use calendar::{Calendar, hours_to_duration};
pub use config::{CalendarConfig, ScheduleConfig};
pub use error::{CalendarError, CalendarResult};
