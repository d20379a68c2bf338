pub mod calendar;
pub mod trends;

pub use calendar::{CalendarEvent, CalendarSnapshot};
pub use trends::{NewsRef, TrendItem};
