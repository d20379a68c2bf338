pub mod automation;
pub mod calendar;
pub mod notify;
pub mod storage;
pub mod trends;
