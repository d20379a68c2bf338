pub mod trends_report;

pub use trends_report::*;
