//! Mock 实现

mod signal;
mod user_buf;

pub use signal::CountdownSignal;
pub use user_buf::{GatedReader, OverReportingReader, ShortReader, ShortWriter};
