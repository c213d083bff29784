//! 测试支持 crate
//!
//! 提供中断来源和用户缓冲区的 Mock 实现

#![no_std]

extern crate alloc;

pub mod mock;

pub use mock::{CountdownSignal, GatedReader, OverReportingReader, ShortReader, ShortWriter};
