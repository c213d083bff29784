//! 同步原语
//!
//! 向设备模块提供可中断的互斥锁（门控锁）。
//!
//! 与普通自旋锁不同，[`Mutex::lock_interruptible`] 在等待期间会反复检查调用方的
//! [`WaitContext`]：一旦调用方被中断（例如收到挂起信号），等待立即放弃并返回
//! [`Interrupted`]，不会获得锁，也不会修改被保护的数据。
//!
//! # 组件
//!
//! - [`RawGate`] - 基于原子操作的原始锁，实现 [`lock_api::RawMutex`]
//! - [`Mutex`] - 包装 `lock_api::Mutex<RawGate, T>` 的数据锁
//! - [`WaitContext`] - 等待方的中断来源抽象

#![no_std]

mod mutex;
mod raw_gate;
mod wait;

pub use mutex::*;
pub use raw_gate::*;
pub use wait::*;
