//! 内存模拟存储设备
//!
//! 此 crate 提供若干个相互独立、编号固定的内存存储设备，包括：
//!
//! - [`StorageBuffer`] - 可增长、零初始化的设备内存
//! - [`DeviceInstance`] - 带门控锁的设备实例，提供 read/write/seek/clear
//! - [`Registry`] - 启动时创建、拆除时释放的设备表
//! - [`Session`] - 每个打开句柄的文件位置
//!
//! # 并发模型
//!
//! 每个设备只有一把互斥锁，读写和扩容同样互斥。等待锁的操作可被调用方的
//! [`sync::WaitContext`] 打断，此时返回 [`DevError::Interrupted`] 且不做任何修改。
//!
//! # 宿主对接
//!
//! 设备节点注册、主/次设备号分配属于宿主的注册层：它调用 [`Registry::initialize`]，
//! 按次设备号用 [`Registry::instance`] 查找设备，再把 open/read/write/llseek/ioctl
//! 转发给 [`Session`]。

#![no_std]

extern crate alloc;

mod buffer;
pub mod config;
mod device;
pub mod error;
pub mod ioctl;
mod registry;
mod session;
pub mod transfer;

// Re-export buffer
pub use buffer::StorageBuffer;

// Re-export config
pub use config::{DEFAULT_CAPACITY, DEFAULT_NUM_DEVICES, PAGE_SIZE, RamDevConfig};

// Re-export device
pub use device::{DEVICE_NAME_PREFIX, DeviceInstance, DeviceStats, SeekMode};

// Re-export error
pub use error::DevError;

// Re-export ioctl
pub use ioctl::ASP_CLEAR_BUF;

// Re-export registry
pub use registry::Registry;

// Re-export session
pub use session::Session;

// Re-export transfer
pub use transfer::{UserReader, UserWriter};

// Re-export sync types used in the public API
pub use sync::{InterruptFlag, NeverInterrupted, WaitContext};
