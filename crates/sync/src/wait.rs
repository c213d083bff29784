//! 等待上下文
//!
//! 描述“调用方在等待锁期间是否已被中断”。内核中通常对应当前任务是否有挂起信号。

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};

/// 等待方的中断来源
///
/// 可中断的加锁操作在每次获取失败后都会查询 [`WaitContext::interrupted`]。
pub trait WaitContext: Send + Sync {
    /// 调用方是否已被中断
    fn interrupted(&self) -> bool;
}

/// 永远不会被中断的上下文
///
/// 适用于初始化、拆除等不响应信号的路径。
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverInterrupted;

impl WaitContext for NeverInterrupted {
    fn interrupted(&self) -> bool {
        false
    }
}

/// 基于原子标志的中断来源
///
/// 其它执行上下文调用 [`InterruptFlag::raise`] 后，正在等待的加锁操作会放弃等待。
#[derive(Debug, Default)]
pub struct InterruptFlag {
    pending: AtomicBool,
}

impl InterruptFlag {
    /// 创建一个未触发的中断标志
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    /// 触发中断
    pub fn raise(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// 清除中断（例如信号已被处理）
    pub fn clear(&self) {
        self.pending.store(false, Ordering::Release);
    }
}

impl WaitContext for InterruptFlag {
    fn interrupted(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

/// 等待锁时被中断
///
/// 返回此错误时锁未被获取，被保护的数据未被修改，调用方可以重试。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted;

impl fmt::Display for Interrupted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("interrupted while waiting for lock")
    }
}
