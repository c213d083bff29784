//! 中断来源的 Mock 实现

use core::sync::atomic::{AtomicUsize, Ordering};

use sync::WaitContext;

/// 被查询若干次之后报告中断的信号源
///
/// 模拟“等待一段时间后收到信号”的任务。
pub struct CountdownSignal {
    remaining: AtomicUsize,
    polls: AtomicUsize,
}

impl CountdownSignal {
    /// 前 `polls_before_interrupt` 次查询报告未中断，之后一直报告中断
    pub const fn new(polls_before_interrupt: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(polls_before_interrupt),
            polls: AtomicUsize::new(0),
        }
    }

    /// 已被查询的次数
    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::Relaxed)
    }
}

impl WaitContext for CountdownSignal {
    fn interrupted(&self) -> bool {
        self.polls.fetch_add(1, Ordering::Relaxed);
        self.remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_err()
    }
}
