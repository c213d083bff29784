//! 原始门控锁
//!
//! 基于原子操作实现，供 `lock_api` 组装成带数据的锁。

use core::{
    hint,
    sync::atomic::{AtomicBool, Ordering},
};

use lock_api::{GuardSend, RawMutex};

/// 原始门控锁，仅维护一个占用标志。
///
/// 不可重入：持有锁时再次获取会一直等待。
///
/// # 示例
/// ```
/// use lock_api::RawMutex;
/// use sync::RawGate;
///
/// let gate = RawGate::new();
/// assert!(gate.try_lock());
/// assert!(!gate.try_lock());
/// unsafe { gate.unlock() };
/// assert!(!gate.is_locked());
/// ```
#[derive(Debug)]
pub struct RawGate {
    locked: AtomicBool,
}

impl RawGate {
    /// 创建一个未被占用的 RawGate。
    pub const fn new() -> Self {
        RawGate {
            locked: AtomicBool::new(false),
        }
    }
}

impl Default for RawGate {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: 占用标志通过 Acquire/Release 原子操作维护，同一时刻只有一个持有者。
unsafe impl RawMutex for RawGate {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = RawGate::new();

    type GuardMarker = GuardSend;

    fn lock(&self) {
        while !self.try_lock() {
            // 先只读等待，减少对缓存行的争用
            while self.locked.load(Ordering::Relaxed) {
                hint::spin_loop();
            }
        }
    }

    fn try_lock(&self) -> bool {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    unsafe fn unlock(&self) {
        self.locked.store(false, Ordering::Release);
    }

    fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_lock_excludes_second_owner() {
        let gate = RawGate::new();
        assert!(!gate.is_locked());
        assert!(gate.try_lock());
        assert!(gate.is_locked());
        assert!(!gate.try_lock());

        // SAFETY: the gate is held by this test.
        unsafe { gate.unlock() };
        assert!(!gate.is_locked());
        assert!(gate.try_lock());
    }

    #[test]
    fn test_lock_after_unlock() {
        let gate = RawGate::default();
        gate.lock();
        // SAFETY: acquired just above.
        unsafe { gate.unlock() };
        gate.lock();
        assert!(gate.is_locked());
    }
}
