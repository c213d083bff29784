//! 可中断互斥锁
//!
//! 提供对数据的互斥访问，等待可被调用方的 [`WaitContext`] 打断。

use core::hint;

use crate::raw_gate::RawGate;
use crate::wait::{Interrupted, WaitContext};

/// [`Mutex`] 的 RAII 保护器，离开作用域时自动释放锁。
pub type MutexGuard<'a, T> = lock_api::MutexGuard<'a, RawGate, T>;

/// 提供对数据的互斥访问的锁结构体。
///
/// 所有访问者（无论读写）同样互斥。
///
/// # 示例
/// ```
/// use sync::{Mutex, NeverInterrupted};
///
/// let lock = Mutex::new(0);
/// {
///     let mut guard = lock.lock_interruptible(&NeverInterrupted).unwrap();
///     *guard += 1;
/// } // 离开作用域，自动释放锁
/// assert_eq!(*lock.lock(), 1);
/// ```
///
/// # 注意
/// Mutex 不是可重入的。持有锁时在同一执行上下文中再次调用 [`Mutex::lock`] 将导致死锁；
/// [`Mutex::lock_interruptible`] 则只会在中断到来时返回。
#[derive(Debug)]
pub struct Mutex<T> {
    inner: lock_api::Mutex<RawGate, T>,
}

impl<T> Mutex<T> {
    /// 创建一个新的 Mutex 实例，初始化内部数据。
    pub fn new(data: T) -> Self {
        Mutex {
            inner: lock_api::Mutex::new(data),
        }
    }

    /// 获取锁，不响应中断。
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.lock()
    }

    /// 获取锁，等待期间若 `ctx` 报告中断则放弃。
    ///
    /// 锁空闲时即使 `ctx` 已被中断也会成功获取。
    ///
    /// # 返回值
    /// 成功时返回保护器；被中断时返回 [`Interrupted`]，此时未持有锁。
    pub fn lock_interruptible(
        &self,
        ctx: &dyn WaitContext,
    ) -> Result<MutexGuard<'_, T>, Interrupted> {
        loop {
            if let Some(guard) = self.inner.try_lock() {
                return Ok(guard);
            }
            if ctx.interrupted() {
                return Err(Interrupted);
            }
            hint::spin_loop();
        }
    }

    /// 尝试获取锁，如果成功则返回 RAII 保护器，否则返回 None。
    pub fn try_lock(&self) -> Option<MutexGuard<'_, T>> {
        self.inner.try_lock()
    }

    /// 检查锁是否被占用 (仅用于调试/测试)
    pub fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }

    /// 获取内部数据的可变引用，独占借用保证无需加锁。
    pub fn get_mut(&mut self) -> &mut T {
        self.inner.get_mut()
    }

    /// 消耗锁并取回内部数据。
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}
