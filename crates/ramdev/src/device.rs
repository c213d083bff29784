//! 设备实例
//!
//! 每个设备实例独占一块 [`StorageBuffer`]，所有操作（open、close、read、write、seek、
//! clear）都在同一把门控锁内完成。读写同样互斥：seek 扩容会替换底层内存，
//! 不能与任何访问并发。
//!
//! 文件位置由调用方（[`crate::Session`]）持有，以 `&mut i64` 传入，语义同内核的 `loff_t *ppos`。

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use log::{debug, info, warn};
use sync::{Mutex, WaitContext};

use crate::buffer::StorageBuffer;
use crate::error::DevError;
use crate::ioctl::{self, ASP_CLEAR_BUF};
use crate::transfer::{UserReader, UserWriter};

/// 设备名前缀，设备节点名为 `ramdev0`、`ramdev1` ...
pub const DEVICE_NAME_PREFIX: &str = "ramdev";

/// seek 的基准
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekMode {
    /// 绝对位置 (SEEK_SET)
    Absolute,
    /// 相对当前位置 (SEEK_CUR)
    Relative,
    /// 相对高水位，并按偏移量扩容 (SEEK_END)
    FromEnd,
}

impl SeekMode {
    /// SEEK_SET
    pub const SEEK_SET: u32 = 0;
    /// SEEK_CUR
    pub const SEEK_CUR: u32 = 1;
    /// SEEK_END
    pub const SEEK_END: u32 = 2;

    /// 从 lseek 的 whence 参数转换
    pub fn from_whence(whence: u32) -> Result<Self, DevError> {
        match whence {
            Self::SEEK_SET => Ok(SeekMode::Absolute),
            Self::SEEK_CUR => Ok(SeekMode::Relative),
            Self::SEEK_END => Ok(SeekMode::FromEnd),
            _ => Err(DevError::UnrecognizedSeekMode),
        }
    }
}

/// 设备状态快照（用于诊断）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceStats {
    /// 设备编号
    pub identity: usize,
    /// 当前容量
    pub capacity: usize,
    /// 高水位
    pub high_water_mark: usize,
    /// 打开计数
    pub open_count: usize,
}

impl fmt::Display for DeviceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}: capacity={} size={} opens={}",
            DEVICE_NAME_PREFIX, self.identity, self.capacity, self.high_water_mark, self.open_count
        )
    }
}

/// 锁内状态
#[derive(Debug)]
struct DeviceState {
    buffer: StorageBuffer,
    open_count: usize,
}

/// 内存模拟的存储设备
pub struct DeviceInstance {
    /// 设备编号，创建后不变
    identity: usize,

    /// 门控锁保护的状态
    state: Mutex<DeviceState>,
}

impl DeviceInstance {
    /// 创建指定初始容量的设备
    pub(crate) fn new(identity: usize, capacity: usize) -> Result<Self, DevError> {
        Ok(Self {
            identity,
            state: Mutex::new(DeviceState {
                buffer: StorageBuffer::allocate(capacity)?,
                open_count: 0,
            }),
        })
    }

    /// 获取设备编号
    pub fn identity(&self) -> usize {
        self.identity
    }

    /// 获取设备名
    pub fn name(&self) -> String {
        format!("{}{}", DEVICE_NAME_PREFIX, self.identity)
    }

    /// 记录一次打开
    ///
    /// # 返回值
    /// 打开后的计数
    pub fn open(&self, ctx: &dyn WaitContext) -> Result<usize, DevError> {
        let mut state = self.state.lock_interruptible(ctx)?;
        state.open_count += 1;
        debug!(
            "{}{}: opened, count={}",
            DEVICE_NAME_PREFIX, self.identity, state.open_count
        );
        Ok(state.open_count)
    }

    /// 记录一次关闭
    ///
    /// 计数不会降到 0 以下。
    ///
    /// # 返回值
    /// 关闭后的计数
    pub fn close(&self, ctx: &dyn WaitContext) -> Result<usize, DevError> {
        let mut state = self.state.lock_interruptible(ctx)?;
        match state.open_count.checked_sub(1) {
            Some(count) => state.open_count = count,
            None => warn!(
                "{}{}: close without matching open",
                DEVICE_NAME_PREFIX, self.identity
            ),
        }
        debug!(
            "{}{}: closed, count={}",
            DEVICE_NAME_PREFIX, self.identity, state.open_count
        );
        Ok(state.open_count)
    }

    /// 从 `*pos` 读取 `dst.len()` 字节
    ///
    /// 请求越过容量时不读取任何数据并返回 0。成功时 `*pos` 按实际传输量推进。
    pub fn read<W: UserWriter + ?Sized>(
        &self,
        ctx: &dyn WaitContext,
        dst: &mut W,
        pos: &mut i64,
    ) -> Result<usize, DevError> {
        let state = self.state.lock_interruptible(ctx)?;
        let result = match usize::try_from(*pos) {
            Ok(offset) => state.buffer.read_at(offset, dst),
            Err(_) => Err(DevError::OutOfRange),
        };
        match result {
            Ok(nbytes) => {
                *pos += nbytes as i64;
                debug!(
                    "{}{}: read nbytes={}, pos={}",
                    DEVICE_NAME_PREFIX, self.identity, nbytes, *pos
                );
                Ok(nbytes)
            }
            Err(DevError::OutOfRange) => {
                warn!(
                    "{}{}: read of {} bytes at {} past end of device (capacity {})",
                    DEVICE_NAME_PREFIX,
                    self.identity,
                    dst.len(),
                    *pos,
                    state.buffer.capacity()
                );
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    /// 把 `src` 写入 `*pos`
    ///
    /// 请求越过容量时不写入任何数据并返回 0。成功时 `*pos` 按实际传输量推进，
    /// 高水位只会前移。
    pub fn write<R: UserReader + ?Sized>(
        &self,
        ctx: &dyn WaitContext,
        src: &R,
        pos: &mut i64,
    ) -> Result<usize, DevError> {
        let mut state = self.state.lock_interruptible(ctx)?;
        let result = match usize::try_from(*pos) {
            Ok(offset) => state.buffer.write_at(offset, src),
            Err(_) => Err(DevError::OutOfRange),
        };
        match result {
            Ok(nbytes) => {
                *pos += nbytes as i64;
                debug!(
                    "{}{}: write nbytes={}, pos={}",
                    DEVICE_NAME_PREFIX, self.identity, nbytes, *pos
                );
                Ok(nbytes)
            }
            Err(DevError::OutOfRange) => {
                warn!(
                    "{}{}: write of {} bytes at {} past end of device (capacity {})",
                    DEVICE_NAME_PREFIX,
                    self.identity,
                    src.len(),
                    *pos,
                    state.buffer.capacity()
                );
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    /// 重新定位 `*pos`
    ///
    /// [`SeekMode::FromEnd`] 以高水位为基准，并且正偏移量会让容量增加同样的字节数。
    /// 扩容失败只记录日志，位置照常更新。负偏移量不会缩小容量。
    /// 结果为负时截断为 0。
    ///
    /// # 返回值
    /// 新位置
    pub fn seek(
        &self,
        ctx: &dyn WaitContext,
        mode: SeekMode,
        offset: i64,
        pos: &mut i64,
    ) -> Result<i64, DevError> {
        let mut state = self.state.lock_interruptible(ctx)?;

        let new_pos = match mode {
            SeekMode::Absolute => offset,
            SeekMode::Relative => pos.saturating_add(offset),
            SeekMode::FromEnd => {
                let end = i64::try_from(state.buffer.high_water_mark()).unwrap_or(i64::MAX);
                if offset > 0 {
                    let old_capacity = state.buffer.capacity();
                    let grown = usize::try_from(offset)
                        .ok()
                        .and_then(|delta| old_capacity.checked_add(delta))
                        .ok_or(DevError::AllocationError)
                        .and_then(|new_capacity| state.buffer.grow_to(new_capacity));
                    match grown {
                        Ok(()) => info!(
                            "{}{}: reallocated {} -> {} bytes",
                            DEVICE_NAME_PREFIX,
                            self.identity,
                            old_capacity,
                            state.buffer.capacity()
                        ),
                        Err(e) => warn!(
                            "{}{}: could not grow by {} bytes: {}",
                            DEVICE_NAME_PREFIX, self.identity, offset, e
                        ),
                    }
                }
                end.saturating_add(offset)
            }
        };

        *pos = new_pos.max(0);
        Ok(*pos)
    }

    /// 清空设备：全部容量置零，高水位和 `*pos` 复位为 0
    pub fn clear(&self, ctx: &dyn WaitContext, pos: &mut i64) -> Result<(), DevError> {
        let mut state = self.state.lock_interruptible(ctx)?;
        info!(
            "{}{}: clearing {} bytes",
            DEVICE_NAME_PREFIX,
            self.identity,
            state.buffer.capacity()
        );
        state.buffer.clear();
        *pos = 0;
        Ok(())
    }

    /// 执行控制命令
    ///
    /// 仅支持 [`ASP_CLEAR_BUF`]，其它命令返回 [`DevError::UnrecognizedControl`]。
    pub fn ioctl(&self, ctx: &dyn WaitContext, cmd: u32, pos: &mut i64) -> Result<(), DevError> {
        match cmd {
            ASP_CLEAR_BUF => self.clear(ctx, pos),
            _ => {
                warn!(
                    "{}{}: unknown ioctl {:#x} (type {:#x}, nr {})",
                    DEVICE_NAME_PREFIX,
                    self.identity,
                    cmd,
                    ioctl::ioc_type(cmd),
                    ioctl::ioc_nr(cmd)
                );
                Err(DevError::UnrecognizedControl)
            }
        }
    }

    /// 获取状态快照
    pub fn stats(&self, ctx: &dyn WaitContext) -> Result<DeviceStats, DevError> {
        let state = self.state.lock_interruptible(ctx)?;
        Ok(DeviceStats {
            identity: self.identity,
            capacity: state.buffer.capacity(),
            high_water_mark: state.buffer.high_water_mark(),
            open_count: state.open_count,
        })
    }

    /// 获取原始数据（用于调试）
    pub fn raw_data(&self, ctx: &dyn WaitContext) -> Result<Vec<u8>, DevError> {
        let state = self.state.lock_interruptible(ctx)?;
        let mut data = Vec::new();
        data.try_reserve_exact(state.buffer.capacity())?;
        data.extend_from_slice(state.buffer.as_bytes());
        Ok(data)
    }

    /// 占住门控锁，模拟另一个正在进行的操作
    #[cfg(test)]
    pub(crate) fn hold_gate(&self) -> impl Sized + '_ {
        self.state.lock()
    }
}

impl fmt::Debug for DeviceInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceInstance")
            .field("identity", &self.identity)
            .field("busy", &self.state.is_locked())
            .finish()
    }
}
