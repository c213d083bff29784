//! 存储缓冲区
//!
//! 每个设备独占一块可增长、零初始化的连续内存，并记录写入过的最高位置（高水位）。

use alloc::vec::Vec;
use core::ops::Range;

use crate::error::DevError;
use crate::transfer::{UserReader, UserWriter};

/// 设备的存储缓冲区
///
/// 不变式：`high_water_mark() <= capacity()`；新分配和扩容得到的字节均为 0。
#[derive(Debug)]
pub struct StorageBuffer {
    /// 数据，长度即容量
    bytes: Vec<u8>,

    /// 曾经成功写入的最大 `offset + len`
    high_water_mark: usize,
}

impl StorageBuffer {
    /// 分配 `capacity` 字节的零初始化缓冲区
    ///
    /// # 返回值
    /// 内存不足时返回 [`DevError::AllocationError`]
    pub fn allocate(capacity: usize) -> Result<Self, DevError> {
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(capacity)?;
        bytes.resize(capacity, 0);
        Ok(Self {
            bytes,
            high_water_mark: 0,
        })
    }

    /// 当前容量（字节）
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// 逻辑大小（高水位）
    pub fn high_water_mark(&self) -> usize {
        self.high_water_mark
    }

    /// 只读访问全部数据
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// 扩容到 `new_capacity`，原有内容保留在前缀，新增部分为 0
    ///
    /// `new_capacity` 不大于当前容量时什么也不做。分配失败时缓冲区保持原样。
    pub fn grow_to(&mut self, new_capacity: usize) -> Result<(), DevError> {
        let Some(additional) = new_capacity.checked_sub(self.capacity()) else {
            return Ok(());
        };
        self.bytes.try_reserve_exact(additional)?;
        self.bytes.resize(new_capacity, 0);
        Ok(())
    }

    /// 检查 `[offset, offset + len)` 是否落在容量内
    fn span(&self, offset: usize, len: usize) -> Result<Range<usize>, DevError> {
        match offset.checked_add(len) {
            Some(end) if end <= self.capacity() => Ok(offset..end),
            _ => Err(DevError::OutOfRange),
        }
    }

    /// 从 `offset` 读取 `dst.len()` 字节到 `dst`
    ///
    /// 区间越界时不拷贝任何数据（不做部分读取）。
    ///
    /// # 返回值
    /// 拷贝原语实际传输的字节数，不超过请求长度
    pub fn read_at<W: UserWriter + ?Sized>(
        &self,
        offset: usize,
        dst: &mut W,
    ) -> Result<usize, DevError> {
        let range = self.span(offset, dst.len())?;
        let len = range.len();
        Ok(dst.copy_to_user(&self.bytes[range]).min(len))
    }

    /// 把 `src` 写入 `offset` 处，并按实际写入量推进高水位
    ///
    /// 区间越界时不修改任何数据。
    ///
    /// # 返回值
    /// 拷贝原语实际传输的字节数，不超过请求长度
    pub fn write_at<R: UserReader + ?Sized>(
        &mut self,
        offset: usize,
        src: &R,
    ) -> Result<usize, DevError> {
        let range = self.span(offset, src.len())?;
        let len = range.len();
        let written = src.copy_from_user(&mut self.bytes[range]).min(len);
        self.high_water_mark = self.high_water_mark.max(offset + written);
        Ok(written)
    }

    /// 清零全部容量并把高水位复位为 0
    pub fn clear(&mut self) {
        self.bytes.fill(0);
        self.high_water_mark = 0;
    }
}
