//! 用户缓冲区的 Mock 实现
//!
//! 模拟 `copy_to_user` / `copy_from_user` 在中途遇到不可访问页面的情况。

use alloc::vec;
use alloc::vec::Vec;
use core::hint;
use core::sync::atomic::{AtomicBool, Ordering};

use ramdev::{UserReader, UserWriter};

/// 只接受前 `accept` 字节的读目标
pub struct ShortWriter {
    /// 已接收的数据，长度为请求长度
    pub data: Vec<u8>,
    accept: usize,
}

impl ShortWriter {
    /// 请求 `len` 字节，但只有前 `accept` 字节可写
    pub fn new(len: usize, accept: usize) -> Self {
        Self {
            data: vec![0; len],
            accept,
        }
    }
}

impl UserWriter for ShortWriter {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn copy_to_user(&mut self, src: &[u8]) -> usize {
        let n = src.len().min(self.accept).min(self.data.len());
        self.data[..n].copy_from_slice(&src[..n]);
        n
    }
}

/// 只有前 `accept` 字节可读的写来源
pub struct ShortReader {
    data: Vec<u8>,
    accept: usize,
}

impl ShortReader {
    /// 提供 `data`，但只有前 `accept` 字节可读
    pub fn new(data: &[u8], accept: usize) -> Self {
        Self {
            data: data.to_vec(),
            accept,
        }
    }
}

impl UserReader for ShortReader {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn copy_from_user(&self, dst: &mut [u8]) -> usize {
        let n = dst.len().min(self.accept).min(self.data.len());
        dst[..n].copy_from_slice(&self.data[..n]);
        n
    }
}

/// 拷贝过程中停住的写来源
///
/// 写操作持有设备锁进入拷贝后，一直等到 [`GatedReader::release`] 才完成，
/// 用来在测试中制造“设备正忙”的窗口。
pub struct GatedReader {
    data: Vec<u8>,
    entered: AtomicBool,
    released: AtomicBool,
}

impl GatedReader {
    /// 创建一个尚未放行的来源
    pub fn new(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            entered: AtomicBool::new(false),
            released: AtomicBool::new(false),
        }
    }

    /// 等待拷贝开始（此时设备锁已被持有）
    pub fn wait_entered(&self) {
        while !self.entered.load(Ordering::Acquire) {
            hint::spin_loop();
        }
    }

    /// 放行拷贝
    pub fn release(&self) {
        self.released.store(true, Ordering::Release);
    }
}

impl UserReader for GatedReader {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn copy_from_user(&self, dst: &mut [u8]) -> usize {
        self.entered.store(true, Ordering::Release);
        while !self.released.load(Ordering::Acquire) {
            hint::spin_loop();
        }
        let n = dst.len().min(self.data.len());
        dst[..n].copy_from_slice(&self.data[..n]);
        n
    }
}

/// 报告的拷贝字节数比实际多 `excess` 的写来源
///
/// 模拟实现有误的拷贝原语。
pub struct OverReportingReader {
    data: Vec<u8>,
    excess: usize,
}

impl OverReportingReader {
    /// 提供 `data`，每次拷贝多报告 `excess` 字节
    pub fn new(data: &[u8], excess: usize) -> Self {
        Self {
            data: data.to_vec(),
            excess,
        }
    }
}

impl UserReader for OverReportingReader {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn copy_from_user(&self, dst: &mut [u8]) -> usize {
        let n = dst.len().min(self.data.len());
        dst[..n].copy_from_slice(&self.data[..n]);
        dst.len() + self.excess
    }
}
