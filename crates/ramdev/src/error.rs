//! ramdev 错误类型
//!
//! 定义设备核心层可能产生的错误，可通过 [`DevError::to_errno()`] 转换为驱动返回给内核的错误码。

use alloc::collections::TryReserveError;
use core::fmt;

/// 设备核心层错误类型
///
/// 各错误码对应 Linux errno 值。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevError {
    /// 等待设备门控锁时被中断 (-ERESTARTSYS)
    ///
    /// 未做任何修改，调用方可以重试或放弃。
    Interrupted,
    /// 内存分配失败 (-ENOMEM)
    AllocationError,
    /// 请求区间超出当前容量 (-EINVAL)
    ///
    /// 设备层把它报告为传输了 0 字节，而非硬错误。
    OutOfRange,
    /// 未识别的控制码 (-ENOTTY)
    UnrecognizedControl,
    /// 未识别的 seek 模式 (-EINVAL)
    UnrecognizedSeekMode,
    /// 设备不存在 (-ENODEV)
    NoDevice,
}

impl DevError {
    /// 转换为驱动返回值（负数 errno）
    pub fn to_errno(&self) -> isize {
        match self {
            DevError::AllocationError => -12,
            DevError::NoDevice => -19,
            DevError::OutOfRange => -22,
            DevError::UnrecognizedSeekMode => -22,
            DevError::UnrecognizedControl => -25,
            DevError::Interrupted => -512,
        }
    }

    /// 该错误是否值得原样重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, DevError::Interrupted)
    }
}

impl fmt::Display for DevError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            DevError::Interrupted => "interrupted while waiting for device",
            DevError::AllocationError => "could not allocate device memory",
            DevError::OutOfRange => "request extends past end of device",
            DevError::UnrecognizedControl => "unrecognized control code",
            DevError::UnrecognizedSeekMode => "unrecognized seek mode",
            DevError::NoDevice => "no such device",
        };
        f.write_str(msg)
    }
}

impl From<sync::Interrupted> for DevError {
    fn from(_: sync::Interrupted) -> Self {
        DevError::Interrupted
    }
}

impl From<TryReserveError> for DevError {
    fn from(_: TryReserveError) -> Self {
        DevError::AllocationError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_values() {
        assert_eq!(DevError::Interrupted.to_errno(), -512);
        assert_eq!(DevError::AllocationError.to_errno(), -12);
        assert_eq!(DevError::UnrecognizedControl.to_errno(), -25);
        assert_eq!(DevError::UnrecognizedSeekMode.to_errno(), -22);
        assert_eq!(DevError::NoDevice.to_errno(), -19);
    }

    #[test]
    fn test_only_interrupted_is_retryable() {
        assert!(DevError::Interrupted.is_retryable());
        assert!(!DevError::AllocationError.is_retryable());
        assert!(!DevError::OutOfRange.is_retryable());
        assert!(!DevError::UnrecognizedControl.is_retryable());
    }

    #[test]
    fn test_from_sync_interrupted() {
        assert_eq!(DevError::from(sync::Interrupted), DevError::Interrupted);
    }
}
