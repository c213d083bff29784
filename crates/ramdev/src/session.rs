//! 会话 - 每个打开句柄的状态
//!
//! [`Session`] 绑定一个设备实例并维护文件位置。会话只借用设备（通过注册表按编号查找），
//! 因此在注册表拆除之前必须全部关闭。

use log::{debug, warn};
use sync::WaitContext;

use crate::device::{DeviceInstance, SeekMode};
use crate::error::DevError;
use crate::registry::Registry;
use crate::transfer::{UserReader, UserWriter};

/// 一个打开的设备句柄
///
/// 由调用方独占持有，等待设备时以 `ctx` 判断是否被中断。
///
/// 必须以 [`Session::close`] 结束：直接丢弃不会减少设备的打开计数。
#[must_use = "a session must be closed with `Session::close`"]
pub struct Session<'a> {
    device: &'a DeviceInstance,
    ctx: &'a dyn WaitContext,
    cursor: i64,
}

impl<'a> Session<'a> {
    /// 打开编号为 `identity` 的设备，位置从 0 开始
    pub fn open(
        registry: &'a Registry,
        identity: usize,
        ctx: &'a dyn WaitContext,
    ) -> Result<Self, DevError> {
        let device = registry.instance(identity)?;
        device.open(ctx)?;
        Ok(Self {
            device,
            ctx,
            cursor: 0,
        })
    }

    /// 关闭会话
    ///
    /// 被中断时会话原样返回，调用方可以稍后重试。
    pub fn close(self) -> Result<(), (Self, DevError)> {
        match self.device.close(self.ctx) {
            Ok(_) => {
                debug!("{}: session closed", self.device.name());
                Ok(())
            }
            Err(e) => Err((self, e)),
        }
    }

    /// 绑定的设备编号
    pub fn device_identity(&self) -> usize {
        self.device.identity()
    }

    /// 绑定的设备
    pub fn device(&self) -> &'a DeviceInstance {
        self.device
    }

    /// 当前位置
    pub fn position(&self) -> i64 {
        self.cursor
    }

    /// 从当前位置读取，位置按实际读取量推进
    pub fn read<W: UserWriter + ?Sized>(&mut self, dst: &mut W) -> Result<usize, DevError> {
        self.device.read(self.ctx, dst, &mut self.cursor)
    }

    /// 向当前位置写入，位置按实际写入量推进
    pub fn write<R: UserReader + ?Sized>(&mut self, src: &R) -> Result<usize, DevError> {
        self.device.write(self.ctx, src, &mut self.cursor)
    }

    /// 重新定位
    pub fn seek(&mut self, mode: SeekMode, offset: i64) -> Result<i64, DevError> {
        self.device.seek(self.ctx, mode, offset, &mut self.cursor)
    }

    /// lseek 入口：`whence` 为 SEEK_SET / SEEK_CUR / SEEK_END
    ///
    /// 未识别的 `whence` 返回 [`DevError::UnrecognizedSeekMode`]，位置不变。
    pub fn lseek(&mut self, offset: i64, whence: u32) -> Result<i64, DevError> {
        let mode = SeekMode::from_whence(whence).inspect_err(|_| {
            warn!("{}: invalid seek whence {}", self.device.name(), whence);
        })?;
        self.seek(mode, offset)
    }

    /// 清空设备并把位置复位为 0
    pub fn clear(&mut self) -> Result<(), DevError> {
        self.device.clear(self.ctx, &mut self.cursor)
    }

    /// ioctl 入口
    ///
    /// 清空命令不使用 `arg`。
    pub fn ioctl(&mut self, cmd: u32, _arg: usize) -> Result<isize, DevError> {
        self.device.ioctl(self.ctx, cmd, &mut self.cursor)?;
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ioctl::ASP_CLEAR_BUF;
    use sync::{InterruptFlag, NeverInterrupted};

    #[test]
    fn test_open_unknown_device() {
        let registry = Registry::initialize(1).unwrap();
        assert_eq!(
            Session::open(&registry, 1, &NeverInterrupted).err(),
            Some(DevError::NoDevice)
        );
    }

    #[test]
    fn test_cursor_follows_reads_and_writes() {
        let registry = Registry::initialize(1).unwrap();
        let mut session = Session::open(&registry, 0, &NeverInterrupted).unwrap();

        assert_eq!(session.write(&b"abcdef"[..]).unwrap(), 6);
        assert_eq!(session.position(), 6);

        session.seek(SeekMode::Absolute, 2).unwrap();
        let mut out = [0u8; 3];
        assert_eq!(session.read(&mut out[..]).unwrap(), 3);
        assert_eq!(&out, b"cde");
        assert_eq!(session.position(), 5);

        session.close().ok().unwrap();
    }

    #[test]
    fn test_lseek_rejects_unknown_whence() {
        let registry = Registry::initialize(1).unwrap();
        let mut session = Session::open(&registry, 0, &NeverInterrupted).unwrap();
        session.lseek(7, SeekMode::SEEK_SET).unwrap();

        assert_eq!(session.lseek(1, 9), Err(DevError::UnrecognizedSeekMode));
        assert_eq!(session.position(), 7);
    }

    #[test]
    fn test_ioctl_clear_resets_cursor() {
        let registry = Registry::initialize(1).unwrap();
        let mut session = Session::open(&registry, 0, &NeverInterrupted).unwrap();
        session.write(&b"xyz"[..]).unwrap();

        assert_eq!(session.ioctl(ASP_CLEAR_BUF, 0).unwrap(), 0);
        assert_eq!(session.position(), 0);
        assert_eq!(
            session.ioctl(ASP_CLEAR_BUF + 1, 0),
            Err(DevError::UnrecognizedControl)
        );
    }

    #[test]
    fn test_interrupted_close_returns_session() {
        let registry = Registry::initialize(1).unwrap();
        let flag = InterruptFlag::new();
        let session = Session::open(&registry, 0, &flag).unwrap();
        let device = session.device();

        flag.raise();
        let held = device.hold_gate();
        let (session, err) = match session.close() {
            Err(returned) => returned,
            Ok(()) => panic!("close should have been interrupted"),
        };
        assert_eq!(err, DevError::Interrupted);
        drop(held);

        flag.clear();
        session.close().ok().unwrap();
        assert_eq!(device.stats(&NeverInterrupted).unwrap().open_count, 0);
    }
}
